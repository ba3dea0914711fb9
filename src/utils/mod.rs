//! Utility Module
//!
//! - [`FrameClock`]: timestamp source for the frame driver ([`SystemClock`], [`ManualClock`])
//! - [`FrameStats`]: frame counters and FPS measurement
//! - [`OrbitControls`]: damped look-around for inspecting the tunnel

pub mod fps_counter;
pub mod orbit_control;
pub mod time;

pub use fps_counter::FrameStats;
pub use orbit_control::{ControlInput, OrbitControls};
pub use time::{FrameClock, ManualClock, SystemClock};
