//! # Flythrough
//!
//! Core of an interactive tunnel flythrough: a camera travels along a closed
//! 3D curve while a tube and a field of small elements are procedurally
//! regenerated around it under live style parameters.
//!
//! The crate provides:
//! - [`Path`]: the periodic, arc-length parametrized curve
//! - [`ProceduralGenerator`]: tube and element construction with outline fallback
//! - [`ResourceLifecycleManager`]: one live generation per group, old one disposed on install
//! - [`CameraPathAnimator`]: time-based progress that survives speed and direction changes
//! - [`FrameDriver`]: the per-frame advance, render, controls sequence
//! - [`FlythroughController`]: the session object hosts talk to
//!
//! Rendering goes through the [`RenderBackend`] trait; [`HeadlessBackend`]
//! tracks residency without a device.
//!
//! ```rust,ignore
//! use flythrough::{FlythroughController, FlythroughSettings, HeadlessBackend, SystemClock, Viewport};
//!
//! let mut controller = FlythroughController::new(
//!     Viewport::new(1280, 720),
//!     FlythroughSettings::default(),
//!     HeadlessBackend::default(),
//!     Box::new(SystemClock::new()),
//! )?;
//! controller.update_camera_speed(500.0)?;
//! controller.frame();
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod animator;
pub mod controller;
pub mod driver;
pub mod errors;
pub mod generator;
pub mod gpu;
pub mod lifecycle;
pub mod path;
pub mod resources;
pub mod scene;
pub mod settings;
pub mod style;
pub mod utils;

pub use animator::{AnimatorConfig, CameraMotionState, CameraPathAnimator, CameraPose};
pub use controller::{ControlCommand, ControllerHandle, FlythroughController, Viewport};
pub use driver::{FrameDriver, FrameOutcome};
pub use errors::{FlythroughError, Result};
pub use generator::{ElementPlacement, ProceduralGenerator, TextureLibrary, Treatment};
pub use gpu::{HeadlessBackend, RenderBackend, SurfaceInfo};
pub use lifecycle::{GeneratedAsset, GroupId, InstallReport, ResourceLifecycleManager};
pub use path::Path;
pub use resources::{Color, ColorValue, Geometry, Material, Texture, TextureSlot};
pub use scene::{Camera, Scene};
pub use settings::FlythroughSettings;
pub use style::{ElementStyle, ElementStyleUpdate, TubeStyle, TubeStyleUpdate, VisualStyle};
pub use utils::{ControlInput, FrameClock, FrameStats, ManualClock, OrbitControls, SystemClock};
