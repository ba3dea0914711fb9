//! Render Scene
//!
//! The scene the backend draws each frame:
//! - [`Scene`]: flat, slot-map keyed container of attached objects
//! - [`Environment`]: background, exponential fog and bloom parameters
//! - [`Camera`]: perspective camera with view frustum
//! - [`Transform`]: position/rotation/scale with cached local matrix

pub mod camera;
pub mod environment;
pub mod scene;
pub mod transform;

pub use camera::{Camera, Frustum};
pub use environment::{BloomSettings, Environment, Fog};
pub use scene::{Scene, SceneObject};
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct ObjectKey;
}
