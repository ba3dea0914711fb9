//! CPU-side Resources
//!
//! Plain data describing what the render backend makes GPU-resident:
//!
//! - [`Geometry`]: vertex attributes, indices, topology and bounding volumes
//! - [`Material`]: unlit line or surface material, optionally mapped
//! - [`Texture`]: RGBA8 image with its sampler
//! - [`Color`]/[`ColorValue`]: packed colors and the random-color sentinel
//! - [`primitives`]: tube, box and edge-extraction builders

pub mod color;
pub mod geometry;
pub mod material;
pub mod primitives;
pub mod texture;

pub use color::{Color, ColorValue};
pub use geometry::{Attribute, BoundingBox, BoundingSphere, Geometry};
pub use material::{LineBasicMaterial, Material, MaterialData, MaterialSettings, MeshBasicMaterial, Side};
pub use primitives::{TubeOptions, create_box, create_edges, create_tube};
pub use texture::{Texture, TextureSampler, TextureSlot, TextureTransform};
