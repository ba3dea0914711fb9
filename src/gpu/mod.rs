//! Render Backend Seam
//!
//! [`RenderBackend`] is the only way CPU-side resources become GPU-resident.
//! Every upload returns a slot-map id; the holder of that id is responsible for
//! handing it back through the matching `dispose_*` call exactly once.
//!
//! [`HeadlessBackend`] keeps full residency bookkeeping without a device and
//! is what the tests and the demo run against. A windowed wgpu backend
//! implements the same trait outside this crate.

pub mod headless;

pub use headless::{BackendStats, HeadlessBackend, PipelineState, RenderedFrame};

use slotmap::new_key_type;
use wgpu::TextureFormat;

use crate::errors::Result;
use crate::resources::{Geometry, Material, Texture};
use crate::scene::{Camera, Scene};

new_key_type! {
    pub struct GpuGeometryId;
    pub struct GpuMaterialId;
    pub struct GpuTextureId;
}

/// Size and pixel format of the presentation surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceInfo {
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

impl SurfaceInfo {
    #[must_use]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Everything a backend needs to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub scene: &'a Scene,
    pub camera: &'a Camera,
    /// Frame timestamp in milliseconds
    pub time: f64,
}

pub trait RenderBackend {
    fn upload_geometry(&mut self, geometry: &Geometry) -> Result<GpuGeometryId>;

    /// Uploads `material`; `map` is the resident texture for its map slot.
    /// Fails with a construction error when the material samples a map but none is given.
    fn upload_material(&mut self, material: &Material, map: Option<GpuTextureId>) -> Result<GpuMaterialId>;

    fn upload_texture(&mut self, texture: &Texture) -> Result<GpuTextureId>;

    fn dispose_geometry(&mut self, id: GpuGeometryId) -> Result<()>;
    fn dispose_material(&mut self, id: GpuMaterialId) -> Result<()>;
    fn dispose_texture(&mut self, id: GpuTextureId) -> Result<()>;

    fn resize(&mut self, width: u32, height: u32);
    fn surface(&self) -> SurfaceInfo;

    fn render(&mut self, frame: &FrameView<'_>) -> Result<()>;
}

/// Lets a caller keep ownership of a backend while a controller drives it.
impl<B: RenderBackend + ?Sized> RenderBackend for &mut B {
    fn upload_geometry(&mut self, geometry: &Geometry) -> Result<GpuGeometryId> {
        (**self).upload_geometry(geometry)
    }

    fn upload_material(&mut self, material: &Material, map: Option<GpuTextureId>) -> Result<GpuMaterialId> {
        (**self).upload_material(material, map)
    }

    fn upload_texture(&mut self, texture: &Texture) -> Result<GpuTextureId> {
        (**self).upload_texture(texture)
    }

    fn dispose_geometry(&mut self, id: GpuGeometryId) -> Result<()> {
        (**self).dispose_geometry(id)
    }

    fn dispose_material(&mut self, id: GpuMaterialId) -> Result<()> {
        (**self).dispose_material(id)
    }

    fn dispose_texture(&mut self, id: GpuTextureId) -> Result<()> {
        (**self).dispose_texture(id)
    }

    fn resize(&mut self, width: u32, height: u32) {
        (**self).resize(width, height);
    }

    fn surface(&self) -> SurfaceInfo {
        (**self).surface()
    }

    fn render(&mut self, frame: &FrameView<'_>) -> Result<()> {
        (**self).render(frame)
    }
}
