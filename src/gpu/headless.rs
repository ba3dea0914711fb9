use glam::Mat3;
use slotmap::SlotMap;
use wgpu::{Face, PrimitiveTopology, TextureFormat};

use crate::errors::{FlythroughError, Result};
use crate::gpu::{FrameView, GpuGeometryId, GpuMaterialId, GpuTextureId, RenderBackend, SurfaceInfo};
use crate::resources::{Geometry, Material, Texture, TextureSampler};

#[derive(Debug)]
struct ResidentGeometry {
    label: String,
    bytes: usize,
}

#[derive(Debug)]
struct ResidentMaterial {
    shader: &'static str,
    map: Option<GpuTextureId>,
    pipeline: PipelineState,
}

#[derive(Debug)]
struct ResidentTexture {
    name: String,
    bytes: usize,
    sampler: TextureSampler,
}

/// Pipeline and binding state a resident material was created with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineState {
    pub cull_mode: Option<Face>,
    pub fog: bool,
    /// UV matrix applied to the map, when the material samples one
    pub uv_transform: Option<Mat3>,
}

/// Counters of everything the backend has been asked to do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackendStats {
    pub geometry_uploads: u64,
    pub material_uploads: u64,
    pub texture_uploads: u64,
    pub geometry_disposals: u64,
    pub material_disposals: u64,
    pub texture_disposals: u64,
    pub frames_rendered: u64,
}

/// What the most recent successful render drew.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderedFrame {
    pub objects: usize,
    /// Objects passing the frustum test
    pub visible: usize,
    pub line_draws: usize,
    pub triangle_draws: usize,
    pub fog: bool,
    pub bloom: bool,
}

/// A device-less backend that tracks residency exactly as a GPU backend would.
///
/// Failures can be injected to exercise the recovery paths of the callers.
#[derive(Debug)]
pub struct HeadlessBackend {
    surface: SurfaceInfo,
    geometries: SlotMap<GpuGeometryId, ResidentGeometry>,
    materials: SlotMap<GpuMaterialId, ResidentMaterial>,
    textures: SlotMap<GpuTextureId, ResidentTexture>,
    stats: BackendStats,
    last_frame: Option<RenderedFrame>,

    failing_uploads: u32,
    failing_disposals: u32,
    failing_renders: u32,
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl HeadlessBackend {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            surface: SurfaceInfo {
                width,
                height,
                format: TextureFormat::Bgra8UnormSrgb,
            },
            geometries: SlotMap::with_key(),
            materials: SlotMap::with_key(),
            textures: SlotMap::with_key(),
            stats: BackendStats::default(),
            last_frame: None,
            failing_uploads: 0,
            failing_disposals: 0,
            failing_renders: 0,
        }
    }

    // ========================================================================
    // Failure Injection
    // ========================================================================

    /// The next `count` uploads of any kind fail with a construction error.
    pub fn fail_next_uploads(&mut self, count: u32) {
        self.failing_uploads = count;
    }

    /// The next `count` disposals fail. The resource stays resident (leaks).
    pub fn fail_next_disposals(&mut self, count: u32) {
        self.failing_disposals = count;
    }

    pub fn fail_next_renders(&mut self, count: u32) {
        self.failing_renders = count;
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    #[must_use]
    pub fn stats(&self) -> BackendStats {
        self.stats
    }

    #[must_use]
    pub fn last_frame(&self) -> Option<RenderedFrame> {
        self.last_frame
    }

    #[must_use]
    pub fn resident_geometries(&self) -> usize {
        self.geometries.len()
    }

    #[must_use]
    pub fn resident_materials(&self) -> usize {
        self.materials.len()
    }

    #[must_use]
    pub fn resident_textures(&self) -> usize {
        self.textures.len()
    }

    #[must_use]
    pub fn is_geometry_resident(&self, id: GpuGeometryId) -> bool {
        self.geometries.contains_key(id)
    }

    #[must_use]
    pub fn is_material_resident(&self, id: GpuMaterialId) -> bool {
        self.materials.contains_key(id)
    }

    #[must_use]
    pub fn is_texture_resident(&self, id: GpuTextureId) -> bool {
        self.textures.contains_key(id)
    }

    /// The texture a resident material samples.
    #[must_use]
    pub fn material_map(&self, id: GpuMaterialId) -> Option<GpuTextureId> {
        self.materials.get(id).and_then(|m| m.map)
    }

    #[must_use]
    pub fn material_shader(&self, id: GpuMaterialId) -> Option<&'static str> {
        self.materials.get(id).map(|m| m.shader)
    }

    #[must_use]
    pub fn material_pipeline(&self, id: GpuMaterialId) -> Option<PipelineState> {
        self.materials.get(id).map(|m| m.pipeline)
    }

    #[must_use]
    pub fn texture_sampler(&self, id: GpuTextureId) -> Option<TextureSampler> {
        self.textures.get(id).map(|t| t.sampler)
    }

    /// Bytes held by resident geometries and textures.
    #[must_use]
    pub fn resident_bytes(&self) -> usize {
        self.geometries.values().map(|g| g.bytes).sum::<usize>()
            + self.textures.values().map(|t| t.bytes).sum::<usize>()
    }

    fn take_upload_failure(&mut self, what: &str) -> Result<()> {
        if self.failing_uploads > 0 {
            self.failing_uploads -= 1;
            return Err(FlythroughError::Construction(format!("{what} upload rejected")));
        }
        Ok(())
    }

    fn take_disposal_failure(&mut self, what: &str) -> Result<()> {
        if self.failing_disposals > 0 {
            self.failing_disposals -= 1;
            return Err(FlythroughError::ResourceDisposal(format!("{what} release rejected")));
        }
        Ok(())
    }
}

impl RenderBackend for HeadlessBackend {
    fn upload_geometry(&mut self, geometry: &Geometry) -> Result<GpuGeometryId> {
        self.take_upload_failure("geometry")?;
        if geometry.index_attribute().is_some() && geometry.vertex_count() == 0 {
            return Err(FlythroughError::Construction(format!(
                "geometry `{}` has indices but no positions",
                geometry.label
            )));
        }
        self.stats.geometry_uploads += 1;
        Ok(self.geometries.insert(ResidentGeometry {
            label: geometry.label.clone(),
            bytes: geometry.byte_size(),
        }))
    }

    fn upload_material(&mut self, material: &Material, map: Option<GpuTextureId>) -> Result<GpuMaterialId> {
        self.take_upload_failure("material")?;
        let map = match (material.map(), map) {
            (Some(slot), None) => {
                return Err(FlythroughError::Construction(format!(
                    "material samples texture slot {slot:?} but no texture is resident"
                )));
            }
            (Some(_), Some(id)) if !self.textures.contains_key(id) => {
                return Err(FlythroughError::Construction("material map is not resident".to_string()));
            }
            (Some(_), Some(id)) => Some(id),
            (None, _) => None,
        };
        self.stats.material_uploads += 1;
        Ok(self.materials.insert(ResidentMaterial {
            shader: material.shader_name(),
            map,
            pipeline: PipelineState {
                cull_mode: material.settings.side.cull_mode(),
                fog: material.settings.fog,
                uv_transform: material.map_matrix(),
            },
        }))
    }

    fn upload_texture(&mut self, texture: &Texture) -> Result<GpuTextureId> {
        self.take_upload_failure("texture")?;
        let expected = texture.bytes_per_row() as usize * texture.height as usize;
        if texture.byte_size() < expected {
            return Err(FlythroughError::Construction(format!(
                "texture `{}` holds {} bytes, {}x{} needs {expected}",
                texture.name,
                texture.byte_size(),
                texture.width,
                texture.height
            )));
        }
        self.stats.texture_uploads += 1;
        Ok(self.textures.insert(ResidentTexture {
            name: texture.name.clone(),
            bytes: texture.byte_size(),
            sampler: texture.sampler,
        }))
    }

    fn dispose_geometry(&mut self, id: GpuGeometryId) -> Result<()> {
        self.take_disposal_failure("geometry")?;
        let geometry = self
            .geometries
            .remove(id)
            .ok_or_else(|| FlythroughError::ResourceDisposal("geometry is not resident".to_string()))?;
        log::trace!("Released geometry `{}`", geometry.label);
        self.stats.geometry_disposals += 1;
        Ok(())
    }

    fn dispose_material(&mut self, id: GpuMaterialId) -> Result<()> {
        self.take_disposal_failure("material")?;
        self.materials
            .remove(id)
            .ok_or_else(|| FlythroughError::ResourceDisposal("material is not resident".to_string()))?;
        self.stats.material_disposals += 1;
        Ok(())
    }

    fn dispose_texture(&mut self, id: GpuTextureId) -> Result<()> {
        self.take_disposal_failure("texture")?;
        let texture = self
            .textures
            .remove(id)
            .ok_or_else(|| FlythroughError::ResourceDisposal("texture is not resident".to_string()))?;
        log::debug!("Released texture `{}`", texture.name);
        self.stats.texture_disposals += 1;
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.surface.width = width;
        self.surface.height = height;
    }

    fn surface(&self) -> SurfaceInfo {
        self.surface
    }

    fn render(&mut self, frame: &FrameView<'_>) -> Result<()> {
        if self.failing_renders > 0 {
            self.failing_renders -= 1;
            return Err(FlythroughError::Render("surface lost".to_string()));
        }

        let frustum = frame.camera.frustum();
        let mut drawn = RenderedFrame {
            fog: frame.scene.environment.fog.is_some(),
            bloom: frame.scene.environment.bloom.enabled,
            ..RenderedFrame::default()
        };

        for (_, object) in frame.scene.iter() {
            if !self.geometries.contains_key(object.geometry)
                || object.materials.iter().any(|m| !self.materials.contains_key(*m))
            {
                return Err(FlythroughError::Render(format!(
                    "object `{}` references released resources",
                    object.name
                )));
            }
            drawn.objects += 1;
            if !object.visible {
                continue;
            }
            let in_view = object
                .world_bounding_sphere()
                .is_none_or(|s| frustum.intersects_sphere(s.center, s.radius));
            if !in_view {
                continue;
            }
            drawn.visible += 1;
            match object.topology {
                PrimitiveTopology::LineList | PrimitiveTopology::LineStrip => drawn.line_draws += 1,
                _ => drawn.triangle_draws += 1,
            }
        }

        self.stats.frames_rendered += 1;
        self.last_frame = Some(drawn);
        Ok(())
    }
}
