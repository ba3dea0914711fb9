use std::sync::Arc;

use glam::{Affine3A, Vec3};
use rustc_hash::FxHashMap;
use wgpu::{BufferUsages, PrimitiveTopology, VertexFormat, VertexStepMode};

/// A vertex attribute: CPU-side bytes plus the layout a GPU upload needs.
#[derive(Debug, Clone)]
pub struct Attribute {
    /// Raw bytes, shared so that clones of a geometry don't copy vertex data
    pub data: Arc<Vec<u8>>,
    pub format: VertexFormat,
    pub count: u32,
    pub stride: u64,
    pub step_mode: VertexStepMode,
}

impl Attribute {
    /// Creates a planar (non-interleaved) attribute.
    pub fn new_planar<T: bytemuck::Pod>(data: &[T], format: VertexFormat) -> Self {
        Self {
            data: Arc::new(bytemuck::cast_slice(data).to_vec()),
            format,
            count: data.len() as u32,
            stride: std::mem::size_of::<T>() as u64,
            step_mode: VertexStepMode::Vertex,
        }
    }

    #[inline]
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    pub fn read_vec3(&self, i: u32) -> Option<Vec3> {
        if self.format != VertexFormat::Float32x3 {
            return None;
        }
        let offset = (i as usize) * self.stride as usize;
        let bytes = self.data.get(offset..offset + 12)?;
        let vals: [f32; 3] = bytemuck::pod_read_unaligned(bytes);
        Some(Vec3::from_array(vals))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub fn center(&self) -> Vec3 { (self.min + self.max) * 0.5 }
    pub fn size(&self) -> Vec3 { self.max - self.min }
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    /// Conservative world-space sphere: the radius grows with the largest axis scale.
    #[must_use]
    pub fn transform(&self, matrix: &Affine3A) -> Self {
        let scale = matrix
            .matrix3
            .x_axis
            .length()
            .max(matrix.matrix3.y_axis.length())
            .max(matrix.matrix3.z_axis.length());
        Self {
            center: matrix.transform_point3(self.center),
            radius: self.radius * scale,
        }
    }
}

/// CPU-side geometry, described in the vocabulary of a wgpu upload.
#[derive(Debug, Clone)]
pub struct Geometry {
    pub label: String,
    attributes: FxHashMap<String, Attribute>,
    index_attribute: Option<Attribute>,
    pub topology: PrimitiveTopology,
    pub bounding_box: Option<BoundingBox>,
    pub bounding_sphere: Option<BoundingSphere>,
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new()
    }
}

impl Geometry {
    pub fn new() -> Self {
        Self {
            label: "Geometry".to_string(),
            attributes: FxHashMap::default(),
            index_attribute: None,
            topology: PrimitiveTopology::TriangleList,
            bounding_box: None,
            bounding_sphere: None,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn attributes(&self) -> &FxHashMap<String, Attribute> {
        &self.attributes
    }

    pub fn index_attribute(&self) -> Option<&Attribute> {
        self.index_attribute.as_ref()
    }

    pub fn set_attribute(&mut self, name: &str, attr: Attribute) {
        self.attributes.insert(name.to_string(), attr);
    }

    pub fn get_attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn set_indices(&mut self, indices: &[u16]) {
        self.index_attribute = Some(Attribute::new_planar(indices, VertexFormat::Uint16));
    }

    pub fn set_indices_u32(&mut self, indices: &[u32]) {
        self.index_attribute = Some(Attribute::new_planar(indices, VertexFormat::Uint32));
    }

    /// Stores indices in the narrowest format that can address every vertex.
    pub fn set_index_list(&mut self, indices: &[u32]) {
        if self.vertex_count() <= u32::from(u16::MAX) {
            let narrow: Vec<u16> = indices.iter().map(|&i| i as u16).collect();
            self.set_indices(&narrow);
        } else {
            self.set_indices_u32(indices);
        }
    }

    /// Index list widened to `u32`, or `None` for non-indexed geometry.
    pub fn indices(&self) -> Option<Vec<u32>> {
        let attr = self.index_attribute.as_ref()?;
        match attr.format {
            // The byte vector carries no alignment guarantee, so read element-wise
            VertexFormat::Uint16 => Some(
                attr.data
                    .chunks_exact(2)
                    .map(|c| u32::from(bytemuck::pod_read_unaligned::<u16>(c)))
                    .collect(),
            ),
            VertexFormat::Uint32 => Some(
                attr.data
                    .chunks_exact(4)
                    .map(bytemuck::pod_read_unaligned::<u32>)
                    .collect(),
            ),
            _ => None,
        }
    }

    pub fn vertex_count(&self) -> u32 {
        self.attributes.get("position").map_or(0, |a| a.count)
    }

    /// Number of indices (or vertices, when non-indexed) a draw call consumes.
    pub fn draw_count(&self) -> u32 {
        self.index_attribute
            .as_ref()
            .map_or_else(|| self.vertex_count(), |a| a.count)
    }

    pub fn positions(&self) -> Vec<Vec3> {
        let Some(attr) = self.attributes.get("position") else {
            return Vec::new();
        };
        (0..attr.count).filter_map(|i| attr.read_vec3(i)).collect()
    }

    /// Total bytes a GPU upload of this geometry occupies.
    pub fn byte_size(&self) -> usize {
        let vertex_bytes: usize = self.attributes.values().map(Attribute::byte_len).sum();
        vertex_bytes + self.index_attribute.as_ref().map_or(0, Attribute::byte_len)
    }

    /// Buffer usages for the vertex and index uploads respectively.
    pub fn buffer_usages() -> (BufferUsages, BufferUsages) {
        (
            BufferUsages::VERTEX | BufferUsages::COPY_DST,
            BufferUsages::INDEX | BufferUsages::COPY_DST,
        )
    }

    pub fn compute_bounding_volume(&mut self) {
        let positions = self.positions();
        if positions.is_empty() {
            self.bounding_box = None;
            self.bounding_sphere = None;
            return;
        }

        let (min, max) = positions.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(min, max), p| (min.min(*p), max.max(*p)),
        );
        let center = (min + max) * 0.5;
        let radius = positions
            .iter()
            .map(|p| p.distance_squared(center))
            .fold(0.0_f32, f32::max)
            .sqrt();

        self.bounding_box = Some(BoundingBox { min, max });
        self.bounding_sphere = Some(BoundingSphere { center, radius });
    }
}
