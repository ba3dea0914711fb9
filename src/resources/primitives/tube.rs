use std::f32::consts::TAU;

use wgpu::VertexFormat;

use crate::path::Path;
use crate::resources::geometry::{Attribute, Geometry};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TubeOptions {
    pub tubular_segments: u32,
    pub radius: f32,
    pub radial_segments: u32,
    pub closed: bool,
}

impl Default for TubeOptions {
    fn default() -> Self {
        Self {
            tubular_segments: 222,
            radius: 0.65,
            radial_segments: 16,
            closed: true,
        }
    }
}

/// Sweeps a circular profile along `path`.
///
/// Produces `(tubular + 1) * (radial + 1)` vertices: the seam ring and seam
/// column are duplicated so UVs run cleanly from 0 to 1. For a closed tube the
/// last ring reuses the first ring's frame, so the surface has no gap.
#[must_use]
pub fn create_tube(path: &Path, options: TubeOptions) -> Geometry {
    let tubular = options.tubular_segments.max(1);
    let radial = options.radial_segments.max(3);
    let frames = path.frenet_frames(tubular);

    let ring_len = (radial + 1) as usize;
    let vertex_total = (tubular as usize + 1) * ring_len;
    let mut positions = Vec::with_capacity(vertex_total);
    let mut normals = Vec::with_capacity(vertex_total);
    let mut uvs = Vec::with_capacity(vertex_total);

    for i in 0..=tubular {
        let frame = if options.closed && i == tubular { 0 } else { i as usize };
        let center = path.position(frame as f32 / tubular as f32);
        let n = frames.normals[frame];
        let b = frames.binormals[frame];

        for j in 0..=radial {
            let angle = j as f32 / radial as f32 * TAU;
            let normal = (n * -angle.cos() + b * angle.sin()).normalize_or_zero();
            positions.push((center + normal * options.radius).to_array());
            normals.push(normal.to_array());
            uvs.push([i as f32 / tubular as f32, j as f32 / radial as f32]);
        }
    }

    let stride = radial + 1;
    let mut indices = Vec::with_capacity((tubular * radial * 6) as usize);
    for j in 1..=tubular {
        for i in 1..=radial {
            let a = stride * (j - 1) + (i - 1);
            let b = stride * j + (i - 1);
            let c = stride * j + i;
            let d = stride * (j - 1) + i;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    let mut geo = Geometry::new().with_label("Tube");
    geo.set_attribute("position", Attribute::new_planar(&positions, VertexFormat::Float32x3));
    geo.set_attribute("normal", Attribute::new_planar(&normals, VertexFormat::Float32x3));
    geo.set_attribute("uv", Attribute::new_planar(&uvs, VertexFormat::Float32x2));
    geo.set_index_list(&indices);
    geo.compute_bounding_volume();
    geo
}
