use glam::Vec3;
use rustc_hash::FxHashMap;
use wgpu::{PrimitiveTopology, VertexFormat};

use crate::resources::geometry::{Attribute, Geometry};

/// Positions are welded at this many decimal places before edges are matched.
const PRECISION: f32 = 1e4;

type VertexKey = [i64; 3];

fn vertex_key(v: Vec3) -> VertexKey {
    [
        (v.x * PRECISION).round() as i64,
        (v.y * PRECISION).round() as i64,
        (v.z * PRECISION).round() as i64,
    ]
}

struct HalfEdge {
    start: Vec3,
    end: Vec3,
    normal: Vec3,
}

/// Extracts the feature edges of a triangle mesh as a line list.
///
/// An edge is kept when it borders a single triangle, or when the normals of
/// its two triangles differ by more than `threshold_degrees`. Coincident
/// vertices are welded by position, so seams of UV-split meshes vanish.
#[must_use]
pub fn create_edges(geometry: &Geometry, threshold_degrees: f32) -> Geometry {
    let positions = geometry.positions();
    let indices = geometry
        .indices()
        .unwrap_or_else(|| (0..positions.len() as u32).collect());
    let threshold_dot = threshold_degrees.to_radians().cos();

    // `None` marks an edge already matched with its twin
    let mut open: FxHashMap<(VertexKey, VertexKey), Option<HalfEdge>> = FxHashMap::default();
    // Insertion order keeps the output deterministic
    let mut order: Vec<(VertexKey, VertexKey)> = Vec::new();
    let mut lines: Vec<[f32; 3]> = Vec::new();

    for tri in indices.chunks_exact(3) {
        let Some(verts) = tri
            .iter()
            .map(|&i| positions.get(i as usize).copied())
            .collect::<Option<Vec<Vec3>>>()
        else {
            continue;
        };
        let keys = [vertex_key(verts[0]), vertex_key(verts[1]), vertex_key(verts[2])];
        if keys[0] == keys[1] || keys[1] == keys[2] || keys[2] == keys[0] {
            continue;
        }
        let normal = (verts[1] - verts[0]).cross(verts[2] - verts[0]).normalize_or_zero();

        for j in 0..3 {
            let next = (j + 1) % 3;
            let forward = (keys[j], keys[next]);
            let reverse = (keys[next], keys[j]);

            if let Some(slot) = open.get_mut(&reverse)
                && let Some(twin) = slot.take()
            {
                if normal.dot(twin.normal) <= threshold_dot {
                    lines.push(verts[j].to_array());
                    lines.push(verts[next].to_array());
                }
            } else if !open.contains_key(&forward) {
                open.insert(
                    forward,
                    Some(HalfEdge {
                        start: verts[j],
                        end: verts[next],
                        normal,
                    }),
                );
                order.push(forward);
            }
        }
    }

    for key in order {
        if let Some(Some(edge)) = open.get(&key) {
            lines.push(edge.start.to_array());
            lines.push(edge.end.to_array());
        }
    }

    let mut geo = Geometry::new().with_label(format!("{} Edges", geometry.label));
    geo.topology = PrimitiveTopology::LineList;
    geo.set_attribute("position", Attribute::new_planar(&lines, VertexFormat::Float32x3));
    geo.compute_bounding_volume();
    geo
}
