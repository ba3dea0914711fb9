//! Procedural Generation
//!
//! [`ProceduralGenerator`] builds the GPU-resident assets of the two groups:
//!
//! - the tube swept along the [`Path`], tessellated according to its scale,
//! - the scattered elements: `count` small boxes jittered around the path.
//!
//! A group is built as a whole. If any part of it fails to construct, the
//! already uploaded parts are released and the group is rebuilt with the
//! outline treatment, which needs neither textures nor filled surfaces. The
//! result is handed to the lifecycle manager for installation; a failing
//! build never touches the live generation.

mod textures;
mod treatment;

pub use textures::TextureLibrary;
pub use treatment::{BuiltAsset, Treatment, TreatmentParams};

use std::f32::consts::PI;

use glam::{Affine3A, EulerRot, Quat, Vec2};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use smallvec::smallvec;

use crate::errors::{FlythroughError, Result};
use crate::gpu::RenderBackend;
use crate::lifecycle::{GeneratedAsset, GroupId};
use crate::path::{Path, wrap_progress};
use crate::resources::{Color, ColorValue, TubeOptions, create_box, create_tube};
use crate::settings::{ElementSettings, TubeSettings};
use crate::style::{ElementStyle, TubeStyle};

/// Where and in which color one element is placed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementPlacement {
    pub progress: f32,
    pub transform: Affine3A,
    pub color: Color,
}

pub struct ProceduralGenerator {
    rng: StdRng,
    tube: TubeSettings,
    elements: ElementSettings,
}

impl std::fmt::Debug for ProceduralGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProceduralGenerator")
            .field("tube", &self.tube)
            .field("elements", &self.elements)
            .finish_non_exhaustive()
    }
}

impl ProceduralGenerator {
    /// A `None` seed draws one from system entropy.
    #[must_use]
    pub fn new(seed: Option<u64>, tube: TubeSettings, elements: ElementSettings) -> Self {
        let seed = seed.unwrap_or_else(rand::random::<u64>);
        log::debug!("Generator seed: {seed}");
        Self {
            rng: StdRng::seed_from_u64(seed),
            tube,
            elements,
        }
    }

    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Tube tessellation for `scale`. Segment counts grow monotonically with it.
    #[must_use]
    pub fn tube_options(&self, scale: f32) -> TubeOptions {
        let scaled = |base: u32, min: u32| ((base as f32 * scale).ceil() as u32).max(min);
        TubeOptions {
            tubular_segments: scaled(self.tube.tubular_segments, 8),
            radius: self.tube.radius,
            radial_segments: scaled(self.tube.radial_segments, 3),
            closed: true,
        }
    }

    pub fn regenerate_tube<B: RenderBackend>(
        &self,
        path: &Path,
        style: &TubeStyle,
        textures: &TextureLibrary,
        backend: &mut B,
    ) -> Result<Vec<GeneratedAsset>> {
        let options = self.tube_options(style.scale);
        let tube = create_tube(path, options);
        log::debug!(
            "Tube: {}x{} segments, {} vertices",
            options.tubular_segments,
            options.radial_segments,
            tube.vertex_count()
        );

        let params = TreatmentParams {
            color: style.color,
            edge_threshold: self.tube.edge_threshold,
            texture_repeat: Vec2::from(self.tube.texture_repeat),
            transform: Affine3A::IDENTITY,
        };

        build_with_fallback(GroupId::Tube, style.visual_style.into(), backend, |treatment, backend| {
            let asset = upload(treatment.build(&tube, &params), "Tube".to_string(), textures, backend)?;
            Ok(vec![asset])
        })
    }

    /// Draws placements for `style.count` elements.
    ///
    /// Element `i` sits at progress `i / count` plus a small jitter, is pushed
    /// off the path on X and Y, and gets a random XYZ rotation. A random color
    /// is drawn per element only when the style asks for one.
    pub fn element_placements(&mut self, path: &Path, style: &ElementStyle) -> Vec<ElementPlacement> {
        let count = style.count;
        let [lo, hi] = self.elements.offset_range;
        let jitter = self.elements.progress_jitter;

        let shared = match style.color {
            ColorValue::Rgb(c) => Some(c),
            ColorValue::Random => None,
        };

        (0..count)
            .map(|i| {
                let color = shared.unwrap_or_else(|| Color::random(&mut self.rng));
                let progress = wrap_progress(i as f32 / count as f32 + self.rng.random_range(0.0..1.0) * jitter);
                let mut position = path.position(progress);
                position.x += self.rng.random_range(lo..hi);
                position.y += self.rng.random_range(lo..hi);
                let rotation = Quat::from_euler(
                    EulerRot::XYZ,
                    self.rng.random_range(0.0..PI),
                    self.rng.random_range(0.0..PI),
                    self.rng.random_range(0.0..PI),
                );
                ElementPlacement {
                    progress,
                    transform: Affine3A::from_rotation_translation(rotation, position),
                    color,
                }
            })
            .collect()
    }

    pub fn regenerate_elements<B: RenderBackend>(
        &mut self,
        path: &Path,
        style: &ElementStyle,
        textures: &TextureLibrary,
        backend: &mut B,
    ) -> Result<Vec<GeneratedAsset>> {
        let placements = self.element_placements(path, style);
        let size = self.elements.size;
        let shape = create_box(size, size, size);
        let edge_threshold = self.elements.edge_threshold;
        let texture_repeat = Vec2::from(self.elements.texture_repeat);

        build_with_fallback(GroupId::Elements, style.visual_style.into(), backend, |treatment, backend| {
            let mut assets = Vec::with_capacity(placements.len());
            for (i, placement) in placements.iter().enumerate() {
                let params = TreatmentParams {
                    color: placement.color,
                    edge_threshold,
                    texture_repeat,
                    transform: placement.transform,
                };
                match upload(treatment.build(&shape, &params), format!("Element {i}"), textures, backend) {
                    Ok(asset) => assets.push(asset),
                    Err(e) => {
                        discard(assets, backend);
                        return Err(e);
                    }
                }
            }
            Ok(assets)
        })
    }
}

fn build_with_fallback<B, F>(group: GroupId, treatment: Treatment, backend: &mut B, mut build: F) -> Result<Vec<GeneratedAsset>>
where
    B: RenderBackend,
    F: FnMut(Treatment, &mut B) -> Result<Vec<GeneratedAsset>>,
{
    match build(treatment, backend) {
        Err(e) if e.is_construction() && treatment != Treatment::Outline => {
            log::warn!("Building {group} as {treatment:?} failed: {e}. Falling back to outline");
            build(Treatment::Outline, backend)
        }
        result => result,
    }
}

/// Makes one built asset resident. Nothing stays resident on failure.
fn upload<B: RenderBackend>(
    built: BuiltAsset,
    label: String,
    textures: &TextureLibrary,
    backend: &mut B,
) -> Result<GeneratedAsset> {
    let texture_slot = built.material.map();
    let map = match texture_slot {
        Some(slot) => Some(textures.gpu_id(slot).ok_or_else(|| {
            FlythroughError::Construction(format!("no texture registered for slot {slot:?}"))
        })?),
        None => None,
    };

    let geometry = backend.upload_geometry(&built.geometry)?;
    let material = match backend.upload_material(&built.material, map) {
        Ok(id) => id,
        Err(e) => {
            if let Err(release) = backend.dispose_geometry(geometry) {
                log::warn!("Leaking geometry of `{label}`: {release}");
            }
            return Err(e);
        }
    };

    Ok(GeneratedAsset {
        label,
        geometry,
        materials: smallvec![material],
        topology: built.geometry.topology,
        draw_count: built.geometry.draw_count(),
        transform: built.transform,
        bounding_sphere: built.geometry.bounding_sphere,
        texture_slot,
    })
}

fn discard<B: RenderBackend>(assets: Vec<GeneratedAsset>, backend: &mut B) {
    for asset in assets {
        for e in asset.release(backend) {
            log::warn!("Leaking part of a partially built group: {e}");
        }
    }
}

