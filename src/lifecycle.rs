//! Resource Lifecycle
//!
//! [`ResourceLifecycleManager`] owns every generated asset that is currently
//! live and guarantees that each group has exactly one live generation.
//!
//! Installing a new generation happens in one call, between frames:
//!
//! 1. detach the previous generation from the scene,
//! 2. dispose its GPU resources (materials first, then geometry),
//! 3. attach the new generation.
//!
//! No frame can observe a group empty or doubled. Disposal failures are
//! logged and reported but never abort the installation.

use std::fmt;

use glam::Affine3A;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use wgpu::PrimitiveTopology;

use crate::errors::FlythroughError;
use crate::gpu::{GpuGeometryId, GpuMaterialId, RenderBackend};
use crate::resources::{BoundingSphere, TextureSlot};
use crate::scene::{ObjectKey, Scene, SceneObject};

/// The independently regenerated object groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupId {
    Tube,
    Elements,
}

impl GroupId {
    pub const ALL: [GroupId; 2] = [GroupId::Tube, GroupId::Elements];
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tube => f.write_str("tube"),
            Self::Elements => f.write_str("elements"),
        }
    }
}

/// GPU-resident geometry and materials of one renderable object.
///
/// Not `Clone`: the asset is the sole owner of its GPU handles, and releasing
/// it consumes it.
#[derive(Debug)]
pub struct GeneratedAsset {
    pub(crate) label: String,
    pub(crate) geometry: GpuGeometryId,
    pub(crate) materials: SmallVec<[GpuMaterialId; 2]>,
    pub(crate) topology: PrimitiveTopology,
    pub(crate) draw_count: u32,
    pub(crate) transform: Affine3A,
    pub(crate) bounding_sphere: Option<BoundingSphere>,
    pub(crate) texture_slot: Option<TextureSlot>,
}

impl GeneratedAsset {
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn geometry(&self) -> GpuGeometryId {
        self.geometry
    }

    #[must_use]
    pub fn materials(&self) -> &[GpuMaterialId] {
        &self.materials
    }

    #[must_use]
    pub fn topology(&self) -> PrimitiveTopology {
        self.topology
    }

    #[must_use]
    pub fn transform(&self) -> Affine3A {
        self.transform
    }

    /// The texture slot this asset's material samples.
    #[must_use]
    pub fn texture_slot(&self) -> Option<TextureSlot> {
        self.texture_slot
    }

    fn to_scene_object(&self, group: GroupId) -> SceneObject {
        SceneObject {
            name: self.label.clone(),
            group,
            geometry: self.geometry,
            materials: self.materials.clone(),
            topology: self.topology,
            draw_count: self.draw_count,
            world_matrix: self.transform,
            bounding_sphere: self.bounding_sphere,
            visible: true,
        }
    }

    /// Disposes every material, then the geometry. Every handle is attempted
    /// even if an earlier one fails; the failures are returned.
    pub(crate) fn release<B: RenderBackend>(self, backend: &mut B) -> Vec<FlythroughError> {
        let mut errors = Vec::new();
        for material in self.materials {
            if let Err(e) = backend.dispose_material(material) {
                errors.push(e);
            }
        }
        if let Err(e) = backend.dispose_geometry(self.geometry) {
            errors.push(e);
        }
        errors
    }
}

/// Outcome of one [`ResourceLifecycleManager::install`] call.
#[derive(Debug)]
pub struct InstallReport {
    pub group: GroupId,
    pub detached: usize,
    pub released: usize,
    pub attached: usize,
    pub disposal_errors: Vec<FlythroughError>,
}

impl InstallReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.disposal_errors.is_empty()
    }
}

struct LiveAsset {
    asset: GeneratedAsset,
    key: ObjectKey,
}

#[derive(Default)]
pub struct ResourceLifecycleManager {
    live: FxHashMap<GroupId, Vec<LiveAsset>>,
    installs: u64,
    released: u64,
}

impl fmt::Debug for ResourceLifecycleManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceLifecycleManager")
            .field("tube", &self.live_count(GroupId::Tube))
            .field("elements", &self.live_count(GroupId::Elements))
            .field("installs", &self.installs)
            .field("released", &self.released)
            .finish()
    }
}

impl ResourceLifecycleManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the live generation of `group` with `assets`.
    pub fn install<B: RenderBackend>(
        &mut self,
        group: GroupId,
        assets: Vec<GeneratedAsset>,
        scene: &mut Scene,
        backend: &mut B,
    ) -> InstallReport {
        let previous = self.live.remove(&group).unwrap_or_default();

        let mut report = InstallReport {
            group,
            detached: 0,
            released: 0,
            attached: 0,
            disposal_errors: Vec::new(),
        };

        for live in &previous {
            if scene.remove(live.key).is_some() {
                report.detached += 1;
            }
        }

        for live in previous {
            let errors = live.asset.release(backend);
            for e in &errors {
                log::warn!("Leaking part of a {group} asset: {e}");
            }
            report.disposal_errors.extend(errors);
            report.released += 1;
        }

        let attached: Vec<LiveAsset> = assets
            .into_iter()
            .map(|asset| {
                let key = scene.add(asset.to_scene_object(group));
                LiveAsset { asset, key }
            })
            .collect();
        report.attached = attached.len();
        self.live.insert(group, attached);

        self.installs += 1;
        self.released += report.released as u64;

        log::debug!(
            "Installed {group}: {} attached, {} released",
            report.attached,
            report.released
        );
        report
    }

    /// Detaches and disposes every live group. The manager is empty afterwards.
    pub fn release_all<B: RenderBackend>(&mut self, scene: &mut Scene, backend: &mut B) -> Vec<FlythroughError> {
        let mut errors = Vec::new();
        for (group, assets) in self.live.drain() {
            for live in assets {
                scene.remove(live.key);
                let failed = live.asset.release(backend);
                for e in &failed {
                    log::warn!("Leaking part of a {group} asset at shutdown: {e}");
                }
                errors.extend(failed);
                self.released += 1;
            }
        }
        errors
    }

    #[must_use]
    pub fn live_count(&self, group: GroupId) -> usize {
        self.live.get(&group).map_or(0, Vec::len)
    }

    pub fn live_assets(&self, group: GroupId) -> impl Iterator<Item = &GeneratedAsset> {
        self.live.get(&group).into_iter().flatten().map(|l| &l.asset)
    }

    /// Scene keys of the live generation of `group`.
    pub fn live_keys(&self, group: GroupId) -> impl Iterator<Item = ObjectKey> + '_ {
        self.live.get(&group).into_iter().flatten().map(|l| l.key)
    }

    /// Whether any live asset of `group` samples `slot`.
    #[must_use]
    pub fn uses_texture(&self, group: GroupId, slot: TextureSlot) -> bool {
        self.live_assets(group).any(|a| a.texture_slot == Some(slot))
    }

    #[must_use]
    pub fn install_count(&self) -> u64 {
        self.installs
    }

    /// Total assets released over the manager's lifetime.
    #[must_use]
    pub fn released_count(&self) -> u64 {
        self.released
    }
}
