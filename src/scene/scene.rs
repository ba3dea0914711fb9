use glam::Affine3A;
use slotmap::SlotMap;
use smallvec::SmallVec;
use wgpu::PrimitiveTopology;

use crate::gpu::{GpuGeometryId, GpuMaterialId};
use crate::lifecycle::GroupId;
use crate::resources::BoundingSphere;
use crate::scene::ObjectKey;
use crate::scene::environment::Environment;

/// One drawable attached to the scene.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: String,
    pub group: GroupId,
    pub geometry: GpuGeometryId,
    pub materials: SmallVec<[GpuMaterialId; 2]>,
    pub topology: PrimitiveTopology,
    pub draw_count: u32,
    pub world_matrix: Affine3A,
    /// Local-space bounds, if the geometry has any vertices
    pub bounding_sphere: Option<BoundingSphere>,
    pub visible: bool,
}

impl SceneObject {
    /// Bounds in world space.
    #[must_use]
    pub fn world_bounding_sphere(&self) -> Option<BoundingSphere> {
        self.bounding_sphere.map(|s| s.transform(&self.world_matrix))
    }
}

/// Flat container of attached objects.
///
/// The scene holds GPU handles only; it never disposes anything. Ownership of
/// the underlying resources stays with the lifecycle manager.
#[derive(Debug, Default)]
pub struct Scene {
    objects: SlotMap<ObjectKey, SceneObject>,
    pub environment: Environment,
}

impl Scene {
    #[must_use]
    pub fn new(environment: Environment) -> Self {
        Self {
            objects: SlotMap::with_key(),
            environment,
        }
    }

    pub fn add(&mut self, object: SceneObject) -> ObjectKey {
        self.objects.insert(object)
    }

    pub fn remove(&mut self, key: ObjectKey) -> Option<SceneObject> {
        self.objects.remove(key)
    }

    #[must_use]
    pub fn get(&self, key: ObjectKey) -> Option<&SceneObject> {
        self.objects.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectKey, &SceneObject)> {
        self.objects.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Number of attached objects belonging to `group`.
    #[must_use]
    pub fn count_group(&self, group: GroupId) -> usize {
        self.objects.values().filter(|o| o.group == group).count()
    }
}
