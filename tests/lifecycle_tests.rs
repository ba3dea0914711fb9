//! Resource Lifecycle Tests
//!
//! Tests for:
//! - Installing a generation detaches and disposes the previous one
//! - Exclusive ownership of GPU resources across repeated regenerations
//! - Groups are regenerated independently
//! - Disposal failures are reported without blocking installation
//! - Releasing everything at shutdown

use flythrough::generator::{ProceduralGenerator, TextureLibrary};
use flythrough::gpu::{GpuGeometryId, HeadlessBackend};
use flythrough::lifecycle::{GeneratedAsset, GroupId, ResourceLifecycleManager};
use flythrough::path::Path;
use flythrough::resources::{Color, ColorValue};
use flythrough::scene::Scene;
use flythrough::settings::{ElementSettings, TubeSettings};
use flythrough::style::{ElementStyle, TubeStyle, VisualStyle};

// ============================================================================
// Helper
// ============================================================================

struct Fixture {
    path: Path,
    generator: ProceduralGenerator,
    textures: TextureLibrary,
    backend: HeadlessBackend,
    scene: Scene,
    lifecycle: ResourceLifecycleManager,
}

impl Fixture {
    fn new() -> Self {
        Self {
            path: Path::tunnel(),
            generator: ProceduralGenerator::new(Some(42), TubeSettings::default(), ElementSettings::default()),
            textures: TextureLibrary::new(),
            backend: HeadlessBackend::new(640, 480),
            scene: Scene::default(),
            lifecycle: ResourceLifecycleManager::new(),
        }
    }

    fn elements(&mut self, count: u32) -> Vec<GeneratedAsset> {
        let style = ElementStyle {
            visual_style: VisualStyle::Solid,
            color: ColorValue::Random,
            count,
        };
        self.generator
            .regenerate_elements(&self.path, &style, &self.textures, &mut self.backend)
            .unwrap()
    }

    fn tube(&mut self) -> Vec<GeneratedAsset> {
        let style = TubeStyle {
            visual_style: VisualStyle::Outline,
            color: Color::WHITE,
            scale: 0.25,
        };
        self.generator
            .regenerate_tube(&self.path, &style, &self.textures, &mut self.backend)
            .unwrap()
    }

    fn install(&mut self, group: GroupId, assets: Vec<GeneratedAsset>) -> flythrough::InstallReport {
        self.lifecycle.install(group, assets, &mut self.scene, &mut self.backend)
    }
}

fn geometry_ids(lifecycle: &ResourceLifecycleManager, group: GroupId) -> Vec<GpuGeometryId> {
    lifecycle.live_assets(group).map(GeneratedAsset::geometry).collect()
}

// ============================================================================
// Installation
// ============================================================================

#[test]
fn first_install_attaches_everything() {
    let mut fx = Fixture::new();
    let assets = fx.elements(150);
    let report = fx.install(GroupId::Elements, assets);

    assert_eq!(report.group, GroupId::Elements);
    assert_eq!(report.detached, 0);
    assert_eq!(report.released, 0);
    assert_eq!(report.attached, 150);
    assert!(report.is_clean());

    assert_eq!(fx.lifecycle.live_count(GroupId::Elements), 150);
    assert_eq!(fx.scene.count_group(GroupId::Elements), 150);
    assert_eq!(fx.backend.resident_geometries(), 150);
    assert_eq!(fx.backend.resident_materials(), 150);
}

#[test]
fn replacing_with_zero_elements_releases_all() {
    let mut fx = Fixture::new();
    let assets = fx.elements(150);
    fx.install(GroupId::Elements, assets);

    let assets = fx.elements(0);
    let report = fx.install(GroupId::Elements, assets);

    assert_eq!(report.detached, 150);
    assert_eq!(report.released, 150);
    assert_eq!(report.attached, 0);

    let stats = fx.backend.stats();
    assert_eq!(stats.geometry_disposals, 150);
    assert_eq!(stats.material_disposals, 150);
    assert_eq!(fx.backend.resident_geometries(), 0);
    assert_eq!(fx.backend.resident_materials(), 0);
    assert!(fx.scene.is_empty());
}

#[test]
fn repeated_regeneration_keeps_one_generation() {
    let mut fx = Fixture::new();
    let tube = fx.tube();
    fx.install(GroupId::Tube, tube);

    for round in 0..10_u32 {
        let count = 20 + round * 3;
        let assets = fx.elements(count);
        fx.install(GroupId::Elements, assets);

        assert_eq!(fx.lifecycle.live_count(GroupId::Elements), count as usize);
        assert_eq!(fx.scene.count_group(GroupId::Elements), count as usize);
        // One tube plus the live elements, nothing leaked
        assert_eq!(fx.backend.resident_geometries(), 1 + count as usize);
        assert_eq!(fx.backend.resident_materials(), 1 + count as usize);
    }

    assert_eq!(fx.lifecycle.install_count(), 11);
    assert_eq!(fx.lifecycle.live_count(GroupId::Tube), 1);
}

#[test]
fn live_ids_are_resident_and_superseded_ids_are_not() {
    let mut fx = Fixture::new();
    let assets = fx.elements(12);
    fx.install(GroupId::Elements, assets);
    let first = geometry_ids(&fx.lifecycle, GroupId::Elements);

    let assets = fx.elements(12);
    fx.install(GroupId::Elements, assets);
    let second = geometry_ids(&fx.lifecycle, GroupId::Elements);

    for id in &first {
        assert!(!fx.backend.is_geometry_resident(*id));
        assert!(!second.contains(id));
    }
    for id in &second {
        assert!(fx.backend.is_geometry_resident(*id));
    }
    for asset in fx.lifecycle.live_assets(GroupId::Elements) {
        for material in asset.materials() {
            assert!(fx.backend.is_material_resident(*material));
        }
    }
}

#[test]
fn groups_are_independent() {
    let mut fx = Fixture::new();
    let tube = fx.tube();
    fx.install(GroupId::Tube, tube);
    let tube_ids = geometry_ids(&fx.lifecycle, GroupId::Tube);

    let assets = fx.elements(30);
    fx.install(GroupId::Elements, assets);
    let assets = fx.elements(5);
    fx.install(GroupId::Elements, assets);

    assert_eq!(geometry_ids(&fx.lifecycle, GroupId::Tube), tube_ids);
    assert!(fx.backend.is_geometry_resident(tube_ids[0]));
    assert_eq!(fx.scene.count_group(GroupId::Tube), 1);
}

#[test]
fn scene_only_references_live_assets() {
    let mut fx = Fixture::new();
    let assets = fx.elements(25);
    fx.install(GroupId::Elements, assets);
    let assets = fx.elements(8);
    fx.install(GroupId::Elements, assets);

    let live: Vec<_> = fx.lifecycle.live_keys(GroupId::Elements).collect();
    assert_eq!(live.len(), 8);
    for key in live {
        let object = fx.scene.get(key).unwrap();
        assert!(fx.backend.is_geometry_resident(object.geometry));
    }
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn disposal_failure_does_not_block_install() {
    let mut fx = Fixture::new();
    let assets = fx.elements(10);
    fx.install(GroupId::Elements, assets);

    fx.backend.fail_next_disposals(3);
    let assets = fx.elements(4);
    let report = fx.install(GroupId::Elements, assets);

    assert!(!report.is_clean());
    assert_eq!(report.disposal_errors.len(), 3);
    assert_eq!(report.released, 10);
    assert_eq!(report.attached, 4);

    assert_eq!(fx.lifecycle.live_count(GroupId::Elements), 4);
    assert_eq!(fx.scene.count_group(GroupId::Elements), 4);
    // The three failed handles leak, everything else is gone
    let leaked = 20 - 3;
    assert_eq!(
        fx.backend.stats().geometry_disposals + fx.backend.stats().material_disposals,
        leaked
    );
}

#[test]
fn release_all_empties_the_manager() {
    let mut fx = Fixture::new();
    let tube = fx.tube();
    fx.install(GroupId::Tube, tube);
    let assets = fx.elements(40);
    fx.install(GroupId::Elements, assets);

    let errors = fx.lifecycle.release_all(&mut fx.scene, &mut fx.backend);
    assert!(errors.is_empty());

    for group in GroupId::ALL {
        assert_eq!(fx.lifecycle.live_count(group), 0);
    }
    assert!(fx.scene.is_empty());
    assert_eq!(fx.backend.resident_geometries(), 0);
    assert_eq!(fx.backend.resident_materials(), 0);
    assert_eq!(fx.lifecycle.released_count(), 41);
}
