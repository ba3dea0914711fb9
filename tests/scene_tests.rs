//! Scene and Utility Tests
//!
//! Tests for:
//! - Transform matrix caching and look-at orientation
//! - Camera frustum culling
//! - Inspection controls: damping, clamping, zoom
//! - Frame statistics and clocks

use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec2, Vec3};

use flythrough::resources::Color;
use flythrough::scene::{Camera, Fog, Transform};
use flythrough::settings::ControlSettings;
use flythrough::utils::{ControlInput, FrameClock, FrameStats, ManualClock, OrbitControls};

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-4;

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    a.distance(b) < EPSILON
}

// ============================================================================
// Transform
// ============================================================================

#[test]
fn transform_rebuilds_only_when_changed() {
    let mut t = Transform::new();
    assert!(t.update_local_matrix());
    assert!(!t.update_local_matrix());

    t.position = Vec3::new(1.0, 2.0, 3.0);
    assert!(t.update_local_matrix());
    assert!(vec3_approx(t.local_matrix().translation.into(), Vec3::new(1.0, 2.0, 3.0)));
    assert!(!t.update_local_matrix());

    t.scale = Vec3::splat(2.0);
    assert!(t.update_local_matrix());
}

#[test]
fn look_at_points_negative_z_at_target() {
    let mut t = Transform::new();
    t.position = Vec3::new(0.0, 0.0, 5.0);
    t.look_at(Vec3::new(3.0, 0.0, 5.0), Vec3::Y);

    let forward = t.rotation * Vec3::NEG_Z;
    assert!(vec3_approx(forward, Vec3::X));
    t.update_local_matrix();
    assert!(vec3_approx(t.local_matrix().transform_point3(Vec3::ZERO), t.position));
}

#[test]
fn degenerate_look_at_keeps_rotation() {
    let mut t = Transform::new();
    t.rotation = Quat::from_rotation_x(0.3);
    let before = t.rotation;

    t.look_at(Vec3::ZERO, Vec3::Y);
    assert_eq!(t.rotation, before);
    t.look_at(Vec3::new(0.0, 10.0, 0.0), Vec3::Y);
    assert_eq!(t.rotation, before);
}

// ============================================================================
// Camera
// ============================================================================

#[test]
fn frustum_culls_behind_the_camera() {
    let mut camera = Camera::new_perspective(75.0, 1.0, 0.1, 100.0);
    let mut t = Transform::new();
    t.look_at(Vec3::new(0.0, 0.0, -1.0), Vec3::Y);
    t.update_local_matrix();
    camera.update_view_projection(t.local_matrix());

    let frustum = camera.frustum();
    assert!(frustum.intersects_sphere(Vec3::new(0.0, 0.0, -10.0), 0.5));
    assert!(!frustum.intersects_sphere(Vec3::new(0.0, 0.0, 10.0), 0.5));
    assert!(!frustum.intersects_sphere(Vec3::new(0.0, 0.0, -500.0), 0.5));
    assert!(vec3_approx(camera.forward(), Vec3::NEG_Z));
}

#[test]
fn aspect_change_rebuilds_projection() {
    let mut camera = Camera::new_perspective(60.0, 1.0, 0.1, 100.0);
    let square = camera.projection_matrix();
    camera.set_aspect(2.0);
    assert_ne!(camera.projection_matrix(), square);
    assert!((camera.projection_matrix().x_axis.x * 2.0 - square.x_axis.x).abs() < EPSILON);
}

#[test]
fn fog_thickens_with_distance() {
    let fog = Fog::new(Color::BLACK, 0.4);
    assert!(fog.factor(0.0).abs() < EPSILON);
    assert!(fog.factor(1.0) < fog.factor(2.0));
    assert!(fog.factor(100.0) <= 1.0);
    assert!(Fog::new(Color::BLACK, -1.0).factor(10.0).abs() < EPSILON);
}

// ============================================================================
// Inspection Controls
// ============================================================================

fn drag(dx: f32) -> ControlInput {
    ControlInput {
        pointer_delta: Vec2::new(dx, 0.0),
        rotating: true,
        viewport_height: 600.0,
        ..ControlInput::default()
    }
}

#[test]
fn controls_ease_out_after_input_stops() {
    let mut controls = OrbitControls::new(&ControlSettings {
        damping_factor: 0.1,
        ..ControlSettings::default()
    });
    let dt = 1.0 / 60.0;

    controls.update(&drag(-30.0), dt);
    let after_drag = controls.theta;
    assert!(after_drag > 0.0);

    let idle = ControlInput::default();
    let mut previous = after_drag;
    for _ in 0..30 {
        controls.update(&idle, dt);
        let step = controls.theta - previous;
        assert!(step >= 0.0);
        previous = controls.theta;
    }
    assert!(controls.theta > after_drag);

    controls.reset();
    assert_eq!(controls.theta, 0.0);
    assert_eq!(controls.zoom, 0.0);
}

#[test]
fn pitch_is_clamped() {
    let mut controls = OrbitControls::new(&ControlSettings {
        damping_factor: 1.0,
        ..ControlSettings::default()
    });
    let input = ControlInput {
        pointer_delta: Vec2::new(0.0, -100_000.0),
        rotating: true,
        viewport_height: 600.0,
        ..ControlInput::default()
    };
    controls.update(&input, 1.0 / 60.0);
    assert!(controls.phi < FRAC_PI_2);
    assert!(controls.phi > 0.0);
}

#[test]
fn zoom_pulls_back_along_view_axis() {
    let mut controls = OrbitControls::new(&ControlSettings::default());
    let scroll_out = ControlInput {
        scroll: -50.0,
        ..ControlInput::default()
    };
    controls.update(&scroll_out, 0.016);
    assert!((controls.zoom - controls.max_zoom).abs() < EPSILON);

    let mut t = Transform::new();
    t.rotation = Quat::IDENTITY;
    controls.apply(&mut t);
    assert!(vec3_approx(t.position, Vec3::new(0.0, 0.0, controls.max_zoom)));
}

#[test]
fn disabled_controls_do_nothing() {
    let mut controls = OrbitControls::new(&ControlSettings {
        enabled: false,
        ..ControlSettings::default()
    });
    controls.update(&drag(-50.0), 0.016);
    assert_eq!(controls.theta, 0.0);

    let mut t = Transform::new();
    t.position = Vec3::ONE;
    controls.apply(&mut t);
    assert_eq!(t.position, Vec3::ONE);
    assert_eq!(t.rotation, Quat::IDENTITY);
}

// ============================================================================
// Frame Statistics and Clocks
// ============================================================================

#[test]
fn frame_stats_measure_fps_per_second_window() {
    let mut stats = FrameStats::new();
    let mut reported = None;
    for i in 0..=60 {
        if let Some(fps) = stats.record(f64::from(i) * 1000.0 / 60.0, i != 10) {
            reported = Some(fps);
        }
    }
    assert_eq!(stats.total_frames, 61);
    assert_eq!(stats.dropped_frames, 1);
    assert!((reported.unwrap() - 61.0).abs() < 0.5);
    assert!((stats.delta_seconds() - 1.0 / 60.0).abs() < 1e-4);
}

#[test]
fn manual_clock_clones_share_time() {
    let clock = ManualClock::new(100.0);
    let shared = clock.clone();
    clock.advance(50.0);
    assert_eq!(shared.now_ms(), 150.0);
    shared.set(10.0);
    assert_eq!(clock.now_ms(), 10.0);
}
