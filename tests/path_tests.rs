//! Path Tests
//!
//! Tests for:
//! - Construction and validation of control points
//! - Periodicity and continuity of position queries
//! - Arc-length uniformity of the progress parametrization
//! - Tangents, look-ahead, and closed moving frames

use glam::Vec3;
use flythrough::FlythroughError;
use flythrough::path::{Path, wrap_progress};

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-3;

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    a.distance(b) < EPSILON
}

fn square_loop() -> Vec<Vec3> {
    vec![
        Vec3::new(5.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 5.0),
        Vec3::new(-5.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -5.0),
    ]
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn path_rejects_fewer_than_three_points() {
    let err = Path::new(vec![Vec3::ZERO, Vec3::X]).unwrap_err();
    assert!(matches!(err, FlythroughError::InvalidParameter { .. }));
}

#[test]
fn path_rejects_non_finite_points() {
    let err = Path::new(vec![Vec3::ZERO, Vec3::X, Vec3::new(f32::NAN, 0.0, 0.0)]).unwrap_err();
    assert!(matches!(err, FlythroughError::InvalidParameter { .. }));
}

#[test]
fn path_default_is_tunnel() {
    let path = Path::default();
    assert_eq!(path.control_points(), Path::tunnel().control_points());
    assert!(path.length() > 0.0);
}

#[test]
fn wrap_progress_stays_in_unit_interval() {
    for p in [-2.5_f32, -1.0, -1e-9, 0.0, 0.25, 0.999_999, 1.0, 3.75] {
        let w = wrap_progress(p);
        assert!((0.0..1.0).contains(&w), "wrap_progress({p}) = {w}");
    }
    assert!((wrap_progress(1.25) - 0.25).abs() < 1e-6);
    assert!((wrap_progress(-0.25) - 0.75).abs() < 1e-6);
}

// ============================================================================
// Position Queries
// ============================================================================

#[test]
fn position_is_periodic() {
    let path = Path::tunnel();
    for i in 0..20 {
        let p = i as f32 / 20.0 + 0.013;
        assert!(vec3_approx(path.position(p), path.position(p + 1.0)));
        assert!(vec3_approx(path.position(p), path.position(p - 1.0)));
        assert!(vec3_approx(path.position(p), path.position(p + 3.0)));
    }
}

#[test]
fn position_is_continuous_across_the_seam() {
    let path = Path::tunnel();
    let before = path.position(0.999_9);
    let at = path.position(0.0);
    let after = path.position(0.000_1);
    assert!(before.distance(at) < 0.05);
    assert!(after.distance(at) < 0.05);
}

#[test]
fn position_passes_through_control_points() {
    let points = square_loop();
    let path = Path::new(points.clone()).unwrap();
    assert!(vec3_approx(path.position(0.0), points[0]));
    assert!(vec3_approx(path.point(0.5), points[2]));
}

#[test]
fn progress_is_arc_length_uniform() {
    let path = Path::tunnel();
    let samples = 50;
    let expected = path.length() / samples as f32;

    for i in 0..samples {
        let a = path.position(i as f32 / samples as f32);
        let b = path.position((i + 1) as f32 / samples as f32);
        let step = a.distance(b);
        assert!(
            (step - expected).abs() < expected * 0.1,
            "step {i} covers {step}, expected about {expected}"
        );
    }
}

// ============================================================================
// Tangents and Frames
// ============================================================================

#[test]
fn tangent_is_unit_and_points_forward() {
    let path = Path::tunnel();
    for i in 0..16 {
        let p = i as f32 / 16.0;
        let tangent = path.tangent(p);
        assert!((tangent.length() - 1.0).abs() < 1e-3);

        let forward = path.position(p + 0.001) - path.position(p);
        assert!(tangent.dot(forward.normalize()) > 0.99);
    }
}

#[test]
fn look_ahead_wraps_both_ways() {
    let path = Path::tunnel();
    assert!(vec3_approx(path.look_ahead(0.995, 0.01), path.position(0.005)));
    assert!(vec3_approx(path.look_ahead(0.005, -0.01), path.position(0.995)));
}

#[test]
fn frenet_frames_are_orthonormal_and_closed() {
    let path = Path::tunnel();
    let segments = 64;
    let frames = path.frenet_frames(segments);

    assert_eq!(frames.tangents.len(), segments as usize + 1);
    assert_eq!(frames.normals.len(), segments as usize + 1);
    assert_eq!(frames.binormals.len(), segments as usize + 1);

    for i in 0..=segments as usize {
        let (t, n, b) = (frames.tangents[i], frames.normals[i], frames.binormals[i]);
        assert!(t.dot(n).abs() < 1e-2, "frame {i}: tangent/normal not orthogonal");
        assert!((n.length() - 1.0).abs() < 1e-2);
        assert!((b.length() - 1.0).abs() < 1e-2);
    }

    // The twist correction makes the last frame line up with the first
    let first = frames.normals[0];
    let last = frames.normals[segments as usize];
    assert!(first.dot(last) > 0.99, "closing frame drifted: {first} vs {last}");
}
