//! Closed Camera Path
//!
//! [`Path`] is the immutable curve the tunnel is built around and the camera
//! travels along. It is a closed centripetal Catmull-Rom spline through a set
//! of control points, re-parametrized by arc length so that equal steps of the
//! normalized progress `p ∈ [0, 1)` cover equal distances along the curve.
//!
//! Every query is periodic: `position(p) == position(p + 1)`.

use glam::{Quat, Vec3};

use crate::errors::{FlythroughError, Result};

/// Control points of the built-in tunnel loop.
const TUNNEL_POINTS: [[f32; 3]; 12] = [
    [10.0, 0.0, 0.0],
    [7.6, 1.8, 6.1],
    [2.2, -1.1, 9.4],
    [-3.4, 2.4, 8.1],
    [-8.3, 0.6, 5.2],
    [-10.6, -1.9, -0.4],
    [-7.2, 1.1, -6.4],
    [-2.6, 3.0, -8.9],
    [2.9, 0.2, -10.4],
    [6.4, -2.6, -7.1],
    [9.3, -1.2, -3.6],
    [11.1, 0.8, -1.5],
];

const TANGENT_DELTA: f32 = 1e-4;

/// Wraps any progress value into `[0, 1)`.
#[inline]
#[must_use]
pub fn wrap_progress(p: f32) -> f32 {
    let wrapped = p.rem_euclid(1.0);
    // rem_euclid rounds tiny negative inputs up to exactly 1.0
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}

/// Per-sample moving frames along the path, used to sweep the tube profile.
#[derive(Debug, Clone, Default)]
pub struct FrenetFrames {
    pub tangents: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub binormals: Vec<Vec3>,
}

#[derive(Debug, Clone)]
pub struct Path {
    points: Vec<Vec3>,
    /// Cumulative chord lengths, `divisions + 1` entries starting at 0.
    arc_lengths: Vec<f32>,
}

impl Path {
    pub const DEFAULT_DIVISIONS: usize = 200;

    /// Builds a closed path through `points` with the default arc-length resolution.
    pub fn new(points: Vec<Vec3>) -> Result<Self> {
        Self::with_divisions(points, Self::DEFAULT_DIVISIONS)
    }

    pub fn with_divisions(points: Vec<Vec3>, divisions: usize) -> Result<Self> {
        if points.len() < 3 {
            return Err(FlythroughError::invalid(
                "path.points",
                format!("a closed path needs at least 3 control points, got {}", points.len()),
            ));
        }
        if points.iter().any(|p| !p.is_finite()) {
            return Err(FlythroughError::invalid("path.points", "control points must be finite"));
        }
        if divisions < 2 {
            return Err(FlythroughError::invalid("path.divisions", "at least 2 divisions are required"));
        }
        Ok(Self::build(points, divisions))
    }

    /// The winding loop used when no control points are configured.
    #[must_use]
    pub fn tunnel() -> Self {
        let points = TUNNEL_POINTS.iter().map(|p| Vec3::from_array(*p)).collect();
        Self::build(points, Self::DEFAULT_DIVISIONS)
    }

    fn build(points: Vec<Vec3>, divisions: usize) -> Self {
        let mut path = Self {
            points,
            arc_lengths: Vec::with_capacity(divisions + 1),
        };

        let mut last = path.point(0.0);
        let mut sum = 0.0;
        path.arc_lengths.push(0.0);
        for d in 1..=divisions {
            let current = path.point(d as f32 / divisions as f32);
            sum += current.distance(last);
            path.arc_lengths.push(sum);
            last = current;
        }
        path
    }

    #[inline]
    #[must_use]
    pub fn control_points(&self) -> &[Vec3] {
        &self.points
    }

    /// Total (approximated) length of the loop.
    #[inline]
    #[must_use]
    pub fn length(&self) -> f32 {
        self.arc_lengths.last().copied().unwrap_or(0.0)
    }

    /// Evaluates the spline at its raw parameter `t` (not arc-length uniform).
    #[must_use]
    pub fn point(&self, t: f32) -> Vec3 {
        let n = self.points.len();
        let scaled = wrap_progress(t) * n as f32;
        let i = (scaled.floor() as usize) % n;
        let weight = scaled - scaled.floor();

        let p0 = self.points[(i + n - 1) % n];
        let p1 = self.points[i];
        let p2 = self.points[(i + 1) % n];
        let p3 = self.points[(i + 2) % n];

        // Centripetal parametrization: knot spacing is sqrt of chord length
        let mut dt1 = p1.distance_squared(p2).powf(0.25);
        let mut dt0 = p0.distance_squared(p1).powf(0.25);
        let mut dt2 = p2.distance_squared(p3).powf(0.25);
        if dt1 < 1e-4 {
            dt1 = 1.0;
        }
        if dt0 < 1e-4 {
            dt0 = dt1;
        }
        if dt2 < 1e-4 {
            dt2 = dt1;
        }

        let t1 = ((p1 - p0) / dt0 - (p2 - p0) / (dt0 + dt1) + (p2 - p1) / dt1) * dt1;
        let t2 = ((p2 - p1) / dt1 - (p3 - p1) / (dt1 + dt2) + (p3 - p2) / dt2) * dt1;

        let c0 = p1;
        let c1 = t1;
        let c2 = -3.0 * p1 + 3.0 * p2 - 2.0 * t1 - t2;
        let c3 = 2.0 * p1 - 2.0 * p2 + t1 + t2;

        let w2 = weight * weight;
        c0 + c1 * weight + c2 * w2 + c3 * w2 * weight
    }

    /// Maps arc-length progress `u` to the raw spline parameter.
    fn u_to_t(&self, u: f32) -> f32 {
        let count = self.arc_lengths.len();
        let target = u * self.length();

        let upper = self.arc_lengths.partition_point(|&l| l <= target);
        let i = upper.saturating_sub(1).min(count - 2);

        let before = self.arc_lengths[i];
        let after = self.arc_lengths[i + 1];
        let segment = after - before;
        let fraction = if segment > f32::EPSILON {
            ((target - before) / segment).clamp(0.0, 1.0)
        } else {
            0.0
        };

        (i as f32 + fraction) / (count - 1) as f32
    }

    /// Position at normalized arc-length progress `p`. Periodic in `p`.
    #[must_use]
    pub fn position(&self, p: f32) -> Vec3 {
        self.point(self.u_to_t(wrap_progress(p)))
    }

    /// Unit tangent at progress `p`, pointing in the direction of increasing progress.
    #[must_use]
    pub fn tangent(&self, p: f32) -> Vec3 {
        let ahead = self.position(p + TANGENT_DELTA);
        let behind = self.position(p - TANGENT_DELTA);
        (ahead - behind).normalize_or_zero()
    }

    /// The point `delta` further along the loop; negative `delta` looks backwards.
    #[inline]
    #[must_use]
    pub fn look_ahead(&self, p: f32, delta: f32) -> Vec3 {
        self.position(p + delta)
    }

    /// Computes `segments + 1` moving frames at evenly spaced progress values.
    ///
    /// The first normal is seeded from the tangent's smallest axis; each next
    /// frame is the previous one rotated by the change in tangent. Because the
    /// path is closed, the accumulated twist is spread evenly over all frames so
    /// that the last frame lines up with the first.
    #[must_use]
    pub fn frenet_frames(&self, segments: u32) -> FrenetFrames {
        let segments = segments.max(1) as usize;
        let tangents: Vec<Vec3> = (0..=segments)
            .map(|i| self.tangent(i as f32 / segments as f32))
            .collect();

        let mut normals = Vec::with_capacity(segments + 1);
        let mut binormals = Vec::with_capacity(segments + 1);

        let t0 = tangents[0];
        let abs = t0.abs();
        let axis = if abs.x <= abs.y && abs.x <= abs.z {
            Vec3::X
        } else if abs.y <= abs.z {
            Vec3::Y
        } else {
            Vec3::Z
        };
        let side = t0.cross(axis).normalize_or_zero();
        normals.push(t0.cross(side));
        binormals.push(t0.cross(normals[0]));

        for i in 1..=segments {
            let mut normal = normals[i - 1];
            let axis = tangents[i - 1].cross(tangents[i]);
            if axis.length_squared() > f32::EPSILON {
                let theta = tangents[i - 1].dot(tangents[i]).clamp(-1.0, 1.0).acos();
                normal = Quat::from_axis_angle(axis.normalize(), theta) * normal;
            }
            normals.push(normal);
            binormals.push(tangents[i].cross(normal));
        }

        let mut theta = normals[0].dot(normals[segments]).clamp(-1.0, 1.0).acos() / segments as f32;
        if tangents[0].dot(normals[0].cross(normals[segments])) > 0.0 {
            theta = -theta;
        }
        for i in 1..=segments {
            normals[i] = Quat::from_axis_angle(tangents[i], theta * i as f32) * normals[i];
            binormals[i] = tangents[i].cross(normals[i]);
        }

        FrenetFrames {
            tangents,
            normals,
            binormals,
        }
    }
}

impl Default for Path {
    fn default() -> Self {
        Self::tunnel()
    }
}
