use glam::{EulerRot, Quat, Vec2, Vec3};

use crate::scene::transform::Transform;
use crate::settings::ControlSettings;

/// Pointer state for one frame, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlInput {
    pub pointer_delta: Vec2,
    /// Positive scrolls in
    pub scroll: f32,
    /// Whether the rotate button is held
    pub rotating: bool,
    pub viewport_height: f32,
}

/// Damped look-around on top of the path-following camera.
///
/// Dragging turns the view away from the travel direction; scrolling pulls
/// the eye back along the view axis. Motion decays with the damping factor,
/// so the offset eases out after input stops.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub enabled: bool,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub damping_factor: f32,
    pub max_zoom: f32,

    /// Yaw offset in radians
    pub theta: f32,
    /// Pitch offset in radians
    pub phi: f32,
    /// Pull-back distance along the view axis
    pub zoom: f32,

    rotate_delta: Vec2,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(&ControlSettings::default())
    }
}

impl OrbitControls {
    #[must_use]
    pub fn new(settings: &ControlSettings) -> Self {
        Self {
            enabled: settings.enabled,
            rotate_speed: settings.rotate_speed,
            zoom_speed: settings.zoom_speed,
            damping_factor: settings.damping_factor,
            max_zoom: settings.max_zoom,

            theta: 0.0,
            phi: 0.0,
            zoom: 0.0,

            rotate_delta: Vec2::ZERO,
        }
    }

    pub fn update(&mut self, input: &ControlInput, dt: f32) {
        if !self.enabled {
            return;
        }

        let screen_height = input.viewport_height.max(1.0);
        if input.rotating {
            let rotate_per_pixel = 2.0 * std::f32::consts::PI / screen_height;
            self.rotate_delta -= input.pointer_delta * rotate_per_pixel * self.rotate_speed;
        }

        let target_fps = 60.0;
        let retention = (1.0 - self.damping_factor).powf(dt * target_fps);
        let delta_apply = self.rotate_delta * (1.0 - retention);

        self.theta += delta_apply.x;
        self.phi += delta_apply.y;
        self.rotate_delta *= retention;

        const EPS: f32 = 0.0001;
        let half_pi = std::f32::consts::FRAC_PI_2;
        self.phi = self.phi.clamp(-half_pi + EPS, half_pi - EPS);

        if input.scroll != 0.0 {
            let step = self.max_zoom * self.zoom_speed * input.scroll.abs();
            self.zoom = if input.scroll > 0.0 { self.zoom - step } else { self.zoom + step };
            self.zoom = self.zoom.clamp(0.0, self.max_zoom);
        }
    }

    /// Applies the look offset to a transform already facing along the path.
    pub fn apply(&self, transform: &mut Transform) {
        if !self.enabled {
            return;
        }
        let offset = Quat::from_euler(EulerRot::YXZ, self.theta, self.phi, 0.0);
        transform.rotation = (transform.rotation * offset).normalize();
        if self.zoom > 0.0 {
            transform.position += transform.rotation * Vec3::Z * self.zoom;
        }
    }

    /// Drops any accumulated offset and pending motion.
    pub fn reset(&mut self) {
        self.theta = 0.0;
        self.phi = 0.0;
        self.zoom = 0.0;
        self.rotate_delta = Vec2::ZERO;
    }
}
