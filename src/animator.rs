//! Camera Path Animator
//!
//! Progress along the path is a pure function of wall-clock time since an
//! anchor:
//!
//! ```text
//! elapsed  = (t - reference_time) * direction * time_scale
//! progress = wrap(accumulated + elapsed / (loop_duration * speed))
//! ```
//!
//! Changing speed or direction re-anchors first: progress is evaluated at the
//! moment of the change, stored as the new accumulated progress, and the
//! reference time moves to that moment. The camera therefore never jumps, no
//! matter when or how often the parameters change.

use glam::Vec3;

use crate::path::Path;
use crate::settings::CameraSettings;

/// Wraps into `[0, 1)`.
#[inline]
fn wrap_unit(x: f64) -> f64 {
    let wrapped = ((x % 1.0) + 1.0) % 1.0;
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimatorConfig {
    /// Seconds per loop at speed 1000
    pub loop_duration: f64,
    pub time_scale: f64,
    pub lookahead: f32,
    pub default_speed: f64,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self::from(&CameraSettings::default())
    }
}

impl From<&CameraSettings> for AnimatorConfig {
    fn from(camera: &CameraSettings) -> Self {
        Self {
            loop_duration: camera.loop_duration,
            time_scale: camera.time_scale,
            lookahead: camera.lookahead,
            default_speed: camera.default_speed,
        }
    }
}

/// Mutable motion state. Times are milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraMotionState {
    pub speed: f64,
    pub reversed: bool,
    /// Progress at the last advance, in `[0, 1)`
    pub progress: f64,
    /// Anchor time; unset until the first frame or parameter change
    pub reference_time: Option<f64>,
    /// Progress at the anchor time
    pub accumulated_progress: f64,
}

/// Where the camera is and what it looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub progress: f64,
    pub position: Vec3,
    pub target: Vec3,
}

#[derive(Debug, Clone)]
pub struct CameraPathAnimator {
    config: AnimatorConfig,
    state: CameraMotionState,
}

impl Default for CameraPathAnimator {
    fn default() -> Self {
        Self::new(AnimatorConfig::default())
    }
}

impl CameraPathAnimator {
    #[must_use]
    pub fn new(config: AnimatorConfig) -> Self {
        Self {
            config,
            state: CameraMotionState {
                speed: config.default_speed,
                reversed: false,
                progress: 0.0,
                reference_time: None,
                accumulated_progress: 0.0,
            },
        }
    }

    #[must_use]
    pub fn state(&self) -> &CameraMotionState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &AnimatorConfig {
        &self.config
    }

    #[must_use]
    pub fn speed(&self) -> f64 {
        self.state.speed
    }

    #[must_use]
    pub fn is_reversed(&self) -> bool {
        self.state.reversed
    }

    /// Progress the camera would have at time `t`, without mutating anything.
    #[must_use]
    pub fn progress_at(&self, t: f64) -> f64 {
        let Some(reference) = self.state.reference_time else {
            return wrap_unit(self.state.accumulated_progress);
        };
        let direction = if self.state.reversed { -1.0 } else { 1.0 };
        let elapsed = (t - reference) * direction * self.config.time_scale;
        wrap_unit(self.state.accumulated_progress + elapsed / (self.config.loop_duration * self.state.speed))
    }

    /// Advances to time `t`. The first call anchors the motion at `t`.
    pub fn advance(&mut self, t: f64, path: &Path) -> CameraPose {
        if self.state.reference_time.is_none() {
            self.state.reference_time = Some(t);
        }
        self.state.progress = self.progress_at(t);
        self.pose(path)
    }

    /// Pose at the last advanced progress.
    #[must_use]
    pub fn pose(&self, path: &Path) -> CameraPose {
        let progress = self.state.progress;
        let ahead = if self.state.reversed {
            -f64::from(self.config.lookahead)
        } else {
            f64::from(self.config.lookahead)
        };
        CameraPose {
            progress,
            position: path.position(progress as f32),
            target: path.position(wrap_unit(progress + ahead) as f32),
        }
    }

    /// Changes speed at `t` without moving the camera.
    ///
    /// Speed is not validated here; callers reject non-positive values.
    pub fn set_speed(&mut self, t: f64, speed: f64) {
        self.reanchor(t);
        self.state.speed = speed;
    }

    /// Reverses direction at `t` without moving the camera.
    pub fn toggle_direction(&mut self, t: f64) {
        self.reanchor(t);
        self.state.reversed = !self.state.reversed;
    }

    fn reanchor(&mut self, t: f64) {
        let progress = self.progress_at(t);
        self.state.accumulated_progress = progress;
        self.state.progress = progress;
        self.state.reference_time = Some(t);
    }
}
