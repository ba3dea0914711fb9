//! Frame Driver
//!
//! One [`FrameDriver::step`] per displayed frame:
//!
//! 1. advance the animator to the frame timestamp (never skipped),
//! 2. pose the camera from the animator plus the inspection offset,
//! 3. render one pass,
//! 4. update the inspection controls.
//!
//! A failing render is logged and counted as a dropped frame; the next frame
//! proceeds normally. Since progress derives from wall-clock time, dropped
//! frames cost no motion.

use glam::{Quat, Vec3};

use crate::animator::{CameraPathAnimator, CameraPose};
use crate::gpu::{FrameView, RenderBackend};
use crate::path::Path;
use crate::scene::{Camera, Scene, Transform};
use crate::utils::{ControlInput, FrameStats, OrbitControls};

/// The session state a frame reads and writes.
pub struct FrameTargets<'a, B: RenderBackend> {
    pub animator: &'a mut CameraPathAnimator,
    pub path: &'a Path,
    pub camera: &'a mut Camera,
    pub controls: &'a mut OrbitControls,
    pub input: &'a ControlInput,
    pub scene: &'a Scene,
    pub backend: &'a mut B,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutcome {
    pub pose: CameraPose,
    pub rendered: bool,
}

#[derive(Debug, Default)]
pub struct FrameDriver {
    camera_transform: Transform,
    /// Path-facing rotation before the inspection offset
    base_rotation: Quat,
    stats: FrameStats,
}

impl FrameDriver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    #[must_use]
    pub fn camera_transform(&self) -> &Transform {
        &self.camera_transform
    }

    pub fn step<B: RenderBackend>(&mut self, now: f64, targets: FrameTargets<'_, B>) -> FrameOutcome {
        let FrameTargets {
            animator,
            path,
            camera,
            controls,
            input,
            scene,
            backend,
        } = targets;

        let pose = animator.advance(now, path);

        self.camera_transform.position = pose.position;
        self.camera_transform.rotation = self.base_rotation;
        self.camera_transform.look_at(pose.target, Vec3::Y);
        self.base_rotation = self.camera_transform.rotation;
        controls.apply(&mut self.camera_transform);
        if self.camera_transform.update_local_matrix() {
            camera.update_view_projection(self.camera_transform.local_matrix());
        }

        let rendered = match backend.render(&FrameView {
            scene,
            camera,
            time: now,
        }) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Dropped frame at {now:.1} ms: {e}");
                false
            }
        };

        if let Some(fps) = self.stats.record(now, rendered) {
            log::trace!("{fps:.1} fps");
        }
        controls.update(input, self.stats.delta_seconds());

        FrameOutcome { pose, rendered }
    }
}
