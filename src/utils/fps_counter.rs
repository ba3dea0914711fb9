/// Frame counters and a frames-per-second estimate.
///
/// Driven by frame timestamps rather than its own clock, so it measures the
/// same time base the animator runs on.
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    pub total_frames: u64,
    /// Frames whose render pass failed
    pub dropped_frames: u64,
    pub current_fps: f32,

    window_start: Option<f64>,
    window_frames: u32,
    last_frame_time: Option<f64>,
    last_delta_ms: f64,
}

impl FrameStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one frame at `now_ms`. Returns the new FPS value whenever a
    /// one-second window completes.
    pub fn record(&mut self, now_ms: f64, rendered: bool) -> Option<f32> {
        self.total_frames += 1;
        if !rendered {
            self.dropped_frames += 1;
        }

        self.last_delta_ms = self.last_frame_time.map_or(0.0, |last| (now_ms - last).max(0.0));
        self.last_frame_time = Some(now_ms);

        let start = *self.window_start.get_or_insert(now_ms);
        self.window_frames += 1;

        let window = now_ms - start;
        if window >= 1000.0 {
            self.current_fps = (f64::from(self.window_frames) * 1000.0 / window) as f32;

            self.window_start = Some(now_ms);
            self.window_frames = 0;

            return Some(self.current_fps);
        }

        None
    }

    /// Seconds between the last two recorded frames.
    #[must_use]
    pub fn delta_seconds(&self) -> f32 {
        (self.last_delta_ms / 1000.0) as f32
    }
}
