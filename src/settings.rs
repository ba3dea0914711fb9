//! Session Settings
//!
//! [`FlythroughSettings`] gathers every tunable of a session. All sections use
//! `#[serde(default)]`, so a settings file only needs the keys it changes:
//!
//! ```json
//! {
//!   "seed": 7,
//!   "camera": { "default_speed": 1500.0 },
//!   "elements": { "initial": { "visual_style": "solid", "color": "random", "count": 300 } }
//! }
//! ```

use std::path::{Path as FsPath, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::errors::{FlythroughError, Result};
use crate::path::Path;
use crate::resources::{Color, ColorValue, TextureSlot};
use crate::scene::{BloomSettings, Environment, Fog};
use crate::style::{ElementStyle, TubeStyle, VisualStyle};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FlythroughSettings {
    /// Fixed RNG seed; `None` seeds from system entropy
    pub seed: Option<u64>,
    pub camera: CameraSettings,
    pub path: PathSettings,
    pub tube: TubeSettings,
    pub elements: ElementSettings,
    pub environment: EnvironmentSettings,
    pub controls: ControlSettings,
    pub textures: TextureSettings,
}

impl FlythroughSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_json_file(path: impl AsRef<FsPath>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        log::info!("Loading settings from {}", path.display());
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let cam = &self.camera;
        if !(cam.min_speed.is_finite() && cam.min_speed > 0.0) {
            return Err(FlythroughError::invalid("camera.min_speed", "must be finite and positive"));
        }
        if !(cam.max_speed.is_finite() && cam.max_speed >= cam.min_speed) {
            return Err(FlythroughError::invalid("camera.max_speed", "must be finite and at least min_speed"));
        }
        if !(cam.min_speed..=cam.max_speed).contains(&cam.default_speed) {
            return Err(FlythroughError::invalid("camera.default_speed", "must lie within the speed bounds"));
        }
        if !(cam.loop_duration.is_finite() && cam.loop_duration > 0.0) {
            return Err(FlythroughError::invalid("camera.loop_duration", "must be finite and positive"));
        }
        if !(cam.near > 0.0 && cam.far > cam.near) {
            return Err(FlythroughError::invalid("camera.near", "need 0 < near < far"));
        }
        if !(cam.time_scale.is_finite() && cam.time_scale > 0.0) {
            return Err(FlythroughError::invalid("camera.time_scale", "must be finite and positive"));
        }
        if !(cam.lookahead.is_finite() && cam.lookahead > 0.0) {
            return Err(FlythroughError::invalid("camera.lookahead", "must be finite and positive"));
        }

        let elements = &self.elements;
        let [lo, hi] = elements.offset_range;
        if !(lo.is_finite() && hi.is_finite() && lo < hi) {
            return Err(FlythroughError::invalid("elements.offset_range", "need finite bounds with low < high"));
        }
        if !(elements.progress_jitter.is_finite() && elements.progress_jitter >= 0.0) {
            return Err(FlythroughError::invalid("elements.progress_jitter", "must be finite and non-negative"));
        }
        if elements.initial.count > elements.max_count {
            return Err(FlythroughError::invalid("elements.initial.count", "exceeds elements.max_count"));
        }
        let scale = self.tube.initial.scale;
        if !(scale.is_finite() && scale > 0.0 && scale <= self.tube.max_scale) {
            return Err(FlythroughError::invalid("tube.initial.scale", "must be positive and at most tube.max_scale"));
        }
        Ok(())
    }
}

// ============================================================================
// Camera
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub default_speed: f64,
    pub min_speed: f64,
    pub max_speed: f64,
    /// Seconds per loop at speed 1000
    pub loop_duration: f64,
    pub time_scale: f64,
    /// Progress offset of the look target
    pub lookahead: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov: 75.0,
            near: 0.1,
            far: 1000.0,
            default_speed: 1000.0,
            min_speed: 1.0,
            max_speed: 100_000.0,
            loop_duration: 8.0,
            time_scale: 1.0,
            lookahead: 0.01,
        }
    }
}

// ============================================================================
// Path
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    /// Control points; the built-in tunnel loop when absent
    pub points: Option<Vec<[f32; 3]>>,
    pub divisions: usize,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            points: None,
            divisions: Path::DEFAULT_DIVISIONS,
        }
    }
}

impl PathSettings {
    pub fn build(&self) -> Result<Path> {
        match &self.points {
            Some(points) => Path::with_divisions(points.iter().copied().map(Vec3::from).collect(), self.divisions),
            None if self.divisions == Path::DEFAULT_DIVISIONS => Ok(Path::tunnel()),
            None => Path::with_divisions(Path::tunnel().control_points().to_vec(), self.divisions),
        }
    }
}

// ============================================================================
// Generated Groups
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialTubeStyle {
    pub visual_style: VisualStyle,
    pub color: ColorValue,
    pub scale: f32,
}

impl Default for InitialTubeStyle {
    fn default() -> Self {
        Self {
            visual_style: VisualStyle::Outline,
            color: ColorValue::Rgb(Color::WHITE),
            scale: 1.0,
        }
    }
}

impl InitialTubeStyle {
    /// Resolves the initial color once, like an explicit update would.
    pub fn resolve(&self, rng: &mut rand::rngs::StdRng) -> TubeStyle {
        TubeStyle {
            visual_style: self.visual_style,
            color: self.color.resolve(rng),
            scale: self.scale,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TubeSettings {
    pub radius: f32,
    /// Segments along the path at scale 1
    pub tubular_segments: u32,
    /// Segments around the profile at scale 1
    pub radial_segments: u32,
    /// Minimum face angle, in degrees, for an edge to be drawn in outline style
    pub edge_threshold: f32,
    pub texture_repeat: [f32; 2],
    /// Largest tessellation scale an update may request
    pub max_scale: f32,
    pub initial: InitialTubeStyle,
}

impl Default for TubeSettings {
    fn default() -> Self {
        Self {
            radius: 0.65,
            tubular_segments: 222,
            radial_segments: 16,
            edge_threshold: 0.2,
            texture_repeat: [16.0, 2.0],
            max_scale: 8.0,
            initial: InitialTubeStyle::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialElementStyle {
    pub visual_style: VisualStyle,
    pub color: ColorValue,
    pub count: u32,
}

impl Default for InitialElementStyle {
    fn default() -> Self {
        Self {
            visual_style: VisualStyle::Outline,
            color: ColorValue::Random,
            count: 150,
        }
    }
}

impl From<InitialElementStyle> for ElementStyle {
    fn from(initial: InitialElementStyle) -> Self {
        Self {
            visual_style: initial.visual_style,
            color: initial.color,
            count: initial.count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementSettings {
    /// Edge length of each box
    pub size: f32,
    /// Upper bound of the random progress jitter added to `i / count`
    pub progress_jitter: f32,
    /// Half-open range of the random X/Y offset
    pub offset_range: [f32; 2],
    pub edge_threshold: f32,
    pub texture_repeat: [f32; 2],
    pub max_count: u32,
    pub initial: InitialElementStyle,
}

impl Default for ElementSettings {
    fn default() -> Self {
        Self {
            size: 0.075,
            progress_jitter: 0.1,
            offset_range: [-0.4, 0.6],
            edge_threshold: 0.2,
            texture_repeat: [1.0, 1.0],
            max_count: 5000,
            initial: InitialElementStyle::default(),
        }
    }
}

// ============================================================================
// Environment
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FogSettings {
    pub enabled: bool,
    pub color: Color,
    pub density: f32,
}

impl Default for FogSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            color: Color::BLACK,
            density: 0.4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloomConfig {
    pub enabled: bool,
    pub threshold: f32,
    pub strength: f32,
    pub radius: f32,
}

impl Default for BloomConfig {
    fn default() -> Self {
        let bloom = BloomSettings::default();
        Self {
            enabled: bloom.enabled,
            threshold: bloom.threshold,
            strength: bloom.strength,
            radius: bloom.radius,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentSettings {
    pub background: Color,
    pub fog: FogSettings,
    pub bloom: BloomConfig,
}

impl EnvironmentSettings {
    #[must_use]
    pub fn build(&self) -> Environment {
        let mut bloom = BloomSettings {
            enabled: self.bloom.enabled,
            ..BloomSettings::default()
        };
        bloom.set_threshold(self.bloom.threshold);
        bloom.set_strength(self.bloom.strength);
        bloom.set_radius(self.bloom.radius);

        Environment {
            background: self.background,
            fog: self.fog.enabled.then(|| Fog::new(self.fog.color, self.fog.density)),
            bloom,
        }
    }
}

// ============================================================================
// Inspection Controls
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSettings {
    pub enabled: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub max_zoom: f32,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            damping_factor: 0.005,
            rotate_speed: 1.0,
            zoom_speed: 0.05,
            max_zoom: 2.0,
        }
    }
}

// ============================================================================
// Textures
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureSettings {
    pub slot_a: Option<PathBuf>,
    pub slot_b: Option<PathBuf>,
}

impl TextureSettings {
    #[must_use]
    pub fn path(&self, slot: TextureSlot) -> Option<&FsPath> {
        match slot {
            TextureSlot::A => self.slot_a.as_deref(),
            TextureSlot::B => self.slot_b.as_deref(),
        }
    }
}
