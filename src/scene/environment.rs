//! Scene Environment
//!
//! Global look of the scene: clear color, exponential-squared fog and the
//! bloom post-process parameters.

use crate::resources::Color;

/// Exponential-squared distance fog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    pub color: Color,
    pub density: f32,
}

impl Fog {
    #[must_use]
    pub fn new(color: Color, density: f32) -> Self {
        Self {
            color,
            density: density.max(0.0),
        }
    }

    /// Fraction of fog color blended in at `distance` from the eye, in `[0, 1]`.
    #[must_use]
    pub fn factor(&self, distance: f32) -> f32 {
        let d = self.density * distance;
        (1.0 - (-d * d).exp()).clamp(0.0, 1.0)
    }
}

/// Threshold-based bloom applied after the scene pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomSettings {
    pub enabled: bool,
    /// Luminance above which pixels contribute to the glow
    pub threshold: f32,
    pub strength: f32,
    pub radius: f32,
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: 0.002,
            strength: 3.5,
            radius: 0.0,
        }
    }
}

impl BloomSettings {
    pub fn set_strength(&mut self, strength: f32) {
        self.strength = strength.max(0.0);
    }

    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius.max(0.0);
    }

    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = threshold.max(0.0);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Environment {
    pub background: Color,
    pub fog: Option<Fog>,
    pub bloom: BloomSettings,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            background: Color::BLACK,
            fog: Some(Fog::new(Color::BLACK, 0.4)),
            bloom: BloomSettings::default(),
        }
    }
}
