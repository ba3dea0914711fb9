//! Style Parameters
//!
//! Style parameters describe how a generated group looks. Each update replaces
//! the group's style wholesale, with every field the update leaves out taken
//! from the previous style.

use std::fmt;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::resources::{Color, ColorValue, TextureSlot};

/// Visual treatment of a generated group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VisualStyle {
    /// Feature edges only, drawn as lines
    #[default]
    Outline,
    Solid,
    TexturedA,
    TexturedB,
}

impl VisualStyle {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Outline => "outline",
            Self::Solid => "solid",
            Self::TexturedA => "texturedA",
            Self::TexturedB => "texturedB",
        }
    }

    /// Parses a style name. Unknown names fall back to [`VisualStyle::Outline`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            n if n.eq_ignore_ascii_case("outline") => Self::Outline,
            n if n.eq_ignore_ascii_case("solid") => Self::Solid,
            n if n.eq_ignore_ascii_case("texturedA") => Self::TexturedA,
            n if n.eq_ignore_ascii_case("texturedB") => Self::TexturedB,
            other => {
                log::warn!("Unknown visual style `{other}`, using outline");
                Self::Outline
            }
        }
    }

    /// The texture slot this style samples, if any.
    #[must_use]
    pub fn texture_slot(self) -> Option<TextureSlot> {
        match self {
            Self::TexturedA => Some(TextureSlot::A),
            Self::TexturedB => Some(TextureSlot::B),
            Self::Outline | Self::Solid => None,
        }
    }
}

impl fmt::Display for VisualStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for VisualStyle {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

impl From<String> for VisualStyle {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<VisualStyle> for String {
    fn from(style: VisualStyle) -> Self {
        style.name().to_string()
    }
}

// ============================================================================
// Tube
// ============================================================================

/// The tube's current style. The color is always concrete: a random request is
/// resolved once when it arrives and kept from then on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TubeStyle {
    pub visual_style: VisualStyle,
    pub color: Color,
    pub scale: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TubeStyleUpdate {
    pub visual_style: Option<VisualStyle>,
    pub color: Option<ColorValue>,
    pub scale: Option<f32>,
}

impl TubeStyle {
    /// Applies `update` on top of `self`.
    ///
    /// An explicit `Random` color draws a new color from `rng`; an absent color
    /// keeps the previously resolved one.
    #[must_use]
    pub fn merged(&self, update: &TubeStyleUpdate, rng: &mut StdRng) -> Self {
        Self {
            visual_style: update.visual_style.unwrap_or(self.visual_style),
            color: update.color.map_or(self.color, |c| c.resolve(rng)),
            scale: update.scale.unwrap_or(self.scale),
        }
    }
}

// ============================================================================
// Elements
// ============================================================================

/// The scattered elements' current style. A `Random` color stays a sentinel so
/// that every regeneration draws fresh per-element colors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementStyle {
    pub visual_style: VisualStyle,
    pub color: ColorValue,
    pub count: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementStyleUpdate {
    pub visual_style: Option<VisualStyle>,
    pub color: Option<ColorValue>,
    pub count: Option<u32>,
}

impl ElementStyle {
    #[must_use]
    pub fn merged(&self, update: &ElementStyleUpdate) -> Self {
        Self {
            visual_style: update.visual_style.unwrap_or(self.visual_style),
            color: update.color.unwrap_or(self.color),
            count: update.count.unwrap_or(self.count),
        }
    }
}
