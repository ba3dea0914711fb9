use std::fmt;
use std::str::FromStr;

use glam::Vec4;
use rand::RngExt;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::errors::FlythroughError;

/// Hex digits a random color is drawn from. `e` is deliberately absent.
const RANDOM_DIGITS: &[u8; 15] = b"0123456789abcdf";

/// A packed `0xRRGGBB` color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color(0x00_00_00);
    pub const WHITE: Color = Color(0xff_ff_ff);

    #[must_use]
    pub fn hex(self) -> u32 {
        self.0 & 0x00ff_ffff
    }

    /// Normalized RGBA with full opacity.
    #[must_use]
    pub fn to_vec4(self) -> Vec4 {
        let c = self.hex();
        Vec4::new(
            ((c >> 16) & 0xff) as f32 / 255.0,
            ((c >> 8) & 0xff) as f32 / 255.0,
            (c & 0xff) as f32 / 255.0,
            1.0,
        )
    }

    /// Draws six hex digits independently.
    pub fn random(rng: &mut StdRng) -> Self {
        let value = (0..6).fold(0u32, |acc, _| {
            let digit = RANDOM_DIGITS[rng.random_range(0..RANDOM_DIGITS.len())];
            let nibble = (digit as char).to_digit(16).unwrap_or(0);
            (acc << 4) | nibble
        });
        Color(value)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.hex())
    }
}

impl FromStr for Color {
    type Err = FlythroughError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('#')
            .or_else(|| trimmed.strip_prefix("0x"))
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(FlythroughError::invalid("color", format!("expected 6 hex digits, got `{s}`")));
        }
        u32::from_str_radix(digits, 16)
            .map(Color)
            .map_err(|_| FlythroughError::invalid("color", format!("`{s}` is not a hex color")))
    }
}

impl TryFrom<String> for Color {
    type Error = FlythroughError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// A color as requested by the caller: either concrete or the random sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ColorValue {
    Rgb(Color),
    Random,
}

impl ColorValue {
    #[must_use]
    pub fn is_random(self) -> bool {
        matches!(self, Self::Random)
    }

    /// Concrete color, drawing a fresh one for the random sentinel.
    pub fn resolve(self, rng: &mut StdRng) -> Color {
        match self {
            Self::Rgb(color) => color,
            Self::Random => Color::random(rng),
        }
    }
}

impl From<Color> for ColorValue {
    fn from(color: Color) -> Self {
        Self::Rgb(color)
    }
}

impl FromStr for ColorValue {
    type Err = FlythroughError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("random") {
            Ok(Self::Random)
        } else {
            s.parse().map(Self::Rgb)
        }
    }
}

impl TryFrom<String> for ColorValue {
    type Error = FlythroughError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ColorValue> for String {
    fn from(value: ColorValue) -> Self {
        match value {
            ColorValue::Rgb(color) => color.to_string(),
            ColorValue::Random => "random".to_string(),
        }
    }
}
