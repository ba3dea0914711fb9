use std::path::Path as FsPath;
use std::sync::Arc;

use glam::{Mat3, Vec2};
use serde::{Deserialize, Serialize};
use wgpu::{AddressMode, FilterMode, TextureFormat};

use crate::errors::Result;

/// The two image slots the textured visual styles draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureSlot {
    A,
    B,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureSampler {
    pub address_mode_u: AddressMode,
    pub address_mode_v: AddressMode,
    pub mag_filter: FilterMode,
    pub min_filter: FilterMode,
}

impl Default for TextureSampler {
    /// Wrap-repeating, linearly filtered: suitable for tiling along the tube.
    fn default() -> Self {
        Self {
            address_mode_u: AddressMode::Repeat,
            address_mode_v: AddressMode::Repeat,
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Linear,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureTransform {
    pub offset: Vec2,
    pub repeat: Vec2,
}

impl Default for TextureTransform {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            repeat: Vec2::ONE,
        }
    }
}

impl TextureTransform {
    /// 3x3 UV transform: scale by `repeat`, then translate by `offset`.
    pub fn get_matrix(&self) -> Mat3 {
        Mat3::from_translation(self.offset) * Mat3::from_scale(self.repeat)
    }
}

/// An RGBA8 image plus the sampling state used to draw it.
#[derive(Debug, Clone)]
pub struct Texture {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub data: Arc<Vec<u8>>,
    pub format: TextureFormat,
    pub sampler: TextureSampler,
}

impl Texture {
    pub fn new_2d(name: &str, width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            width,
            height,
            data: Arc::new(data),
            format: TextureFormat::Rgba8UnormSrgb,
            sampler: TextureSampler::default(),
        }
    }

    /// Decodes an image file into an sRGB RGBA8 texture.
    pub fn from_file(path: impl AsRef<FsPath>) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path)?.into_rgba8();
        let (width, height) = image.dimensions();
        log::debug!("Decoded texture {} ({width}x{height})", path.display());
        Ok(Self::new_2d(
            &path.display().to_string(),
            width,
            height,
            image.into_raw(),
        ))
    }

    /// Procedural two-tone checkerboard with `cells` squares per side.
    #[must_use]
    pub fn checkerboard(name: &str, size: u32, cells: u32, light: [u8; 4], dark: [u8; 4]) -> Self {
        let size = size.max(1);
        let cell = (size / cells.max(1)).max(1);
        let mut data = Vec::with_capacity((size * size * 4) as usize);
        for y in 0..size {
            for x in 0..size {
                let texel = if ((x / cell) + (y / cell)) % 2 == 0 { light } else { dark };
                data.extend_from_slice(&texel);
            }
        }
        Self::new_2d(name, size, size, data)
    }

    #[inline]
    #[must_use]
    pub fn byte_size(&self) -> usize {
        self.data.len()
    }

    /// Row pitch of the tightly packed source data.
    #[must_use]
    pub fn bytes_per_row(&self) -> u32 {
        self.format.block_copy_size(None).unwrap_or(4) * self.width
    }
}
