use glam::{Affine3A, Vec2};

use crate::resources::{Color, Geometry, Material, TextureSlot, TextureTransform, create_edges};
use crate::style::VisualStyle;

/// How a generated shape is turned into something drawable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Treatment {
    /// Feature edges as a line list
    Outline,
    /// Filled, double-sided, flat color
    Solid,
    /// Filled, double-sided, tiled texture tinted by the color
    Textured(TextureSlot),
}

impl From<VisualStyle> for Treatment {
    fn from(style: VisualStyle) -> Self {
        match style {
            VisualStyle::Outline => Self::Outline,
            VisualStyle::Solid => Self::Solid,
            VisualStyle::TexturedA => Self::Textured(TextureSlot::A),
            VisualStyle::TexturedB => Self::Textured(TextureSlot::B),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TreatmentParams {
    pub color: Color,
    /// Degrees between face normals above which an outline edge is drawn
    pub edge_threshold: f32,
    pub texture_repeat: Vec2,
    pub transform: Affine3A,
}

/// CPU-side result of a treatment, ready for upload.
#[derive(Debug, Clone)]
pub struct BuiltAsset {
    pub geometry: Geometry,
    pub material: Material,
    pub transform: Affine3A,
}

impl Treatment {
    #[must_use]
    pub fn build(self, input: &Geometry, params: &TreatmentParams) -> BuiltAsset {
        let (geometry, material) = match self {
            Self::Outline => (
                create_edges(input, params.edge_threshold),
                Material::new_line(params.color).with_name("Outline"),
            ),
            Self::Solid => (
                input.clone(),
                Material::new_surface(params.color, None).with_name("Solid"),
            ),
            Self::Textured(slot) => {
                let transform = TextureTransform {
                    repeat: params.texture_repeat,
                    ..TextureTransform::default()
                };
                (
                    input.clone(),
                    Material::new_surface(params.color, Some((slot, transform))).with_name("Textured"),
                )
            }
        };

        BuiltAsset {
            geometry,
            material,
            transform: params.transform,
        }
    }

    #[must_use]
    pub fn texture_slot(self) -> Option<TextureSlot> {
        match self {
            Self::Textured(slot) => Some(slot),
            Self::Outline | Self::Solid => None,
        }
    }
}
