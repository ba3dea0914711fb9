use glam::{Mat3, Vec4};

use crate::resources::color::Color;
use crate::resources::texture::{TextureSlot, TextureTransform};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    #[default]
    Front,
    Back,
    Double,
}

impl Side {
    /// Face culling a pipeline needs for this side.
    #[must_use]
    pub fn cull_mode(self) -> Option<wgpu::Face> {
        match self {
            Side::Front => Some(wgpu::Face::Back),
            Side::Back => Some(wgpu::Face::Front),
            Side::Double => None,
        }
    }
}

/// Render states that select a pipeline variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialSettings {
    pub side: Side,
    /// Whether scene fog applies
    pub fog: bool,
}

impl Default for MaterialSettings {
    fn default() -> Self {
        Self {
            side: Side::Front,
            fog: true,
        }
    }
}

// LineBasicMaterial
// ----------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq)]
pub struct LineBasicMaterial {
    pub color: Vec4,
}

// MeshBasicMaterial
// ----------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq)]
pub struct MeshBasicMaterial {
    pub color: Vec4,
    pub map: Option<TextureSlot>,
    pub map_transform: TextureTransform,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MaterialData {
    LineBasic(LineBasicMaterial),
    MeshBasic(MeshBasicMaterial),
}

impl MaterialData {
    pub fn shader_name(&self) -> &'static str {
        match self {
            Self::LineBasic(_) => "line_basic",
            Self::MeshBasic(_) => "mesh_basic",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: Option<String>,
    pub data: MaterialData,
    pub settings: MaterialSettings,
}

impl Material {
    pub fn new(data: MaterialData) -> Self {
        Self {
            name: None,
            data,
            settings: MaterialSettings::default(),
        }
    }

    /// Unlit line material for edge/outline rendering.
    pub fn new_line(color: Color) -> Self {
        Self::new(MaterialData::LineBasic(LineBasicMaterial {
            color: color.to_vec4(),
        }))
    }

    /// Unlit double-sided surface, optionally textured.
    pub fn new_surface(color: Color, map: Option<(TextureSlot, TextureTransform)>) -> Self {
        let (map, map_transform) = match map {
            Some((slot, transform)) => (Some(slot), transform),
            None => (None, TextureTransform::default()),
        };
        let mut material = Self::new(MaterialData::MeshBasic(MeshBasicMaterial {
            color: color.to_vec4(),
            map,
            map_transform,
        }));
        material.settings.side = Side::Double;
        material
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn color(&self) -> Vec4 {
        match &self.data {
            MaterialData::LineBasic(m) => m.color,
            MaterialData::MeshBasic(m) => m.color,
        }
    }

    pub fn map(&self) -> Option<TextureSlot> {
        match &self.data {
            MaterialData::LineBasic(_) => None,
            MaterialData::MeshBasic(m) => m.map,
        }
    }

    /// UV matrix of the sampled map, if any.
    pub fn map_matrix(&self) -> Option<Mat3> {
        match &self.data {
            MaterialData::MeshBasic(m) if m.map.is_some() => Some(m.map_transform.get_matrix()),
            _ => None,
        }
    }

    pub fn shader_name(&self) -> &'static str {
        self.data.shader_name()
    }
}
