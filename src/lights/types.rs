use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// How a light reaches the scene. Only local lights are clustered per instance.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LightType {
    /// Ambient term: summed into one luminance, never stored per light.
    Uniform = 0,
    /// Directional light affecting every instance.
    Cone = 1,
    Point = 2,
    Spot = 3,
    /// Segment light of `length` along the local X axis.
    Tube = 4,
}

impl LightType {
    /// Lights bounded in space, tested against instance boxes.
    pub fn is_local(self) -> bool {
        matches!(self, LightType::Point | LightType::Spot | LightType::Tube)
    }
}

/// Per-frame light description supplied by the scene layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightInfo {
    /// Stable entity identity, see [`crate::lights::LightId`].
    pub light_index: u16,
    pub light_type: LightType,
    pub luminance: Vec3,
    pub radius: f32,
    pub length: f32,
    pub range: f32,
    /// Index into the model matrices passed to [`crate::Lights::add_lights`].
    pub matrices_offset: u32,
    /// Filled by `add_lights`: slot in the packed parameter array, `None` for
    /// uniform lights.
    pub light_offset: Option<u16>,
}

impl LightInfo {
    pub fn new(light_index: u16, light_type: LightType, matrices_offset: u32) -> Self {
        Self {
            light_index,
            light_type,
            luminance: Vec3::ONE,
            radius: 0.0,
            length: 0.0,
            range: 0.0,
            matrices_offset,
            light_offset: None,
        }
    }

    pub fn with_luminance(mut self, luminance: Vec3) -> Self {
        self.luminance = luminance;
        self
    }

    pub fn with_range(mut self, range: f32) -> Self {
        self.range = range;
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_length(mut self, length: f32) -> Self {
        self.length = length;
        self
    }

    /// Radius of the broad-phase sphere around the light's position.
    pub fn influence_radius(&self) -> f32 {
        match self.light_type {
            LightType::Tube => self.range + self.length * 0.5,
            _ => self.range,
        }
    }
}

/// GPU light record (matches shader layout).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct LightParameters {
    pub luminance: [f32; 3],
    pub radius: f32,
    pub length: f32,
    pub range: f32,
    pub matrices_offset: u32,
    /// [`LightType`] discriminant.
    pub light_type: u32,
}

impl LightParameters {
    pub fn from_info(info: &LightInfo) -> Self {
        Self {
            luminance: info.luminance.to_array(),
            radius: info.radius,
            length: info.length,
            range: info.range,
            matrices_offset: info.matrices_offset,
            light_type: info.light_type as u32,
        }
    }
}

/// Slice `[offset, offset + size)` of the shared light index array.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
pub struct LightsIndicesRange {
    pub offset: u32,
    pub size: u32,
}

impl LightsIndicesRange {
    pub const EMPTY: Self = Self { offset: 0, size: 0 };

    pub fn new(offset: u32, size: u32) -> Self {
        Self { offset, size }
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn as_range(&self) -> std::ops::Range<usize> {
        self.offset as usize..(self.offset + self.size) as usize
    }
}
