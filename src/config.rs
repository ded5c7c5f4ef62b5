//! Global configuration constants and the light clustering configuration.

use serde::{Deserialize, Serialize};

use crate::error::{ClusterError, Result};

/// Default number of non-uniform lights packed per frame.
pub const DEFAULT_MAX_LIGHTS: usize = 1024;

/// Default size (in `u16` entries) of the shared light combination buffer.
pub const DEFAULT_MAX_LIGHT_COMBINATIONS_SIZE: usize = 65_536;

/// Default number of frames the renderer keeps in flight.
pub const DEFAULT_FRAMES_IN_FLIGHT: usize = 3;

/// Light indices are stored as `u16` on the GPU.
pub const MAX_ADDRESSABLE_LIGHTS: usize = u16::MAX as usize + 1;

/// Squared length below which a box face normal (or side direction) counts as
/// degenerate in the sphere test and is not used as a separating axis.
pub const SPHERE_AXIS_EPSILON: f32 = 1e-12;

/// Fraction of a fixed buffer above which a frame logs a capacity warning.
pub const CAPACITY_WARNING_RATIO: f32 = 0.9;

/// Sizes of the fixed GPU buffers the light clustering writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightsConfig {
    /// Upper bound on live light entities and on non-uniform lights per frame.
    pub max_lights: usize,
    /// Capacity of the shared light index array, in entries.
    pub max_light_combinations_size: usize,
    /// Ring size of the per-frame host-visible buffers.
    pub frames_in_flight: usize,
}

impl Default for LightsConfig {
    fn default() -> Self {
        Self {
            max_lights: DEFAULT_MAX_LIGHTS,
            max_light_combinations_size: DEFAULT_MAX_LIGHT_COMBINATIONS_SIZE,
            frames_in_flight: DEFAULT_FRAMES_IN_FLIGHT,
        }
    }
}

impl LightsConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_lights == 0 || self.max_lights > MAX_ADDRESSABLE_LIGHTS {
            return Err(ClusterError::InvalidConfig(format!(
                "max_lights must be in 1..={MAX_ADDRESSABLE_LIGHTS}, got {}",
                self.max_lights
            )));
        }
        if self.max_light_combinations_size == 0
            || self.max_light_combinations_size > u32::MAX as usize
        {
            return Err(ClusterError::InvalidConfig(format!(
                "max_light_combinations_size must be in 1..={}, got {}",
                u32::MAX,
                self.max_light_combinations_size
            )));
        }
        if self.frames_in_flight == 0 {
            return Err(ClusterError::InvalidConfig(
                "frames_in_flight must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
