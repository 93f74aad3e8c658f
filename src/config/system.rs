//! System configuration - root configuration structure.

use heapless::String;
use serde::Deserialize;

use super::coordinator::CoordinatorConfig;
use super::homing::HomingConfig;
use super::motion::MotionConfig;
use super::units::StepsPerSecSquared;

/// Root configuration structure from TOML.
///
/// Every section is optional and falls back to the firmware defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SliderConfig {
    /// Axis name used in log output (max 32 chars).
    pub name: String<32>,

    /// Motion engine limits.
    pub motion: MotionConfig,

    /// Homing pass.
    pub homing: HomingConfig,

    /// Run-loop pacing.
    pub coordinator: CoordinatorConfig,
}

impl SliderConfig {
    /// Acceleration of the homing travel.
    pub fn homing_accel(&self) -> StepsPerSecSquared {
        self.homing.accel.unwrap_or(self.motion.default_accel)
    }
}

impl Default for SliderConfig {
    fn default() -> Self {
        let mut name = String::new();
        let _ = name.push_str("slider");
        Self {
            name,
            motion: MotionConfig::default(),
            homing: HomingConfig::default(),
            coordinator: CoordinatorConfig::default(),
        }
    }
}
