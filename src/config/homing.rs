//! Homing pass configuration.

use serde::Deserialize;

use super::units::{StepsPerSec, StepsPerSecSquared};

/// Parameters of the homing travel toward the endstop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct HomingConfig {
    /// Cruise speed of the homing travel.
    pub speed: StepsPerSec,

    /// Length of the reverse travel. Must exceed the physical travel so the
    /// endstop ends the move, not the step count.
    pub distance: u32,

    /// Acceleration of the homing travel; the motion default when unset.
    #[serde(rename = "acceleration")]
    pub accel: Option<StepsPerSecSquared>,
}

impl HomingConfig {
    /// Firmware defaults: 500 steps/s over 100000 steps.
    pub const DEFAULT: Self = Self {
        speed: StepsPerSec(500),
        distance: 100_000,
        accel: None,
    };

    /// Signed step count of the homing move (always reverse).
    #[inline]
    pub fn travel(&self) -> i32 {
        -(self.distance.min(i32::MAX as u32) as i32)
    }
}

impl Default for HomingConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
