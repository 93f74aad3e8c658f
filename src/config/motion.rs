//! Motion engine limits from TOML.

use serde::Deserialize;

use super::units::{Hertz, StepsPerSec, StepsPerSecSquared};

/// Speed envelope and timer parameters of the motion engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct MotionConfig {
    /// Start/stop speed. Every move begins and ends here.
    pub min_speed: StepsPerSec,

    /// Upper bound for any requested speed.
    pub max_speed: StepsPerSec,

    /// Acceleration used when a move does not specify one.
    #[serde(rename = "default_acceleration")]
    pub default_accel: StepsPerSecSquared,

    /// Input clock of the step timer.
    pub timer_clock_hz: Hertz,

    /// Minimum time the STEP output is held active.
    pub pulse_width_us: u32,
}

impl MotionConfig {
    /// Firmware defaults: 50..5000 steps/s, 600 steps/s², 32 MHz timer, 2 µs pulse.
    pub const DEFAULT: Self = Self {
        min_speed: StepsPerSec(50),
        max_speed: StepsPerSec(5000),
        default_accel: StepsPerSecSquared(600),
        timer_clock_hz: Hertz(32_000_000),
        pulse_width_us: 2,
    };

    /// Clamp a requested speed into the configured envelope.
    #[inline]
    pub fn clamp_speed(&self, speed: StepsPerSec) -> StepsPerSec {
        speed.clamp_to(self.min_speed, self.max_speed)
    }

    /// Timer ticks between two steps at `speed`.
    #[inline]
    pub fn interval_for(&self, speed: StepsPerSec) -> u32 {
        self.timer_clock_hz.interval_for(speed)
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
