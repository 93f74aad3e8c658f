//! Unit types for physical quantities.
//!
//! Speeds, accelerations and clock rates are unsigned integers throughout the
//! motion engine. These wrappers keep configuration values from being mixed up
//! before they are lowered to raw integers.

use serde::Deserialize;

/// Linear speed in steps per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(transparent)]
pub struct StepsPerSec(pub u32);

impl StepsPerSec {
    /// Create a new StepsPerSec value.
    #[inline]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Clamp into `[min, max]`.
    #[inline]
    pub fn clamp_to(self, min: StepsPerSec, max: StepsPerSec) -> Self {
        Self(self.0.max(min.0).min(max.0))
    }
}

/// Linear acceleration in steps per second squared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(transparent)]
pub struct StepsPerSecSquared(pub u32);

impl StepsPerSecSquared {
    /// Create a new StepsPerSecSquared value.
    #[inline]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }
}

/// Timer input clock frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(transparent)]
pub struct Hertz(pub u32);

impl Hertz {
    /// Create a new Hertz value.
    #[inline]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Timer ticks between two steps at `speed`.
    ///
    /// A zero speed is treated as 1 step/sec so the result is always defined.
    #[inline]
    pub fn interval_for(self, speed: StepsPerSec) -> u32 {
        self.0 / speed.0.max(1)
    }
}

/// Extension trait for creating unit types from primitives.
pub trait UnitExt {
    /// Convert to StepsPerSec.
    fn steps_per_sec(self) -> StepsPerSec;
    /// Convert to StepsPerSecSquared.
    fn steps_per_sec2(self) -> StepsPerSecSquared;
    /// Convert to Hertz.
    fn hz(self) -> Hertz;
}

impl UnitExt for u32 {
    fn steps_per_sec(self) -> StepsPerSec {
        StepsPerSec(self)
    }

    fn steps_per_sec2(self) -> StepsPerSecSquared {
        StepsPerSecSquared(self)
    }

    fn hz(self) -> Hertz {
        Hertz(self)
    }
}
