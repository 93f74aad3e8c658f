//! Integer trapezoidal profile kinematics.
//!
//! All speeds are steps/sec and all accelerations steps/sec². Squares and
//! products are taken in `u64` so they never overflow before comparison.
//!
//! Speeds are derived from `v² = v0² ± 2·a·n` with a linear search starting at
//! the previous tick's speed. Speed changes by a few units per tick at
//! realistic accelerations, and the search reproduces the firmware step timing
//! exactly where a closed-form square root would round differently.

/// Direction of slider motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Positive step count, DIR output high.
    Forward,
    /// Negative step count, DIR output low.
    Reverse,
}

impl Direction {
    /// Get direction from signed step count.
    #[inline]
    pub fn from_steps(steps: i32) -> Self {
        if steps > 0 {
            Direction::Forward
        } else {
            Direction::Reverse
        }
    }

    /// Get the sign multiplier.
    #[inline]
    pub fn sign(self) -> i32 {
        match self {
            Direction::Forward => 1,
            Direction::Reverse => -1,
        }
    }
}

/// Current segment of the velocity profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionPhase {
    /// No move in flight.
    Idle,
    /// Ramping up from the minimum speed.
    Accel,
    /// Holding the maximum speed.
    Cruise,
    /// Ramping down toward the minimum speed.
    Decel,
}

/// Steps needed to go from rest to `speed` at `accel`: `speed² / (2·accel)`.
///
/// Returns 0 when `accel` is 0.
#[inline]
pub fn accel_steps_full(speed: u32, accel: u32) -> u32 {
    if accel == 0 {
        return 0;
    }
    let steps = (speed as u64 * speed as u64) / (2 * accel as u64);
    steps.min(u32::MAX as u64) as u32
}

/// Step index at which deceleration begins for a move of `target_steps`.
///
/// A triangle profile (the move is too short to reach `max_speed` and come
/// back down) turns around at half the travel. Otherwise deceleration begins
/// `accel_steps_full` before the end, leaving a cruise segment in between.
#[inline]
pub fn decel_start(target_steps: u32, max_speed: u32, accel: u32) -> u32 {
    let full = accel_steps_full(max_speed, accel) as u64;
    if 2 * full >= target_steps as u64 {
        target_steps / 2
    } else {
        target_steps - full as u32
    }
}

/// Whether a move of `target_steps` never reaches `max_speed`.
#[inline]
pub fn is_triangle(target_steps: u32, max_speed: u32, accel: u32) -> bool {
    2 * accel_steps_full(max_speed, accel) as u64 >= target_steps as u64
}

/// Speed after `accel_steps` steps of acceleration from `min_speed`.
///
/// Largest integer speed not below `current` whose square does not exceed
/// `min_speed² + 2·accel·accel_steps`.
#[inline]
pub fn accel_speed(current: u32, min_speed: u32, accel: u32, accel_steps: u32) -> u32 {
    let target_sq = min_speed as u64 * min_speed as u64 + 2 * accel as u64 * accel_steps as u64;
    let mut speed = current;
    while speed < u32::MAX && (speed as u64 + 1) * (speed as u64 + 1) <= target_sq {
        speed += 1;
    }
    speed
}

/// Speed `decel_steps` steps into deceleration from `max_speed`.
///
/// Largest integer speed not above `current` whose square does not exceed
/// `max_speed² − 2·accel·decel_steps`, floored at `min_speed`. Once the
/// reduction reaches `max_speed²` the result is `min_speed`.
#[inline]
pub fn decel_speed(
    current: u32,
    min_speed: u32,
    max_speed: u32,
    accel: u32,
    decel_steps: u32,
) -> u32 {
    let max_sq = max_speed as u64 * max_speed as u64;
    let reduction = 2 * accel as u64 * decel_steps as u64;
    if reduction >= max_sq {
        return min_speed;
    }

    let target_sq = max_sq - reduction;
    let mut speed = current;
    while speed > min_speed && speed as u64 * speed as u64 > target_sq {
        speed -= 1;
    }
    speed.max(min_speed)
}
