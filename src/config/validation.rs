//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::{CoordinatorConfig, HomingConfig, MotionConfig, SliderConfig};

/// Validate a slider configuration.
///
/// Checks:
/// - Speed range is non-empty and starts above zero
/// - Default acceleration is positive
/// - Timer clock yields at least one tick per step at max speed
/// - Homing speed lies in the speed range and the distance fits a signed move
/// - Coordinator timeouts are positive
pub fn validate_config(config: &SliderConfig) -> Result<()> {
    validate_motion(&config.motion)?;
    validate_homing(&config.homing, &config.motion)?;
    validate_coordinator(&config.coordinator)?;
    Ok(())
}

fn validate_motion(motion: &MotionConfig) -> Result<()> {
    let min = motion.min_speed.value();
    let max = motion.max_speed.value();

    if min == 0 || min > max {
        return Err(Error::Config(ConfigError::InvalidSpeedRange { min, max }));
    }

    if motion.default_accel.value() == 0 {
        return Err(Error::Config(ConfigError::InvalidAcceleration(
            motion.default_accel.value(),
        )));
    }

    if motion.timer_clock_hz.value() < max {
        return Err(Error::Config(ConfigError::InvalidTimerClock {
            clock_hz: motion.timer_clock_hz.value(),
            max_speed: max,
        }));
    }

    Ok(())
}

fn validate_homing(homing: &HomingConfig, motion: &MotionConfig) -> Result<()> {
    let speed = homing.speed;
    if speed < motion.min_speed || speed > motion.max_speed {
        return Err(Error::Config(ConfigError::InvalidHomingSpeed(speed.value())));
    }

    if homing.distance == 0 || homing.distance > i32::MAX as u32 {
        return Err(Error::Config(ConfigError::InvalidHomingDistance(
            homing.distance,
        )));
    }

    if let Some(accel) = homing.accel {
        if accel.value() == 0 {
            return Err(Error::Config(ConfigError::InvalidAcceleration(0)));
        }
    }

    Ok(())
}

fn validate_coordinator(coordinator: &CoordinatorConfig) -> Result<()> {
    if coordinator.completion_timeout_ms == 0 {
        return Err(Error::Config(ConfigError::InvalidTimeout(0)));
    }
    if coordinator.idle_poll_ms == 0 {
        return Err(Error::Config(ConfigError::InvalidTimeout(0)));
    }
    Ok(())
}
