//! Interrupt-driven step generation.
//!
//! Generic over embedded-hal 1.0 pin and delay types and a [`StepTimer`].
//! [`MotionEngine::on_tick`] is the body of the step timer interrupt: it emits
//! one pulse, advances the position and reprograms the timer for the next
//! step. Everything else is called from task context with the interrupt
//! masked (see [`SharedMotion`](super::SharedMotion)).

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::units::{StepsPerSec, StepsPerSecSquared};
use crate::config::MotionConfig;
use crate::error::{MotionError, MotorError, Result};
use crate::hardware::StepTimer;

use super::profile::{self, Direction, MotionPhase};

/// Completion event of a move, delivered exactly once per started move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionOutcome {
    /// The move ran out of steps (`false` after a hard stop or a pin failure).
    pub success: bool,
    /// Absolute position when the move ended.
    pub position: i32,
}

/// Read-only copy of the engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionSnapshot {
    /// Signed step count since the last zeroing.
    pub position: i32,
    /// Current profile segment.
    pub phase: MotionPhase,
    /// Direction of the current or last move.
    pub direction: Direction,
    /// Speed of the next interval in steps/sec.
    pub current_speed: u32,
    /// Cruise speed of the current move.
    pub max_speed: u32,
    /// Acceleration of the current move.
    pub accel: u32,
    /// Steps emitted since the move started.
    pub steps_done: u32,
    /// Steps left before the move completes.
    pub steps_to_go: u32,
    /// Total steps of the current move.
    pub target_steps: u32,
    /// Step index at which deceleration begins.
    pub decel_start: u32,
}

#[derive(Debug, Clone, Copy)]
struct MotionState {
    position: i32,
    phase: MotionPhase,
    direction: Direction,
    steps_done: u32,
    steps_to_go: u32,
    target_steps: u32,
    current_speed: u32,
    max_speed: u32,
    accel: u32,
    accel_steps: u32,
    decel_start: u32,
}

impl MotionState {
    fn idle(min_speed: u32) -> Self {
        Self {
            position: 0,
            phase: MotionPhase::Idle,
            direction: Direction::Forward,
            steps_done: 0,
            steps_to_go: 0,
            target_steps: 0,
            current_speed: min_speed,
            max_speed: min_speed,
            accel: 0,
            accel_steps: 0,
            decel_start: 0,
        }
    }
}

/// Single-axis trapezoidal step generator.
///
/// Generic over:
/// - `STEP`: STEP pin type (must implement `OutputPin`)
/// - `DIR`: DIR pin type (must implement `OutputPin`)
/// - `DELAY`: pulse width delay (must implement `DelayNs`)
/// - `TIMER`: step interrupt timer (must implement [`StepTimer`])
pub struct MotionEngine<STEP, DIR, DELAY, TIMER>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
    TIMER: StepTimer,
{
    step_pin: STEP,
    dir_pin: DIR,
    delay: DELAY,
    timer: TIMER,
    config: MotionConfig,
    state: MotionState,
}

impl<STEP, DIR, DELAY, TIMER> MotionEngine<STEP, DIR, DELAY, TIMER>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
    TIMER: StepTimer,
{
    /// Create an idle engine at position 0.
    ///
    /// Pin levels are left untouched; call [`reset`](Self::reset) to drive
    /// both outputs low.
    pub fn new(step_pin: STEP, dir_pin: DIR, delay: DELAY, timer: TIMER, config: MotionConfig) -> Self {
        Self {
            step_pin,
            dir_pin,
            delay,
            timer,
            state: MotionState::idle(config.min_speed.value()),
            config,
        }
    }

    /// Engine limits.
    #[inline]
    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Whether a move is in flight.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.state.phase != MotionPhase::Idle
    }

    /// Current absolute position in steps.
    #[inline]
    pub fn position(&self) -> i32 {
        self.state.position
    }

    /// Current profile segment.
    #[inline]
    pub fn phase(&self) -> MotionPhase {
        self.state.phase
    }

    /// Speed of the next step interval.
    #[inline]
    pub fn current_speed(&self) -> u32 {
        self.state.current_speed
    }

    /// Overwrite the position. Ignored while a move is in flight.
    ///
    /// Returns whether the position was changed.
    pub fn set_position(&mut self, position: i32) -> bool {
        if self.is_running() {
            return false;
        }
        self.state.position = position;
        true
    }

    /// Copy of the engine state.
    pub fn snapshot(&self) -> MotionSnapshot {
        let s = &self.state;
        MotionSnapshot {
            position: s.position,
            phase: s.phase,
            direction: s.direction,
            current_speed: s.current_speed,
            max_speed: s.max_speed,
            accel: s.accel,
            steps_done: s.steps_done,
            steps_to_go: s.steps_to_go,
            target_steps: s.target_steps,
            decel_start: s.decel_start,
        }
    }

    /// Stop the timer, forget any move, zero the position and drive both
    /// outputs low. No completion event is produced.
    pub fn reset(&mut self) -> Result<()> {
        self.timer.stop();
        self.state = MotionState::idle(self.config.min_speed.value());
        self.step_pin.set_low().map_err(|_| MotorError::PinError)?;
        self.dir_pin.set_low().map_err(|_| MotorError::PinError)?;
        Ok(())
    }

    /// Start a move of `steps` (sign gives the direction).
    ///
    /// `max_speed` is clamped into the configured speed range and a zero
    /// `accel` is replaced by the configured default. The first step fires
    /// one minimum-speed interval after this call.
    ///
    /// # Errors
    ///
    /// - `MotionError::AlreadyRunning` if a move is in flight
    /// - `MotionError::ZeroSteps` if `steps == 0`
    /// - `MotorError::PinError` if the DIR output cannot be set
    ///
    /// The engine state is unchanged on error.
    pub fn start(&mut self, steps: i32, max_speed: StepsPerSec, accel: StepsPerSecSquared) -> Result<()> {
        if self.is_running() {
            return Err(MotionError::AlreadyRunning.into());
        }
        if steps == 0 {
            return Err(MotionError::ZeroSteps.into());
        }

        let min_speed = self.config.min_speed.value();
        let max_speed = self.config.clamp_speed(max_speed).value();
        let accel = match accel.value() {
            0 => self.config.default_accel.value(),
            a => a,
        };
        let direction = Direction::from_steps(steps);
        let target_steps = steps.unsigned_abs();
        let decel_start = profile::decel_start(target_steps, max_speed, accel);

        self.set_direction(direction)?;

        self.state = MotionState {
            position: self.state.position,
            phase: MotionPhase::Accel,
            direction,
            steps_done: 0,
            steps_to_go: target_steps,
            target_steps,
            current_speed: min_speed,
            max_speed,
            accel,
            accel_steps: 0,
            decel_start,
        };

        debug!(
            "motion: start {} steps {:?} at {} steps/s, accel {}, decel at {}",
            target_steps,
            direction,
            max_speed,
            accel,
            decel_start
        );

        self.timer.start(self.config.interval_for(StepsPerSec(min_speed)));
        Ok(())
    }

    /// Stop the move in flight. No-op when idle.
    ///
    /// A hard stop (`fast`, already decelerating, or already at the minimum
    /// speed) stops the timer at once and returns the outcome with
    /// `success = false`. Otherwise the remaining travel is replaced by a
    /// deceleration ramp from the current speed, capped at the steps left,
    /// and the outcome arrives from [`on_tick`](Self::on_tick) when it ends.
    pub fn stop(&mut self, fast: bool) -> Option<MotionOutcome> {
        let s = &mut self.state;
        if s.phase == MotionPhase::Idle {
            return None;
        }

        let min_speed = self.config.min_speed.value();
        if fast || s.phase == MotionPhase::Decel || s.current_speed <= min_speed {
            debug!("motion: hard stop at {}", s.position);
            return Some(self.halt(false));
        }

        let remaining = profile::accel_steps_full(s.current_speed, s.accel).min(s.steps_to_go);
        if remaining == 0 {
            return Some(self.halt(false));
        }

        s.max_speed = s.current_speed;
        s.decel_start = s.steps_done;
        s.target_steps = s.steps_done + remaining;
        s.steps_to_go = remaining;
        s.phase = MotionPhase::Decel;

        debug!("motion: ramping down from {} over {} steps", s.current_speed, remaining);
        None
    }

    /// Step timer interrupt body. No-op when idle.
    ///
    /// Returns the outcome when this tick ends the move.
    pub fn on_tick(&mut self) -> Option<MotionOutcome> {
        if self.state.phase == MotionPhase::Idle {
            return None;
        }

        if self.step_pin.set_high().is_err() {
            error!("motion: STEP pin failure, aborting at {}", self.state.position);
            return Some(self.halt(false));
        }
        self.delay.delay_us(self.config.pulse_width_us);
        let released = self.step_pin.set_low().is_ok();

        // The rising edge already moved the motor.
        let min_speed = self.config.min_speed.value();
        let s = &mut self.state;
        s.position += s.direction.sign();
        s.steps_done += 1;
        s.steps_to_go -= 1;

        if !released {
            error!("motion: STEP pin stuck high, aborting at {}", s.position);
            return Some(self.halt(false));
        }

        if s.steps_to_go == 0 {
            trace!("motion: done at {}", s.position);
            return Some(self.halt(true));
        }

        match s.phase {
            MotionPhase::Accel => {
                s.accel_steps += 1;
                s.current_speed = profile::accel_speed(s.current_speed, min_speed, s.accel, s.accel_steps);

                if s.current_speed >= s.max_speed {
                    s.current_speed = s.max_speed;
                    s.phase = MotionPhase::Cruise;
                } else if s.steps_done >= s.decel_start {
                    s.phase = MotionPhase::Decel;
                }
            }
            MotionPhase::Cruise => {
                if s.steps_done >= s.decel_start {
                    s.phase = MotionPhase::Decel;
                }
            }
            MotionPhase::Decel => {
                s.current_speed = profile::decel_speed(
                    s.current_speed,
                    min_speed,
                    s.max_speed,
                    s.accel,
                    s.steps_done - s.decel_start,
                );
            }
            MotionPhase::Idle => {}
        }

        let interval = self.config.interval_for(StepsPerSec(s.current_speed));
        self.timer.set_interval(interval);
        None
    }

    fn halt(&mut self, success: bool) -> MotionOutcome {
        self.timer.stop();
        self.state.phase = MotionPhase::Idle;
        MotionOutcome {
            success,
            position: self.state.position,
        }
    }

    fn set_direction(&mut self, direction: Direction) -> Result<()> {
        match direction {
            Direction::Forward => self.dir_pin.set_high(),
            Direction::Reverse => self.dir_pin.set_low(),
        }
        .map_err(|_| MotorError::PinError)?;
        Ok(())
    }
}
