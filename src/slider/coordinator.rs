//! Slider coordinator and its request/status façade.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embedded_hal::delay::DelayNs;

use crate::config::units::StepsPerSec;
use crate::config::SliderConfig;
use crate::error::{Error, FaultCode, RequestError, Result};
use crate::motion::{MotionControl, MotionOutcome};

use super::state::{SliderState, SliderStatus};

// Outcome of a coordinator pass, logged once the slider lock is released.
enum Transition {
    Started { state: SliderState, steps: i32, speed: u32 },
    StartFailed { state: SliderState, error: Error },
    Homed { success: bool },
    MoveDone { position: i32, success: bool },
}

#[derive(Debug, Clone, Copy)]
struct Inner {
    state: SliderState,
    error_code: FaultCode,
    homed: bool,
    home_requested: bool,
    move_requested: bool,
    stop_requested: bool,
    pending_steps: i32,
    pending_speed: u32,
    motion_complete: bool,
    motion_success: bool,
    last_outcome: Option<MotionOutcome>,
}

impl Inner {
    const INIT: Self = Self {
        state: SliderState::Idle,
        error_code: FaultCode::None,
        homed: false,
        home_requested: false,
        move_requested: false,
        stop_requested: false,
        pending_steps: 0,
        pending_speed: 0,
        motion_complete: false,
        motion_success: false,
        last_outcome: None,
    };

    // A request still waiting for the run loop counts as activity.
    fn is_busy(&self) -> bool {
        self.state != SliderState::Idle || self.home_requested || self.move_requested
    }
}

/// Cooperative state machine driving one slider axis.
///
/// Requests ([`request_home`](Self::request_home),
/// [`request_move`](Self::request_move), [`request_stop`](Self::request_stop))
/// and [`status`](Self::status) may be called from any task. They only record
/// intent under the slider lock; a single task applies it by calling
/// [`run_once`](Self::run_once) (or [`run`](Self::run)) repeatedly.
///
/// # Example
///
/// ```rust,ignore
/// let slider = Slider::new(&MOTION, config);
/// slider.init()?;
///
/// // slider task
/// slider.run(&mut delay);
///
/// // any other task
/// slider.request_move(1000, 500)?;
/// let status = slider.status();
/// ```
pub struct Slider<'a, M: MotionControl> {
    motion: &'a M,
    config: SliderConfig,
    inner: Mutex<CriticalSectionRawMutex, RefCell<Inner>>,
}

impl<'a, M: MotionControl> Slider<'a, M> {
    /// Create an idle, unhomed slider on top of `motion`.
    ///
    /// The engine is not touched; call [`init`](Self::init) once the hardware
    /// is ready.
    pub fn new(motion: &'a M, config: SliderConfig) -> Self {
        Self {
            motion,
            config,
            inner: Mutex::new(RefCell::new(Inner::INIT)),
        }
    }

    /// Slider configuration.
    pub fn config(&self) -> &SliderConfig {
        &self.config
    }

    /// (Re-)initialise: reset the engine, drop every pending request and
    /// stale completion, clear the fault and the homed flag, and go `Idle`.
    ///
    /// This is the only way out of [`SliderState::Error`].
    pub fn init(&self) -> Result<()> {
        self.inner.lock(|cell| {
            self.motion.reset()?;
            *cell.borrow_mut() = Inner::INIT;
            Ok::<(), Error>(())
        })?;
        info!("{}: initialised", self.name());
        Ok(())
    }

    /// Ask for a homing pass.
    ///
    /// # Errors
    ///
    /// `RequestError::Busy` unless the slider is idle with nothing pending.
    pub fn request_home(&self) -> Result<()> {
        let rejected = self.inner.lock(|cell| {
            let mut s = cell.borrow_mut();
            if s.is_busy() {
                return Some(s.state);
            }
            s.home_requested = true;
            None
        });

        if let Some(state) = rejected {
            warn!("{}: home rejected, {:?}", self.name(), state);
            return Err(RequestError::Busy.into());
        }
        Ok(())
    }

    /// Ask for a relative move of `steps` at up to `speed` steps/sec.
    ///
    /// # Errors
    ///
    /// - `RequestError::InvalidParam` if `steps` or `speed` is zero
    /// - `RequestError::Busy` unless the slider is idle with nothing pending
    pub fn request_move(&self, steps: i32, speed: u32) -> Result<()> {
        if steps == 0 || speed == 0 {
            return Err(RequestError::InvalidParam.into());
        }

        let rejected = self.inner.lock(|cell| {
            let mut s = cell.borrow_mut();
            if s.is_busy() {
                return Some(s.state);
            }
            s.pending_steps = steps;
            s.pending_speed = speed;
            s.move_requested = true;
            None
        });

        if let Some(state) = rejected {
            warn!("{}: move rejected, {:?}", self.name(), state);
            return Err(RequestError::Busy.into());
        }
        Ok(())
    }

    /// Ask for the current move or homing pass to ramp down and stop.
    ///
    /// Always accepted; a no-op if nothing is moving. The caller is not
    /// blocked and observes the resulting `Idle` through [`status`](Self::status).
    pub fn request_stop(&self) {
        self.inner.lock(|cell| {
            cell.borrow_mut().stop_requested = true;
        });
    }

    /// Record a device fault raised by endstop or limit detection.
    ///
    /// Hard-stops the engine, drops pending requests and enters
    /// [`SliderState::Error`]. `FaultCode::None` is ignored.
    pub fn report_fault(&self, code: FaultCode) {
        if code == FaultCode::None {
            return;
        }

        let previous = self.inner.lock(|cell| {
            let mut s = cell.borrow_mut();
            let previous = s.state;
            s.home_requested = false;
            s.move_requested = false;
            s.stop_requested = false;
            s.error_code = code;
            s.state = SliderState::Error;
            self.motion.stop(true);
            previous
        });
        warn!("{}: fault {:?} in {:?}", self.name(), code, previous);
    }

    /// Consistent snapshot of state, fault, live position and homed flag.
    pub fn status(&self) -> SliderStatus {
        self.inner.lock(|cell| {
            let s = cell.borrow();
            SliderStatus {
                state: s.state,
                error_code: s.error_code,
                position: self.motion.position(),
                homed: s.homed,
            }
        })
    }

    /// Completion event of the most recently finished move.
    pub fn last_outcome(&self) -> Option<MotionOutcome> {
        self.inner.lock(|cell| cell.borrow().last_outcome)
    }

    /// Apply pending requests and observe completion, without waiting.
    ///
    /// Returns the state after this pass.
    pub fn poll(&self) -> SliderState {
        let (state, stopping, transition) = self.inner.lock(|cell| {
            let mut s = cell.borrow_mut();

            let stopping = s.stop_requested && s.state.is_in_motion();
            s.stop_requested = false;
            if stopping {
                self.motion.stop(false);
            }

            if let Some(outcome) = self.motion.take_completion() {
                s.motion_complete = true;
                s.motion_success = outcome.success;
                s.last_outcome = Some(outcome);
            }

            let current = s.state;
            let transition = match current {
                SliderState::Idle if s.home_requested => {
                    s.home_requested = false;
                    s.homed = false;
                    s.error_code = FaultCode::None;
                    Some(self.begin(&mut s, SliderState::Homing))
                }
                SliderState::Idle if s.move_requested => {
                    s.move_requested = false;
                    s.error_code = FaultCode::None;
                    Some(self.begin(&mut s, SliderState::Moving))
                }
                // An aborted homing pass still counts as homed: the endstop
                // ends it with a hard stop, which is indistinguishable here.
                SliderState::Homing if s.motion_complete => {
                    s.motion_complete = false;
                    self.motion.set_position(0);
                    s.homed = true;
                    s.state = SliderState::Idle;
                    Some(Transition::Homed { success: s.motion_success })
                }
                SliderState::Moving if s.motion_complete => {
                    s.motion_complete = false;
                    s.state = SliderState::Idle;
                    Some(Transition::MoveDone {
                        position: self.motion.position(),
                        success: s.motion_success,
                    })
                }
                _ => None,
            };

            (s.state, stopping, transition)
        });

        if stopping {
            info!("{}: stopping", self.name());
        }
        if let Some(transition) = transition {
            self.log_transition(transition);
        }
        state
    }

    /// One pass of the coordinator loop.
    ///
    /// Runs [`poll`](Self::poll), then either waits up to
    /// `completion_timeout_ms` for the engine to report completion (while a
    /// move is in flight) or sleeps `idle_poll_ms`.
    pub fn run_once<D: DelayNs>(&self, delay: &mut D) {
        if self.poll().is_in_motion() {
            let timeout_ms = self.config.coordinator.completion_timeout_ms;
            if !self.wait_for_completion(delay, timeout_ms) {
                trace!("{}: no completion within {} ms", self.name(), timeout_ms);
            }
        } else {
            delay.delay_ms(self.config.coordinator.idle_poll_ms);
        }
    }

    /// Coordinator task body.
    pub fn run<D: DelayNs>(&self, delay: &mut D) -> ! {
        loop {
            self.run_once(delay);
        }
    }

    fn name(&self) -> &str {
        self.config.name.as_str()
    }

    // Polls the completion signal in 1 ms slices; a lost wakeup costs at most
    // one timeout.
    fn wait_for_completion<D: DelayNs>(&self, delay: &mut D, timeout_ms: u32) -> bool {
        for _ in 0..timeout_ms {
            if self.motion.completion_pending() {
                return true;
            }
            delay.delay_ms(1);
        }
        self.motion.completion_pending()
    }

    fn begin(&self, s: &mut Inner, next: SliderState) -> Transition {
        let (steps, speed, accel) = match next {
            SliderState::Homing => (
                self.config.homing.travel(),
                self.config.homing.speed,
                self.config.homing_accel(),
            ),
            _ => (
                s.pending_steps,
                StepsPerSec(s.pending_speed),
                self.config.motion.default_accel,
            ),
        };

        s.motion_complete = false;
        match self.motion.start(steps, speed, accel) {
            Ok(()) => {
                s.state = next;
                Transition::Started { state: next, steps, speed: speed.value() }
            }
            Err(error) => Transition::StartFailed { state: next, error },
        }
    }

    fn log_transition(&self, transition: Transition) {
        let name = self.name();
        match transition {
            Transition::Started { state, steps, speed } => {
                debug!("{}: {:?} {} steps at {}", name, state, steps, speed);
            }
            Transition::StartFailed { state, error } => {
                warn!("{}: could not start {:?}: {:?}", name, state, error);
            }
            Transition::Homed { success } => {
                info!("{}: homed (success {})", name, success);
            }
            Transition::MoveDone { position, success } => {
                info!("{}: move done at {} (success {})", name, position, success);
            }
        }
    }
}
