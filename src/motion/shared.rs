//! Engine shared between the step interrupt and task context.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::units::{StepsPerSec, StepsPerSecSquared};
use crate::error::Result;
use crate::hardware::StepTimer;

use super::engine::{MotionEngine, MotionOutcome, MotionSnapshot};

/// Task-side view of the motion engine.
///
/// All methods take `&self` and may be called from any task. The coordinator
/// only talks to the engine through this trait.
pub trait MotionControl {
    /// Start a move. See [`MotionEngine::start`].
    fn start(&self, steps: i32, max_speed: StepsPerSec, accel: StepsPerSecSquared) -> Result<()>;

    /// Stop the move in flight. See [`MotionEngine::stop`].
    fn stop(&self, fast: bool);

    /// Whether a move is in flight.
    fn is_running(&self) -> bool;

    /// Current absolute position in steps.
    fn position(&self) -> i32;

    /// Overwrite the position while idle. Returns whether it took effect.
    fn set_position(&self, position: i32) -> bool;

    /// Take the pending completion event, if any.
    fn take_completion(&self) -> Option<MotionOutcome>;

    /// Whether a completion event is waiting to be taken.
    fn completion_pending(&self) -> bool;

    /// Drop any pending completion event and reset the engine.
    fn reset(&self) -> Result<()>;
}

/// A [`MotionEngine`] guarded by a critical section, plus its completion signal.
///
/// Place it in a `static` (or any shared location), call
/// [`on_timer_interrupt`](Self::on_timer_interrupt) from the step timer
/// interrupt handler and hand a reference to the coordinator.
///
/// # Example
///
/// ```rust,ignore
/// static MOTION: StaticCell<SharedMotion<Step, Dir, Delay, Tim2>> = StaticCell::new();
///
/// #[interrupt]
/// fn TIM2() {
///     MOTION.get().on_timer_interrupt();
/// }
/// ```
pub struct SharedMotion<STEP, DIR, DELAY, TIMER>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
    TIMER: StepTimer,
{
    engine: Mutex<CriticalSectionRawMutex, RefCell<MotionEngine<STEP, DIR, DELAY, TIMER>>>,
    completion: Signal<CriticalSectionRawMutex, MotionOutcome>,
}

impl<STEP, DIR, DELAY, TIMER> SharedMotion<STEP, DIR, DELAY, TIMER>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
    TIMER: StepTimer,
{
    /// Wrap an engine.
    pub fn new(engine: MotionEngine<STEP, DIR, DELAY, TIMER>) -> Self {
        Self {
            engine: Mutex::new(RefCell::new(engine)),
            completion: Signal::new(),
        }
    }

    /// Step timer interrupt handler.
    pub fn on_timer_interrupt(&self) {
        if let Some(outcome) = self.with_engine(|engine| engine.on_tick()) {
            self.completion.signal(outcome);
        }
    }

    /// Run `f` on the engine with the step interrupt masked.
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut MotionEngine<STEP, DIR, DELAY, TIMER>) -> R) -> R {
        self.engine.lock(|cell| f(&mut cell.borrow_mut()))
    }

    /// Copy of the engine state.
    pub fn snapshot(&self) -> MotionSnapshot {
        self.with_engine(|engine| engine.snapshot())
    }
}

impl<STEP, DIR, DELAY, TIMER> MotionControl for SharedMotion<STEP, DIR, DELAY, TIMER>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
    TIMER: StepTimer,
{
    fn start(&self, steps: i32, max_speed: StepsPerSec, accel: StepsPerSecSquared) -> Result<()> {
        self.with_engine(|engine| engine.start(steps, max_speed, accel))
    }

    fn stop(&self, fast: bool) {
        if let Some(outcome) = self.with_engine(|engine| engine.stop(fast)) {
            self.completion.signal(outcome);
        }
    }

    fn is_running(&self) -> bool {
        self.with_engine(|engine| engine.is_running())
    }

    fn position(&self) -> i32 {
        self.with_engine(|engine| engine.position())
    }

    fn set_position(&self, position: i32) -> bool {
        self.with_engine(|engine| engine.set_position(position))
    }

    fn take_completion(&self) -> Option<MotionOutcome> {
        self.completion.try_take()
    }

    fn completion_pending(&self) -> bool {
        self.completion.signaled()
    }

    fn reset(&self) -> Result<()> {
        self.with_engine(|engine| engine.reset())?;
        self.completion.reset();
        Ok(())
    }
}
