//! Simulated step hardware shared by the integration tests.
#![allow(dead_code)]

use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin};
use embedded_hal_mock::eh1::delay::NoopDelay;

use slider_motion::config::MotionConfig;
use slider_motion::hardware::StepTimer;
use slider_motion::motion::{MotionEngine, MotionPhase, SharedMotion};

/// Output pin that counts rising edges.
#[derive(Clone, Default)]
pub struct CountingPin {
    pub high: Arc<AtomicBool>,
    pub rising_edges: Arc<AtomicU32>,
}

impl ErrorType for CountingPin {
    type Error = Infallible;
}

impl OutputPin for CountingPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        if !self.high.swap(true, Ordering::SeqCst) {
            self.rising_edges.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

/// Output pin whose `set_high` fails after a number of successful calls.
#[derive(Clone)]
pub struct FailingPin {
    pub highs_left: Arc<AtomicU32>,
}

impl FailingPin {
    pub fn after(highs: u32) -> Self {
        Self {
            highs_left: Arc::new(AtomicU32::new(highs)),
        }
    }
}

impl ErrorType for FailingPin {
    type Error = ErrorKind;
}

impl OutputPin for FailingPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        let left = self.highs_left.load(Ordering::SeqCst);
        if left == 0 {
            return Err(ErrorKind::Other);
        }
        self.highs_left.store(left - 1, Ordering::SeqCst);
        Ok(())
    }
}

/// Output pin whose `set_low` fails after a number of successful calls.
#[derive(Clone)]
pub struct StuckPin {
    pub lows_left: Arc<AtomicU32>,
}

impl StuckPin {
    pub fn after(lows: u32) -> Self {
        Self {
            lows_left: Arc::new(AtomicU32::new(lows)),
        }
    }
}

impl ErrorType for StuckPin {
    type Error = ErrorKind;
}

impl OutputPin for StuckPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        let left = self.lows_left.load(Ordering::SeqCst);
        if left == 0 {
            return Err(ErrorKind::Other);
        }
        self.lows_left.store(left - 1, Ordering::SeqCst);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Step timer that records its programming instead of raising interrupts.
#[derive(Clone, Default)]
pub struct SimTimer {
    pub armed: Arc<AtomicBool>,
    pub interval: Arc<AtomicU32>,
    pub starts: Arc<AtomicU32>,
}

impl SimTimer {
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::SeqCst)
    }

    pub fn interval(&self) -> u32 {
        self.interval.load(Ordering::SeqCst)
    }
}

impl StepTimer for SimTimer {
    fn start(&mut self, interval_ticks: u32) {
        self.interval.store(interval_ticks, Ordering::SeqCst);
        self.starts.fetch_add(1, Ordering::SeqCst);
        self.armed.store(true, Ordering::SeqCst);
    }

    fn set_interval(&mut self, interval_ticks: u32) {
        self.interval.store(interval_ticks, Ordering::SeqCst);
    }

    fn stop(&mut self) {
        self.armed.store(false, Ordering::SeqCst);
    }
}

pub type SimEngine = MotionEngine<CountingPin, CountingPin, NoopDelay, SimTimer>;
pub type SimMotion = SharedMotion<CountingPin, CountingPin, NoopDelay, SimTimer>;

/// Handles to observe the simulated hardware of an engine.
#[derive(Clone, Default)]
pub struct Probe {
    pub step: CountingPin,
    pub dir: CountingPin,
    pub timer: SimTimer,
}

impl Probe {
    pub fn pulses(&self) -> u32 {
        self.step.rising_edges.load(Ordering::SeqCst)
    }

    pub fn dir_high(&self) -> bool {
        self.dir.high.load(Ordering::SeqCst)
    }
}

pub fn sim_engine(config: MotionConfig) -> (SimEngine, Probe) {
    let probe = Probe::default();
    let engine = MotionEngine::new(
        probe.step.clone(),
        probe.dir.clone(),
        NoopDelay::new(),
        probe.timer.clone(),
        config,
    );
    (engine, probe)
}

pub fn sim_motion(config: MotionConfig) -> (SimMotion, Probe) {
    let (engine, probe) = sim_engine(config);
    (SharedMotion::new(engine), probe)
}

/// One sample per tick: the phase and speed programmed for the next interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSample {
    pub phase: MotionPhase,
    pub speed: u32,
}

/// Tick the engine until it goes idle, recording what each tick programmed.
pub fn run_to_idle(engine: &mut SimEngine, max_ticks: u32) -> Vec<TickSample> {
    let mut samples = Vec::new();
    for _ in 0..max_ticks {
        if !engine.is_running() {
            break;
        }
        engine.on_tick();
        samples.push(TickSample {
            phase: engine.phase(),
            speed: engine.current_speed(),
        });
    }
    assert!(!engine.is_running(), "move did not finish within {} ticks", max_ticks);
    samples
}

/// Speeds rise (or hold) until deceleration begins and fall (or hold) after.
///
/// Sample `b` was computed under the phase of the sample before it.
pub fn assert_monotonic_profile(samples: &[TickSample]) {
    for pair in samples.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if b.phase == MotionPhase::Idle {
            break;
        }
        if a.phase == MotionPhase::Decel {
            assert_eq!(b.phase, MotionPhase::Decel, "left decel: {:?} -> {:?}", a, b);
            assert!(b.speed <= a.speed, "speed rose while decelerating: {:?} -> {:?}", a, b);
        } else {
            assert!(b.speed >= a.speed, "speed fell while accelerating: {:?} -> {:?}", a, b);
        }
    }
}
