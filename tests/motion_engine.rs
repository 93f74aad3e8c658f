//! Motion engine behaviour on simulated hardware.

mod common;

use common::{assert_monotonic_profile, run_to_idle, sim_engine, CountingPin, FailingPin, SimTimer, StuckPin, TickSample};
use embedded_hal_mock::eh1::delay::NoopDelay;
use slider_motion::config::units::{StepsPerSec, StepsPerSecSquared};
use slider_motion::config::MotionConfig;
use slider_motion::motion::profile::is_triangle;
use slider_motion::motion::{MotionEngine, MotionOutcome, MotionPhase};

const ACCEL: StepsPerSecSquared = StepsPerSecSquared(600);

fn tick_n(engine: &mut common::SimEngine, n: u32) {
    for _ in 0..n {
        assert_eq!(engine.on_tick(), None);
    }
}

#[test]
fn trapezoid_move_reaches_cruise_and_lands_exactly() {
    let (mut engine, probe) = sim_engine(MotionConfig::default());

    engine.start(1000, StepsPerSec(500), ACCEL).unwrap();
    let snap = engine.snapshot();
    assert_eq!(snap.decel_start, 792);
    assert_eq!(snap.target_steps, 1000);
    assert_eq!(probe.timer.interval(), 32_000_000 / 50);
    assert!(probe.dir_high());

    let samples = run_to_idle(&mut engine, 2000);

    assert_eq!(engine.position(), 1000);
    assert_eq!(probe.pulses(), 1000);
    assert_eq!(samples.len(), 1000);
    assert!(!probe.timer.is_armed());
    assert!(samples.iter().any(|s| s.phase == MotionPhase::Cruise));
    assert_eq!(samples.iter().map(|s| s.speed).max(), Some(500));
    assert!(samples.iter().all(|s| (50..=5000).contains(&s.speed)));
    assert_monotonic_profile(&samples);
}

#[test]
fn triangle_move_never_reaches_max_speed() {
    let (mut engine, _probe) = sim_engine(MotionConfig::default());

    engine.start(100, StepsPerSec(500), ACCEL).unwrap();
    assert_eq!(engine.snapshot().decel_start, 50);

    let samples = run_to_idle(&mut engine, 200);

    assert_eq!(engine.position(), 100);
    assert!(samples.iter().all(|s| s.phase != MotionPhase::Cruise));
    let peak = samples.iter().map(|s| s.speed).max().unwrap();
    assert!(peak <= 250, "peak {} above triangle bound", peak);
    assert!((peak as u64).pow(2) <= 2500 + 2 * 600 * 50);
    assert_monotonic_profile(&samples);
}

#[test]
fn triangle_at_ramp_boundary_touches_max_speed() {
    // Classified as a triangle because the full ramp is measured from rest,
    // but the real ramp starts at min speed and tops out one step early.
    assert!(is_triangle(416, 500, 600));
    let (mut engine, _probe) = sim_engine(MotionConfig::default());

    engine.start(416, StepsPerSec(500), ACCEL).unwrap();
    assert_eq!(engine.snapshot().decel_start, 208);

    let samples = run_to_idle(&mut engine, 500);

    assert_eq!(engine.position(), 416);
    assert_eq!(samples[205], TickSample { phase: MotionPhase::Accel, speed: 499 });
    assert_eq!(samples[206], TickSample { phase: MotionPhase::Cruise, speed: 500 });
    assert_eq!(samples[207], TickSample { phase: MotionPhase::Decel, speed: 500 });
    assert_eq!(samples.iter().filter(|s| s.phase == MotionPhase::Cruise).count(), 1);
    assert_eq!(samples.iter().map(|s| s.speed).max(), Some(500));
    assert_monotonic_profile(&samples);
}

#[test]
fn timer_interval_follows_speed() {
    let (mut engine, probe) = sim_engine(MotionConfig::default());

    engine.start(300, StepsPerSec(400), ACCEL).unwrap();
    for _ in 0..299 {
        engine.on_tick();
        assert_eq!(probe.timer.interval(), 32_000_000 / engine.current_speed());
    }
    assert!(engine.on_tick().is_some());
}

#[test]
fn reverse_move_counts_down_from_current_position() {
    let (mut engine, probe) = sim_engine(MotionConfig::default());

    assert!(engine.set_position(500));
    engine.start(-200, StepsPerSec(800), ACCEL).unwrap();
    assert!(!probe.dir_high());

    run_to_idle(&mut engine, 400);
    assert_eq!(engine.position(), 300);
    assert_eq!(probe.pulses(), 200);
}

#[test]
fn completion_reports_success_and_position() {
    let (mut engine, _probe) = sim_engine(MotionConfig::default());

    engine.start(3, StepsPerSec(500), ACCEL).unwrap();
    tick_n(&mut engine, 2);
    assert_eq!(
        engine.on_tick(),
        Some(MotionOutcome { success: true, position: 3 })
    );
    // A further interrupt after completion does nothing.
    assert_eq!(engine.on_tick(), None);
    assert_eq!(engine.position(), 3);
}

#[test]
fn graceful_stop_in_cruise_ramps_down_monotonically() {
    let (mut engine, _probe) = sim_engine(MotionConfig::default());

    engine.start(1000, StepsPerSec(500), ACCEL).unwrap();
    tick_n(&mut engine, 400);
    assert_eq!(engine.phase(), MotionPhase::Cruise);
    assert_eq!(engine.current_speed(), 500);

    assert_eq!(engine.stop(false), None);
    let snap = engine.snapshot();
    assert_eq!(snap.phase, MotionPhase::Decel);
    assert_eq!(snap.decel_start, 400);
    assert_eq!(snap.steps_to_go, 208);

    let mut last_speed = engine.current_speed();
    let outcome = loop {
        if let Some(outcome) = engine.on_tick() {
            break outcome;
        }
        assert!(engine.current_speed() <= last_speed);
        last_speed = engine.current_speed();
    };

    assert_eq!(outcome, MotionOutcome { success: true, position: 608 });
    assert!(last_speed < 500);
}

#[test]
fn graceful_stop_while_accelerating_is_rooted_at_current_speed() {
    let (mut engine, _probe) = sim_engine(MotionConfig::default());

    engine.start(5000, StepsPerSec(2000), ACCEL).unwrap();
    tick_n(&mut engine, 20);
    assert_eq!(engine.phase(), MotionPhase::Accel);
    let speed = engine.current_speed();

    engine.stop(false);
    let snap = engine.snapshot();
    assert_eq!(snap.max_speed, speed);
    assert_eq!(snap.steps_to_go, (speed * speed) / 1200);

    let samples = run_to_idle(&mut engine, 1000);
    assert!(samples.iter().all(|s| s.speed <= speed));
    assert_eq!(engine.position(), 20 + (speed * speed / 1200) as i32);
}

#[test]
fn hard_stop_halts_immediately() {
    let (mut engine, probe) = sim_engine(MotionConfig::default());

    engine.start(1000, StepsPerSec(500), ACCEL).unwrap();
    tick_n(&mut engine, 100);

    assert_eq!(
        engine.stop(true),
        Some(MotionOutcome { success: false, position: 100 })
    );
    assert!(!engine.is_running());
    assert!(!probe.timer.is_armed());
    assert_eq!(engine.on_tick(), None);
    assert_eq!(probe.pulses(), 100);
}

#[test]
fn stop_while_decelerating_is_hard() {
    let (mut engine, _probe) = sim_engine(MotionConfig::default());

    engine.start(1000, StepsPerSec(500), ACCEL).unwrap();
    tick_n(&mut engine, 800);
    assert_eq!(engine.phase(), MotionPhase::Decel);

    let outcome = engine.stop(false).expect("decel stop is immediate");
    assert!(!outcome.success);
    assert_eq!(outcome.position, 800);
}

#[test]
fn step_pin_failure_aborts_the_move() {
    let timer = SimTimer::default();
    let mut engine = MotionEngine::new(
        FailingPin::after(5),
        CountingPin::default(),
        NoopDelay::new(),
        timer.clone(),
        MotionConfig::default(),
    );

    engine.start(100, StepsPerSec(500), ACCEL).unwrap();
    for _ in 0..5 {
        assert_eq!(engine.on_tick(), None);
    }
    assert_eq!(
        engine.on_tick(),
        Some(MotionOutcome { success: false, position: 5 })
    );
    assert!(!timer.is_armed());
}

#[test]
fn stuck_step_pin_counts_the_emitted_edge() {
    let timer = SimTimer::default();
    let mut engine = MotionEngine::new(
        StuckPin::after(3),
        CountingPin::default(),
        NoopDelay::new(),
        timer.clone(),
        MotionConfig::default(),
    );

    engine.start(100, StepsPerSec(500), ACCEL).unwrap();
    for _ in 0..3 {
        assert_eq!(engine.on_tick(), None);
    }
    assert_eq!(
        engine.on_tick(),
        Some(MotionOutcome { success: false, position: 4 })
    );
    assert!(!engine.is_running());
    assert!(!timer.is_armed());
}

#[test]
fn custom_speed_envelope_is_honoured() {
    let config = MotionConfig {
        min_speed: StepsPerSec(100),
        max_speed: StepsPerSec(300),
        ..MotionConfig::default()
    };
    let (mut engine, _probe) = sim_engine(config);

    engine.start(2000, StepsPerSec(10_000), StepsPerSecSquared(0)).unwrap();
    assert_eq!(engine.snapshot().max_speed, 300);

    let samples = run_to_idle(&mut engine, 3000);
    assert!(samples.iter().all(|s| (100..=300).contains(&s.speed)));
    assert_eq!(engine.position(), 2000);
}
