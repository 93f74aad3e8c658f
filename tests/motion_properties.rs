//! Property tests for the trapezoidal profile.

mod common;

use common::{assert_monotonic_profile, run_to_idle, sim_engine};
use proptest::prelude::*;
use slider_motion::config::units::{StepsPerSec, StepsPerSecSquared};
use slider_motion::config::MotionConfig;
use slider_motion::motion::profile::is_triangle;

fn nonzero_steps() -> impl Strategy<Value = i32> {
    prop_oneof![-3000i32..=-1, 1i32..=3000]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn completed_move_lands_on_target(
        start in -10_000i32..10_000,
        steps in nonzero_steps(),
        speed in 1u32..8000,
        accel in 0u32..5000,
    ) {
        let (mut engine, probe) = sim_engine(MotionConfig::default());
        engine.set_position(start);
        engine.start(steps, StepsPerSec(speed), StepsPerSecSquared(accel)).unwrap();

        run_to_idle(&mut engine, steps.unsigned_abs() + 1);

        prop_assert_eq!(engine.position(), start + steps);
        prop_assert_eq!(probe.pulses(), steps.unsigned_abs());
    }

    #[test]
    fn speed_stays_in_range_and_monotonic(
        steps in nonzero_steps(),
        speed in 1u32..8000,
        accel in 1u32..5000,
    ) {
        let config = MotionConfig::default();
        let (mut engine, _probe) = sim_engine(config);
        engine.start(steps, StepsPerSec(speed), StepsPerSecSquared(accel)).unwrap();

        let samples = run_to_idle(&mut engine, steps.unsigned_abs() + 1);

        let min = config.min_speed.value();
        let max = config.max_speed.value();
        prop_assert!(samples.iter().all(|s| s.speed >= min && s.speed <= max));
        assert_monotonic_profile(&samples);
    }

    #[test]
    fn triangle_profile_peak_is_bounded(
        steps in 2u32..3000,
        speed in 50u32..5000,
        accel in 1u32..5000,
    ) {
        // Only the peak bound holds: at the ramp boundary a triangle can
        // still touch max speed for one step.
        prop_assume!(is_triangle(steps, speed, accel));

        let (mut engine, _probe) = sim_engine(MotionConfig::default());
        engine.start(steps as i32, StepsPerSec(speed), StepsPerSecSquared(accel)).unwrap();

        let samples = run_to_idle(&mut engine, steps + 1);

        let peak = samples.iter().map(|s| s.speed).max().unwrap_or(50) as u64;
        prop_assert!(peak * peak <= 2500 + 2 * accel as u64 * (steps / 2) as u64);
    }
}
