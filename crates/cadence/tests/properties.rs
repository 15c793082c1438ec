//! Property tests for the timing model and interval sampling.
//!
//! Run with: `cargo test -p cadence --test properties`

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use cadence::{
    calculate, EasingTable, FillMode, IntervalSet, NumberInterpolation, PlaybackDirection, Timing,
    TimingUpdateReason,
};
use proptest::prelude::*;

fn direction() -> impl Strategy<Value = PlaybackDirection> {
    prop_oneof![
        Just(PlaybackDirection::Normal),
        Just(PlaybackDirection::Reverse),
        Just(PlaybackDirection::Alternate),
        Just(PlaybackDirection::AlternateReverse),
    ]
}

fn fill_mode() -> impl Strategy<Value = FillMode> {
    prop_oneof![
        Just(FillMode::None),
        Just(FillMode::Forwards),
        Just(FillMode::Backwards),
        Just(FillMode::Both),
        Just(FillMode::Auto),
    ]
}

fn duration() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.0), Just(f64::INFINITY), 0.01..100.0f64]
}

fn count() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.0), Just(f64::INFINITY), 0.0..10.0f64, (1u32..6).prop_map(f64::from)]
}

fn local_time() -> impl Strategy<Value = f64> {
    prop_oneof![
        8 => -50.0..150.0f64,
        1 => Just(f64::INFINITY),
        1 => Just(f64::NEG_INFINITY),
    ]
}

prop_compose! {
    fn timing()(
        iteration_duration in duration(),
        iteration_count in count(),
        iteration_start in prop_oneof![Just(0.0), 0.0..5.0f64],
        start_delay in 0.0..10.0f64,
        end_delay in -20.0..20.0f64,
        playback_rate in prop_oneof![Just(0.0), Just(1.0), -4.0..4.0f64],
        direction in direction(),
        fill_mode in fill_mode(),
    ) -> Timing {
        Timing::new()
            .with_duration(iteration_duration)
            .with_iterations(iteration_count)
            .with_iteration_start(iteration_start)
            .with_start_delay(start_delay)
            .with_end_delay(end_delay)
            .with_playback_rate(playback_rate)
            .with_direction(direction)
            .with_fill(fill_mode)
    }
}

proptest! {
    #[test]
    fn prop_end_time_formula(timing in timing()) {
        let expected = (timing.start_delay + timing.active_duration() + timing.end_delay).max(0.0);
        prop_assert_eq!(timing.end_time(), expected);
        prop_assert!(timing.end_time() >= 0.0);
    }

    #[test]
    fn prop_active_duration_zero_for_zero_duration(count in count().prop_filter("finite", |c| c.is_finite())) {
        let timing = Timing::new().with_iterations(count);
        prop_assert_eq!(timing.active_duration(), 0.0);
    }

    #[test]
    fn prop_calculate_idempotent(timing in timing(), local_time in local_time()) {
        let first = calculate(&timing, local_time, TimingUpdateReason::OnDemand);
        let second = calculate(&timing, local_time, TimingUpdateReason::OnDemand);
        prop_assert_eq!(first, second);
        prop_assert_eq!(first.is_in_effect, first.time_fraction.is_some());
        prop_assert!(!first.time_to_next_iteration.is_nan());
    }

    #[test]
    fn prop_fraction_within_unit_range(timing in timing(), local_time in local_time()) {
        let result = calculate(&timing, local_time, TimingUpdateReason::OnDemand);
        if let Some(fraction) = result.time_fraction {
            prop_assert!((0.0..=1.0).contains(&fraction), "fraction {}", fraction);
        }
    }

    #[test]
    fn prop_end_boundary_is_exclusive(
        iteration_duration in 0.5..10.0f64,
        iterations in 1u32..6,
        start_delay in 0.0..5.0f64,
    ) {
        let count = f64::from(iterations);
        let timing = Timing::new()
            .with_duration(iteration_duration)
            .with_iterations(count)
            .with_start_delay(start_delay)
            .with_fill(FillMode::Forwards);
        let end = start_delay + timing.active_duration();
        let result = calculate(&timing, end, TimingUpdateReason::OnDemand);
        prop_assert_eq!(result.time_fraction, Some(1.0));
        prop_assert_eq!(result.current_iteration, Some(count - 1.0));
    }

    #[test]
    fn prop_interval_sampling_pure(
        fraction in -2.0..3.0f64,
        iteration_duration in 0.1..10.0f64,
        split in 0.1..0.9f64,
    ) {
        let ease = EasingTable::global().get("ease-in-out");
        let mut set = IntervalSet::new();
        set.add_interval(NumberInterpolation::new(0.0, 5.0), ease.clone(), f64::NEG_INFINITY, split, 0.0, split);
        set.add_interval(NumberInterpolation::new(5.0, 10.0), ease, split, f64::INFINITY, split, 1.0);

        let first: Vec<_> = set.active_intervals_at(fraction, iteration_duration).collect();
        let second: Vec<_> = set.active_intervals_at(fraction, iteration_duration).collect();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.len(), 1);
    }
}
