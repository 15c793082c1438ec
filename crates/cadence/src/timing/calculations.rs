//! Closed-form timing calculations.
//!
//! `calculate` maps a [`Timing`] and a local time to a [`TimingResult`]. It is
//! a pure function: the same inputs always give a bit-identical result.

use super::{multiply_zero_always_gives_zero, serialize_optional_time, serialize_time, FillMode, Timing};
use serde::Serialize;
use tracing::trace;

/// Position of local time relative to the active interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Earlier than the start delay
    Before,
    /// Inside `[start_delay, start_delay + active_duration)`
    Active,
    /// At or past the end of the active interval
    After,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Before => write!(f, "before"),
            Self::Active => write!(f, "active"),
            Self::After => write!(f, "after"),
        }
    }
}

/// Why a timing calculation is being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TimingUpdateReason {
    /// Pure query, never notifies
    OnDemand,
    /// Once-per-frame update, may notify the event delegate
    ForAnimationFrame,
}

/// Outcome of a single timing calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimingResult {
    /// Local time the result was computed for
    #[serde(serialize_with = "serialize_time")]
    pub local_time: f64,
    /// Phase classification
    pub phase: Phase,
    /// Active phase with a non-zero playback rate
    pub is_in_play: bool,
    /// In play, or about to be given the sign of the playback rate
    pub is_current: bool,
    /// A time fraction is defined
    pub is_in_effect: bool,
    /// Index of the current iteration (may be fractional start or infinite)
    #[serde(serialize_with = "serialize_optional_time")]
    pub current_iteration: Option<f64>,
    /// Direction-adjusted progress within the current iteration
    #[serde(serialize_with = "serialize_optional_time")]
    pub time_fraction: Option<f64>,
    /// Span of the active interval
    #[serde(serialize_with = "serialize_time")]
    pub active_duration: f64,
    /// End of the effect including delays
    #[serde(serialize_with = "serialize_time")]
    pub end_time: f64,
    /// Local time until the next iteration boundary, infinite if none
    #[serde(serialize_with = "serialize_time")]
    pub time_to_next_iteration: f64,
}

impl TimingResult {
    /// The current iteration as an integer index, saturating.
    #[must_use]
    pub fn iteration_index(&self) -> Option<i32> {
        self.current_iteration.map(|i| i.max(0.0) as i32)
    }
}

fn calculate_phase(active_duration: f64, local_time: f64, timing: &Timing) -> Phase {
    if local_time < timing.start_delay {
        Phase::Before
    } else if local_time >= timing.start_delay + active_duration {
        Phase::After
    } else {
        Phase::Active
    }
}

fn calculate_active_time(
    active_duration: f64,
    fill_mode: FillMode,
    local_time: f64,
    phase: Phase,
    timing: &Timing,
) -> Option<f64> {
    match phase {
        Phase::Before => fill_mode.fills_backwards().then_some(0.0),
        Phase::Active => Some(local_time - timing.start_delay),
        Phase::After => fill_mode.fills_forwards().then_some(active_duration),
    }
}

fn ends_on_iteration_boundary(iteration_count: f64, iteration_start: f64) -> bool {
    iteration_count.is_finite() && (iteration_count + iteration_start) % 1.0 == 0.0
}

fn calculate_iteration_time(
    iteration_duration: f64,
    repeated_duration: f64,
    scaled_active_time: f64,
    start_offset: f64,
    timing: &Timing,
) -> f64 {
    if !scaled_active_time.is_finite()
        || (scaled_active_time - start_offset == repeated_duration
            && timing.iteration_count != 0.0
            && ends_on_iteration_boundary(timing.iteration_count, timing.iteration_start))
    {
        return iteration_duration;
    }
    scaled_active_time % iteration_duration
}

fn calculate_current_iteration(
    iteration_duration: f64,
    iteration_time: f64,
    scaled_active_time: f64,
    timing: &Timing,
) -> f64 {
    if scaled_active_time == 0.0 {
        return 0.0;
    }
    // The final boundary belongs to the last iteration, not a fresh one.
    if iteration_time == iteration_duration {
        return timing.iteration_start + timing.iteration_count - 1.0;
    }
    (scaled_active_time / iteration_duration).floor()
}

fn calculate_directed_time(
    current_iteration: f64,
    iteration_duration: f64,
    iteration_time: f64,
    timing: &Timing,
) -> f64 {
    if timing.direction.is_forwards(current_iteration) {
        iteration_time
    } else {
        iteration_duration - iteration_time
    }
}

struct IterationState {
    current_iteration: f64,
    directed_time: f64,
    iteration_time: f64,
}

fn iteration_state(
    iteration_duration: f64,
    repeated_duration: f64,
    active_time: f64,
    start_offset: f64,
    timing: &Timing,
) -> IterationState {
    let scaled_active_time = active_time + start_offset;
    let iteration_time = calculate_iteration_time(
        iteration_duration,
        repeated_duration,
        scaled_active_time,
        start_offset,
        timing,
    );
    let current_iteration =
        calculate_current_iteration(iteration_duration, iteration_time, scaled_active_time, timing);
    let directed_time =
        calculate_directed_time(current_iteration, iteration_duration, iteration_time, timing);
    IterationState {
        current_iteration,
        directed_time,
        iteration_time,
    }
}

/// Compute the timing state of an effect at `local_time`.
///
/// # Preconditions
///
/// `timing` has non-negative duration, count and start, and no field is NaN.
/// These are asserted in debug builds only; use [`Timing::validate`] at the
/// boundary where configuration enters.
#[must_use]
pub fn calculate(timing: &Timing, local_time: f64, reason: TimingUpdateReason) -> TimingResult {
    timing.debug_assert_valid();
    debug_assert!(!local_time.is_nan(), "local time must not be NaN");

    let fill_mode = timing.fill_mode.resolve();
    let active_duration = timing.active_duration();
    let end_time = timing.end_time();
    let phase = calculate_phase(active_duration, local_time, timing);
    let active_time = calculate_active_time(active_duration, fill_mode, local_time, phase, timing);

    let mut time_to_next_iteration = f64::INFINITY;
    let mut current_iteration = None;
    let mut time_fraction = None;

    let iteration_duration = timing.iteration_duration;
    if iteration_duration != 0.0 {
        if let Some(active_time) = active_time {
            if iteration_duration.is_finite() {
                let start_offset =
                    multiply_zero_always_gives_zero(timing.iteration_start, iteration_duration);
                let state = iteration_state(
                    iteration_duration,
                    timing.repeated_duration(),
                    active_time,
                    start_offset,
                    timing,
                );
                current_iteration = Some(state.current_iteration);
                time_fraction = Some(state.directed_time / iteration_duration);
                time_to_next_iteration = iteration_duration - state.iteration_time;
                if active_duration - active_time < time_to_next_iteration {
                    time_to_next_iteration = f64::INFINITY;
                }
            } else {
                // An infinite iteration never advances past its start.
                current_iteration = Some(timing.iteration_start.floor());
                time_fraction = Some(timing.iteration_start % 1.0);
            }
        }
    } else {
        // Zero-length iterations are evaluated on a unit timeline where every
        // iteration takes one unit, so fill values still reflect the count.
        let local_iteration_duration = 1.0;
        let local_repeated_duration = local_iteration_duration * timing.iteration_count;
        let local_active_duration = local_repeated_duration;
        let local_local_time = if local_time < timing.start_delay {
            local_time
        } else {
            local_active_duration + timing.start_delay
        };
        let local_phase = calculate_phase(local_active_duration, local_local_time, timing);
        let local_active_time = calculate_active_time(
            local_active_duration,
            fill_mode,
            local_local_time,
            local_phase,
            timing,
        );
        if let Some(local_active_time) = local_active_time {
            let start_offset = timing.iteration_start * local_iteration_duration;
            let state = iteration_state(
                local_iteration_duration,
                local_repeated_duration,
                local_active_time,
                start_offset,
                timing,
            );
            current_iteration = Some(state.current_iteration);
            time_fraction = Some(state.directed_time);
        }
    }

    let is_in_play = phase == Phase::Active && timing.playback_rate != 0.0;
    let is_current = is_in_play
        || (phase == Phase::Before && timing.playback_rate > 0.0)
        || (phase == Phase::After && timing.playback_rate < 0.0);

    trace!(
        local_time,
        ?phase,
        ?reason,
        time_fraction = ?time_fraction,
        "timing calculated"
    );

    TimingResult {
        local_time,
        phase,
        is_in_play,
        is_current,
        is_in_effect: time_fraction.is_some(),
        current_iteration,
        time_fraction,
        active_duration,
        end_time,
        time_to_next_iteration,
    }
}

/// Local time until the effect's output next needs recomputing.
///
/// `forwards` asks about local time increasing. Callers pick the direction
/// from the sign of the playback rate; a zero rate never changes anything.
#[must_use]
pub fn time_to_effect_change(
    timing: &Timing,
    phase: Phase,
    forwards: bool,
    local_time: f64,
    time_to_next_iteration: f64,
    requires_iteration_events: bool,
) -> f64 {
    if timing.playback_rate == 0.0 {
        return f64::INFINITY;
    }
    let start = timing.start_delay;
    let end = start + timing.active_duration();
    match phase {
        Phase::Before => {
            if forwards {
                start - local_time
            } else {
                f64::INFINITY
            }
        }
        Phase::Active => {
            if !forwards {
                return 0.0;
            }
            let time_to_end = end - local_time;
            if requires_iteration_events {
                time_to_end.min(time_to_next_iteration)
            } else {
                time_to_end
            }
        }
        Phase::After => {
            if forwards {
                f64::INFINITY
            } else {
                local_time - end
            }
        }
    }
}
