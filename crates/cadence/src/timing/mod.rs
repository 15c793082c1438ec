//! Timing model: configuration, calculations, and the per-frame driver.
//!
//! # Architecture
//!
//! ```text
//! TimingInput (JSON/YAML) ──→ input::TimingInput::into_timing ──→ Timing
//!                                                                   │
//! local time ──────────────────────────────────────────────────────►│
//!                                                                   │
//!                                           calculations::calculate │
//!                                                                   ▼
//!                                                             TimingResult
//!
//! AnimationNode = Timing + cached TimingResult + EventDelegate hook
//! ```
//!
//! `Timing` is an immutable value once validated. Everything derived from it
//! (`active_duration`, `end_time`) is recomputed on demand.

pub mod calculations;
pub mod input;
pub mod node;

use crate::result::{CadenceError, CadenceResult};
use serde::{Deserialize, Serialize, Serializer};

pub use calculations::{calculate, time_to_effect_change, Phase, TimingResult, TimingUpdateReason};
pub use input::{DurationInput, IterationsInput, TimingInput};
pub use node::{AnimationNode, EffectChange, EventDelegate};

/// Direction in which successive iterations are played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlaybackDirection {
    /// Every iteration runs forwards
    #[default]
    Normal,
    /// Every iteration runs backwards
    Reverse,
    /// Even iterations forwards, odd iterations backwards
    Alternate,
    /// Even iterations backwards, odd iterations forwards
    AlternateReverse,
}

impl PlaybackDirection {
    /// Whether the iteration with the given index plays forwards.
    #[must_use]
    pub fn is_forwards(self, current_iteration: f64) -> bool {
        let odd = current_iteration % 2.0 >= 1.0;
        match self {
            Self::Normal => true,
            Self::Reverse => false,
            Self::Alternate => !odd,
            Self::AlternateReverse => odd,
        }
    }
}

impl std::fmt::Display for PlaybackDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Reverse => write!(f, "reverse"),
            Self::Alternate => write!(f, "alternate"),
            Self::AlternateReverse => write!(f, "alternate-reverse"),
        }
    }
}

/// Whether an effect produces output outside its active interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FillMode {
    /// No output before or after the active interval
    None,
    /// Hold the final value after the active interval
    Forwards,
    /// Hold the initial value before the active interval
    Backwards,
    /// Hold in both directions
    Both,
    /// Resolves to `Both` for standalone effects
    #[default]
    Auto,
}

impl FillMode {
    /// Resolve `Auto` to the concrete mode used by the calculations.
    #[must_use]
    pub const fn resolve(self) -> Self {
        match self {
            Self::Auto => Self::Both,
            other => other,
        }
    }

    /// Whether the (resolved) mode fills before the active interval.
    #[must_use]
    pub const fn fills_backwards(self) -> bool {
        matches!(self.resolve(), Self::Backwards | Self::Both)
    }

    /// Whether the (resolved) mode fills after the active interval.
    #[must_use]
    pub const fn fills_forwards(self) -> bool {
        matches!(self.resolve(), Self::Forwards | Self::Both)
    }
}

impl std::fmt::Display for FillMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Forwards => write!(f, "forwards"),
            Self::Backwards => write!(f, "backwards"),
            Self::Both => write!(f, "both"),
            Self::Auto => write!(f, "auto"),
        }
    }
}

/// Timing configuration of a single animation effect.
///
/// Durations are in seconds of local time. `iteration_duration` and
/// `iteration_count` may be `f64::INFINITY`. An `"auto"` duration must be
/// normalised by the caller (see [`TimingInput`]) before it reaches here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Timing {
    /// Local time before the active interval begins
    pub start_delay: f64,
    /// Local time after the active interval ends
    pub end_delay: f64,
    /// Length of one iteration
    #[serde(serialize_with = "serialize_time")]
    pub iteration_duration: f64,
    /// Number of iterations, possibly fractional or infinite
    #[serde(serialize_with = "serialize_time")]
    pub iteration_count: f64,
    /// Iteration index at which playback begins
    pub iteration_start: f64,
    /// Signed rate at which local time flows
    pub playback_rate: f64,
    /// Per-iteration direction
    pub direction: PlaybackDirection,
    /// Fill behaviour outside the active interval
    pub fill_mode: FillMode,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            start_delay: 0.0,
            end_delay: 0.0,
            iteration_duration: 0.0,
            iteration_count: 1.0,
            iteration_start: 0.0,
            playback_rate: 1.0,
            direction: PlaybackDirection::Normal,
            fill_mode: FillMode::Auto,
        }
    }
}

impl Timing {
    /// Create a timing with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the iteration duration
    #[must_use]
    pub const fn with_duration(mut self, duration: f64) -> Self {
        self.iteration_duration = duration;
        self
    }

    /// Set the iteration count
    #[must_use]
    pub const fn with_iterations(mut self, count: f64) -> Self {
        self.iteration_count = count;
        self
    }

    /// Set the iteration start
    #[must_use]
    pub const fn with_iteration_start(mut self, start: f64) -> Self {
        self.iteration_start = start;
        self
    }

    /// Set the start delay
    #[must_use]
    pub const fn with_start_delay(mut self, delay: f64) -> Self {
        self.start_delay = delay;
        self
    }

    /// Set the end delay
    #[must_use]
    pub const fn with_end_delay(mut self, delay: f64) -> Self {
        self.end_delay = delay;
        self
    }

    /// Set the playback rate
    #[must_use]
    pub const fn with_playback_rate(mut self, rate: f64) -> Self {
        self.playback_rate = rate;
        self
    }

    /// Set the playback direction
    #[must_use]
    pub const fn with_direction(mut self, direction: PlaybackDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Set the fill mode
    #[must_use]
    pub const fn with_fill(mut self, fill_mode: FillMode) -> Self {
        self.fill_mode = fill_mode;
        self
    }

    /// Duration of all iterations back to back. Zero times anything is zero,
    /// so a zero duration with infinite iterations (or the reverse) is `0`.
    #[must_use]
    pub fn repeated_duration(&self) -> f64 {
        multiply_zero_always_gives_zero(self.iteration_duration, self.iteration_count)
    }

    /// Total span of the active interval, excluding delays.
    #[must_use]
    pub fn active_duration(&self) -> f64 {
        self.repeated_duration()
    }

    /// `max(0, start_delay + active_duration + end_delay)`
    #[must_use]
    pub fn end_time(&self) -> f64 {
        (self.start_delay + self.active_duration() + self.end_delay).max(0.0)
    }

    /// Check the preconditions the calculations rely on.
    ///
    /// # Errors
    ///
    /// Returns [`CadenceError::InvalidTiming`] naming the first offending field.
    pub fn validate(&self) -> CadenceResult<()> {
        check_non_negative("iteration_duration", self.iteration_duration)?;
        check_non_negative("iteration_count", self.iteration_count)?;
        check_non_negative("iteration_start", self.iteration_start)?;
        if !self.iteration_start.is_finite() {
            return Err(CadenceError::invalid_timing(
                "iteration_start",
                "must be finite",
            ));
        }
        check_non_negative("start_delay", self.start_delay)?;
        check_finite("start_delay", self.start_delay)?;
        check_finite("end_delay", self.end_delay)?;
        check_finite("playback_rate", self.playback_rate)?;
        Ok(())
    }

    /// Debug-build assertion of the engine preconditions.
    pub(crate) fn debug_assert_valid(&self) {
        debug_assert!(
            self.iteration_duration >= 0.0,
            "iteration_duration must be >= 0, got {}",
            self.iteration_duration
        );
        debug_assert!(
            self.iteration_count >= 0.0,
            "iteration_count must be >= 0, got {}",
            self.iteration_count
        );
        debug_assert!(
            self.iteration_start >= 0.0,
            "iteration_start must be >= 0, got {}",
            self.iteration_start
        );
    }
}

fn check_non_negative(field: &'static str, value: f64) -> CadenceResult<()> {
    if value.is_nan() {
        return Err(CadenceError::invalid_timing(field, "must not be NaN"));
    }
    if value < 0.0 {
        return Err(CadenceError::invalid_timing(
            field,
            format!("must not be negative, got {value}"),
        ));
    }
    Ok(())
}

fn check_finite(field: &'static str, value: f64) -> CadenceResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CadenceError::invalid_timing(
            field,
            format!("must be finite, got {value}"),
        ))
    }
}

/// `x * y`, except that a zero operand always yields zero (even against infinity).
#[must_use]
pub fn multiply_zero_always_gives_zero(x: f64, y: f64) -> f64 {
    debug_assert!(!x.is_nan() && !y.is_nan());
    if x == 0.0 || y == 0.0 {
        0.0
    } else {
        x * y
    }
}

/// Serialize a time, writing non-finite values as `"Infinity"`,
/// `"-Infinity"` or `"NaN"` since JSON has no such numbers.
///
/// For use with `#[serde(serialize_with = "...")]`.
pub fn serialize_time<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else if value.is_nan() {
        serializer.serialize_str("NaN")
    } else if *value > 0.0 {
        serializer.serialize_str("Infinity")
    } else {
        serializer.serialize_str("-Infinity")
    }
}

/// [`serialize_time`] for optional values; `None` is written as null.
pub fn serialize_optional_time<S: Serializer>(
    value: &Option<f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serialize_time(v, serializer),
        None => serializer.serialize_none(),
    }
}
