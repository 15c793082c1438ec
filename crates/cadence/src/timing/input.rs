//! Caller-facing timing configuration.
//!
//! [`TimingInput`] is what documents and command lines provide. It accepts
//! keywords (`"auto"`, `"infinite"`) and omitted fields, and normalises them
//! into a validated [`Timing`].

use super::{FillMode, PlaybackDirection, Timing};
use crate::result::{CadenceError, CadenceResult};
use serde::{Deserialize, Serialize};

/// Iteration duration: seconds or the `"auto"` keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DurationInput {
    /// Explicit duration in seconds
    Seconds(f64),
    /// Keyword form, only `"auto"` is accepted
    Keyword(String),
}

/// Iteration count: a number or the `"infinite"` keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IterationsInput {
    /// Explicit count
    Count(f64),
    /// Keyword form, only `"infinite"` is accepted
    Keyword(String),
}

/// Timing as written in a document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingInput {
    /// Iteration duration, `"auto"` when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<DurationInput>,
    /// Iteration count, `1` when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iterations: Option<IterationsInput>,
    /// Iteration index to start from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iteration_start: Option<f64>,
    /// Start delay
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<f64>,
    /// End delay
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_delay: Option<f64>,
    /// Playback rate, `1` when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playback_rate: Option<f64>,
    /// Playback direction
    pub direction: PlaybackDirection,
    /// Fill mode
    pub fill: FillMode,
}

impl TimingInput {
    /// Resolve keywords and defaults, then validate.
    ///
    /// An `"auto"`, omitted or negative duration becomes `0`.
    pub fn into_timing(&self) -> CadenceResult<Timing> {
        let defaults = Timing::default();

        let iteration_duration = match &self.duration {
            None => 0.0,
            Some(DurationInput::Seconds(seconds)) if *seconds < 0.0 => 0.0,
            Some(DurationInput::Seconds(seconds)) => *seconds,
            Some(DurationInput::Keyword(word)) if word == "auto" => 0.0,
            Some(DurationInput::Keyword(word)) => {
                return Err(CadenceError::invalid_timing(
                    "duration",
                    format!("expected a number or \"auto\", got {word:?}"),
                ))
            }
        };

        let iteration_count = match &self.iterations {
            None => defaults.iteration_count,
            Some(IterationsInput::Count(count)) => *count,
            Some(IterationsInput::Keyword(word)) if word == "infinite" => f64::INFINITY,
            Some(IterationsInput::Keyword(word)) => {
                return Err(CadenceError::invalid_timing(
                    "iterations",
                    format!("expected a number or \"infinite\", got {word:?}"),
                ))
            }
        };

        let timing = Timing {
            start_delay: self.delay.unwrap_or(defaults.start_delay),
            end_delay: self.end_delay.unwrap_or(defaults.end_delay),
            iteration_duration,
            iteration_count,
            iteration_start: self.iteration_start.unwrap_or(defaults.iteration_start),
            playback_rate: self.playback_rate.unwrap_or(defaults.playback_rate),
            direction: self.direction,
            fill_mode: self.fill,
        };
        timing.validate()?;
        Ok(timing)
    }
}

impl From<&Timing> for TimingInput {
    fn from(timing: &Timing) -> Self {
        let iterations = if timing.iteration_count.is_infinite() {
            IterationsInput::Keyword("infinite".to_string())
        } else {
            IterationsInput::Count(timing.iteration_count)
        };
        Self {
            duration: Some(DurationInput::Seconds(timing.iteration_duration)),
            iterations: Some(iterations),
            iteration_start: Some(timing.iteration_start),
            delay: Some(timing.start_delay),
            end_delay: Some(timing.end_delay),
            playback_rate: Some(timing.playback_rate),
            direction: timing.direction,
            fill: timing.fill_mode,
        }
    }
}
