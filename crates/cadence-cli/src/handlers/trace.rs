//! `cadence trace`: drive an effect frame by frame.

use super::{describe_timing, load_document};
use crate::commands::{OutputFormat, TraceArgs};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{number, optional, to_json, Painter};
use cadence::timing::{serialize_optional_time, serialize_time};
use cadence::{AnimationNode, EventDelegate, Phase, Timing, TimingResult, TimingUpdateReason};
use serde::Serialize;
use std::fmt::Write as _;
use tracing::{debug, info};

/// Upper bound on frames per trace
pub const MAX_FRAMES: usize = 100_000;

/// One frame update and what it raised
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TraceFrame {
    /// Local time of the frame
    #[serde(serialize_with = "serialize_time")]
    pub local_time: f64,
    /// Phase at the frame
    pub phase: Phase,
    /// Current iteration, if in effect
    #[serde(serialize_with = "serialize_optional_time")]
    pub current_iteration: Option<f64>,
    /// Time fraction, if in effect
    #[serde(serialize_with = "serialize_optional_time")]
    pub time_fraction: Option<f64>,
    /// Whether the frame raised an event condition
    pub event: bool,
    /// Local time until the output next changes going forwards
    #[serde(serialize_with = "serialize_time")]
    pub time_to_forwards_effect_change: f64,
    /// Local time until the output next changes going backwards
    #[serde(serialize_with = "serialize_time")]
    pub time_to_reverse_effect_change: f64,
}

#[derive(Debug, Default)]
struct FrameRecorder {
    iteration_events: bool,
    fired: bool,
}

impl EventDelegate for FrameRecorder {
    fn on_event_condition(&mut self, _result: &TimingResult) {
        self.fired = true;
    }

    fn requires_iteration_events(&self) -> bool {
        self.iteration_events
    }
}

/// Execute the trace command
pub fn execute_trace(config: &CliConfig, args: &TraceArgs) -> CliResult<()> {
    let document = load_document(&args.file)?;
    let timing = document.timing()?;
    let times = frame_times(args.from, args.to, args.step)?;
    let frames = trace(&timing, &times, args.iteration_events);
    let output = match args.format {
        OutputFormat::Text => render_text(
            &timing,
            &frames,
            config.verbosity.is_quiet(),
            Painter::new(config.color.should_color()),
        ),
        OutputFormat::Json => to_json(&frames)?,
    };
    print!("{output}");
    Ok(())
}

/// Evenly spaced local times from `from` through `to`.
///
/// `to` is included when it lies on the grid.
pub fn frame_times(from: f64, to: f64, step: f64) -> CliResult<Vec<f64>> {
    if !(step.is_finite() && step > 0.0) {
        return Err(CliError::invalid_argument(format!(
            "--step must be positive and finite, got {step}"
        )));
    }
    if !from.is_finite() || !to.is_finite() {
        return Err(CliError::invalid_argument("--from and --to must be finite"));
    }
    if to < from {
        return Err(CliError::invalid_argument(format!(
            "--to ({to}) is before --from ({from})"
        )));
    }
    let spans = ((to - from) / step + 1e-9).floor();
    if spans >= MAX_FRAMES as f64 {
        return Err(CliError::invalid_argument(format!(
            "trace would produce more than {MAX_FRAMES} frames"
        )));
    }
    let count = spans as usize + 1;
    Ok((0..count).map(|i| from + i as f64 * step).collect())
}

/// Update a fresh node once per time, as animation frames.
#[must_use]
pub fn trace(timing: &Timing, times: &[f64], iteration_events: bool) -> Vec<TraceFrame> {
    let mut node = AnimationNode::new(*timing);
    let mut recorder = FrameRecorder {
        iteration_events,
        fired: false,
    };
    let frames: Vec<_> = times
        .iter()
        .map(|&local_time| {
            recorder.fired = false;
            let result = *node.update_inherited_time(
                local_time,
                TimingUpdateReason::ForAnimationFrame,
                Some(&mut recorder),
            );
            TraceFrame {
                local_time,
                phase: result.phase,
                current_iteration: result.current_iteration,
                time_fraction: result.time_fraction,
                event: recorder.fired,
                time_to_forwards_effect_change: node.time_to_forwards_effect_change(),
                time_to_reverse_effect_change: node.time_to_reverse_effect_change(),
            }
        })
        .collect();
    let events = frames.iter().filter(|f| f.event).count();
    info!(frames = frames.len(), events, "trace complete");
    frames
}

/// Text table of frames; `events_only` keeps frames that raised an event.
#[must_use]
pub fn render_text(
    timing: &Timing,
    frames: &[TraceFrame],
    events_only: bool,
    painter: Painter,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", painter.heading("Trace"));
    let _ = writeln!(out, "  {}", describe_timing(timing));
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{}",
        painter.dim(&format!(
            "{:>10}  {:<6}  {:>9}  {:>9}  {:>9}  {:>9}",
            "time", "phase", "iteration", "fraction", "forwards", "reverse"
        ))
    );
    let shown = frames.iter().filter(|frame| frame.event || !events_only);
    for frame in shown {
        let _ = writeln!(
            out,
            "{:>10}  {}  {:>9}  {:>9}  {:>9}  {:>9}  {}",
            number(frame.local_time),
            painter.phase(frame.phase),
            optional(frame.current_iteration),
            optional(frame.time_fraction),
            number(frame.time_to_forwards_effect_change),
            number(frame.time_to_reverse_effect_change),
            painter.event(frame.event),
        );
    }
    if events_only {
        debug!(hidden = frames.iter().filter(|f| !f.event).count(), "frames without events hidden");
    }
    out
}
