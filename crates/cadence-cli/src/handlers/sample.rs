//! `cadence sample`: property values of a keyframe effect at one local time.

use super::{describe_timing, load_document};
use crate::commands::{OutputFormat, SampleArgs};
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{number, optional, to_json, Painter};
use cadence::{
    calculate, InertSampler, KeyframeEffectModel, PropertyValue, Timing, TimingResult,
    TimingUpdateReason,
};
use serde::Serialize;
use std::fmt::Write as _;
use tracing::debug;

/// Outcome of sampling an effect at a fixed time
#[derive(Debug, Clone, Serialize)]
pub struct SampleReport {
    /// Whether the sample was marked paused
    pub paused: bool,
    /// Timing state at the sample time
    pub result: TimingResult,
    /// Interpolated property values, empty when not in effect
    pub values: Vec<PropertyValue>,
}

/// Execute the sample command
pub fn execute_sample(config: &CliConfig, args: &SampleArgs) -> CliResult<()> {
    let document = load_document(&args.file)?;
    let timing = document.timing()?;
    let model = document.effect_model()?;
    let report = sample(&model, timing, args.at, args.paused);
    let output = match args.format {
        OutputFormat::Text => render_text(&timing, &report, Painter::new(config.color.should_color())),
        OutputFormat::Json => to_json(&report)?,
    };
    print!("{output}");
    Ok(())
}

/// Sample `model` at `local_time` through an [`InertSampler`].
#[must_use]
pub fn sample(
    model: &KeyframeEffectModel,
    timing: Timing,
    local_time: f64,
    paused: bool,
) -> SampleReport {
    let sampler = InertSampler::new(model, timing, local_time, paused);
    let values = sampler.sample();
    debug!(local_time, values = values.len(), "sampled effect");
    SampleReport {
        paused,
        result: calculate(&timing, local_time, TimingUpdateReason::OnDemand),
        values,
    }
}

/// Text listing of the sampled values
#[must_use]
pub fn render_text(timing: &Timing, report: &SampleReport, painter: Painter) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", painter.heading("Sample"));
    let _ = writeln!(out, "  {}", describe_timing(timing));
    let _ = writeln!(
        out,
        "  t={} {} iteration {} fraction {}{}",
        number(report.result.local_time),
        painter.phase(report.result.phase).trim_end(),
        optional(report.result.current_iteration),
        optional(report.result.time_fraction),
        if report.paused { " (paused)" } else { "" }
    );
    let _ = writeln!(out);
    if report.values.is_empty() {
        let _ = writeln!(out, "{}", painter.dim("not in effect"));
    }
    let width = report
        .values
        .iter()
        .map(|v| v.property.len())
        .max()
        .unwrap_or(0);
    for value in &report.values {
        let _ = writeln!(
            out,
            "  {:<width$}  {}",
            value.property,
            number(value.value),
            width = width
        );
    }
    out
}
