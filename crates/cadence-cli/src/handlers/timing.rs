//! `cadence timing`: timing results at chosen local times.

use super::{describe_timing, load_document};
use crate::commands::{OutputFormat, TimingArgs};
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{number, optional, to_json, Painter};
use cadence::{calculate, Timing, TimingResult, TimingUpdateReason};
use serde::Serialize;
use std::fmt::Write as _;

#[derive(Debug, Serialize)]
struct TimingReport<'a> {
    timing: &'a Timing,
    results: &'a [TimingResult],
}

/// Execute the timing command
pub fn execute_timing(config: &CliConfig, args: &TimingArgs) -> CliResult<()> {
    let document = load_document(&args.file)?;
    let timing = document.timing()?;
    let results = evaluate(&timing, &args.at);
    let output = match args.format {
        OutputFormat::Text => render_text(&timing, &results, Painter::new(config.color.should_color())),
        OutputFormat::Json => render_json(&timing, &results)?,
    };
    print!("{output}");
    Ok(())
}

/// Calculate on demand at every time in `times`, in order.
#[must_use]
pub fn evaluate(timing: &Timing, times: &[f64]) -> Vec<TimingResult> {
    times
        .iter()
        .map(|&local_time| calculate(timing, local_time, TimingUpdateReason::OnDemand))
        .collect()
}

/// Text table of results
#[must_use]
pub fn render_text(timing: &Timing, results: &[TimingResult], painter: Painter) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", painter.heading("Timing"));
    let _ = writeln!(out, "  {}", describe_timing(timing));
    let _ = writeln!(
        out,
        "  active duration {}, end time {}",
        number(timing.active_duration()),
        number(timing.end_time())
    );
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{}",
        painter.dim(&format!(
            "{:>10}  {:<6}  {:>9}  {:>9}  {:>7}  {:>7}  {:>9}",
            "time", "phase", "iteration", "fraction", "in play", "current", "in effect"
        ))
    );
    for result in results {
        let _ = writeln!(
            out,
            "{:>10}  {}  {:>9}  {:>9}  {:>7}  {:>7}  {:>9}",
            number(result.local_time),
            painter.phase(result.phase),
            optional(result.current_iteration),
            optional(result.time_fraction),
            yes_no(result.is_in_play),
            yes_no(result.is_current),
            yes_no(result.is_in_effect),
        );
    }
    out
}

/// JSON report of the timing and every result
pub fn render_json(timing: &Timing, results: &[TimingResult]) -> CliResult<String> {
    to_json(&TimingReport { timing, results })
}

const fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
