//! `cadence easing`: tabulate an easing function.

use crate::commands::{EasingArgs, OutputFormat};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{number, to_json, Painter};
use cadence::{EasingTable, TimingFunction};
use serde::Serialize;
use std::fmt::Write as _;
use tracing::debug;

const BAR_WIDTH: usize = 40;

/// Upper bound on samples per table
pub const MAX_SAMPLES: usize = 100_000;

/// One evaluated point of the curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EasingPoint {
    /// Raw progress
    pub x: f64,
    /// Eased progress
    pub y: f64,
}

/// Evaluated easing function
#[derive(Debug, Clone, Serialize)]
pub struct EasingReport {
    /// Canonical text of the function
    pub function: String,
    /// Output range over `[0, 1]`
    pub range: (f64, f64),
    /// Evenly spaced samples, both ends included
    pub samples: Vec<EasingPoint>,
}

/// Execute the easing command
pub fn execute_easing(config: &CliConfig, args: &EasingArgs) -> CliResult<()> {
    let report = tabulate(&args.function, args.samples, args.duration)?;
    let output = match args.format {
        OutputFormat::Text => render_text(&report, Painter::new(config.color.should_color())),
        OutputFormat::Json => to_json(&report)?,
    };
    print!("{output}");
    Ok(())
}

/// Resolve `function` and evaluate it at `samples` evenly spaced inputs.
pub fn tabulate(function: &str, samples: usize, duration: Option<f64>) -> CliResult<EasingReport> {
    if !(2..=MAX_SAMPLES).contains(&samples) {
        return Err(CliError::invalid_argument(format!(
            "--samples must be between 2 and {MAX_SAMPLES}, got {samples}"
        )));
    }
    if let Some(duration) = duration {
        if !(duration.is_finite() && duration > 0.0) {
            return Err(CliError::invalid_argument(format!(
                "--duration must be positive and finite, got {duration}"
            )));
        }
    }

    let easing = EasingTable::global().resolve(function)?;
    debug!(function = %easing, samples, ?duration, "tabulating easing");
    Ok(EasingReport {
        function: easing.to_string(),
        range: easing.range(0.0, 1.0),
        samples: points(&easing, samples, duration),
    })
}

fn points(easing: &TimingFunction, samples: usize, duration: Option<f64>) -> Vec<EasingPoint> {
    let last = (samples - 1) as f64;
    (0..samples)
        .map(|i| {
            let x = i as f64 / last;
            EasingPoint {
                x,
                y: easing.evaluate(x, duration),
            }
        })
        .collect()
}

/// Text table with a bar per sample
#[must_use]
pub fn render_text(report: &EasingReport, painter: Painter) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", painter.heading(&report.function));
    let _ = writeln!(
        out,
        "  range [{}, {}]",
        number(report.range.0),
        number(report.range.1)
    );
    let _ = writeln!(out);
    for point in &report.samples {
        let _ = writeln!(
            out,
            "{:>8}  {:>9}  {}",
            number(point.x),
            number(point.y),
            painter.dim(&bar(point.y))
        );
    }
    out
}

// Values outside [0, 1] pin to the ends.
fn bar(y: f64) -> String {
    let filled = (y.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    "#".repeat(filled)
}
