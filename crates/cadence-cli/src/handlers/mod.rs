//! Command handlers - extracted from main.rs for testability
//!
//! Each handler module contains:
//! - The execution logic for a CLI command
//! - Pure render functions for text and JSON output
//! - Tests

pub mod easing;
pub mod sample;
pub mod timing;
pub mod trace;

pub use easing::execute_easing;
pub use sample::execute_sample;
pub use timing::execute_timing;
pub use trace::execute_trace;

use crate::error::{CliError, CliResult};
use crate::output::number;
use cadence::{EffectDocument, Timing};
use std::path::Path;
use tracing::info;

/// Load an effect document, naming the file in any error.
pub fn load_document(path: &Path) -> CliResult<EffectDocument> {
    let document = EffectDocument::load(path)
        .map_err(|e| CliError::config(format!("{}: {e}", path.display())))?;
    info!(
        path = %path.display(),
        keyframes = document.keyframes.len(),
        "loaded effect document"
    );
    Ok(document)
}

/// One-line summary of a timing configuration.
#[must_use]
pub fn describe_timing(timing: &Timing) -> String {
    format!(
        "duration {} x {} from {}, delay {}, end delay {}, rate {}, {}, fill {}",
        number(timing.iteration_duration),
        number(timing.iteration_count),
        number(timing.iteration_start),
        number(timing.start_delay),
        number(timing.end_delay),
        number(timing.playback_rate),
        timing.direction,
        timing.fill_mode,
    )
}
