//! Cadence CLI Library
//!
//! Command-line interface for the Cadence timing engine: evaluate timing
//! at chosen local times, sample keyframe effects, tabulate easing curves
//! and trace frame-by-frame event conditions.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
pub mod handlers;
mod output;

pub use commands::{
    Cli, ColorArg, Commands, EasingArgs, OutputFormat, SampleArgs, TimingArgs, TraceArgs,
};
pub use config::{log_filter, CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::Painter;
