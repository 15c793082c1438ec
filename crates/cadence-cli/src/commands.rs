//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Cadence: inspect animation timing, easing curves and keyframe samples
#[derive(Parser, Debug)]
#[command(name = "cadence")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Calculate timing results at one or more local times
    Timing(TimingArgs),

    /// Sample a keyframe effect at a fixed local time
    Sample(SampleArgs),

    /// Evaluate an easing function across [0, 1]
    Easing(EasingArgs),

    /// Drive an effect frame by frame and report event conditions
    Trace(TraceArgs),
}

/// Output format shared by every subcommand
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Arguments for the timing command
#[derive(Parser, Debug)]
pub struct TimingArgs {
    /// Effect document (.json, .yaml, .yml)
    pub file: PathBuf,

    /// Local times to evaluate, comma separated
    #[arg(long, value_delimiter = ',', required = true, allow_negative_numbers = true)]
    pub at: Vec<f64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Arguments for the sample command
#[derive(Parser, Debug)]
pub struct SampleArgs {
    /// Effect document (.json, .yaml, .yml)
    pub file: PathBuf,

    /// Local time to sample at
    #[arg(long, allow_negative_numbers = true)]
    pub at: f64,

    /// Mark the sample as paused
    #[arg(long)]
    pub paused: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Arguments for the easing command
#[derive(Parser, Debug)]
pub struct EasingArgs {
    /// Easing function, e.g. `ease-in`, `steps(4, start)`, `cubic-bezier(0.1, 0.7, 1, 0.1)`
    pub function: String,

    /// Number of evenly spaced samples, including both ends
    #[arg(long, default_value = "11")]
    pub samples: usize,

    /// Iteration duration used to pick the solver accuracy
    #[arg(long)]
    pub duration: Option<f64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Arguments for the trace command
#[derive(Parser, Debug)]
pub struct TraceArgs {
    /// Effect document (.json, .yaml, .yml)
    pub file: PathBuf,

    /// First local time
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    pub from: f64,

    /// Last local time (inclusive)
    #[arg(long, allow_negative_numbers = true)]
    pub to: f64,

    /// Local time between frames
    #[arg(long, default_value = "0.1")]
    pub step: f64,

    /// Also raise event conditions when the iteration changes
    #[arg(long)]
    pub iteration_events: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Color argument
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::config::ColorChoice;

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_timing() {
        let cli = Cli::try_parse_from(["cadence", "timing", "fade.yaml", "--at=-1,0.5,2"]).unwrap();
        match cli.command {
            Commands::Timing(args) => {
                assert_eq!(args.at, vec![-1.0, 0.5, 2.0]);
                assert_eq!(args.format, OutputFormat::Text);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_timing_requires_at() {
        assert!(Cli::try_parse_from(["cadence", "timing", "fade.yaml"]).is_err());
    }

    #[test]
    fn test_parse_sample() {
        let cli = Cli::try_parse_from([
            "cadence", "sample", "fade.json", "--at", "1.5", "--paused", "--format", "json",
        ])
        .unwrap();
        match cli.command {
            Commands::Sample(args) => {
                assert_eq!(args.at, 1.5);
                assert!(args.paused);
                assert_eq!(args.format, OutputFormat::Json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_easing_defaults() {
        let cli = Cli::try_parse_from(["cadence", "easing", "ease-in"]).unwrap();
        match cli.command {
            Commands::Easing(args) => {
                assert_eq!(args.function, "ease-in");
                assert_eq!(args.samples, 11);
                assert_eq!(args.duration, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_trace() {
        let cli = Cli::try_parse_from([
            "cadence",
            "-vv",
            "trace",
            "fade.yaml",
            "--to",
            "3",
            "--step",
            "0.5",
            "--iteration-events",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Trace(args) => {
                assert_eq!(args.from, 0.0);
                assert_eq!(args.to, 3.0);
                assert_eq!(args.step, 0.5);
                assert!(args.iteration_events);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_color_arg_conversion() {
        assert_eq!(ColorChoice::from(ColorArg::Always), ColorChoice::Always);
        assert_eq!(ColorChoice::from(ColorArg::Never), ColorChoice::Never);
        assert_eq!(ColorChoice::from(ColorArg::Auto), ColorChoice::Auto);
    }
}
