//! Cadence CLI: inspect animation timing from the command line
//!
//! ## Usage
//!
//! ```bash
//! cadence timing fade.yaml --at 0,0.5,1.5      # Timing results at local times
//! cadence sample fade.yaml --at 1.5 --paused   # Property values at one time
//! cadence easing "steps(4, start)"             # Tabulate an easing function
//! cadence trace fade.yaml --to 6 --step 0.25   # Frame-by-frame event conditions
//! ```

use cadence_cli::{
    handlers, log_filter, Cli, CliConfig, CliResult, ColorChoice, Commands, Verbosity,
};
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    let config = build_config(&cli);
    init_tracing(&cli, &config);

    match cli.command {
        Commands::Timing(args) => handlers::execute_timing(&config, &args),
        Commands::Sample(args) => handlers::execute_sample(&config, &args),
        Commands::Easing(args) => handlers::execute_easing(&config, &args),
        Commands::Trace(args) => handlers::execute_trace(&config, &args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let color: ColorChoice = cli.color.into();
    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
        .with_color(color)
}

// Logs go to stderr. RUST_LOG overrides the -q/-v flags.
fn init_tracing(cli: &Cli, config: &CliConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_filter(cli.quiet, cli.verbose)));
    let ansi = match config.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => std::io::IsTerminal::is_terminal(&std::io::stderr()),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_ansi(ansi))
        .init();
}
