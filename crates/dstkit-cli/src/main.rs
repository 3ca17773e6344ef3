//! # dstkit CLI entry point
//!
//! Parses command-line arguments, loads the optional config file, and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dstkit_cli::config::CliConfig;
use dstkit_cli::inspect::{run_inspect, InspectArgs};
use dstkit_cli::parse::{run_parse, ParseArgs};
use dstkit_cli::resolve::{run_resolve, ResolveArgs};

/// dstkit: ISO-8601 parsing and DST offset resolution.
///
/// Resolves the UTC offset of local wall-clock times from a location's
/// list of offset transitions, reporting times skipped by a clock change.
#[derive(Parser, Debug)]
#[command(name = "dstkit", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse ISO-8601 dates and date-times.
    Parse(ParseArgs),

    /// Resolve the UTC offset of a local time.
    Resolve(ResolveArgs),

    /// List a DST data file's zones and transitions.
    Inspect(InspectArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "dstkit starting");

    let config = match CliConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(2);
        }
    };

    let result = match cli.command {
        Commands::Parse(args) => run_parse(&args, &config),
        Commands::Resolve(args) => run_resolve(&args, &config),
        Commands::Inspect(args) => run_inspect(&args, &config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
