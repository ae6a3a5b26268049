//! `songpat` binary: format and filter song records from the command line.
//!
//! Configuration problems exit with status 2; failures while running a
//! command are reported through `eyre` and exit with status 1.

use clap::Parser;
use eyre::{Result, WrapErr};

use songpat_cli::commands::{self, Command};
use songpat_cli::config::{CliConfig, LogLevel};
use songpat_cli::error::CliError;
use songpat_cli::logging::init_logging;

/// Format and filter song metadata with display patterns and queries.
#[derive(Parser, Debug)]
#[command(name = "songpat", version, about)]
struct Args {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    /// Number of compiled patterns kept in the formatter cache.
    #[arg(long, global = true)]
    cache_capacity: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            init_logging(&CliConfig::default());
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(2);
        }
    };
    init_logging(&config);
    config.apply_to_libraries();

    tracing::debug!(command = ?args.command, "running songpat");
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::run(&args.command, &mut out).wrap_err("songpat failed")
}

fn build_config(args: &Args) -> Result<CliConfig, CliError> {
    let config = CliConfig::from_env()?;
    Ok(config.apply_overrides(args.log_level, args.cache_capacity))
}
