//! # regmap CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use regmap_cli::dump::{run_dump, DumpArgs};
use regmap_cli::lint::{run_lint, LintArgs};
use regmap_cli::validate::{run_validate, ValidateArgs};
use regmap_cli::EXIT_OPERATIONAL;

/// Register map toolchain.
///
/// Validates YAML register block descriptions (word-aligned offsets, legal
/// bit ranges), lints them for cross-register consistency, and dumps the
/// resulting model for code generators.
#[derive(Parser, Debug)]
#[command(name = "regmap", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a lint configuration file (YAML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load a register map and print its summary.
    Validate(ValidateArgs),

    /// Load a register map and report duplicate names, overlaps, and range problems.
    Lint(LintArgs),

    /// Print the register map with derived values (hex, masks, addresses).
    Dump(DumpArgs),
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

    tracing::debug!("regmap CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args),
        Commands::Lint(args) => run_lint(&args, cli.config.as_deref()),
        Commands::Dump(args) => run_dump(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_OPERATIONAL)
        }
    }
}
