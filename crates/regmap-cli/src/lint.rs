//! # Lint Subcommand
//!
//! Loads a register map, then runs the cross-entity checks from
//! `regmap_core::lint`. Configuration is layered: a `--config` YAML file if
//! given, otherwise `REGMAP_*` environment variables, and command-line flags
//! on top of either.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use regmap_core::{LintConfig, LintReport};

use crate::{load_block, Loaded, EXIT_INVALID};

/// Arguments for the `regmap lint` subcommand.
#[derive(Args, Debug, Default)]
pub struct LintArgs {
    /// Register map YAML file.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Register width in bits (default 32).
    #[arg(long)]
    pub register_width: Option<u32>,

    /// Address bus width in bits (default 32).
    #[arg(long)]
    pub address_width: Option<u32>,

    /// Treat warnings as errors.
    #[arg(long)]
    pub deny_warnings: bool,
}

/// Execute the lint subcommand.
///
/// Returns exit code: 0 when no error-severity findings remain, 1 otherwise
/// or when the document fails to load, 2 if it cannot be read.
pub fn run_lint(args: &LintArgs, config_path: Option<&Path>) -> Result<u8> {
    let config = resolve_config(args, config_path)?;
    tracing::debug!(?config, "resolved lint configuration");

    let block = match load_block(&args.input) {
        Loaded::Block(block) => block,
        Loaded::Failed(code) => return Ok(code),
    };

    let report = regmap_core::lint(&block, &config);
    print!("{}", render_report(block.name(), &report));

    if report.has_errors() {
        Ok(EXIT_INVALID)
    } else {
        Ok(0)
    }
}

/// Build the effective configuration for a lint run.
pub fn resolve_config(args: &LintArgs, config_path: Option<&Path>) -> Result<LintConfig> {
    let mut config = match config_path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read lint config {}", path.display()))?;
            LintConfig::from_yaml(&text)
                .with_context(|| format!("invalid lint config {}", path.display()))?
        }
        None => LintConfig::from_env().context("invalid REGMAP_* environment")?,
    };

    if let Some(width) = args.register_width {
        config.register_width = width;
    }
    if let Some(width) = args.address_width {
        config.address_width = width;
    }
    if args.deny_warnings {
        config.warnings_as_errors = true;
    }

    for (flag, width) in [
        ("--register-width", config.register_width),
        ("--address-width", config.address_width),
    ] {
        anyhow::ensure!(
            (1..=64).contains(&width),
            "{flag} must be between 1 and 64, got {width}"
        );
    }
    Ok(config)
}

/// One line per finding plus a summary line.
pub fn render_report(block: &str, report: &LintReport) -> String {
    let mut out = String::new();
    for finding in &report.findings {
        out.push_str(&finding.to_string());
        out.push('\n');
    }
    let errors = report.errors().count();
    let warnings = report.warnings().count();
    if report.is_clean() {
        out.push_str(&format!("✓ {block}: no findings\n"));
    } else {
        out.push_str(&format!("{block}: {errors} error(s), {warnings} warning(s)\n"));
    }
    out
}
