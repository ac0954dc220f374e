//! # regmap-cli: Register Map Command-Line Interface
//!
//! A thin clap front end over `regmap-core`. Each subcommand lives in its own
//! module with an `Args` struct and a `run_*` handler that returns the
//! process exit code.
//!
//! ## Subcommands
//!
//! - `validate`: load a register map and print its summary
//! - `lint`: load, then run the cross-entity checks
//! - `dump`: print the full model with derived values, as text or JSON
//!
//! ## Exit Codes
//!
//! - `0`: success
//! - `1`: the document is invalid (load error or lint errors)
//! - `2`: operational failure (input unreadable, bad configuration)
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers.
//! - Handlers delegate to `regmap-core`; no validation logic lives here.
//! - Reports go to stdout. Load failures and `tracing` diagnostics go to stderr.

use std::path::Path;

use regmap_core::{Block, ErrorCategory, RegmapError};

pub mod dump;
pub mod lint;
pub mod validate;

/// Exit code for a document that failed validation.
pub const EXIT_INVALID: u8 = 1;

/// Exit code for an operational failure.
pub const EXIT_OPERATIONAL: u8 = 2;

/// Outcome of loading a register map for a subcommand.
#[derive(Debug)]
pub enum Loaded {
    Block(Block),
    /// Loading failed; carries the exit code to return.
    Failed(u8),
}

/// Load `path`, printing a one-line failure report if it does not load.
pub fn load_block(path: &Path) -> Loaded {
    match regmap_core::parse(path) {
        Ok(block) => {
            tracing::info!(
                path = %path.display(),
                block = block.name(),
                registers = block.registers().len(),
                "loaded register map"
            );
            Loaded::Block(block)
        }
        Err(e) => {
            tracing::debug!(category = ?e.category(), "register map failed to load");
            eprintln!("{}", failure_line(path, &e));
            Loaded::Failed(exit_code(&e))
        }
    }
}

/// One-line load failure report, written to stderr.
pub fn failure_line(path: &Path, err: &RegmapError) -> String {
    format!("✗ {}: {err}", path.display())
}

/// Exit code for a load error.
pub fn exit_code(err: &RegmapError) -> u8 {
    match err.category() {
        ErrorCategory::SourceAccess => EXIT_OPERATIONAL,
        ErrorCategory::Format
        | ErrorCategory::MissingKey
        | ErrorCategory::UnrecognizedValue
        | ErrorCategory::Alignment
        | ErrorCategory::BitRange => EXIT_INVALID,
    }
}
