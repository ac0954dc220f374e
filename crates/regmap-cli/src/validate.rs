//! # Validate Subcommand
//!
//! Loads a register map and prints a short summary: block name, base
//! address, and one line per register with its offset and access mode.
//! Any load error is reported and turns into a non-zero exit code.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use regmap_core::Block;

use crate::{load_block, Loaded};

/// Arguments for the `regmap validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Register map YAML file.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 on success, 1 if the document is invalid, 2 if it
/// cannot be read.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    match load_block(&args.input) {
        Loaded::Block(block) => {
            print!("{}", summary(&block));
            Ok(0)
        }
        Loaded::Failed(code) => Ok(code),
    }
}

/// Human-readable summary of a loaded block.
pub fn summary(block: &Block) -> String {
    let mut out = format!(
        "✓ Block: {}\n  Base Address: {}\n  Registers: {}\n",
        block.name(),
        block.base_address_hex(),
        block.registers().len()
    );
    for reg in block.registers() {
        out.push_str(&format!(
            "    - {} @ {} ({})\n",
            reg.name(),
            reg.offset_hex(),
            reg.access()
        ));
    }
    out
}
