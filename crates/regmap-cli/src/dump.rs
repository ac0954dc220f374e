//! # Dump Subcommand
//!
//! Prints the loaded model together with every derived value a generator
//! would read (hex renderings, absolute addresses, widths, masks, composed
//! reset values). Text output is for humans; JSON output is for feeding
//! external template engines.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;

use regmap_core::{Block, Field, Register};

use crate::{load_block, Loaded};

/// Output format for `regmap dump`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum DumpFormat {
    #[default]
    Text,
    Json,
}

/// Arguments for the `regmap dump` subcommand.
#[derive(Args, Debug)]
pub struct DumpArgs {
    /// Register map YAML file.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = DumpFormat::Text)]
    pub format: DumpFormat,
}

/// Execute the dump subcommand.
pub fn run_dump(args: &DumpArgs) -> Result<u8> {
    let block = match load_block(&args.input) {
        Loaded::Block(block) => block,
        Loaded::Failed(code) => return Ok(code),
    };

    match args.format {
        DumpFormat::Text => print!("{}", render_text(&block)),
        DumpFormat::Json => {
            let json = serde_json::to_string_pretty(&BlockView::from(&block))
                .context("failed to serialize register map")?;
            println!("{json}");
        }
    }
    Ok(0)
}

#[derive(Debug, Serialize)]
struct BlockView<'a> {
    name: &'a str,
    description: &'a str,
    base_address: u64,
    base_address_hex: String,
    registers: Vec<RegisterView<'a>>,
}

#[derive(Debug, Serialize)]
struct RegisterView<'a> {
    name: &'a str,
    description: &'a str,
    offset: u64,
    offset_hex: String,
    address: u64,
    access: &'a str,
    reset_value: u64,
    fields: Vec<FieldView<'a>>,
}

#[derive(Debug, Serialize)]
struct FieldView<'a> {
    name: &'a str,
    description: &'a str,
    msb: u32,
    lsb: u32,
    width: u32,
    mask: u64,
    reset: u64,
    reset_hex: String,
}

impl<'a> From<&'a Block> for BlockView<'a> {
    fn from(block: &'a Block) -> Self {
        Self {
            name: block.name(),
            description: block.description(),
            base_address: block.base_address(),
            base_address_hex: block.base_address_hex(),
            registers: block
                .registers()
                .iter()
                .map(|reg| RegisterView::new(reg, block.absolute_address(reg)))
                .collect(),
        }
    }
}

impl<'a> RegisterView<'a> {
    fn new(reg: &'a Register, address: u64) -> Self {
        Self {
            name: reg.name(),
            description: reg.description(),
            offset: reg.offset(),
            offset_hex: reg.offset_hex(),
            address,
            access: reg.access().as_str(),
            reset_value: reg.reset_value(),
            fields: reg.fields().iter().map(FieldView::from).collect(),
        }
    }
}

impl<'a> From<&'a Field> for FieldView<'a> {
    fn from(field: &'a Field) -> Self {
        Self {
            name: field.name(),
            description: field.description(),
            msb: field.msb(),
            lsb: field.lsb(),
            width: field.width(),
            mask: field.mask(),
            reset: field.reset(),
            reset_hex: field.reset_hex(),
        }
    }
}

/// Indented text rendering of a block.
pub fn render_text(block: &Block) -> String {
    let mut out = format!("{} @ {}\n", block.name(), block.base_address_hex());
    if !block.description().is_empty() {
        out.push_str(&format!("  {}\n", block.description()));
    }
    for reg in block.registers() {
        out.push_str(&format!(
            "  {:<16} {:>8}  {:#010X}  {:<3} reset={:#X}\n",
            reg.name(),
            reg.offset_hex(),
            block.absolute_address(reg),
            reg.access(),
            reg.reset_value()
        ));
        for field in reg.fields() {
            out.push_str(&format!(
                "    [{:>5}] {:<16} width={:<2} mask={:#010X} reset={}\n",
                field.bits_label(),
                field.name(),
                field.width(),
                field.mask(),
                field.reset_hex()
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
block:
  name: UART0
  base_address: 0x40001000
  registers:
    - name: CTRL
      offset: 0x0
      fields:
        - { name: enable, bits: 0, reset: 1 }
        - { name: mode, bits: "3:1", reset: "0x2" }
    - name: STATUS
      offset: 0x4
      access: RO
"#;

    #[test]
    fn json_view_carries_derived_values() {
        let block = regmap_core::parse_str(SAMPLE).unwrap();
        let json = serde_json::to_value(BlockView::from(&block)).unwrap();
        assert_eq!(json["base_address_hex"], "0x40001000");
        assert_eq!(json["registers"][1]["address"], 0x40001004u64);
        assert_eq!(json["registers"][1]["access"], "RO");
        assert_eq!(json["registers"][0]["reset_value"], 0b0101);
        assert_eq!(json["registers"][0]["fields"][1]["mask"], 0xE);
        assert_eq!(json["registers"][0]["fields"][1]["width"], 3);
        assert_eq!(json["registers"][0]["fields"][1]["reset_hex"], "0x2");
    }

    #[test]
    fn text_rendering_lists_fields_in_order() {
        let block = regmap_core::parse_str(SAMPLE).unwrap();
        let text = render_text(&block);
        assert!(text.starts_with("UART0 @ 0x40001000\n"));
        let enable = text.find("enable").unwrap();
        let mode = text.find("mode").unwrap();
        assert!(enable < mode);
        assert!(text.contains("0x40001004"));
        assert!(text.contains("[  3:1]"));
    }

    #[test]
    fn run_dump_json() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("uart.yaml");
        std::fs::write(&input, SAMPLE).unwrap();
        let args = DumpArgs {
            input,
            format: DumpFormat::Json,
        };
        assert_eq!(run_dump(&args).unwrap(), 0);
    }
}
