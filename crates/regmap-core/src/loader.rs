//! # Register Map Loader
//!
//! Turns a YAML register map document into a validated [`Block`].
//!
//! Loading is two-phase. serde_yaml first decodes the text into the entry
//! types below, whose attributes are all optional and whose numeric
//! attributes are loose [`Scalar`]s. The `parse_*` functions then walk the
//! entries top-down, report missing required keys against the entity that
//! lacks them, narrow every scalar, and apply the alignment check. The
//! first failure aborts the whole load.
//!
//! Cross-entity consistency (duplicate names, overlapping offsets or bit
//! ranges) is not checked here; see [`crate::lint`].

use std::path::Path;

use serde::Deserialize;

use crate::access::AccessMode;
use crate::error::{RegmapError, RegmapResult};
use crate::model::{Block, Field, Register, REGISTER_ALIGNMENT};
use crate::scalar::{parse_bits, parse_hex, Scalar};

/// Source label used by [`parse_str`] in format errors.
const STRING_SOURCE: &str = "<string>";

// ---------------------------------------------------------------------------
// Document entries
// ---------------------------------------------------------------------------

/// Root of a register map document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Document {
    pub block: Option<BlockEntry>,
}

/// The `block` mapping.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockEntry {
    pub name: Option<String>,
    pub base_address: Option<Scalar>,
    pub description: Option<String>,
    pub registers: Option<Vec<RegisterEntry>>,
}

/// One item of `block.registers`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterEntry {
    pub name: Option<String>,
    pub offset: Option<Scalar>,
    pub access: Option<String>,
    pub description: Option<String>,
    pub fields: Option<Vec<FieldEntry>>,
}

/// One item of `registers[].fields`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FieldEntry {
    pub name: Option<String>,
    pub bits: Option<Scalar>,
    pub description: Option<String>,
    pub reset: Option<Scalar>,
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Load and validate a register map from a YAML file.
///
/// # Errors
///
/// - [`RegmapError::FileNotFound`] if `path` does not exist.
/// - [`RegmapError::Io`] if it cannot be read.
/// - [`RegmapError::Format`] if the YAML is malformed or mis-shaped.
/// - Any error from [`parse_document`].
pub fn parse(path: impl AsRef<Path>) -> RegmapResult<Block> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            RegmapError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            RegmapError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "loading register map");
    parse_source(&content, &path.display().to_string())
}

/// Load and validate a register map from YAML text.
pub fn parse_str(text: &str) -> RegmapResult<Block> {
    parse_source(text, STRING_SOURCE)
}

fn parse_source(text: &str, source_name: &str) -> RegmapResult<Block> {
    let format_error = |source: serde_yaml::Error| RegmapError::Format {
        source_name: source_name.to_string(),
        source,
    };
    let value: serde_yaml::Value = serde_yaml::from_str(text).map_err(format_error)?;
    let document: Document = if value.is_null() {
        Document::default()
    } else {
        serde_yaml::from_value(value).map_err(format_error)?
    };
    parse_document(&document)
}

/// Validate a decoded document.
pub fn parse_document(document: &Document) -> RegmapResult<Block> {
    let block = document.block.as_ref().ok_or(RegmapError::MissingKey {
        entity: "document".to_string(),
        key: "block",
    })?;
    parse_block(block)
}

// ---------------------------------------------------------------------------
// Per-entity parsing
// ---------------------------------------------------------------------------

/// Validate the `block` entry and every register beneath it.
pub fn parse_block(entry: &BlockEntry) -> RegmapResult<Block> {
    let name = entry.name.as_deref().ok_or(RegmapError::MissingKey {
        entity: "block".to_string(),
        key: "name",
    })?;
    let entity = format!("block '{name}'");

    let base_address = match &entry.base_address {
        Some(raw) => parse_hex(raw).map_err(|source| RegmapError::InvalidValue {
            entity: entity.clone(),
            key: "base_address",
            source,
        })?,
        None => 0,
    };

    let registers = entry
        .registers
        .iter()
        .flatten()
        .enumerate()
        .map(|(index, reg)| parse_register(reg, name, index))
        .collect::<RegmapResult<Vec<_>>>()?;

    tracing::debug!(
        block = name,
        base_address,
        registers = registers.len(),
        "parsed register block"
    );

    Ok(Block::new(name, base_address)
        .with_description(entry.description.clone().unwrap_or_default())
        .with_registers(registers))
}

/// Validate one register entry.
///
/// `block` and `index` only label errors.
pub fn parse_register(entry: &RegisterEntry, block: &str, index: usize) -> RegmapResult<Register> {
    let name = entry.name.as_deref().ok_or_else(|| RegmapError::MissingKey {
        entity: format!("register at index {index} in block '{block}'"),
        key: "name",
    })?;
    let entity = format!("register '{name}' in block '{block}'");

    let raw_offset = entry.offset.as_ref().ok_or_else(|| RegmapError::MissingKey {
        entity: entity.clone(),
        key: "offset",
    })?;
    let offset = parse_hex(raw_offset).map_err(|source| RegmapError::InvalidValue {
        entity: entity.clone(),
        key: "offset",
        source,
    })?;

    if offset % REGISTER_ALIGNMENT != 0 {
        return Err(RegmapError::RegisterAlignment {
            register: name.to_string(),
            offset,
        });
    }

    let access = entry
        .access
        .as_deref()
        .map(AccessMode::from)
        .unwrap_or_default();

    let fields = entry
        .fields
        .iter()
        .flatten()
        .enumerate()
        .map(|(i, field)| parse_field(field, name, i))
        .collect::<RegmapResult<Vec<_>>>()?;

    tracing::trace!(register = name, offset, access = %access, fields = fields.len(), "parsed register");

    // Alignment was checked above, so construction cannot fail.
    let register = Register::new(name, offset, access).ok_or(RegmapError::RegisterAlignment {
        register: name.to_string(),
        offset,
    })?;
    Ok(register
        .with_description(entry.description.clone().unwrap_or_default())
        .with_fields(fields))
}

/// Validate one field entry.
///
/// `register` and `index` only label errors.
pub fn parse_field(entry: &FieldEntry, register: &str, index: usize) -> RegmapResult<Field> {
    let name = entry.name.as_deref().ok_or_else(|| RegmapError::MissingKey {
        entity: format!("field at index {index} in register '{register}'"),
        key: "name",
    })?;
    let entity = format!("field '{name}' in register '{register}'");

    let raw_bits = entry.bits.as_ref().ok_or_else(|| RegmapError::MissingKey {
        entity: entity.clone(),
        key: "bits",
    })?;
    let (msb, lsb) = parse_bits(raw_bits).map_err(|source| RegmapError::InvalidValue {
        entity: entity.clone(),
        key: "bits",
        source,
    })?;

    let reset = match &entry.reset {
        Some(raw) => parse_hex(raw).map_err(|source| RegmapError::InvalidValue {
            entity: entity.clone(),
            key: "reset",
            source,
        })?,
        None => 0,
    };

    tracing::trace!(field = name, msb, lsb, reset, "parsed field");

    let field = Field::new(name, msb, lsb).ok_or(RegmapError::InvertedBitRange { entity, msb, lsb })?;
    Ok(field
        .with_description(entry.description.clone().unwrap_or_default())
        .with_reset(reset))
}
