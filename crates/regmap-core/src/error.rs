//! # Error Types
//!
//! Structured errors for loading a register map. Every failure aborts the
//! parse: there is no partial model, and a document with one bad entry never
//! yields a usable [`Block`](crate::Block).
//!
//! ## Categories
//!
//! - Source access: the input path is missing or unreadable.
//! - Format: the document is not valid YAML or has the wrong shape.
//! - Missing key: a required attribute is absent on a block/register/field.
//! - Unrecognized value: a scalar that should be an integer or hex string
//!   is neither.
//! - Alignment: a register offset is not a multiple of 4.
//! - Bit range: a field's msb is below its lsb.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading and validating a register map document.
#[derive(Debug, Error)]
pub enum RegmapError {
    /// The input path does not exist.
    #[error("register map not found: {path}")]
    FileNotFound { path: PathBuf },

    /// The input exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The document could not be decoded into the expected structure.
    #[error("failed to parse YAML at {source_name}: {source}")]
    Format {
        source_name: String,
        source: serde_yaml::Error,
    },

    /// A required key is absent.
    #[error("{entity} is missing required key '{key}'")]
    MissingKey { entity: String, key: &'static str },

    /// A scalar could not be coerced to an integer or bit range.
    #[error("{entity} has an invalid '{key}': {source}")]
    InvalidValue {
        entity: String,
        key: &'static str,
        #[source]
        source: ScalarError,
    },

    /// A register offset is not word-aligned.
    #[error("register '{register}' offset {offset:#x} is not aligned to a 4-byte boundary")]
    RegisterAlignment { register: String, offset: u64 },

    /// A field declares msb below lsb.
    #[error("{entity} has inverted bit range {msb}:{lsb} (msb must be >= lsb)")]
    InvertedBitRange { entity: String, msb: u32, lsb: u32 },
}

/// Coarse classification of a [`RegmapError`].
///
/// Lets callers (the CLI in particular) choose an exit status or a message
/// prefix without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    SourceAccess,
    Format,
    MissingKey,
    UnrecognizedValue,
    Alignment,
    BitRange,
}

impl RegmapError {
    /// The category this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FileNotFound { .. } | Self::Io { .. } => ErrorCategory::SourceAccess,
            Self::Format { .. } => ErrorCategory::Format,
            Self::MissingKey { .. } => ErrorCategory::MissingKey,
            Self::InvalidValue { .. } => ErrorCategory::UnrecognizedValue,
            Self::RegisterAlignment { .. } => ErrorCategory::Alignment,
            Self::InvertedBitRange { .. } => ErrorCategory::BitRange,
        }
    }
}

/// Errors from narrowing a loosely-typed scalar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScalarError {
    /// The value is neither an integer nor a string.
    #[error("unrecognized value: {0}")]
    Unrecognized(String),

    /// The string is not a valid decimal or `0x`-prefixed hex integer.
    #[error("invalid integer {text:?}: {reason}")]
    InvalidInteger { text: String, reason: String },

    /// The string is not a valid `msb:lsb` or single-bit specification.
    #[error("invalid bit specification {text:?}: {reason}")]
    InvalidBits { text: String, reason: String },
}

/// Result type alias for register map operations.
pub type RegmapResult<T> = Result<T, RegmapError>;
