//! # Scalar Coercion
//!
//! Register map documents are hand-written, so addresses, offsets, bit
//! ranges and reset values show up as either YAML integers or strings
//! (`0x40`, `"0x40"`, `"64"`, `"15:8"`). [`Scalar`] captures that looseness
//! at the deserialization boundary; [`parse_hex`] and [`parse_bits`] narrow
//! it once so the rest of the model only ever sees fixed-width integers.
//!
//! Numeric strings may group digits with single underscores
//! (`0x4000_0000`, `1_000`).

use std::borrow::Cow;
use std::fmt;

use serde::Deserialize;

use crate::error::ScalarError;
use crate::model::MAX_BIT_INDEX;

/// A loosely-typed scalar as it appears in the source document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// A native non-negative YAML integer.
    Integer(u64),
    /// A string, possibly hex-prefixed or an `msb:lsb` range.
    Text(String),
    /// Anything else: booleans, floats, negative integers, collections.
    Other(serde_yaml::Value),
}

impl From<u64> for Scalar {
    fn from(value: u64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Other(value) => match serde_yaml::to_string(value) {
                Ok(s) => f.write_str(s.trim_end()),
                Err(_) => write!(f, "{value:?}"),
            },
        }
    }
}

/// Coerce a scalar to an unsigned integer.
///
/// Integers pass through unchanged. Strings are trimmed; a case-insensitive
/// `0x` prefix selects base 16, otherwise base 10.
pub fn parse_hex(value: &Scalar) -> Result<u64, ScalarError> {
    match value {
        Scalar::Integer(n) => Ok(*n),
        Scalar::Text(text) => parse_int_text(text),
        Scalar::Other(_) => Err(ScalarError::Unrecognized(value.to_string())),
    }
}

fn parse_int_text(text: &str) -> Result<u64, ScalarError> {
    let invalid = |reason: String| ScalarError::InvalidInteger {
        text: text.to_string(),
        reason,
    };
    let trimmed = text.trim();
    let (digits, radix) = match strip_hex_prefix(trimmed) {
        Some(digits) => (digits, 16),
        None => (trimmed, 10),
    };
    let digits = strip_separators(digits)
        .ok_or_else(|| invalid("misplaced '_' digit separator".to_string()))?;
    u64::from_str_radix(&digits, radix).map_err(|e| invalid(e.to_string()))
}

/// Remove `_` separators between digits. `None` if an underscore leads,
/// trails, or follows another underscore.
fn strip_separators(digits: &str) -> Option<Cow<'_, str>> {
    if !digits.contains('_') {
        return Some(Cow::Borrowed(digits));
    }
    if digits.starts_with('_') || digits.ends_with('_') || digits.contains("__") {
        return None;
    }
    Some(Cow::Owned(digits.replace('_', "")))
}

fn strip_hex_prefix(s: &str) -> Option<&str> {
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))
}

/// Coerce a bit specification to an `(msb, lsb)` pair.
///
/// An integer `k` or a bare decimal string `"k"` yields `(k, k)`. A string
/// containing a colon is split on the first colon into `msb:lsb`. Indices
/// are always decimal and at most [`MAX_BIT_INDEX`]. Ordering of msb and lsb
/// is not checked here.
pub fn parse_bits(value: &Scalar) -> Result<(u32, u32), ScalarError> {
    match value {
        Scalar::Integer(n) => {
            let bit = u32::try_from(*n)
                .ok()
                .filter(|bit| *bit <= MAX_BIT_INDEX)
                .ok_or_else(|| ScalarError::InvalidBits {
                    text: n.to_string(),
                    reason: format!("bit index exceeds {MAX_BIT_INDEX}"),
                })?;
            Ok((bit, bit))
        }
        Scalar::Text(text) => {
            let trimmed = text.trim();
            match trimmed.split_once(':') {
                Some((msb, lsb)) => Ok((parse_bit_index(text, msb)?, parse_bit_index(text, lsb)?)),
                None => {
                    let bit = parse_bit_index(text, trimmed)?;
                    Ok((bit, bit))
                }
            }
        }
        Scalar::Other(_) => Err(ScalarError::Unrecognized(value.to_string())),
    }
}

fn parse_bit_index(raw: &str, part: &str) -> Result<u32, ScalarError> {
    let part = part.trim();
    if strip_hex_prefix(part).is_some() {
        return Err(ScalarError::InvalidBits {
            text: raw.to_string(),
            reason: "bit indices are decimal".to_string(),
        });
    }
    let invalid = |reason: String| ScalarError::InvalidBits {
        text: raw.to_string(),
        reason,
    };
    let digits =
        strip_separators(part).ok_or_else(|| invalid("misplaced '_' digit separator".to_string()))?;
    let bit = digits.parse::<u32>().map_err(|e| invalid(e.to_string()))?;
    if bit > MAX_BIT_INDEX {
        return Err(invalid(format!("bit index exceeds {MAX_BIT_INDEX}")));
    }
    Ok(bit)
}
