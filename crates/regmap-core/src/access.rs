//! # Register Access Modes
//!
//! Source documents spell access modes as free-form text. The three modes
//! every generator understands get their own variants; anything else is
//! kept verbatim in [`AccessMode::Other`] so undocumented modes survive a
//! load-and-dump without loss.

use serde::{Serialize, Serializer};
use std::str::FromStr;

/// Permitted read/write behavior of a register.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum AccessMode {
    /// `RW`
    #[default]
    ReadWrite,
    /// `RO`
    ReadOnly,
    /// `WO`
    WriteOnly,
    /// Any other spelling, stored as written.
    Other(String),
}

impl AccessMode {
    /// Canonical spelling: `RW`, `RO`, `WO`, or the raw text.
    pub fn as_str(&self) -> &str {
        match self {
            Self::ReadWrite => "RW",
            Self::ReadOnly => "RO",
            Self::WriteOnly => "WO",
            Self::Other(raw) => raw,
        }
    }

    /// Whether software may read the register. Unknown modes are assumed
    /// readable.
    pub fn is_readable(&self) -> bool {
        !matches!(self, Self::WriteOnly)
    }

    /// Whether software may write the register. Unknown modes are assumed
    /// writable.
    pub fn is_writable(&self) -> bool {
        !matches!(self, Self::ReadOnly)
    }

    /// Whether the mode is one of the three known variants.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl std::fmt::Display for AccessMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for AccessMode {
    type Err = std::convert::Infallible;

    /// Known modes match case-insensitively after trimming; everything else
    /// becomes [`AccessMode::Other`] with the original text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mode = match s.trim().to_ascii_uppercase().as_str() {
            "RW" => Self::ReadWrite,
            "RO" => Self::ReadOnly,
            "WO" => Self::WriteOnly,
            _ => Self::Other(s.to_string()),
        };
        Ok(mode)
    }
}

impl From<&str> for AccessMode {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(mode) => mode,
            Err(never) => match never {},
        }
    }
}

impl PartialEq<str> for AccessMode {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for AccessMode {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl Serialize for AccessMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_modes_parse() {
        assert_eq!(AccessMode::from("RW"), AccessMode::ReadWrite);
        assert_eq!(AccessMode::from("RO"), AccessMode::ReadOnly);
        assert_eq!(AccessMode::from("WO"), AccessMode::WriteOnly);
    }

    #[test]
    fn known_modes_are_case_insensitive() {
        assert_eq!(AccessMode::from("ro"), AccessMode::ReadOnly);
        assert_eq!(AccessMode::from(" wo "), AccessMode::WriteOnly);
    }

    #[test]
    fn unknown_mode_is_kept_verbatim() {
        let mode = AccessMode::from("W1C");
        assert_eq!(mode, AccessMode::Other("W1C".to_string()));
        assert_eq!(mode.as_str(), "W1C");
        assert!(!mode.is_known());
    }

    #[test]
    fn default_is_read_write() {
        assert_eq!(AccessMode::default(), AccessMode::ReadWrite);
    }

    #[test]
    fn readability() {
        assert!(AccessMode::ReadOnly.is_readable());
        assert!(!AccessMode::ReadOnly.is_writable());
        assert!(!AccessMode::WriteOnly.is_readable());
        assert!(AccessMode::WriteOnly.is_writable());
        assert!(AccessMode::ReadWrite.is_readable() && AccessMode::ReadWrite.is_writable());
    }

    #[test]
    fn compares_with_str() {
        assert_eq!(AccessMode::ReadOnly, "RO");
        assert!(AccessMode::ReadWrite != "RO");
    }

    #[test]
    fn display_matches_as_str() {
        for mode in [
            AccessMode::ReadWrite,
            AccessMode::ReadOnly,
            AccessMode::WriteOnly,
            AccessMode::Other("RW1S".to_string()),
        ] {
            assert_eq!(mode.to_string(), mode.as_str());
        }
    }

    #[test]
    fn serializes_as_canonical_string() {
        assert_eq!(serde_json::to_string(&AccessMode::ReadOnly).unwrap(), "\"RO\"");
        assert_eq!(
            serde_json::to_string(&AccessMode::Other("RC".to_string())).unwrap(),
            "\"RC\""
        );
    }
}
