//! Lint configuration.
//!
//! Defaults describe a 32-bit bus with 32-bit registers. Override via
//! environment variables, a YAML file, or explicit construction.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Register width assumed when nothing else is configured.
pub const DEFAULT_REGISTER_WIDTH: u32 = 32;

/// Address bus width assumed when nothing else is configured.
pub const DEFAULT_ADDRESS_WIDTH: u32 = 32;

/// Knobs for [`crate::lint::lint`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LintConfig {
    /// Width of every register in bits. Fields reaching this bit are out of range.
    pub register_width: u32,
    /// Width of the address bus in bits.
    pub address_width: u32,
    /// Promote warnings to errors.
    pub warnings_as_errors: bool,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            register_width: DEFAULT_REGISTER_WIDTH,
            address_width: DEFAULT_ADDRESS_WIDTH,
            warnings_as_errors: false,
        }
    }
}

impl LintConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `REGMAP_REGISTER_WIDTH` (default: 32)
    /// - `REGMAP_ADDRESS_WIDTH` (default: 32)
    /// - `REGMAP_WARNINGS_AS_ERRORS` (`1`/`true`/`0`/`false`, default: false)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`LintConfig::from_env`] but reads variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            register_width: width_var(&lookup, "REGMAP_REGISTER_WIDTH", defaults.register_width)?,
            address_width: width_var(&lookup, "REGMAP_ADDRESS_WIDTH", defaults.address_width)?,
            warnings_as_errors: match lookup("REGMAP_WARNINGS_AS_ERRORS") {
                Some(raw) => parse_flag("REGMAP_WARNINGS_AS_ERRORS", &raw)?,
                None => defaults.warnings_as_errors,
            },
        };
        config.validate()
    }

    /// Parse configuration from YAML text. Missing keys take defaults.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text).map_err(ConfigError::Yaml)?;
        config.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        for (name, width) in [
            ("register_width", self.register_width),
            ("address_width", self.address_width),
        ] {
            if width == 0 || width > u64::BITS {
                return Err(ConfigError::WidthOutOfRange { name, width });
            }
        }
        Ok(self)
    }
}

fn width_var(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: u32,
) -> Result<u32, ConfigError> {
    match lookup(var) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidVar { var, value: raw }),
        None => Ok(default),
    }
}

fn parse_flag(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" | "" => Ok(false),
        _ => Err(ConfigError::InvalidVar {
            var,
            value: raw.to_string(),
        }),
    }
}

/// Errors from building a [`LintConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}")]
    InvalidVar { var: &'static str, value: String },

    #[error("{name} must be between 1 and 64 bits, got {width}")]
    WidthOutOfRange { name: &'static str, width: u32 },

    #[error("invalid lint configuration: {0}")]
    Yaml(#[source] serde_yaml::Error),
}
