//! Ledger configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default maximum product name length, in bytes.
pub const DEFAULT_MAX_NAME_LEN: usize = 256;

/// Default maximum note length, in bytes.
pub const DEFAULT_MAX_NOTE_LEN: usize = 1024;

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse ledger config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid ledger config: {0}")]
    Invalid(String),
}

/// Input bounds enforced by the ledger.
///
/// # Example
///
/// ```rust
/// use product_ledger::config::LedgerConfig;
///
/// let config = LedgerConfig::from_json(r#"{ "max_note_len": 64 }"#).unwrap();
/// assert_eq!(config.max_note_len, 64);
/// assert_eq!(config.max_name_len, 256);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LedgerConfig {
    /// Maximum product name length in bytes
    pub max_name_len: usize,
    /// Maximum status-update note length in bytes
    pub max_note_len: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_name_len: DEFAULT_MAX_NAME_LEN,
            max_note_len: DEFAULT_MAX_NOTE_LEN,
        }
    }
}

impl LedgerConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: LedgerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn max_name_len(mut self, max: usize) -> Self {
        self.max_name_len = max;
        self
    }

    pub fn max_note_len(mut self, max: usize) -> Self {
        self.max_note_len = max;
        self
    }

    /// Reject bounds that would make every call fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_name_len == 0 {
            return Err(ConfigError::Invalid(
                "max_name_len must be greater than zero".to_string(),
            ));
        }
        if self.max_note_len == 0 {
            return Err(ConfigError::Invalid(
                "max_note_len must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
