//! Process configuration, read from the environment.

use std::path::PathBuf;

use thiserror::Error;

use stockroom_observability::LogFormat;

pub const DATA_FILE_VAR: &str = "STOCKROOM_DATA_FILE";
pub const LOG_FORMAT_VAR: &str = "STOCKROOM_LOG_FORMAT";

const DEFAULT_DATA_FILE: &str = "data/stockroom.json";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Location of the JSON snapshot.
    pub data_file: PathBuf,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup(DATA_FILE_VAR) {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: DATA_FILE_VAR,
                    value,
                    reason: "path cannot be empty",
                });
            }
            config.data_file = PathBuf::from(value);
        }

        if let Some(value) = lookup(LOG_FORMAT_VAR) {
            config.log_format = match value.trim().to_ascii_lowercase().as_str() {
                "pretty" | "text" => LogFormat::Pretty,
                "json" => LogFormat::Json,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: LOG_FORMAT_VAR,
                        value,
                        reason: "expected 'pretty' or 'json'",
                    });
                }
            };
        }

        Ok(config)
    }
}
