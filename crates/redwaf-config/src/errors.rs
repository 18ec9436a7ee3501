//! Error handling for redwaf-config

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using ConfigError
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while reading or consuming a configuration source
///
/// Malformed constructs inside the source are not errors: the parser skips
/// them and leaves the affected key absent. Only a missing/unreadable file
/// and a value that fails mandatory coercion are fatal.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration source could not be read
    #[error("Failed to read config file {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configured value could not be coerced to its target type
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}
