//! Error handling for redwaf-store

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors raised while talking to the store or reading rule files
///
/// Connectivity failures are fatal and happen before any mutation; a missing
/// rule file is not an error (it yields an empty rule set).
#[derive(Error, Debug)]
pub enum StoreError {
    /// Store connection could not be established
    #[error("Failed to connect to store at {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: redis::RedisError,
    },

    /// Liveness check failed after connecting
    #[error("Store did not answer liveness check: {source}")]
    Ping {
        #[source]
        source: redis::RedisError,
    },

    /// A store command failed mid-seed
    #[error("Store command {op} failed for key {key}: {source}")]
    Command {
        op: &'static str,
        key: String,
        #[source]
        source: redis::RedisError,
    },

    /// A rule file exists but could not be read
    #[error("Failed to read rule file {path}: {source}")]
    RuleFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
