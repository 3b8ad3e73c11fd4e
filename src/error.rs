//! Error types for inventory classification and metadata storage.

use std::path::PathBuf;
use thiserror::Error;

/// Failures of the persistence layer, carrying the underlying cause.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to walk inventory directory: {0}")]
    Walk(#[from] walkdir::Error),
}

impl StorageError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn yaml(path: impl Into<PathBuf>, source: serde_yaml::Error) -> Self {
        StorageError::Yaml {
            path: path.into(),
            source,
        }
    }
}

/// Error returned by every public operation of the crate.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Malformed rule: {0}")]
    MalformedRule(String),

    #[error("Unsupported condition: {0}")]
    UnsupportedCondition(String),

    #[error("Invalid node identity: {0}")]
    InvalidIdentity(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error(
        "Not enough IP addresses in ranges \"{ranges}\": {available} available, {needed} required"
    )]
    InsufficientCapacity {
        ranges: String,
        available: usize,
        needed: usize,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
