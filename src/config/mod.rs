//! Configuration
//!
//! Layered configuration for inventory locations, classification defaults and
//! logging. See [`ConfigLoader`] for source precedence.

pub mod facade;
pub mod merge;
pub mod paths;
pub mod sources;
pub mod storage_paths;

pub use facade::ConfigLoader;
pub use paths::xdg_root as xdg;
pub use storage_paths::StorageConfig;

use crate::cluster::repository::DEFAULT_OVERRIDE_FILE;
use crate::logging::LoggingConfig;
use crate::types::{DEFAULT_CLUSTER, DEFAULT_ENVIRONMENT, RESERVED_ATTRIBUTE_PREFIX};
use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReclassConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub classification: ClassificationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Defaults applied by the classification engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationConfig {
    /// Node path for records created by classification
    #[serde(default = "default_generated_path")]
    pub generated_path: String,

    /// Attribute keys with this prefix are dropped before evaluation
    #[serde(default = "default_reserved_prefix")]
    pub reserved_prefix: String,

    /// Cluster whose override file receives cluster parameters
    #[serde(default)]
    pub cluster: String,

    #[serde(default = "default_override_file")]
    pub override_file: String,

    #[serde(default = "default_cluster")]
    pub default_cluster: String,

    #[serde(default = "default_environment")]
    pub default_environment: String,
}

fn default_generated_path() -> String {
    "_generated".to_string()
}

fn default_reserved_prefix() -> String {
    RESERVED_ATTRIBUTE_PREFIX.to_string()
}

fn default_override_file() -> String {
    DEFAULT_OVERRIDE_FILE.to_string()
}

fn default_cluster() -> String {
    DEFAULT_CLUSTER.to_string()
}

fn default_environment() -> String {
    DEFAULT_ENVIRONMENT.to_string()
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            generated_path: default_generated_path(),
            reserved_prefix: default_reserved_prefix(),
            cluster: String::new(),
            override_file: default_override_file(),
            default_cluster: default_cluster(),
            default_environment: default_environment(),
        }
    }
}
