use crate::document::InventoryDocument;
use crate::error::ApiError;
use crate::types::validate_path;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_OVERRIDE_FILE: &str = "overrides.yml";

/// Which override file an operation targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OverrideScope {
    /// Cluster directory name; empty means the cluster root.
    #[serde(default)]
    pub cluster: String,
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

fn default_file_name() -> String {
    DEFAULT_OVERRIDE_FILE.to_string()
}

impl Default for OverrideScope {
    fn default() -> Self {
        Self {
            cluster: String::new(),
            file_name: default_file_name(),
        }
    }
}

impl OverrideScope {
    pub fn new(cluster: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            cluster: cluster.into(),
            file_name: file_name.into(),
        }
    }

    pub fn cluster(cluster: impl Into<String>) -> Self {
        Self {
            cluster: cluster.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.file_name.trim().is_empty() {
            return Err(ApiError::InvalidIdentity(
                "Override file name cannot be empty".to_string(),
            ));
        }
        validate_path(&self.cluster)?;
        validate_path(&self.file_name)
    }
}

/// Persistence port for cluster override documents.
pub trait OverrideRepository: Send + Sync {
    fn file_for(&self, scope: &OverrideScope) -> PathBuf;

    /// `Ok(None)` when the override file does not exist yet.
    fn load(&self, scope: &OverrideScope) -> Result<Option<InventoryDocument>, ApiError>;

    fn save(&self, scope: &OverrideScope, document: &InventoryDocument)
        -> Result<PathBuf, ApiError>;
}
