use crate::document::InventoryDocument;
use crate::error::ApiError;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct StoredNode {
    pub identity: String,
    /// Directory below the nodes root; empty for the root itself.
    pub path: String,
    pub document: InventoryDocument,
    pub file: PathBuf,
}

/// Persistence port for node documents.
pub trait NodeRepository: Send + Sync {
    fn list(&self) -> Result<Vec<StoredNode>, ApiError>;

    fn find(&self, identity: &str) -> Result<Option<StoredNode>, ApiError> {
        Ok(self.list()?.into_iter().find(|n| n.identity == identity))
    }

    fn file_for(&self, identity: &str, path: &str) -> PathBuf;

    fn save(
        &self,
        identity: &str,
        path: &str,
        document: &InventoryDocument,
    ) -> Result<PathBuf, ApiError>;

    /// Remove the record; `Ok(false)` when there was nothing to remove.
    fn delete(&self, identity: &str, path: &str) -> Result<bool, ApiError>;
}
