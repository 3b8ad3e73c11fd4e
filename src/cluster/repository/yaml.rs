use crate::cluster::repository::{OverrideRepository, OverrideScope};
use crate::document::InventoryDocument;
use crate::error::{ApiError, StorageError};
use std::path::{Path, PathBuf};

/// Directory under the classes root holding per-cluster overrides.
pub const CLUSTER_DIR: &str = "cluster";

/// Overrides as `<classes_dir>/cluster/<cluster>/<file_name>`.
pub struct YamlOverrideRepository {
    classes_dir: PathBuf,
}

impl YamlOverrideRepository {
    pub fn new(classes_dir: impl Into<PathBuf>) -> Self {
        Self {
            classes_dir: classes_dir.into(),
        }
    }

    pub fn classes_dir(&self) -> &Path {
        &self.classes_dir
    }
}

impl OverrideRepository for YamlOverrideRepository {
    fn file_for(&self, scope: &OverrideScope) -> PathBuf {
        let mut dir = self.classes_dir.join(CLUSTER_DIR);
        if !scope.cluster.is_empty() {
            dir = dir.join(&scope.cluster);
        }
        dir.join(&scope.file_name)
    }

    fn load(&self, scope: &OverrideScope) -> Result<Option<InventoryDocument>, ApiError> {
        let file = self.file_for(scope);
        let content = match std::fs::read_to_string(&file) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::io(&file, e).into()),
        };
        let document = InventoryDocument::from_yaml_str(&content)
            .map_err(|e| StorageError::yaml(&file, e))?;
        Ok(Some(document))
    }

    fn save(
        &self,
        scope: &OverrideScope,
        document: &InventoryDocument,
    ) -> Result<PathBuf, ApiError> {
        let file = self.file_for(scope);
        if let Some(dir) = file.parent() {
            std::fs::create_dir_all(dir).map_err(|e| StorageError::io(dir, e))?;
        }
        let content = document
            .to_yaml_string()
            .map_err(|e| StorageError::yaml(&file, e))?;
        std::fs::write(&file, content).map_err(|e| StorageError::io(&file, e))?;
        Ok(file)
    }
}
