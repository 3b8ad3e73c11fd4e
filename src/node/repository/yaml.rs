use crate::document::InventoryDocument;
use crate::error::{ApiError, StorageError};
use crate::node::repository::{NodeRepository, StoredNode};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extension of node record files.
pub const NODE_FILE_EXTENSION: &str = "yml";

/// Node records as `<nodes_dir>/[<path>/]<identity>.yml`.
pub struct YamlNodeRepository {
    nodes_dir: PathBuf,
}

impl YamlNodeRepository {
    pub fn new(nodes_dir: impl Into<PathBuf>) -> Self {
        Self {
            nodes_dir: nodes_dir.into(),
        }
    }

    pub fn nodes_dir(&self) -> &Path {
        &self.nodes_dir
    }

    /// Every `.yml` file below the nodes root as `(identity, path, file)`.
    fn node_files(&self) -> Result<Vec<(String, String, PathBuf)>, ApiError> {
        if !self.nodes_dir.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.nodes_dir).sort_by_file_name() {
            let entry = entry.map_err(StorageError::from)?;
            if !entry.file_type().is_file() {
                continue;
            }

            let file = entry.path();
            if file.extension() != Some(OsStr::new(NODE_FILE_EXTENSION)) {
                continue;
            }

            let identity = match file.file_stem().and_then(|s| s.to_str()) {
                Some(name) => name.to_string(),
                None => {
                    tracing::warn!("Invalid node filename non UTF8: {:?}", file);
                    continue;
                }
            };

            let path = file
                .parent()
                .and_then(|dir| dir.strip_prefix(&self.nodes_dir).ok())
                .map(|rel| rel.to_string_lossy().replace('\\', "/"))
                .unwrap_or_default();

            files.push((identity, path, file.to_path_buf()));
        }
        Ok(files)
    }

    fn load(identity: String, path: String, file: PathBuf) -> Result<StoredNode, ApiError> {
        let content =
            std::fs::read_to_string(&file).map_err(|e| StorageError::io(&file, e))?;
        let document = InventoryDocument::from_yaml_str(&content)
            .map_err(|e| StorageError::yaml(&file, e))?;
        Ok(StoredNode {
            identity,
            path,
            document,
            file,
        })
    }
}

impl NodeRepository for YamlNodeRepository {
    fn list(&self) -> Result<Vec<StoredNode>, ApiError> {
        let mut loaded: Vec<StoredNode> = Vec::new();
        for (identity, path, file) in self.node_files()? {
            if let Some(existing) = loaded.iter().find(|n| n.identity == identity) {
                tracing::warn!(
                    "Duplicate node {} at {}; keeping {}",
                    identity,
                    file.display(),
                    existing.file.display()
                );
                continue;
            }
            match Self::load(identity, path, file) {
                Ok(node) => loaded.push(node),
                Err(e) => {
                    tracing::error!("Skipping unreadable node record: {}", e);
                    continue;
                }
            }
        }
        Ok(loaded)
    }

    fn find(&self, identity: &str) -> Result<Option<StoredNode>, ApiError> {
        let found = self
            .node_files()?
            .into_iter()
            .find(|(name, _, _)| name == identity);
        match found {
            Some((identity, path, file)) => Self::load(identity, path, file).map(Some),
            None => Ok(None),
        }
    }

    fn file_for(&self, identity: &str, path: &str) -> PathBuf {
        let dir = if path.is_empty() {
            self.nodes_dir.clone()
        } else {
            self.nodes_dir.join(path)
        };
        dir.join(format!("{}.{}", identity, NODE_FILE_EXTENSION))
    }

    fn save(
        &self,
        identity: &str,
        path: &str,
        document: &InventoryDocument,
    ) -> Result<PathBuf, ApiError> {
        let file = self.file_for(identity, path);
        if let Some(dir) = file.parent() {
            std::fs::create_dir_all(dir).map_err(|e| StorageError::io(dir, e))?;
        }

        let content = document
            .to_yaml_string()
            .map_err(|e| StorageError::yaml(&file, e))?;
        std::fs::write(&file, content).map_err(|e| StorageError::io(&file, e))?;
        Ok(file)
    }

    fn delete(&self, identity: &str, path: &str) -> Result<bool, ApiError> {
        let file = self.file_for(identity, path);
        match std::fs::remove_file(&file) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::io(&file, e).into()),
        }
    }
}
