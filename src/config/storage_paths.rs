//! StorageConfig and resolve_paths for inventory directories.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_nodes_dir() -> PathBuf {
    PathBuf::from("/srv/salt/reclass/nodes")
}

fn default_classes_dir() -> PathBuf {
    PathBuf::from("/srv/salt/reclass/classes")
}

/// Storage configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root of node records
    #[serde(default = "default_nodes_dir")]
    pub nodes_dir: PathBuf,

    /// Root of class files; cluster overrides live below `cluster/`
    #[serde(default = "default_classes_dir")]
    pub classes_dir: PathBuf,
}

impl StorageConfig {
    /// Resolve `(nodes_dir, classes_dir)`; relative paths are taken from `root`.
    pub fn resolve_paths(&self, root: &Path) -> (PathBuf, PathBuf) {
        let resolve = |p: &Path| {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                root.join(p)
            }
        };
        (resolve(&self.nodes_dir), resolve(&self.classes_dir))
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            nodes_dir: default_nodes_dir(),
            classes_dir: default_classes_dir(),
        }
    }
}
