//! Inventory: wires the YAML repositories, stores and classifier for one
//! inventory root.

use crate::classify::{ClassificationRequest, ClassificationResult, Classifier};
use crate::cluster::{ClusterMetadataStore, OverrideScope, YamlOverrideRepository};
use crate::config::{ClassificationConfig, ReclassConfig};
use crate::error::ApiError;
use crate::node::{NodeMetadataStore, YamlNodeRepository};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct Inventory {
    nodes_dir: PathBuf,
    classes_dir: PathBuf,
    nodes: Arc<NodeMetadataStore>,
    clusters: Arc<ClusterMetadataStore>,
    classifier: Classifier,
}

impl Inventory {
    /// Open the inventory described by `config`; relative directories are
    /// resolved against `root`.
    pub fn from_config(config: &ReclassConfig, root: &Path) -> Self {
        let (nodes_dir, classes_dir) = config.storage.resolve_paths(root);
        Self::open(nodes_dir, classes_dir, config.classification.clone())
    }

    pub fn open(
        nodes_dir: impl Into<PathBuf>,
        classes_dir: impl Into<PathBuf>,
        classification: ClassificationConfig,
    ) -> Self {
        let nodes_dir = nodes_dir.into();
        let classes_dir = classes_dir.into();
        let nodes = Arc::new(NodeMetadataStore::new(Arc::new(YamlNodeRepository::new(
            &nodes_dir,
        ))));
        let clusters = Arc::new(ClusterMetadataStore::new(Arc::new(
            YamlOverrideRepository::new(&classes_dir),
        )));
        let classifier = Classifier::new(nodes.clone(), clusters.clone(), classification);
        tracing::debug!(
            nodes_dir = %nodes_dir.display(),
            classes_dir = %classes_dir.display(),
            "Opened inventory"
        );
        Self {
            nodes_dir,
            classes_dir,
            nodes,
            clusters,
            classifier,
        }
    }

    pub fn nodes_dir(&self) -> &Path {
        &self.nodes_dir
    }

    pub fn classes_dir(&self) -> &Path {
        &self.classes_dir
    }

    pub fn nodes(&self) -> &NodeMetadataStore {
        &self.nodes
    }

    pub fn clusters(&self) -> &ClusterMetadataStore {
        &self.clusters
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Override scope cluster parameters from classification are written to.
    pub fn classification_scope(&self) -> OverrideScope {
        let config = self.classifier.config();
        OverrideScope::new(config.cluster.clone(), config.override_file.clone())
    }

    pub fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassificationResult, ApiError> {
        self.classifier.classify_request(request)
    }
}
