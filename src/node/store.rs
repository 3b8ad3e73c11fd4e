//! Node Metadata Store: get, create, update, delete and list node records.

use crate::concurrency::KeyedLockManager;
use crate::error::ApiError;
use crate::node::record::{new_node_document, NodeRecord};
use crate::node::repository::NodeRepository;
use crate::types::{
    string_entries, validate_identity, validate_path, Parameters, DEFAULT_CLUSTER,
    DEFAULT_ENVIRONMENT,
};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments of a node creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub identity: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default = "default_cluster")]
    pub cluster: String,
    #[serde(default = "default_environment")]
    pub environment: String,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub parameters: Parameters,
}

fn default_cluster() -> String {
    DEFAULT_CLUSTER.to_string()
}

fn default_environment() -> String {
    DEFAULT_ENVIRONMENT.to_string()
}

impl NodeSpec {
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            path: None,
            cluster: default_cluster(),
            environment: default_environment(),
            classes: Vec::new(),
            parameters: Parameters::new(),
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.cluster = cluster.into();
        self
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    pub fn with_classes(mut self, classes: Vec<String>) -> Self {
        self.classes = classes;
        self
    }

    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }
}

/// Result of a create: the record either was written now or already existed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "node", rename_all = "snake_case")]
pub enum CreateOutcome {
    Created(NodeRecord),
    Existing(NodeRecord),
}

impl CreateOutcome {
    pub fn record(&self) -> &NodeRecord {
        match self {
            CreateOutcome::Created(record) | CreateOutcome::Existing(record) => record,
        }
    }

    pub fn into_record(self) -> NodeRecord {
        match self {
            CreateOutcome::Created(record) | CreateOutcome::Existing(record) => record,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, CreateOutcome::Created(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeleteOutcome {
    Deleted { identity: String, file: PathBuf },
    NotFound { identity: String },
}

/// Node store over a repository port, serializing writes per node identity.
pub struct NodeMetadataStore {
    repository: Arc<dyn NodeRepository>,
    locks: KeyedLockManager,
}

impl NodeMetadataStore {
    pub fn new(repository: Arc<dyn NodeRepository>) -> Self {
        Self {
            repository,
            locks: KeyedLockManager::new(),
        }
    }

    pub fn get(&self, identity: &str) -> Result<Option<NodeRecord>, ApiError> {
        let lock = self.locks.get_lock(identity);
        let _guard = lock.read();
        Ok(self
            .repository
            .find(identity)?
            .map(|stored| NodeRecord::from_document(&stored.identity, &stored.path, &stored.document)))
    }

    pub fn list(&self) -> Result<Vec<NodeRecord>, ApiError> {
        Ok(self
            .repository
            .list()?
            .iter()
            .map(|stored| NodeRecord::from_document(&stored.identity, &stored.path, &stored.document))
            .collect())
    }

    /// Create a node unless one with the same identity exists anywhere in the
    /// inventory, in which case the existing record is returned untouched.
    pub fn create(&self, spec: &NodeSpec) -> Result<CreateOutcome, ApiError> {
        validate_identity(&spec.identity)?;
        let path = spec.path.as_deref().unwrap_or("");
        validate_path(path)?;

        let lock = self.locks.get_lock(&spec.identity);
        let _guard = lock.write();

        if let Some(stored) = self.repository.find(&spec.identity)? {
            tracing::debug!("Node {} exists at {}", spec.identity, stored.file.display());
            return Ok(CreateOutcome::Existing(NodeRecord::from_document(
                &stored.identity,
                &stored.path,
                &stored.document,
            )));
        }

        let document = new_node_document(
            &spec.identity,
            &spec.cluster,
            &spec.environment,
            &spec.classes,
            &spec.parameters,
        );
        let file = self.repository.save(&spec.identity, path, &document)?;
        tracing::info!(node = %spec.identity, file = %file.display(), "Created node");

        Ok(CreateOutcome::Created(NodeRecord::from_document(
            &spec.identity,
            path,
            &document,
        )))
    }

    /// Merge classes and parameters into an existing node.
    ///
    /// Classes are appended when not already present; parameters overwrite
    /// per key. The record stays at its current path.
    pub fn update(
        &self,
        identity: &str,
        classes: Option<&[String]>,
        parameters: Option<&Parameters>,
    ) -> Result<NodeRecord, ApiError> {
        let lock = self.locks.get_lock(identity);
        let _guard = lock.write();

        let mut stored = self
            .repository
            .find(identity)?
            .ok_or_else(|| ApiError::NotFound(format!("Node {} not found", identity)))?;

        let mut changed = false;
        for class in classes.unwrap_or_default() {
            if !stored.document.classes.contains(class) {
                stored.document.classes.push(class.clone());
                changed = true;
            }
        }

        if let Some(parameters) = parameters {
            let params = stored.document.params_mut();
            for (key, value) in string_entries(parameters) {
                let key = Value::from(key);
                if params.get(&key) != Some(value) {
                    params.insert(key, value.clone());
                    changed = true;
                }
            }
        }

        if changed {
            self.repository
                .save(&stored.identity, &stored.path, &stored.document)?;
            tracing::info!(node = %identity, "Updated node");
        } else {
            tracing::debug!(node = %identity, "Node already up to date");
        }

        Ok(NodeRecord::from_document(
            &stored.identity,
            &stored.path,
            &stored.document,
        ))
    }

    pub fn delete(&self, identity: &str) -> Result<DeleteOutcome, ApiError> {
        let lock = self.locks.get_lock(identity);
        let _guard = lock.write();

        let stored = match self.repository.find(identity)? {
            Some(stored) => stored,
            None => {
                return Ok(DeleteOutcome::NotFound {
                    identity: identity.to_string(),
                })
            }
        };

        if !self.repository.delete(&stored.identity, &stored.path)? {
            return Ok(DeleteOutcome::NotFound {
                identity: identity.to_string(),
            });
        }
        tracing::info!(node = %identity, file = %stored.file.display(), "Deleted node");
        Ok(DeleteOutcome::Deleted {
            identity: identity.to_string(),
            file: stored.file,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::repository::YamlNodeRepository;
    use tempfile::TempDir;

    fn store(temp: &TempDir) -> NodeMetadataStore {
        NodeMetadataStore::new(Arc::new(YamlNodeRepository::new(temp.path())))
    }

    fn classes(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_create_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        let spec = NodeSpec::new("web01.example.com").with_classes(classes(&["role.web"]));

        let first = store.create(&spec).unwrap();
        assert!(first.was_created());
        let second = store.create(&spec).unwrap();
        assert!(!second.was_created());
        assert_eq!(first.record(), second.record());
    }

    #[test]
    fn test_create_never_overwrites() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        store
            .create(&NodeSpec::new("web01").with_classes(classes(&["a"])))
            .unwrap();
        let outcome = store
            .create(&NodeSpec::new("web01").with_classes(classes(&["b"])).with_path("other"))
            .unwrap();
        assert_eq!(outcome.record().classes, classes(&["a"]));
        assert_eq!(outcome.record().path, "");
    }

    #[test]
    fn test_update_appends_classes_without_duplicates() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        store.create(&NodeSpec::new("web01")).unwrap();

        store.update("web01", Some(&classes(&["a"])), None).unwrap();
        let record = store
            .update("web01", Some(&classes(&["a", "b"])), None)
            .unwrap();
        assert_eq!(record.classes, classes(&["a", "b"]));
        assert_eq!(store.get("web01").unwrap().unwrap().classes, classes(&["a", "b"]));
    }

    #[test]
    fn test_update_merges_parameters() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        let mut initial = Parameters::new();
        initial.insert(Value::from("keep"), Value::from(1));
        initial.insert(Value::from("change"), Value::from("old"));
        store
            .create(&NodeSpec::new("web01").with_cluster("edge").with_parameters(initial))
            .unwrap();

        let mut patch = Parameters::new();
        patch.insert(Value::from("change"), Value::from("new"));
        patch.insert(Value::from("added"), Value::from(true));
        let record = store.update("web01", None, Some(&patch)).unwrap();

        assert_eq!(record.parameters.get("keep"), Some(&Value::from(1)));
        assert_eq!(record.parameters.get("change"), Some(&Value::from("new")));
        assert_eq!(record.parameters.get("added"), Some(&Value::from(true)));
        assert_eq!(record.cluster, "edge");
    }

    #[test]
    fn test_update_preserves_unmanaged_keys() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        std::fs::write(
            temp.path().join("web01.yml"),
            "classes: [a]\napplications: [nginx]\nenvironment: base\nparameters:\n  linux:\n    system:\n      cluster: edge\n",
        )
        .unwrap();

        store.update("web01", Some(&classes(&["b"])), None).unwrap();

        let written: Value =
            serde_yaml::from_str(&std::fs::read_to_string(temp.path().join("web01.yml")).unwrap())
                .unwrap();
        assert_eq!(written["classes"], Value::from(vec!["a", "b"]));
        assert_eq!(written["applications"][0], Value::from("nginx"));
        assert_eq!(written["environment"], Value::from("base"));
        assert_eq!(
            written["parameters"]["linux"]["system"]["cluster"],
            Value::from("edge")
        );
    }

    #[test]
    fn test_update_missing_node_is_not_found() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        assert!(matches!(
            store.update("ghost", None, None),
            Err(ApiError::NotFound(_))
        ));
    }

    #[test]
    fn test_update_keeps_path() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        store
            .create(&NodeSpec::new("web01").with_path("_generated"))
            .unwrap();
        let record = store.update("web01", Some(&classes(&["x"])), None).unwrap();
        assert_eq!(record.path, "_generated");
        assert!(temp.path().join("_generated/web01.yml").exists());
    }

    #[test]
    fn test_delete_then_not_found() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        store
            .create(&NodeSpec::new("web01").with_path("site"))
            .unwrap();

        assert!(matches!(
            store.delete("web01").unwrap(),
            DeleteOutcome::Deleted { .. }
        ));
        assert!(!temp.path().join("site/web01.yml").exists());
        assert!(matches!(
            store.delete("web01").unwrap(),
            DeleteOutcome::NotFound { .. }
        ));
        assert!(store.get("web01").unwrap().is_none());
    }

    #[test]
    fn test_invalid_identity_rejected() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        assert!(matches!(
            store.create(&NodeSpec::new("../escape")),
            Err(ApiError::InvalidIdentity(_))
        ));
        assert!(matches!(
            store.create(&NodeSpec::new("web01").with_path("../up")),
            Err(ApiError::InvalidIdentity(_))
        ));
    }

    #[test]
    fn test_list() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        store.create(&NodeSpec::new("a.example.com")).unwrap();
        store
            .create(&NodeSpec::new("b.example.com").with_path("_generated"))
            .unwrap();
        let identities: Vec<String> = store.list().unwrap().into_iter().map(|r| r.identity).collect();
        assert_eq!(identities.len(), 2);
        assert!(identities.contains(&"a.example.com".to_string()));
        assert!(identities.contains(&"b.example.com".to_string()));
    }
}
