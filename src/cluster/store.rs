//! Cluster Metadata Store: flat override parameters per cluster file.

use crate::cluster::repository::{OverrideRepository, OverrideScope};
use crate::concurrency::KeyedLockManager;
use crate::error::ApiError;
use crate::types::Parameters;
use serde::Serialize;
use serde_yaml::Value;
use std::sync::Arc;

/// Outcome of setting one override parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SetOutcome {
    Created { value: Value },
    /// The stored value already equals the requested one; nothing was written.
    Unchanged { value: Value },
    Updated { old: Value, new: Value },
}

impl SetOutcome {
    pub fn changed(&self) -> bool {
        !matches!(self, SetOutcome::Unchanged { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RemoveOutcome {
    Deleted { old: Value },
    NotFound,
}

pub struct ClusterMetadataStore {
    repository: Arc<dyn OverrideRepository>,
    locks: KeyedLockManager,
}

impl ClusterMetadataStore {
    pub fn new(repository: Arc<dyn OverrideRepository>) -> Self {
        Self {
            repository,
            locks: KeyedLockManager::new(),
        }
    }

    fn lock_key(&self, scope: &OverrideScope) -> String {
        self.repository.file_for(scope).to_string_lossy().into_owned()
    }

    /// All override parameters in `scope`; empty when the file does not exist.
    pub fn list(&self, scope: &OverrideScope) -> Result<Parameters, ApiError> {
        scope.validate()?;
        let lock = self.locks.get_lock(&self.lock_key(scope));
        let _guard = lock.read();
        Ok(self
            .repository
            .load(scope)?
            .map(|document| document.params())
            .unwrap_or_default())
    }

    pub fn get(&self, name: &str, scope: &OverrideScope) -> Result<Option<Value>, ApiError> {
        Ok(self.list(scope)?.get(name).cloned())
    }

    pub fn set(
        &self,
        name: &str,
        value: Value,
        scope: &OverrideScope,
    ) -> Result<SetOutcome, ApiError> {
        scope.validate()?;
        let lock = self.locks.get_lock(&self.lock_key(scope));
        let _guard = lock.write();

        let mut document = self.repository.load(scope)?.unwrap_or_default();
        let params = document.params_mut();
        let key = Value::from(name);

        let outcome = match params.get(&key) {
            Some(old) if *old == value => {
                tracing::debug!(parameter = name, "Cluster parameter already in correct state");
                return Ok(SetOutcome::Unchanged { value });
            }
            Some(old) => SetOutcome::Updated {
                old: old.clone(),
                new: value.clone(),
            },
            None => SetOutcome::Created {
                value: value.clone(),
            },
        };
        params.insert(key, value);

        let file = self.repository.save(scope, &document)?;
        tracing::info!(parameter = name, file = %file.display(), "Set cluster parameter");
        Ok(outcome)
    }

    pub fn delete(&self, name: &str, scope: &OverrideScope) -> Result<RemoveOutcome, ApiError> {
        scope.validate()?;
        let lock = self.locks.get_lock(&self.lock_key(scope));
        let _guard = lock.write();

        let mut document = match self.repository.load(scope)? {
            Some(document) => document,
            None => return Ok(RemoveOutcome::NotFound),
        };
        let old = match document.params_mut().remove(name) {
            Some(old) => old,
            None => return Ok(RemoveOutcome::NotFound),
        };

        let file = self.repository.save(scope, &document)?;
        tracing::info!(parameter = name, file = %file.display(), "Deleted cluster parameter");
        Ok(RemoveOutcome::Deleted { old })
    }
}
