//! Declarative state functions over the metadata stores.
//!
//! Each function drives the inventory toward a desired state and reports what
//! it did as a [`StateResult`]. Repeating a call with the same arguments
//! reports no changes. Failures are reported through `result: false` rather
//! than as errors so a batch of states can run to completion.

use crate::cluster::{ClusterMetadataStore, OverrideScope, RemoveOutcome, SetOutcome};
use crate::error::ApiError;
use crate::node::{CreateOutcome, DeleteOutcome, NodeMetadataStore, NodeSpec};
use serde::Serialize;
use serde_json::{json, Value as Json};
use serde_yaml::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateResult {
    pub name: String,
    pub result: bool,
    pub changes: Json,
    pub comment: String,
}

impl StateResult {
    fn unchanged(name: &str, comment: String) -> Self {
        Self {
            name: name.to_string(),
            result: true,
            changes: json!({}),
            comment,
        }
    }

    fn changed(name: &str, changes: Json, comment: String) -> Self {
        Self {
            name: name.to_string(),
            result: true,
            changes,
            comment,
        }
    }

    fn failed(name: &str, err: &ApiError) -> Self {
        tracing::warn!(state = name, error = %err, "State failed");
        Self {
            name: name.to_string(),
            result: false,
            changes: json!({}),
            comment: err.to_string(),
        }
    }

    pub fn has_changes(&self) -> bool {
        self.changes.as_object().map_or(false, |c| !c.is_empty())
    }
}

fn to_json<T: Serialize>(value: &T) -> Json {
    serde_json::to_value(value).unwrap_or(Json::Null)
}

/// Ensure the node exists and carries at least the given classes and parameters.
///
/// A missing node is created from `spec`. An existing node keeps its path,
/// cluster and environment; classes are appended and parameters merged.
pub fn node_present(store: &NodeMetadataStore, spec: &NodeSpec) -> StateResult {
    let name = spec.identity.as_str();
    let existing = match store.create(spec) {
        Ok(CreateOutcome::Created(record)) => {
            return StateResult::changed(
                name,
                json!({ "node": to_json(&record) }),
                format!("Node {} created", name),
            )
        }
        Ok(CreateOutcome::Existing(record)) => record,
        Err(err) => return StateResult::failed(name, &err),
    };

    let updated = match store.update(name, Some(&spec.classes), Some(&spec.parameters)) {
        Ok(record) => record,
        Err(err) => return StateResult::failed(name, &err),
    };

    if updated == existing {
        return StateResult::unchanged(name, format!("Node {} is already in correct state", name));
    }

    let mut changes = serde_json::Map::new();
    if updated.classes != existing.classes {
        changes.insert(
            "classes".to_string(),
            json!({ "old": existing.classes, "new": updated.classes }),
        );
    }
    if updated.parameters != existing.parameters {
        changes.insert(
            "parameters".to_string(),
            json!({ "old": to_json(&existing.parameters), "new": to_json(&updated.parameters) }),
        );
    }
    StateResult::changed(name, Json::Object(changes), format!("Node {} updated", name))
}

pub fn node_absent(store: &NodeMetadataStore, identity: &str) -> StateResult {
    match store.delete(identity) {
        Ok(DeleteOutcome::Deleted { file, .. }) => StateResult::changed(
            identity,
            json!({ "node": { "old": file.display().to_string(), "new": null } }),
            format!("Node {} deleted", identity),
        ),
        Ok(DeleteOutcome::NotFound { .. }) => {
            StateResult::unchanged(identity, format!("Node {} is already absent", identity))
        }
        Err(err) => StateResult::failed(identity, &err),
    }
}

pub fn cluster_meta_present(
    store: &ClusterMetadataStore,
    name: &str,
    value: Value,
    scope: &OverrideScope,
) -> StateResult {
    match store.set(name, value, scope) {
        Ok(SetOutcome::Created { value }) => StateResult::changed(
            name,
            json!({ name: to_json(&value) }),
            format!("Cluster parameter {} created", name),
        ),
        Ok(SetOutcome::Updated { old, new }) => StateResult::changed(
            name,
            json!({ "old": to_json(&old), "new": to_json(&new) }),
            format!("Cluster parameter {} updated", name),
        ),
        Ok(SetOutcome::Unchanged { .. }) => StateResult::unchanged(
            name,
            format!("Cluster parameter {} is already in correct state", name),
        ),
        Err(err) => StateResult::failed(name, &err),
    }
}

pub fn cluster_meta_absent(
    store: &ClusterMetadataStore,
    name: &str,
    scope: &OverrideScope,
) -> StateResult {
    match store.delete(name, scope) {
        Ok(RemoveOutcome::Deleted { old }) => StateResult::changed(
            name,
            json!({ "old": to_json(&old), "new": null }),
            format!("Cluster parameter {} deleted", name),
        ),
        Ok(RemoveOutcome::NotFound) => StateResult::unchanged(
            name,
            format!("Cluster parameter {} is already absent", name),
        ),
        Err(err) => StateResult::failed(name, &err),
    }
}
