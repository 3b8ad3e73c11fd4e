//! Core types shared by the classification engine and the metadata stores.

use crate::error::ApiError;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::{Component, Path};

/// Flat attribute mapping describing a node (grains, facts, caller data).
pub type Attributes = BTreeMap<String, Value>;

/// Parameter mapping; insertion ordered.
pub type Parameters = serde_yaml::Mapping;

/// Private parameter namespace inside a node or override document.
pub const PARAM_NAMESPACE: &str = "_param";

/// Default cluster for nodes created without one.
pub const DEFAULT_CLUSTER: &str = "default";

/// Default environment for nodes created without one.
pub const DEFAULT_ENVIRONMENT: &str = "prd";

/// Attribute keys starting with this marker are internal and never reach rules.
pub const RESERVED_ATTRIBUTE_PREFIX: &str = "__";

/// Split a node identity into `(host_name, domain)` on the first `.`.
pub fn split_identity(identity: &str) -> (String, String) {
    match identity.split_once('.') {
        Some((host, domain)) => (host.to_string(), domain.to_string()),
        None => (identity.to_string(), String::new()),
    }
}

/// Reject identities that cannot name a single record file.
pub fn validate_identity(identity: &str) -> Result<(), ApiError> {
    if identity.trim().is_empty() {
        return Err(ApiError::InvalidIdentity(
            "Node identity cannot be empty".to_string(),
        ));
    }
    if identity == "." || identity == ".." || identity.contains(&['/', '\\'][..]) {
        return Err(ApiError::InvalidIdentity(format!(
            "Node identity '{}' must not contain path separators",
            identity
        )));
    }
    Ok(())
}

/// Reject path overrides that would escape the nodes directory.
pub fn validate_path(path: &str) -> Result<(), ApiError> {
    let escapes = Path::new(path)
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(ApiError::InvalidIdentity(format!(
            "Node path '{}' must be relative and stay inside the nodes directory",
            path
        )));
    }
    Ok(())
}

/// Drop attributes whose key starts with `prefix`.
pub fn strip_reserved(attributes: &Attributes, prefix: &str) -> Attributes {
    attributes
        .iter()
        .filter(|(key, _)| prefix.is_empty() || !key.starts_with(prefix))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// String form of an attribute value as it appears in rendered templates.
///
/// Scalars render bare; sequences and mappings render as compact JSON.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Tagged(tagged) => value_to_string(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => serde_json::to_string(value)
            .unwrap_or_else(|_| {
                serde_yaml::to_string(value)
                    .map(|s| s.trim_end().to_string())
                    .unwrap_or_default()
            }),
    }
}

/// Look up a string-keyed entry of a YAML mapping.
pub fn mapping_get<'a>(mapping: &'a Parameters, key: &str) -> Option<&'a Value> {
    mapping.get(Value::String(key.to_string()))
}

/// Iterate the string-keyed entries of a YAML mapping, skipping other keys.
pub fn string_entries(mapping: &Parameters) -> impl Iterator<Item = (&str, &Value)> {
    mapping
        .iter()
        .filter_map(|(k, v)| k.as_str().map(|key| (key, v)))
}
