//! On-disk shape shared by node files and cluster override files.
//!
//! Both are reclass documents: `{ classes: [..], parameters: { _param: {..}, ... } }`.
//! Only the `_param` namespace is managed here; every other key under
//! `parameters`, and every other top-level key, round-trips untouched.

use crate::types::{mapping_get, Parameters, PARAM_NAMESPACE};
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::{Mapping, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryDocument {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub classes: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub parameters: DocumentParameters,
    /// Top-level keys this crate does not manage (`applications`, `exports`, ...).
    #[serde(flatten)]
    pub extra: Mapping,
}

/// The `parameters` block: the managed `_param` namespace and everything else.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentParameters {
    #[serde(rename = "_param", default, deserialize_with = "mapping_or_empty")]
    pub param: Parameters,
    #[serde(flatten)]
    pub namespaces: Mapping,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A `_param` that is null or not a mapping reads as empty.
fn mapping_or_empty<'de, D>(deserializer: D) -> Result<Parameters, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Mapping(params) => Ok(params),
        _ => Ok(Parameters::new()),
    }
}

impl InventoryDocument {
    /// Parse a document; an empty file is an empty document.
    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    pub fn to_yaml_string(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Copy of the `_param` namespace.
    pub fn params(&self) -> Parameters {
        self.parameters.param.clone()
    }

    pub fn params_mut(&mut self) -> &mut Parameters {
        &mut self.parameters.param
    }

    /// Look up a nested string value, e.g. `["linux", "system", "cluster"]`.
    pub fn parameter_str(&self, path: &[&str]) -> Option<&str> {
        let (first, rest) = path.split_first()?;
        if *first == PARAM_NAMESPACE {
            let (second, rest) = rest.split_first()?;
            return lookup(mapping_get(&self.parameters.param, second)?, rest);
        }
        lookup(mapping_get(&self.parameters.namespaces, first)?, rest)
    }
}

fn lookup<'a>(mut current: &'a Value, path: &[&str]) -> Option<&'a str> {
    for key in path {
        current = match current {
            Value::Mapping(m) => mapping_get(m, key)?,
            _ => return None,
        };
    }
    current.as_str()
}
