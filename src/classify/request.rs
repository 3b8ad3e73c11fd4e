//! Request and response shapes of a classification call.

use crate::classify::rule::ClassMapping;
use crate::cluster::SetOutcome;
use crate::error::ApiError;
use crate::node::CreateOutcome;
use crate::types::{Attributes, Parameters};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRequest {
    #[serde(alias = "node_name")]
    pub node_identity: String,
    #[serde(default, alias = "node_data")]
    pub node_attributes: Attributes,
    #[serde(alias = "class_mapping")]
    pub rule_mapping: ClassMapping,
}

impl ClassificationRequest {
    pub fn from_json(content: &str) -> Result<Self, ApiError> {
        serde_json::from_str(content).map_err(|e| {
            ApiError::MalformedRule(format!("Failed to parse classification request: {}", e))
        })
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ApiError> {
        serde_yaml::from_str(content).map_err(|e| {
            ApiError::MalformedRule(format!("Failed to parse classification request: {}", e))
        })
    }
}

/// Per-key result of writing a cluster parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterParamOutcome {
    Applied(SetOutcome),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterParamResult {
    pub name: String,
    pub outcome: ClusterParamOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassificationResult {
    /// `None` when no rule contributed a class and no node write was attempted.
    pub node: Option<CreateOutcome>,
    pub classes: Vec<String>,
    pub node_parameters: Parameters,
    pub cluster_parameters: Parameters,
    pub cluster_results: Vec<ClusterParamResult>,
}

impl ClassificationResult {
    pub fn node_created(&self) -> bool {
        self.node.as_ref().map(CreateOutcome::was_created).unwrap_or(false)
    }

    pub fn to_json(&self) -> Result<String, ApiError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ApiError::ConfigError(format!("Failed to serialize result: {}", e)))
    }
}
