//! Classification Engine: evaluate every rule, aggregate what matched, and
//! persist the result through the node and cluster stores.

use crate::classify::request::{
    ClassificationRequest, ClassificationResult, ClusterParamOutcome, ClusterParamResult,
};
use crate::classify::rule::{ClassMapping, Generated};
use crate::cluster::{ClusterMetadataStore, OverrideScope};
use crate::config::ClassificationConfig;
use crate::error::ApiError;
use crate::node::{NodeMetadataStore, NodeSpec};
use crate::types::{string_entries, strip_reserved, Attributes};
use std::sync::Arc;

/// Aggregate the output of every matching rule, in rule order.
///
/// Classes are concatenated keeping the first occurrence of each name.
/// Parameters are last-write-wins per key across matching rules.
pub fn evaluate_rules(attributes: &Attributes, mapping: &ClassMapping) -> Result<Generated, ApiError> {
    let mut aggregate = Generated::default();
    for rule in mapping.rules() {
        if !rule.matches(attributes)? {
            tracing::debug!(rule = %rule.name, "Rule did not match");
            continue;
        }
        tracing::debug!(rule = %rule.name, "Rule matched");

        let generated = rule.generate(attributes)?;
        for class in generated.classes {
            if !aggregate.classes.contains(&class) {
                aggregate.classes.push(class);
            }
        }
        for (key, value) in generated.node_parameters {
            aggregate.node_parameters.insert(key, value);
        }
        for (key, value) in generated.cluster_parameters {
            aggregate.cluster_parameters.insert(key, value);
        }
    }
    Ok(aggregate)
}

/// Classifies nodes against a class mapping and records the outcome.
pub struct Classifier {
    nodes: Arc<NodeMetadataStore>,
    clusters: Arc<ClusterMetadataStore>,
    config: ClassificationConfig,
}

impl Classifier {
    pub fn new(
        nodes: Arc<NodeMetadataStore>,
        clusters: Arc<ClusterMetadataStore>,
        config: ClassificationConfig,
    ) -> Self {
        Self {
            nodes,
            clusters,
            config,
        }
    }

    pub fn config(&self) -> &ClassificationConfig {
        &self.config
    }

    pub fn classify_request(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassificationResult, ApiError> {
        self.classify(
            &request.node_identity,
            &request.node_attributes,
            &request.rule_mapping,
        )
    }

    /// Classify `identity`.
    ///
    /// The node record is created under the generated-nodes path only when at
    /// least one class was produced; an existing node is returned as is.
    /// Cluster parameters are written one by one and each write reports its
    /// own outcome. Nothing is rolled back on failure.
    pub fn classify(
        &self,
        identity: &str,
        attributes: &Attributes,
        mapping: &ClassMapping,
    ) -> Result<ClassificationResult, ApiError> {
        let attributes = strip_reserved(attributes, &self.config.reserved_prefix);
        tracing::info!(node = identity, rules = mapping.len(), "Classifying node");

        let generated = evaluate_rules(&attributes, mapping)?;

        let node = if generated.classes.is_empty() {
            tracing::debug!(node = identity, "No classes generated; node left untouched");
            None
        } else {
            let spec = NodeSpec::new(identity)
                .with_path(self.config.generated_path.clone())
                .with_cluster(self.config.default_cluster.clone())
                .with_environment(self.config.default_environment.clone())
                .with_classes(generated.classes.clone())
                .with_parameters(generated.node_parameters.clone());
            Some(self.nodes.create(&spec)?)
        };

        let scope = OverrideScope::new(self.config.cluster.clone(), self.config.override_file.clone());
        let mut cluster_results = Vec::with_capacity(generated.cluster_parameters.len());
        for (name, value) in string_entries(&generated.cluster_parameters) {
            let outcome = match self.clusters.set(name, value.clone(), &scope) {
                Ok(outcome) => ClusterParamOutcome::Applied(outcome),
                Err(e) => {
                    tracing::error!(parameter = %name, "Failed to set cluster parameter: {}", e);
                    ClusterParamOutcome::Failed(e.to_string())
                }
            };
            cluster_results.push(ClusterParamResult {
                name: name.to_string(),
                outcome,
            });
        }

        Ok(ClassificationResult {
            node,
            classes: generated.classes,
            node_parameters: generated.node_parameters,
            cluster_parameters: generated.cluster_parameters,
            cluster_results,
        })
    }
}
