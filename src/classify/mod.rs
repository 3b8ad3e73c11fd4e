//! Dynamic node classification.
//!
//! A class mapping is a set of named rules. Each rule carries an expression
//! evaluated against node attributes and generators for the classes, node
//! parameters and cluster parameters it contributes when it matches.

pub mod condition;
pub mod engine;
pub mod request;
pub mod rule;

pub use condition::{evaluate_condition, Expression, Operator};
pub use engine::{evaluate_rules, Classifier};
pub use request::{ClassificationRequest, ClassificationResult, ClusterParamOutcome};
pub use rule::{ClassGenerator, ClassMapping, ClassMappingRule, Generated, ParamGenerator};
