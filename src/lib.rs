//! Reclass Meta: node classification and metadata management
//!
//! Maintains a reclass-style YAML inventory. Nodes are classified by
//! evaluating rule mappings against their attributes; the generated classes
//! and parameters are persisted as node records and cluster overrides.

pub mod classify;
pub mod cluster;
pub mod concurrency;
pub mod config;
pub mod document;
pub mod error;
pub mod inventory;
pub mod logging;
pub mod netutils;
pub mod node;
pub mod state;
pub mod template;
pub mod types;

pub use classify::{ClassMapping, ClassificationRequest, ClassificationResult, Classifier};
pub use cluster::{ClusterMetadataStore, OverrideScope};
pub use error::ApiError;
pub use inventory::Inventory;
pub use node::{NodeMetadataStore, NodeRecord, NodeSpec};
