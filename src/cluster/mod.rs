//! Cluster-level parameter overrides kept apart from any single node.

pub mod repository;
pub mod store;

pub use repository::{OverrideRepository, OverrideScope, YamlOverrideRepository};
pub use store::{ClusterMetadataStore, RemoveOutcome, SetOutcome};
