//! Node metadata: records, persistence, and the store that owns their semantics.

pub mod record;
pub mod repository;
pub mod store;

pub use record::{new_node_document, NodeRecord};
pub use repository::{NodeRepository, StoredNode, YamlNodeRepository};
pub use store::{CreateOutcome, DeleteOutcome, NodeMetadataStore, NodeSpec};
