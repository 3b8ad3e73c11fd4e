//! Node repository port and adapters.

pub mod contract;
pub mod yaml;

pub use contract::{NodeRepository, StoredNode};
pub use yaml::YamlNodeRepository;
