//! Override repository port and adapters.

pub mod contract;
pub mod yaml;

pub use contract::{OverrideRepository, OverrideScope, DEFAULT_OVERRIDE_FILE};
pub use yaml::YamlOverrideRepository;
