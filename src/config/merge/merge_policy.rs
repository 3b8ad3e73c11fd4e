//! Built-in defaults, the lowest precedence layer.

use crate::config::ReclassConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let defaults = ReclassConfig::default();
    Config::builder()
        .set_default(
            "storage.nodes_dir",
            defaults.storage.nodes_dir.to_string_lossy().into_owned(),
        )?
        .set_default(
            "storage.classes_dir",
            defaults.storage.classes_dir.to_string_lossy().into_owned(),
        )?
        .set_default(
            "classification.generated_path",
            defaults.classification.generated_path,
        )?
        .set_default(
            "classification.reserved_prefix",
            defaults.classification.reserved_prefix,
        )?
        .set_default(
            "classification.override_file",
            defaults.classification.override_file,
        )?
        .set_default("logging.level", defaults.logging.level)?
        .set_default("logging.format", defaults.logging.format)?
        .set_default("logging.output", defaults.logging.output)
}
