//! Global config file source: `$XDG_CONFIG_HOME/reclass-meta/config.{toml,yaml,...}`

use crate::config::xdg;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};

/// Add the optional global config file to builder.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    match xdg::global_config_stem() {
        Ok(stem) => {
            let name = stem.to_string_lossy().into_owned();
            Ok(builder.add_source(File::with_name(&name).required(false)))
        }
        Err(e) => {
            tracing::debug!("Skipping global config file: {}", e);
            Ok(builder)
        }
    }
}
