use reclass_meta::config::ClassificationConfig;
use reclass_meta::types::Attributes;
use reclass_meta::Inventory;
use serde_yaml::Value;
use std::path::Path;
use tempfile::TempDir;
use walkdir::WalkDir;

pub fn inventory(temp: &TempDir) -> Inventory {
    inventory_with(temp, ClassificationConfig::default())
}

pub fn inventory_with(temp: &TempDir, config: ClassificationConfig) -> Inventory {
    Inventory::open(
        temp.path().join("nodes"),
        temp.path().join("classes"),
        config,
    )
}

pub fn attrs(pairs: &[(&str, &str)]) -> Attributes {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), Value::from(*v)))
        .collect()
}

pub fn classes(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Every regular file below `root`, relative to it.
pub fn files_under(root: &Path) -> Vec<String> {
    if !root.exists() {
        return Vec::new();
    }
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            entry
                .path()
                .strip_prefix(root)
                .ok()
                .map(|p| p.to_string_lossy().into_owned())
        })
        .collect()
}
