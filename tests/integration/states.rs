use super::support::{classes, inventory};
use reclass_meta::state::{cluster_meta_absent, cluster_meta_present, node_absent, node_present};
use reclass_meta::{NodeSpec, OverrideScope};
use serde_yaml::Value;
use tempfile::TempDir;

#[test]
fn test_node_states_round_trip() {
    let temp = TempDir::new().unwrap();
    let inventory = inventory(&temp);
    let spec = NodeSpec::new("cfg01.lab.local")
        .with_path("_generated")
        .with_classes(classes(&["system.salt.master"]));

    let created = node_present(inventory.nodes(), &spec);
    assert!(created.result);
    assert!(created.has_changes());
    assert!(!node_present(inventory.nodes(), &spec).has_changes());

    let removed = node_absent(inventory.nodes(), "cfg01.lab.local");
    assert!(removed.has_changes());
    assert!(inventory.nodes().get("cfg01.lab.local").unwrap().is_none());
}

#[test]
fn test_cluster_meta_states() {
    let temp = TempDir::new().unwrap();
    let inventory = inventory(&temp);
    let scope = OverrideScope::default();

    let first = cluster_meta_present(inventory.clusters(), "dns", Value::from("1.1.1.1"), &scope);
    assert!(first.result && first.has_changes());
    let second = cluster_meta_present(inventory.clusters(), "dns", Value::from("1.1.1.1"), &scope);
    assert!(second.result && !second.has_changes());

    assert!(cluster_meta_absent(inventory.clusters(), "dns", &scope).has_changes());
    assert!(!cluster_meta_absent(inventory.clusters(), "dns", &scope).has_changes());
}
