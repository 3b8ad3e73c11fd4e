use super::support::inventory;
use reclass_meta::cluster::{RemoveOutcome, SetOutcome};
use reclass_meta::OverrideScope;
use serde_yaml::Value;
use tempfile::TempDir;

#[test]
fn test_set_reports_unchanged_then_updated() {
    let temp = TempDir::new().unwrap();
    let inventory = inventory(&temp);
    let scope = OverrideScope::cluster("edge");
    let clusters = inventory.clusters();

    assert!(clusters.set("k", Value::from("v1"), &scope).unwrap().changed());
    let again = clusters.set("k", Value::from("v1"), &scope).unwrap();
    assert!(!again.changed());
    assert_eq!(
        clusters.set("k", Value::from("v2"), &scope).unwrap(),
        SetOutcome::Updated {
            old: Value::from("v1"),
            new: Value::from("v2")
        }
    );
}

#[test]
fn test_override_file_shape() {
    let temp = TempDir::new().unwrap();
    let inventory = inventory(&temp);
    let scope = OverrideScope::new("edge", "site.yml");
    inventory
        .clusters()
        .set("ntp", Value::from("pool.ntp.org"), &scope)
        .unwrap();

    let file = temp.path().join("classes/cluster/edge/site.yml");
    let document: Value = serde_yaml::from_str(&std::fs::read_to_string(file).unwrap()).unwrap();
    assert_eq!(
        document["parameters"]["_param"]["ntp"],
        Value::from("pool.ntp.org")
    );
}

#[test]
fn test_scopes_are_independent() {
    let temp = TempDir::new().unwrap();
    let inventory = inventory(&temp);
    let lab = OverrideScope::cluster("lab");
    let prod = OverrideScope::cluster("prod");

    inventory.clusters().set("k", Value::from(1), &lab).unwrap();
    assert_eq!(inventory.clusters().get("k", &prod).unwrap(), None);
    assert_eq!(
        inventory.clusters().delete("k", &prod).unwrap(),
        RemoveOutcome::NotFound
    );
    assert_eq!(inventory.clusters().list(&lab).unwrap().len(), 1);
}
