use super::support::{classes, files_under, inventory};
use reclass_meta::node::DeleteOutcome;
use reclass_meta::types::Parameters;
use reclass_meta::{ApiError, NodeSpec};
use serde_yaml::Value;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

#[test]
fn test_create_twice_yields_same_record() {
    let temp = TempDir::new().unwrap();
    let inventory = inventory(&temp);
    let spec = NodeSpec::new("db01.example.com")
        .with_cluster("core")
        .with_environment("stg")
        .with_classes(classes(&["role.db"]));

    let first = inventory.nodes().create(&spec).unwrap();
    let second = inventory.nodes().create(&spec).unwrap();
    assert_eq!(first.record(), second.record());
    assert_eq!(first.record().cluster, "core");
    assert_eq!(first.record().environment, "stg");
}

#[test]
fn test_update_never_duplicates_classes() {
    let temp = TempDir::new().unwrap();
    let inventory = inventory(&temp);
    inventory.nodes().create(&NodeSpec::new("web01")).unwrap();

    inventory
        .nodes()
        .update("web01", Some(&classes(&["a"])), None)
        .unwrap();
    let record = inventory
        .nodes()
        .update("web01", Some(&classes(&["a", "b"])), None)
        .unwrap();
    assert_eq!(record.classes, classes(&["a", "b"]));
}

#[test]
fn test_node_file_layout() {
    let temp = TempDir::new().unwrap();
    let inventory = inventory(&temp);
    let mut params = Parameters::new();
    params.insert(Value::from("port"), Value::from(5432));
    inventory
        .nodes()
        .create(
            &NodeSpec::new("db01.example.com")
                .with_path("site/a")
                .with_classes(classes(&["role.db"]))
                .with_parameters(params),
        )
        .unwrap();

    let file = temp.path().join("nodes/site/a/db01.example.com.yml");
    let document: Value = serde_yaml::from_str(&std::fs::read_to_string(file).unwrap()).unwrap();
    assert_eq!(document["classes"][0], Value::from("role.db"));
    assert_eq!(document["parameters"]["_param"]["port"], Value::from(5432));
    let system = &document["parameters"]["linux"]["system"];
    assert_eq!(system["name"], Value::from("db01"));
    assert_eq!(system["domain"], Value::from("example.com"));
    assert_eq!(system["cluster"], Value::from("default"));
    assert_eq!(system["environment"], Value::from("prd"));
}

#[test]
fn test_list_skips_foreign_files() {
    let temp = TempDir::new().unwrap();
    let inventory = inventory(&temp);
    inventory.nodes().create(&NodeSpec::new("a")).unwrap();
    std::fs::write(temp.path().join("nodes/README.md"), "notes").unwrap();

    let records = inventory.nodes().list().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].identity, "a");
}

#[test]
fn test_delete_removes_file() {
    let temp = TempDir::new().unwrap();
    let inventory = inventory(&temp);
    inventory.nodes().create(&NodeSpec::new("web01")).unwrap();

    let outcome = inventory.nodes().delete("web01").unwrap();
    assert!(matches!(outcome, DeleteOutcome::Deleted { .. }));
    assert!(files_under(&temp.path().join("nodes")).is_empty());
    assert!(matches!(
        inventory.nodes().update("web01", None, None),
        Err(ApiError::NotFound(_))
    ));
}

#[test]
fn test_concurrent_updates_keep_every_class() {
    let temp = TempDir::new().unwrap();
    let inventory = Arc::new(inventory(&temp));
    inventory.nodes().create(&NodeSpec::new("web01")).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let inventory = inventory.clone();
            thread::spawn(move || {
                inventory
                    .nodes()
                    .update("web01", Some(&[format!("class.{}", i)]), None)
                    .unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let record = inventory.nodes().get("web01").unwrap().unwrap();
    assert_eq!(record.classes.len(), 8);
}
