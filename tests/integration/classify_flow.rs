use super::support::{attrs, classes, files_under, inventory, inventory_with};
use reclass_meta::classify::ClusterParamOutcome;
use reclass_meta::cluster::SetOutcome;
use reclass_meta::config::ClassificationConfig;
use reclass_meta::{ApiError, ClassMapping, ClassificationRequest, OverrideScope};
use serde_yaml::Value;
use tempfile::TempDir;

const PROD_MAPPING: &str = r#"
r1:
  expression: env__equals__prod
  node_class:
    value: [role.web]
"#;

#[test]
fn test_matching_rule_creates_node() {
    let temp = TempDir::new().unwrap();
    let inventory = inventory(&temp);
    let mapping = ClassMapping::from_yaml_str(PROD_MAPPING).unwrap();

    let result = inventory
        .classifier()
        .classify("web01.example.com", &attrs(&[("env", "prod")]), &mapping)
        .unwrap();

    assert_eq!(result.classes, classes(&["role.web"]));
    assert!(result.node_created());
    let record = inventory.nodes().get("web01.example.com").unwrap().unwrap();
    assert_eq!(record.classes, classes(&["role.web"]));
    assert_eq!(record.path, "_generated");
    assert_eq!(record.host_name, "web01");
    assert_eq!(record.domain, "example.com");
    assert!(temp
        .path()
        .join("nodes/_generated/web01.example.com.yml")
        .exists());
}

#[test]
fn test_no_match_performs_no_writes() {
    let temp = TempDir::new().unwrap();
    let inventory = inventory(&temp);
    let mapping = ClassMapping::from_yaml_str(PROD_MAPPING).unwrap();

    let result = inventory
        .classifier()
        .classify("web01.example.com", &attrs(&[("env", "dev")]), &mapping)
        .unwrap();

    assert!(result.classes.is_empty());
    assert!(result.node_parameters.is_empty());
    assert!(result.cluster_parameters.is_empty());
    assert!(result.node.is_none());
    assert!(files_under(temp.path()).is_empty());
}

#[test]
fn test_existing_node_returned_unchanged() {
    let temp = TempDir::new().unwrap();
    let inventory = inventory(&temp);
    let first = ClassMapping::from_yaml_str(PROD_MAPPING).unwrap();
    let second = ClassMapping::from_yaml_str(
        "r2:\n  expression: all\n  node_class:\n    value: [role.db]\n",
    )
    .unwrap();

    inventory
        .classifier()
        .classify("web01", &attrs(&[("env", "prod")]), &first)
        .unwrap();
    let result = inventory
        .classifier()
        .classify("web01", &attrs(&[("env", "prod")]), &second)
        .unwrap();

    assert_eq!(result.classes, classes(&["role.db"]));
    assert!(!result.node_created());
    assert_eq!(
        result.node.unwrap().record().classes,
        classes(&["role.web"])
    );
}

#[test]
fn test_reserved_attributes_hidden_from_rules() {
    let temp = TempDir::new().unwrap();
    let inventory = inventory(&temp);
    let mapping = ClassMapping::from_yaml_str(
        "r1:\n  expression: all\n  node_param:\n    secret: { value_template: \"<<__pillar>>\" }\n",
    )
    .unwrap();

    let result = inventory
        .classifier()
        .classify("web01", &attrs(&[("__pillar", "hunter2")]), &mapping)
        .unwrap();
    assert_eq!(
        result.node_parameters.get("secret"),
        Some(&Value::from("<<__pillar>>"))
    );
    assert!(result.node.is_none());
}

#[test]
fn test_full_request_writes_node_and_cluster_params() {
    let temp = TempDir::new().unwrap();
    let config = ClassificationConfig {
        cluster: "lab".to_string(),
        ..ClassificationConfig::default()
    };
    let inventory = inventory_with(&temp, config);
    let request = ClassificationRequest::from_yaml_str(
        r#"
node_identity: web01.lab.local
node_attributes:
  role: web
  ip: 10.0.0.10
  __internal: skip
rule_mapping:
  web:
    expression: ["role__equals__web", "<<ip>>__startswith__10."]
    node_class:
      value_template: ["cluster.lab.<<role>>"]
      value: [system.linux]
    node_param:
      web_address: { value_template: "<<ip>>" }
    cluster_param:
      web_vip: { value_template: "<<ip>>" }
"#,
    )
    .unwrap();

    let result = inventory.classify(&request).unwrap();
    assert_eq!(result.classes, classes(&["cluster.lab.web", "system.linux"]));

    let record = inventory.nodes().get("web01.lab.local").unwrap().unwrap();
    assert_eq!(
        record.parameters.get("web_address"),
        Some(&Value::from("10.0.0.10"))
    );

    assert_eq!(result.cluster_results.len(), 1);
    assert_eq!(
        result.cluster_results[0].outcome,
        ClusterParamOutcome::Applied(SetOutcome::Created {
            value: Value::from("10.0.0.10")
        })
    );
    assert_eq!(
        inventory
            .clusters()
            .get("web_vip", &OverrideScope::cluster("lab"))
            .unwrap(),
        Some(Value::from("10.0.0.10"))
    );
    assert!(temp.path().join("classes/cluster/lab/overrides.yml").exists());

    let json = result.to_json().unwrap();
    assert!(json.contains("\"status\": \"created\""));
}

#[test]
fn test_unsupported_condition_aborts_before_writes() {
    let temp = TempDir::new().unwrap();
    let inventory = inventory(&temp);
    let mapping = ClassMapping::from_yaml_str(
        "ok:\n  expression: all\n  node_class:\n    value: [a]\nbad:\n  expression: a__contains__b\n",
    )
    .unwrap();

    let err = inventory
        .classifier()
        .classify("web01", &attrs(&[]), &mapping)
        .unwrap_err();
    assert!(matches!(err, ApiError::UnsupportedCondition(_)));
    assert!(files_under(temp.path()).is_empty());
}

#[test]
fn test_cluster_param_failure_reported_per_key() {
    let temp = TempDir::new().unwrap();
    let config = ClassificationConfig {
        cluster: "../outside".to_string(),
        ..ClassificationConfig::default()
    };
    let inventory = inventory_with(&temp, config);
    let mapping = ClassMapping::from_yaml_str(
        r#"
web:
  expression: all
  node_class:
    value: [role.web]
  cluster_param:
    web_vip: { value: 10.0.0.1 }
"#,
    )
    .unwrap();

    let result = inventory
        .classifier()
        .classify("web01", &attrs(&[]), &mapping)
        .unwrap();

    assert!(result.node_created());
    assert!(inventory.nodes().get("web01").unwrap().is_some());
    assert_eq!(result.cluster_results.len(), 1);
    assert_eq!(result.cluster_results[0].name, "web_vip");
    assert!(matches!(
        &result.cluster_results[0].outcome,
        ClusterParamOutcome::Failed(message) if message.contains("Invalid node identity")
    ));
    assert!(!temp.path().join("classes").exists());
}
