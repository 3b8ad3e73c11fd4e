//! Node records: the view callers get of one persisted node.

use crate::document::{DocumentParameters, InventoryDocument};
use crate::types::{split_identity, Parameters, DEFAULT_CLUSTER, DEFAULT_ENVIRONMENT};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

/// Namespace path of the system identity block inside node parameters.
pub const SYSTEM_NAMESPACE: [&str; 2] = ["linux", "system"];

/// A node as read back from the inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub identity: String,
    pub host_name: String,
    pub domain: String,
    pub cluster: String,
    pub environment: String,
    /// Directory below the nodes root holding the record; empty for the root.
    pub path: String,
    pub classes: Vec<String>,
    /// The private `_param` namespace.
    pub parameters: Parameters,
}

impl NodeRecord {
    pub fn from_document(identity: &str, path: &str, document: &InventoryDocument) -> Self {
        let (host_name, domain) = split_identity(identity);
        let system = |key: &str| {
            document
                .parameter_str(&[SYSTEM_NAMESPACE[0], SYSTEM_NAMESPACE[1], key])
                .map(str::to_string)
        };
        Self {
            identity: identity.to_string(),
            host_name,
            domain,
            cluster: system("cluster").unwrap_or_else(|| DEFAULT_CLUSTER.to_string()),
            environment: system("environment").unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string()),
            path: path.to_string(),
            classes: document.classes.clone(),
            parameters: document.params(),
        }
    }
}

/// Build the document written for a newly created node.
pub fn new_node_document(
    identity: &str,
    cluster: &str,
    environment: &str,
    classes: &[String],
    parameters: &Parameters,
) -> InventoryDocument {
    let (host_name, domain) = split_identity(identity);

    let mut system = Mapping::new();
    system.insert(Value::from("name"), Value::from(host_name));
    system.insert(Value::from("domain"), Value::from(domain));
    system.insert(Value::from("cluster"), Value::from(cluster));
    system.insert(Value::from("environment"), Value::from(environment));

    let mut linux = Mapping::new();
    linux.insert(Value::from(SYSTEM_NAMESPACE[1]), Value::Mapping(system));

    let mut namespaces = Mapping::new();
    namespaces.insert(Value::from(SYSTEM_NAMESPACE[0]), Value::Mapping(linux));

    InventoryDocument {
        classes: classes.to_vec(),
        parameters: DocumentParameters {
            param: parameters.clone(),
            namespaces,
        },
        extra: Mapping::new(),
    }
}
