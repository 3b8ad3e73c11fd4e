//! Class mapping rules and the class/parameter generators they carry.

use crate::classify::condition::Expression;
use crate::error::ApiError;
use crate::template::substitute;
use crate::types::{Attributes, Parameters};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_yaml::{Mapping, Value};

/// Class names contributed by a matching rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassGenerator {
    /// Templates rendered against node attributes; emitted first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub value_template: Vec<String>,
    /// Literal class names; emitted after the templates.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub value: Vec<String>,
}

impl ClassGenerator {
    pub fn generate(&self, attributes: &Attributes) -> Vec<String> {
        self.value_template
            .iter()
            .map(|template| substitute(template, attributes))
            .chain(self.value.iter().cloned())
            .collect()
    }
}

/// One generated parameter: a literal value or a template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamGenerator {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_template: Option<String>,
}

impl ParamGenerator {
    pub fn literal(value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            value_template: None,
        }
    }

    pub fn template(template: impl Into<String>) -> Self {
        Self {
            value: None,
            value_template: Some(template.into()),
        }
    }

    /// The literal wins over the template when both are present.
    pub fn generate(&self, attributes: &Attributes) -> Option<Value> {
        match (&self.value, &self.value_template) {
            (Some(value), _) => Some(value.clone()),
            (None, Some(template)) => Some(Value::String(substitute(template, attributes))),
            (None, None) => None,
        }
    }
}

/// Parameter generators of one rule, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Mapping")]
pub struct ParamGenerators {
    entries: Vec<(String, ParamGenerator)>,
}

impl ParamGenerators {
    /// Add or replace a generator; a replaced one keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, generator: ParamGenerator) {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = generator,
            None => self.entries.push((name, generator)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamGenerator)> {
        self.entries.iter().map(|(name, generator)| (name.as_str(), generator))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TryFrom<Mapping> for ParamGenerators {
    type Error = ApiError;

    fn try_from(mapping: Mapping) -> Result<Self, Self::Error> {
        let mut generators = Self::default();
        for (key, body) in mapping {
            let name = match key {
                Value::String(name) => name,
                other => {
                    return Err(ApiError::MalformedRule(format!(
                        "Parameter name must be a string, got {:?}",
                        other
                    )))
                }
            };
            let generator: ParamGenerator = serde_yaml::from_value(body)
                .map_err(|e| ApiError::MalformedRule(format!("Parameter '{}': {}", name, e)))?;
            generators.insert(name, generator);
        }
        Ok(generators)
    }
}

impl Serialize for ParamGenerators {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, generator) in &self.entries {
            map.serialize_entry(name, generator)?;
        }
        map.end()
    }
}

/// A named classification rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassMappingRule {
    #[serde(skip)]
    pub name: String,
    #[serde(default)]
    pub expression: Expression,
    #[serde(default)]
    pub node_class: ClassGenerator,
    #[serde(default, skip_serializing_if = "ParamGenerators::is_empty")]
    pub node_param: ParamGenerators,
    #[serde(default, skip_serializing_if = "ParamGenerators::is_empty")]
    pub cluster_param: ParamGenerators,
}

/// Output of one matching rule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Generated {
    pub classes: Vec<String>,
    pub node_parameters: Parameters,
    pub cluster_parameters: Parameters,
}

impl ClassMappingRule {
    pub fn new(name: impl Into<String>, expression: impl Into<Expression>) -> Self {
        Self {
            name: name.into(),
            expression: expression.into(),
            ..Default::default()
        }
    }

    pub fn matches(&self, attributes: &Attributes) -> Result<bool, ApiError> {
        self.expression.evaluate(attributes)
    }

    /// Produce the classes and parameters of this rule.
    pub fn generate(&self, attributes: &Attributes) -> Result<Generated, ApiError> {
        Ok(Generated {
            classes: self.node_class.generate(attributes),
            node_parameters: self.generate_params(&self.node_param, attributes)?,
            cluster_parameters: self.generate_params(&self.cluster_param, attributes)?,
        })
    }

    fn generate_params(
        &self,
        generators: &ParamGenerators,
        attributes: &Attributes,
    ) -> Result<Parameters, ApiError> {
        let mut params = Parameters::new();
        for (name, generator) in generators.iter() {
            let value = generator.generate(attributes).ok_or_else(|| {
                ApiError::MalformedRule(format!(
                    "Parameter '{}' in rule '{}' has neither value nor value_template",
                    name, self.name
                ))
            })?;
            params.insert(Value::from(name), value);
        }
        Ok(params)
    }
}

/// An ordered set of rules keyed by rule name.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Mapping")]
pub struct ClassMapping {
    rules: Vec<ClassMappingRule>,
}

impl ClassMapping {
    pub fn new(rules: Vec<ClassMappingRule>) -> Self {
        Self { rules }
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ApiError> {
        let mapping: Mapping = serde_yaml::from_str(content)
            .map_err(|e| ApiError::MalformedRule(format!("Failed to parse class mapping: {}", e)))?;
        Self::try_from(mapping)
    }

    pub fn rules(&self) -> &[ClassMappingRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl TryFrom<Mapping> for ClassMapping {
    type Error = ApiError;

    fn try_from(mapping: Mapping) -> Result<Self, Self::Error> {
        let mut rules = Vec::with_capacity(mapping.len());
        for (key, body) in mapping {
            let name = match key {
                Value::String(name) => name,
                other => {
                    return Err(ApiError::MalformedRule(format!(
                        "Rule name must be a string, got {:?}",
                        other
                    )))
                }
            };
            let body = if body.is_null() {
                Value::Mapping(Mapping::new())
            } else {
                body
            };
            let mut rule: ClassMappingRule = serde_yaml::from_value(body)
                .map_err(|e| ApiError::MalformedRule(format!("Rule '{}': {}", name, e)))?;
            rule.name = name;
            rules.push(rule);
        }
        Ok(Self { rules })
    }
}

impl Serialize for ClassMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.rules.len()))?;
        for rule in &self.rules {
            map.serialize_entry(&rule.name, rule)?;
        }
        map.end()
    }
}
