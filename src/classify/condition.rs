//! Rule conditions: `LEFT__OP__RIGHT` predicates over rendered templates.

use crate::error::ApiError;
use crate::template::{is_identifier, substitute};
use crate::types::{value_to_string, Attributes};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Sentinel expression that always matches.
pub const MATCH_ALL: &str = "all";

/// Token separating the parts of a condition.
pub const CONDITION_SEPARATOR: &str = "__";

/// A rule expression: one condition or a list that must all hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expression {
    Single(String),
    All(Vec<String>),
}

impl Default for Expression {
    fn default() -> Self {
        Expression::All(Vec::new())
    }
}

impl From<&str> for Expression {
    fn from(value: &str) -> Self {
        Expression::Single(value.to_string())
    }
}

impl From<Vec<&str>> for Expression {
    fn from(values: Vec<&str>) -> Self {
        Expression::All(values.into_iter().map(str::to_string).collect())
    }
}

impl Expression {
    pub fn conditions(&self) -> &[String] {
        match self {
            Expression::Single(s) => std::slice::from_ref(s),
            Expression::All(list) => list,
        }
    }

    /// Evaluate every condition against `attributes`; true iff all hold.
    ///
    /// Every condition is evaluated so an unsupported operator late in the
    /// list still surfaces as an error. An empty expression is true.
    pub fn evaluate(&self, attributes: &Attributes) -> Result<bool, ApiError> {
        let mut matched = true;
        for condition in self.conditions() {
            matched &= evaluate_condition(condition, attributes)?;
        }
        Ok(matched)
    }
}

/// Supported comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    StartsWith,
    Equals,
}

impl FromStr for Operator {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "startswith" => Ok(Operator::StartsWith),
            "equals" => Ok(Operator::Equals),
            other => Err(ApiError::UnsupportedCondition(format!(
                "Unknown operator '{}'. Must be startswith or equals",
                other
            ))),
        }
    }
}

impl Operator {
    pub fn apply(self, left: &str, right: &str) -> bool {
        match self {
            Operator::StartsWith => left.starts_with(right),
            Operator::Equals => left == right,
        }
    }
}

/// Render one condition template and evaluate it.
///
/// A bare LEFT side that names an attribute (`role__equals__web`) resolves to
/// that attribute's value. A LEFT produced by substitution
/// (`<<role>>__equals__web`) is compared as rendered.
pub fn evaluate_condition(template: &str, attributes: &Attributes) -> Result<bool, ApiError> {
    let bare_left = template
        .split(CONDITION_SEPARATOR)
        .next()
        .filter(|left| is_identifier(left));
    let rendered = substitute(template, attributes);
    if rendered.is_empty() || rendered == MATCH_ALL {
        return Ok(true);
    }

    let mut parts = rendered.splitn(3, CONDITION_SEPARATOR);
    let (left, op, right) = match (parts.next(), parts.next(), parts.next()) {
        (Some(left), Some(op), Some(right)) => (left, op, right),
        _ => {
            return Err(ApiError::UnsupportedCondition(format!(
                "Condition '{}' is not of the form LEFT__OP__RIGHT",
                rendered
            )))
        }
    };

    let operator = op.parse::<Operator>()?;
    let left = match bare_left.and_then(|name| attributes.get(name)) {
        Some(value) => value_to_string(value),
        None => left.to_string(),
    };
    let result = operator.apply(&left, right);
    tracing::debug!(condition = %rendered, result, "Evaluated condition");
    Ok(result)
}
