use std::fmt;

use serde::de::{Deserializer, Error as _};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SchemaError;

/// Comparison operator of a [`SimpleCondition`].
///
/// Operator strings are part of the wire format. Strings that do not match
/// any known operator deserialize into [`ConditionOperator::Unknown`] so a
/// stale or hand-edited document still loads; the evaluator resolves the
/// unknown operator to `false` with a warning instead of failing the parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    In,
    NotIn,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    IsEmpty,
    IsNotEmpty,
    IsNull,
    IsNotNull,
    Between,
    NotBetween,
    Unknown(String),
}

impl ConditionOperator {
    /// The wire name of the operator.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Equals => "eq",
            Self::NotEquals => "neq",
            Self::LessThan => "lt",
            Self::LessThanOrEqual => "lte",
            Self::GreaterThan => "gt",
            Self::GreaterThanOrEqual => "gte",
            Self::In => "in",
            Self::NotIn => "notIn",
            Self::Contains => "contains",
            Self::NotContains => "notContains",
            Self::StartsWith => "startsWith",
            Self::EndsWith => "endsWith",
            Self::IsEmpty => "isEmpty",
            Self::IsNotEmpty => "isNotEmpty",
            Self::IsNull => "isNull",
            Self::IsNotNull => "isNotNull",
            Self::Between => "between",
            Self::NotBetween => "notBetween",
            Self::Unknown(other) => other,
        }
    }

    fn parse(s: &str) -> Self {
        match s {
            "eq" => Self::Equals,
            "neq" => Self::NotEquals,
            "lt" => Self::LessThan,
            "lte" => Self::LessThanOrEqual,
            "gt" => Self::GreaterThan,
            "gte" => Self::GreaterThanOrEqual,
            "in" => Self::In,
            "notIn" => Self::NotIn,
            "contains" => Self::Contains,
            "notContains" => Self::NotContains,
            "startsWith" => Self::StartsWith,
            "endsWith" => Self::EndsWith,
            "isEmpty" => Self::IsEmpty,
            "isNotEmpty" => Self::IsNotEmpty,
            "isNull" => Self::IsNull,
            "isNotNull" => Self::IsNotNull,
            "between" => Self::Between,
            "notBetween" => Self::NotBetween,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for ConditionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ConditionOperator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ConditionOperator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() {
            return Err(D::Error::custom("operator must be a non-empty string"));
        }
        Ok(Self::parse(&raw))
    }
}

/// Combinator of a [`ComplexCondition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalOperator {
    #[serde(alias = "and", alias = "AND")]
    And,
    #[serde(alias = "or", alias = "OR")]
    Or,
    #[serde(alias = "not", alias = "NOT")]
    Not,
}

/// Leaf comparison: one field reference, one operator, one rule value.
///
/// The `field` string follows the reference grammar
/// `(<moduleKey>.)?<fieldId>`; without a prefix it names a field of the
/// module currently being evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimpleCondition {
    pub field: String,
    pub operator: ConditionOperator,
    #[serde(default)]
    pub value: Value,
}

/// Recursive combination of sub-conditions under one logical operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ComplexCondition {
    pub logical_op: LogicalOperator,
    pub conditions: Vec<Condition>,
}

/// A recursive boolean expression over field values.
///
/// Exactly one of the two shapes is populated; the wire format is
/// `{field, operator, value}` for [`Condition::Simple`] and
/// `{logicalOp, conditions}` for [`Condition::Complex`]. A document
/// satisfying neither or both shapes is rejected during deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Condition {
    Simple(SimpleCondition),
    Complex(ComplexCondition),
}

impl Condition {
    pub fn simple(field: impl Into<String>, operator: ConditionOperator, value: Value) -> Self {
        Self::Simple(SimpleCondition {
            field: field.into(),
            operator,
            value,
        })
    }

    pub fn and(conditions: Vec<Condition>) -> Self {
        Self::Complex(ComplexCondition {
            logical_op: LogicalOperator::And,
            conditions,
        })
    }

    pub fn or(conditions: Vec<Condition>) -> Self {
        Self::Complex(ComplexCondition {
            logical_op: LogicalOperator::Or,
            conditions,
        })
    }

    pub fn not(condition: Condition) -> Self {
        Self::Complex(ComplexCondition {
            logical_op: LogicalOperator::Not,
            conditions: vec![condition],
        })
    }

    /// Structural validation applied at rule-load time.
    ///
    /// `Not` must carry exactly one sub-condition; the evaluator does not
    /// silently repair the arity later.
    pub fn validate(&self, rule_id: &str) -> Result<(), SchemaError> {
        match self {
            Self::Simple(_) => Ok(()),
            Self::Complex(complex) => {
                if complex.logical_op == LogicalOperator::Not && complex.conditions.len() != 1 {
                    return Err(SchemaError::InvalidNotArity {
                        rule_id: rule_id.to_string(),
                        found: complex.conditions.len(),
                    });
                }
                for sub in &complex.conditions {
                    sub.validate(rule_id)?;
                }
                Ok(())
            }
        }
    }
}
