//! Deterministic, fail-safe evaluation of condition trees against a
//! workflow data snapshot.
//!
//! Evaluation runs on every data change, potentially per keystroke, so it
//! never errors and never panics on malformed input: anything it cannot
//! resolve becomes `false` plus a diagnostic on the warning side-channel.

use std::cmp::Ordering;

use serde_json::Value;
use tracing::warn;

use crate::data::{FieldLookup, WorkflowFormData};
use crate::error::EvaluationWarning;
use crate::schema::{ComplexCondition, Condition, ConditionOperator, LogicalOperator, SimpleCondition};

mod compare;
mod fieldref;

pub use fieldref::FieldReference;

use compare::{canonical, is_empty, is_null, loose_cmp, loose_eq};

/// Result of an evaluation together with its diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationOutcome {
    pub result: bool,
    pub warnings: Vec<EvaluationWarning>,
}

/// Evaluates [`Condition`] trees. Stateless and reusable; a single
/// instance may serve any number of concurrent callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionEvaluator;

impl ConditionEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Evaluates `condition` against `data`, resolving bare field
    /// references in `current_module`. Diagnostics go to `tracing`.
    pub fn evaluate(
        &self,
        condition: &Condition,
        data: &WorkflowFormData,
        current_module: &str,
    ) -> bool {
        let outcome = self.evaluate_with_warnings(condition, data, current_module);
        for warning in &outcome.warnings {
            warn!(module = current_module, %warning, "condition fallback");
        }
        outcome.result
    }

    /// Like [`evaluate`](Self::evaluate) but hands the diagnostics back to
    /// the caller instead of logging them.
    pub fn evaluate_with_warnings(
        &self,
        condition: &Condition,
        data: &WorkflowFormData,
        current_module: &str,
    ) -> EvaluationOutcome {
        let mut warnings = Vec::new();
        let result = eval_condition(condition, data, current_module, &mut warnings);
        EvaluationOutcome { result, warnings }
    }
}

fn eval_condition(
    condition: &Condition,
    data: &WorkflowFormData,
    module: &str,
    warnings: &mut Vec<EvaluationWarning>,
) -> bool {
    match condition {
        Condition::Simple(simple) => eval_simple(simple, data, module, warnings),
        Condition::Complex(complex) => eval_complex(complex, data, module, warnings),
    }
}

fn eval_complex(
    complex: &ComplexCondition,
    data: &WorkflowFormData,
    module: &str,
    warnings: &mut Vec<EvaluationWarning>,
) -> bool {
    match complex.logical_op {
        // An empty And is vacuously true; an empty Or has no witness.
        LogicalOperator::And => complex
            .conditions
            .iter()
            .all(|sub| eval_condition(sub, data, module, warnings)),
        LogicalOperator::Or => complex
            .conditions
            .iter()
            .any(|sub| eval_condition(sub, data, module, warnings)),
        LogicalOperator::Not => match complex.conditions.as_slice() {
            [sub] => !eval_condition(sub, data, module, warnings),
            other => {
                // Arity is enforced at rule load; a stray document that
                // skipped validation still must not take the engine down.
                warnings.push(EvaluationWarning::NotArity { found: other.len() });
                false
            }
        },
    }
}

fn eval_simple(
    simple: &SimpleCondition,
    data: &WorkflowFormData,
    module: &str,
    warnings: &mut Vec<EvaluationWarning>,
) -> bool {
    let lookup = fieldref::resolve(&simple.field, data, module);

    match &simple.operator {
        ConditionOperator::Equals => loose_eq(lookup, &simple.value),
        ConditionOperator::NotEquals => !loose_eq(lookup, &simple.value),

        ConditionOperator::LessThan => {
            eval_ordering(simple, lookup, warnings, |ord| ord == Ordering::Less)
        }
        ConditionOperator::LessThanOrEqual => {
            eval_ordering(simple, lookup, warnings, |ord| ord != Ordering::Greater)
        }
        ConditionOperator::GreaterThan => {
            eval_ordering(simple, lookup, warnings, |ord| ord == Ordering::Greater)
        }
        ConditionOperator::GreaterThanOrEqual => {
            eval_ordering(simple, lookup, warnings, |ord| ord != Ordering::Less)
        }

        ConditionOperator::In => eval_membership(simple, lookup, warnings).unwrap_or(false),
        ConditionOperator::NotIn => eval_membership(simple, lookup, warnings)
            .map(|contained| !contained)
            .unwrap_or(false),

        ConditionOperator::Contains => eval_substring(lookup, &simple.value, |h, n| h.contains(n)),
        ConditionOperator::NotContains => {
            !eval_substring(lookup, &simple.value, |h, n| h.contains(n))
        }
        ConditionOperator::StartsWith => {
            eval_substring(lookup, &simple.value, |h, n| h.starts_with(n))
        }
        ConditionOperator::EndsWith => eval_substring(lookup, &simple.value, |h, n| h.ends_with(n)),

        ConditionOperator::IsEmpty => is_empty(lookup),
        ConditionOperator::IsNotEmpty => !is_empty(lookup),
        ConditionOperator::IsNull => is_null(lookup),
        ConditionOperator::IsNotNull => !is_null(lookup),

        ConditionOperator::Between => eval_range(simple, lookup, warnings).unwrap_or(false),
        ConditionOperator::NotBetween => eval_range(simple, lookup, warnings)
            .map(|inside| !inside)
            .unwrap_or(false),

        ConditionOperator::Unknown(operator) => {
            warnings.push(EvaluationWarning::UnknownOperator {
                operator: operator.clone(),
            });
            false
        }
    }
}

fn eval_ordering(
    simple: &SimpleCondition,
    lookup: FieldLookup<'_>,
    warnings: &mut Vec<EvaluationWarning>,
    accept: impl Fn(Ordering) -> bool,
) -> bool {
    match lookup.value() {
        Some(value) => accept(loose_cmp(value, &simple.value)),
        None => {
            warnings.push(EvaluationWarning::UnresolvedReference {
                reference: simple.field.clone(),
            });
            false
        }
    }
}

/// Membership via the equality rule per element. `None` means the rule
/// value was not a sequence; both `in` and `notIn` then fail safe.
fn eval_membership(
    simple: &SimpleCondition,
    lookup: FieldLookup<'_>,
    warnings: &mut Vec<EvaluationWarning>,
) -> Option<bool> {
    let Value::Array(candidates) = &simple.value else {
        warnings.push(EvaluationWarning::MalformedRuleValue {
            operator: simple.operator.as_str().to_string(),
            expected: "a sequence",
        });
        return None;
    };
    Some(candidates.iter().any(|candidate| loose_eq(lookup, candidate)))
}

/// Inclusive range test against a 2-element sequence, using the ordering
/// chain. `None` means the rule value was malformed.
fn eval_range(
    simple: &SimpleCondition,
    lookup: FieldLookup<'_>,
    warnings: &mut Vec<EvaluationWarning>,
) -> Option<bool> {
    let bounds = match &simple.value {
        Value::Array(items) if items.len() == 2 => items,
        _ => {
            warnings.push(EvaluationWarning::MalformedRuleValue {
                operator: simple.operator.as_str().to_string(),
                expected: "a 2-element sequence",
            });
            return None;
        }
    };
    let Some(value) = lookup.value() else {
        warnings.push(EvaluationWarning::UnresolvedReference {
            reference: simple.field.clone(),
        });
        return None;
    };
    Some(
        loose_cmp(value, &bounds[0]) != Ordering::Less
            && loose_cmp(value, &bounds[1]) != Ordering::Greater,
    )
}

/// Case-insensitive substring family. A missing or null field has nothing
/// to test against, so the positive operators answer `false` (and the
/// caller inverts for `notContains`).
fn eval_substring(
    lookup: FieldLookup<'_>,
    rule_value: &Value,
    test: impl Fn(&str, &str) -> bool,
) -> bool {
    let Some(value) = lookup.value() else {
        return false;
    };
    if value.is_null() {
        return false;
    }
    let haystack = canonical(value).to_lowercase();
    let needle = canonical(rule_value).to_lowercase();
    test(&haystack, &needle)
}
