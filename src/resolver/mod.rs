//! Aggregates triggered rules into field-level state and workflow-level
//! branch candidates.
//!
//! Both entry points are pure and fully recomputed per call; callers
//! re-run them from their own change notifications instead of the core
//! keeping incremental state.

use std::cmp::Reverse;

use itertools::Itertools;

use crate::data::WorkflowFormData;
use crate::evaluator::ConditionEvaluator;
use crate::schema::{ConditionalRule, FieldAction, RuleTarget, WorkflowAction};

/// Resolved render state of one field.
///
/// `required: None` means no requirement rule fired and the schema's own
/// `required` flag stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldState {
    pub visible: bool,
    pub enabled: bool,
    pub required: Option<bool>,
}

impl Default for FieldState {
    fn default() -> Self {
        Self {
            visible: true,
            enabled: true,
            required: None,
        }
    }
}

/// One triggered workflow rule, ready for the external workflow runner.
/// The resolver only produces the ordered candidate list; picking between
/// simultaneous actions is the runner's decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowActionCandidate {
    pub action: WorkflowAction,
    pub step: u32,
    pub rule_id: String,
    pub priority: i32,
}

/// Resolves rule sets against a snapshot. Stateless; holds only the
/// evaluator it delegates conditions to.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleResolver {
    evaluator: ConditionEvaluator,
}

impl RuleResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves the three action families (show/hide, enable/disable,
    /// setRequired/setOptional) for one field's rules.
    ///
    /// Within a family, rules are scanned by priority descending with
    /// declaration order breaking ties; the first rule whose condition
    /// holds decides the family. Families without a match keep the
    /// baseline: visible, enabled, schema-declared requirement.
    pub fn resolve_field_state(
        &self,
        rules: &[ConditionalRule],
        data: &WorkflowFormData,
        current_module: &str,
    ) -> FieldState {
        let mut visible: Option<bool> = None;
        let mut enabled: Option<bool> = None;
        let mut required: Option<bool> = None;

        for (_, rule) in self.scan_order(rules) {
            let RuleTarget::Field(target) = &rule.target else {
                continue;
            };
            let slot = match target.action {
                FieldAction::Show | FieldAction::Hide => &mut visible,
                FieldAction::Enable | FieldAction::Disable => &mut enabled,
                FieldAction::SetRequired | FieldAction::SetOptional => &mut required,
            };
            if slot.is_some() {
                continue;
            }
            if self.evaluator.evaluate(&rule.condition, data, current_module) {
                *slot = Some(matches!(
                    target.action,
                    FieldAction::Show | FieldAction::Enable | FieldAction::SetRequired
                ));
            }
        }

        FieldState {
            visible: visible.unwrap_or(true),
            enabled: enabled.unwrap_or(true),
            required,
        }
    }

    /// Every active workflow rule whose condition holds, ordered by
    /// priority descending then declaration order.
    pub fn resolve_workflow_actions(
        &self,
        rules: &[ConditionalRule],
        data: &WorkflowFormData,
        current_module: &str,
    ) -> Vec<WorkflowActionCandidate> {
        self.scan_order(rules)
            .filter_map(|(_, rule)| {
                let RuleTarget::Workflow(target) = &rule.target else {
                    return None;
                };
                if !self.evaluator.evaluate(&rule.condition, data, current_module) {
                    return None;
                }
                Some(WorkflowActionCandidate {
                    action: target.action,
                    step: target.step,
                    rule_id: rule.id.clone(),
                    priority: rule.priority,
                })
            })
            .collect()
    }

    /// Active rules in evaluation order: priority descending, declaration
    /// order for ties.
    fn scan_order<'r>(
        &self,
        rules: &'r [ConditionalRule],
    ) -> impl Iterator<Item = (usize, &'r ConditionalRule)> {
        rules
            .iter()
            .enumerate()
            .filter(|(_, rule)| rule.active)
            .sorted_by_key(|(index, rule)| (Reverse(rule.priority), *index))
    }
}
