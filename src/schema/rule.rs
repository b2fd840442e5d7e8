use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::schema::condition::Condition;

/// Action applied to a single field when its rule triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldAction {
    Show,
    Hide,
    Enable,
    Disable,
    SetRequired,
    SetOptional,
}

/// Action applied to the surrounding workflow when a rule triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkflowAction {
    SkipStep,
    GoToStep,
    CompleteWorkflow,
}

/// Field-scoped rule target: `{fieldId, action}` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct FieldTarget {
    pub field_id: String,
    pub action: FieldAction,
}

/// Workflow-scoped rule target: `{step, action}` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkflowTarget {
    pub step: u32,
    pub action: WorkflowAction,
}

/// The single target of a [`ConditionalRule`]: either a field action or a
/// workflow branch, never both. A document populating neither shape or
/// mixing keys of both is rejected during deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleTarget {
    Field(FieldTarget),
    Workflow(WorkflowTarget),
}

impl RuleTarget {
    pub fn field(field_id: impl Into<String>, action: FieldAction) -> Self {
        Self::Field(FieldTarget {
            field_id: field_id.into(),
            action,
        })
    }

    pub fn workflow(step: u32, action: WorkflowAction) -> Self {
        Self::Workflow(WorkflowTarget { step, action })
    }
}

/// Binds a [`Condition`] to exactly one target action.
///
/// Rules with a higher `priority` are considered first; inactive rules are
/// skipped entirely by the resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalRule {
    pub id: String,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_active")]
    pub active: bool,
    pub condition: Condition,
    pub target: RuleTarget,
}

fn default_active() -> bool {
    true
}

impl ConditionalRule {
    /// Structural validation applied once when a schema is loaded, so that
    /// evaluation never has to deal with malformed shapes.
    pub fn validate(&self) -> Result<(), SchemaError> {
        self.condition.validate(&self.id)
    }

    /// True when the rule targets a field rather than the workflow.
    pub fn is_field_rule(&self) -> bool {
        matches!(self.target, RuleTarget::Field(_))
    }
}
