use thiserror::Error;

/// Fatal structural defects in a module schema. Any of these aborts a
/// hierarchy build; they are collected into a [`ValidationResult`] rather
/// than returned through `?` so an editor can render all of them at once.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Duplicate field id '{id}' in module definition")]
    DuplicateFieldId { id: String },

    #[error("Field '{field_id}' participates in a parent cycle")]
    CycleDetected { field_id: String },

    #[error("Rule '{rule_id}': a Not condition must have exactly one sub-condition, found {found}")]
    InvalidNotArity { rule_id: String, found: usize },

    #[error("Rule '{rule_id}' on field '{field_id}' is malformed: {message}")]
    InvalidRule {
        rule_id: String,
        field_id: String,
        message: String,
    },
}

/// Non-fatal defects recorded during a hierarchy build. The build proceeds
/// and the resulting tree remains usable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildWarning {
    #[error("Field '{field_id}' declares missing parent '{parent_id}'; treated as a root")]
    DanglingParent { field_id: String, parent_id: String },

    #[error("Field '{field_id}' was part of a parent cycle and has been re-rooted")]
    CycleDemoted { field_id: String },

    #[error("Code set '{code_set_id}' for field '{field_id}' could not be resolved: {reason}")]
    CodeSetUnresolved {
        field_id: String,
        code_set_id: String,
        reason: String,
    },
}

/// Diagnostics emitted when the evaluator falls back to its safe default.
/// These are never returned as errors; evaluation always yields a boolean.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationWarning {
    #[error("Unknown operator '{operator}' evaluated as false")]
    UnknownOperator { operator: String },

    #[error("Field reference '{reference}' did not resolve to a value")]
    UnresolvedReference { reference: String },

    #[error("Operator '{operator}' expected {expected} as its rule value")]
    MalformedRuleValue {
        operator: String,
        expected: &'static str,
    },

    #[error("Not condition with {found} sub-conditions evaluated as false")]
    NotArity { found: usize },
}

/// Failures reported by a [`CodeSetProvider`](crate::codeset::CodeSetProvider).
/// The hierarchy builder downgrades these to [`BuildWarning::CodeSetUnresolved`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodeSetError {
    #[error("Code set source unavailable: {0}")]
    Unavailable(String),

    #[error("Code set '{0}' is malformed at the source")]
    Malformed(String),
}

/// Returned when a build's cancellation token fires. The build yields no
/// partial result.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Hierarchy build was cancelled")]
pub struct BuildCancelled;

/// The collected outcome of validating a module schema during a build.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResult {
    pub errors: Vec<SchemaError>,
    pub warnings: Vec<BuildWarning>,
}

impl ValidationResult {
    /// True when no fatal error was recorded. Warnings do not count.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub(crate) fn error(&mut self, error: SchemaError) {
        self.errors.push(error);
    }

    pub(crate) fn warn(&mut self, warning: BuildWarning) {
        self.warnings.push(warning);
    }
}
