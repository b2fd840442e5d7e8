//! Prelude module for convenient imports
//!
//! Re-exports the most commonly used types so embedders can bring in the
//! core functionality with a single `use bunki::prelude::*;`.

// Hierarchy building
pub use crate::hierarchy::{
    BuildOutput, CycleMode, FieldNode, HierarchyBuilder, HierarchyMetrics, ModuleTree, auto_fix,
};

// Schema types
pub use crate::schema::{
    Condition, ConditionOperator, ConditionalRule, DisplayOption, FieldAction, FieldConfig,
    FieldDefinition, FieldType, LogicalOperator, RelationshipKind, RuleTarget, ValidationConstraints,
    WorkflowAction,
};

// Evaluation and rule resolution
pub use crate::evaluator::{ConditionEvaluator, EvaluationOutcome, FieldReference};
pub use crate::resolver::{FieldState, RuleResolver, WorkflowActionCandidate};

// Data snapshot
pub use crate::data::{FieldLookup, WorkflowFormData};

// Code sets
pub use crate::codeset::{CodeSetItem, CodeSetProvider, CodeSetSchema, InMemoryCodeSetProvider};

// Error types
pub use crate::error::{
    BuildCancelled, BuildWarning, CodeSetError, EvaluationWarning, SchemaError, ValidationResult,
};
