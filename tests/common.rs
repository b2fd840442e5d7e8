//! Common test utilities for building field definitions, rules, and data.
use bunki::prelude::*;
use serde_json::Value;

/// Creates a bare field with the given id, parent, and order.
#[allow(dead_code)]
pub fn field(id: &str, parent: Option<&str>, order: i32) -> FieldDefinition {
    let mut def = FieldDefinition::new(id, FieldType::Text).with_order(order);
    if let Some(parent) = parent {
        def = def.with_parent(parent);
    }
    def
}

/// A small but representative module:
///
/// ```text
/// details (section)
///   name
///   age
/// country (select, code set "countries")
/// ```
#[allow(dead_code)]
pub fn simple_module() -> Vec<FieldDefinition> {
    vec![
        FieldDefinition::new("details", FieldType::Section).with_order(0),
        field("name", Some("details"), 0),
        {
            let mut age = FieldDefinition::new("age", FieldType::Number)
                .with_parent("details")
                .with_order(1);
            age.required = true;
            age
        },
        {
            let mut country =
                FieldDefinition::new("country", FieldType::Select).with_order(1);
            country.code_set_id = Some("countries".to_string());
            country
        },
    ]
}

#[allow(dead_code)]
pub fn countries_code_set() -> CodeSetSchema {
    CodeSetSchema {
        id: "countries".to_string(),
        code: "COUNTRIES".to_string(),
        items: vec![
            CodeSetItem {
                value: "nz".to_string(),
                label: "New Zealand".to_string(),
                order: 2,
                is_default: false,
            },
            CodeSetItem {
                value: "jp".to_string(),
                label: "Japan".to_string(),
                order: 1,
                is_default: true,
            },
        ],
    }
}

/// A rule targeting a field action on field "x".
#[allow(dead_code)]
pub fn field_rule(
    id: &str,
    priority: i32,
    action: FieldAction,
    condition: Condition,
) -> ConditionalRule {
    ConditionalRule {
        id: id.to_string(),
        priority,
        active: true,
        condition,
        target: RuleTarget::field("x", action),
    }
}

/// A rule targeting a workflow branch.
#[allow(dead_code)]
pub fn workflow_rule(
    id: &str,
    priority: i32,
    step: u32,
    action: WorkflowAction,
    condition: Condition,
) -> ConditionalRule {
    ConditionalRule {
        id: id.to_string(),
        priority,
        active: true,
        condition,
        target: RuleTarget::workflow(step, action),
    }
}

/// Builds a snapshot with one populated module.
#[allow(dead_code)]
pub fn data_with(module: &str, entries: &[(&str, Value)]) -> WorkflowFormData {
    let mut data = WorkflowFormData::new();
    for (field, value) in entries {
        data.set(module, *field, value.clone());
    }
    data
}
