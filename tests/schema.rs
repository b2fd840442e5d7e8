//! Tests for the wire shapes: condition variants, rule targets, and field
//! definitions must round-trip JSON and reject malformed documents.
mod common;

use bunki::prelude::*;
use serde_json::json;

#[test]
fn simple_condition_parses_from_its_wire_shape() {
    let condition: Condition =
        serde_json::from_value(json!({"field": "age", "operator": "gte", "value": 18})).unwrap();
    match condition {
        Condition::Simple(simple) => {
            assert_eq!(simple.field, "age");
            assert_eq!(simple.operator, ConditionOperator::GreaterThanOrEqual);
            assert_eq!(simple.value, json!(18));
        }
        Condition::Complex(_) => panic!("expected a simple condition"),
    }
}

#[test]
fn complex_condition_parses_recursively() {
    let condition: Condition = serde_json::from_value(json!({
        "logicalOp": "And",
        "conditions": [
            {"field": "a", "operator": "eq", "value": 1},
            {"logicalOp": "Not", "conditions": [
                {"field": "b", "operator": "isEmpty", "value": null}
            ]}
        ]
    }))
    .unwrap();

    let Condition::Complex(complex) = condition else {
        panic!("expected a complex condition");
    };
    assert_eq!(complex.logical_op, LogicalOperator::And);
    assert_eq!(complex.conditions.len(), 2);
}

#[test]
fn condition_with_both_shapes_is_rejected() {
    let result: Result<Condition, _> = serde_json::from_value(json!({
        "field": "a", "operator": "eq", "value": 1,
        "logicalOp": "And", "conditions": []
    }));
    assert!(result.is_err());
}

#[test]
fn condition_with_neither_shape_is_rejected() {
    let result: Result<Condition, _> = serde_json::from_value(json!({"something": "else"}));
    assert!(result.is_err());

    let result: Result<Condition, _> = serde_json::from_value(json!({}));
    assert!(result.is_err());
}

#[test]
fn missing_value_defaults_to_null() {
    let condition: Condition =
        serde_json::from_value(json!({"field": "x", "operator": "isEmpty"})).unwrap();
    let Condition::Simple(simple) = condition else {
        panic!("expected a simple condition");
    };
    assert!(simple.value.is_null());
}

#[test]
fn unknown_operator_string_survives_parsing() {
    let condition: Condition =
        serde_json::from_value(json!({"field": "x", "operator": "fuzzyMatch", "value": 1}))
            .unwrap();
    let Condition::Simple(simple) = condition else {
        panic!("expected a simple condition");
    };
    assert_eq!(
        simple.operator,
        ConditionOperator::Unknown("fuzzyMatch".to_string())
    );
    // And it serializes back out unchanged.
    assert_eq!(serde_json::to_value(&simple.operator).unwrap(), json!("fuzzyMatch"));
}

#[test]
fn operator_wire_names_round_trip() {
    for (op, name) in [
        (ConditionOperator::Equals, "eq"),
        (ConditionOperator::NotEquals, "neq"),
        (ConditionOperator::LessThan, "lt"),
        (ConditionOperator::LessThanOrEqual, "lte"),
        (ConditionOperator::GreaterThan, "gt"),
        (ConditionOperator::GreaterThanOrEqual, "gte"),
        (ConditionOperator::In, "in"),
        (ConditionOperator::NotIn, "notIn"),
        (ConditionOperator::Contains, "contains"),
        (ConditionOperator::NotContains, "notContains"),
        (ConditionOperator::StartsWith, "startsWith"),
        (ConditionOperator::EndsWith, "endsWith"),
        (ConditionOperator::IsEmpty, "isEmpty"),
        (ConditionOperator::IsNotEmpty, "isNotEmpty"),
        (ConditionOperator::IsNull, "isNull"),
        (ConditionOperator::IsNotNull, "isNotNull"),
        (ConditionOperator::Between, "between"),
        (ConditionOperator::NotBetween, "notBetween"),
    ] {
        assert_eq!(op.as_str(), name);
        let parsed: ConditionOperator = serde_json::from_value(json!(name)).unwrap();
        assert_eq!(parsed, op);
    }
}

#[test]
fn rule_with_a_field_target_parses() {
    let rule: ConditionalRule = serde_json::from_value(json!({
        "id": "r1",
        "priority": 5,
        "condition": {"field": "age", "operator": "lt", "value": 18},
        "target": {"fieldId": "guardian", "action": "show"}
    }))
    .unwrap();

    assert!(rule.active, "active defaults to true");
    assert!(rule.is_field_rule());
}

#[test]
fn rule_with_a_workflow_target_parses() {
    let rule: ConditionalRule = serde_json::from_value(json!({
        "id": "r2",
        "condition": {"field": "total", "operator": "lt", "value": 10000},
        "target": {"step": 3, "action": "skipStep"}
    }))
    .unwrap();

    assert!(!rule.is_field_rule());
    assert_eq!(rule.priority, 0, "priority defaults to zero");
    match rule.target {
        RuleTarget::Workflow(target) => {
            assert_eq!(target.step, 3);
            assert_eq!(target.action, WorkflowAction::SkipStep);
        }
        RuleTarget::Field(_) => panic!("expected a workflow target"),
    }
}

#[test]
fn rule_target_mixing_both_shapes_is_rejected() {
    let result: Result<ConditionalRule, _> = serde_json::from_value(json!({
        "id": "r3",
        "condition": {"field": "a", "operator": "eq", "value": 1},
        "target": {"fieldId": "x", "step": 2, "action": "show"}
    }));
    assert!(result.is_err());
}

#[test]
fn rule_target_with_neither_shape_is_rejected() {
    let result: Result<ConditionalRule, _> = serde_json::from_value(json!({
        "id": "r4",
        "condition": {"field": "a", "operator": "eq", "value": 1},
        "target": {"action": "show"}
    }));
    assert!(result.is_err());
}

#[test]
fn not_arity_is_enforced_at_rule_load() {
    let rule: ConditionalRule = serde_json::from_value(json!({
        "id": "r5",
        "condition": {"logicalOp": "Not", "conditions": [
            {"field": "a", "operator": "eq", "value": 1},
            {"field": "b", "operator": "eq", "value": 2}
        ]},
        "target": {"fieldId": "x", "action": "hide"}
    }))
    .unwrap();

    assert_eq!(
        rule.validate(),
        Err(SchemaError::InvalidNotArity {
            rule_id: "r5".to_string(),
            found: 2
        })
    );
}

#[test]
fn field_definition_round_trips_through_json() {
    let document = json!({
        "id": "income",
        "type": "number",
        "label": "Monthly income",
        "order": 3,
        "parentId": "finances",
        "required": true,
        "validation": {"min": 0.0},
        "codeSetId": null,
        "config": {"kind": "number", "step": 0.01, "decimalPlaces": 2},
        "rules": [{
            "id": "hide-when-unemployed",
            "priority": 1,
            "condition": {"field": "employment", "operator": "eq", "value": "none"},
            "target": {"fieldId": "income", "action": "hide"}
        }]
    });

    let definition: FieldDefinition = serde_json::from_value(document).unwrap();
    assert_eq!(definition.field_type, FieldType::Number);
    assert_eq!(definition.parent_id.as_deref(), Some("finances"));
    assert_eq!(definition.validation.min, Some(0.0));
    assert!(matches!(
        definition.config,
        FieldConfig::Number { step: Some(s), decimal_places: Some(2) } if s == 0.01
    ));

    let back = serde_json::to_value(&definition).unwrap();
    let again: FieldDefinition = serde_json::from_value(back).unwrap();
    assert_eq!(again, definition);
}

#[test]
fn field_config_defaults_to_none() {
    let definition: FieldDefinition =
        serde_json::from_value(json!({"id": "plain", "type": "text"})).unwrap();
    assert_eq!(definition.config, FieldConfig::None);
    assert_eq!(definition.relationship, RelationshipKind::Child);
}

#[test]
fn workflow_form_data_round_trips_through_json() {
    let mut data = WorkflowFormData::new();
    data.set("Step1", "amount", json!(7500));
    data.set("Step1", "note", json!("ok"));
    data.set("3", "total", json!([1, 2]));

    let text = serde_json::to_string(&data).unwrap();
    let back: WorkflowFormData = serde_json::from_str(&text).unwrap();
    assert_eq!(back, data);
    assert_eq!(
        back.lookup("Step1", "amount").value(),
        Some(&json!(7500))
    );
    assert!(back.lookup("Step1", "absent").is_missing());
}
