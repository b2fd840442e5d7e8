//! End-to-end test: a module loaded from JSON, built into a tree, and
//! driven by snapshot changes the way a renderer would.
mod common;

use bunki::prelude::*;
use common::*;
use serde_json::json;

fn loan_module() -> Vec<FieldDefinition> {
    serde_json::from_value(json!([
        {
            "id": "applicant",
            "type": "section",
            "label": "Applicant",
            "order": 0,
            "config": {"kind": "section", "collapsible": true}
        },
        {
            "id": "age",
            "type": "number",
            "order": 0,
            "parentId": "applicant",
            "required": true
        },
        {
            "id": "guardian",
            "type": "text",
            "order": 1,
            "parentId": "applicant",
            "rules": [{
                "id": "show-guardian",
                "priority": 10,
                "condition": {"field": "age", "operator": "lt", "value": 18},
                "target": {"fieldId": "guardian", "action": "show"}
            }, {
                "id": "hide-guardian",
                "priority": 1,
                "condition": {"field": "age", "operator": "gte", "value": 18},
                "target": {"fieldId": "guardian", "action": "hide"}
            }]
        },
        {
            "id": "country",
            "type": "select",
            "order": 1,
            "codeSetId": "countries"
        },
        {
            "id": "review",
            "type": "label",
            "order": 2,
            "rules": [{
                "id": "fast-track",
                "priority": 5,
                "condition": {"logicalOp": "And", "conditions": [
                    {"field": "Step1.total", "operator": "lt", "value": 10000},
                    {"field": "age", "operator": "gte", "value": 18}
                ]},
                "target": {"step": 3, "action": "skipStep"}
            }]
        }
    ]))
    .unwrap()
}

#[test]
fn module_builds_and_reacts_to_data_changes() {
    let provider = InMemoryCodeSetProvider::new().with_set(countries_code_set());
    let builder = HierarchyBuilder::new(&provider);
    let output = tokio_test::block_on(builder.build(&loan_module())).unwrap();

    assert!(output.validation.is_valid());
    assert!(output.validation.warnings.is_empty());
    let tree = output.tree.unwrap();

    // Tree shape and resolved options.
    let ids: Vec<&str> = tree.fields_in_order().map(|n| n.id()).collect();
    assert_eq!(ids, vec!["applicant", "age", "guardian", "country", "review"]);
    assert_eq!(tree.get("country").unwrap().options().len(), 2);
    assert_eq!(output.metrics.field_count, 5);
    assert_eq!(output.metrics.rule_count, 3);

    let resolver = RuleResolver::new();
    let guardian_rules = &tree.get("guardian").unwrap().definition().rules;
    let review_rules = &tree.get("review").unwrap().definition().rules;

    // Minor applicant: the guardian field shows, no fast track.
    let mut data = WorkflowFormData::new();
    data.set("intake", "age", json!(16));
    data.set("Step1", "total", json!(7500));

    let state = resolver.resolve_field_state(guardian_rules, &data, "intake");
    assert!(state.visible);
    let actions = resolver.resolve_workflow_actions(review_rules, &data, "intake");
    assert!(actions.is_empty());

    // Adult applicant under the threshold: guardian hides, step 3 skips.
    data.set("intake", "age", json!(25));

    let state = resolver.resolve_field_state(guardian_rules, &data, "intake");
    assert!(!state.visible);
    let actions = resolver.resolve_workflow_actions(review_rules, &data, "intake");
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].step, 3);
    assert_eq!(actions[0].action, WorkflowAction::SkipStep);

    // The evaluator saw every change without anyone rebuilding the tree.
    let rebuilt = tokio_test::block_on(
        HierarchyBuilder::new(&provider).build(&loan_module()),
    )
    .unwrap();
    assert_eq!(rebuilt.tree.unwrap().len(), tree.len());
}
