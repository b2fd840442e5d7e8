//! # Bunki - Conditional Form Hierarchy and Rule Evaluation Engine
//!
//! **Bunki** (分岐, "branching") turns flat, JSON-shaped form schemas into
//! navigable field trees and evaluates declarative conditional rules
//! against live workflow data. It is the headless core of a form builder:
//! persistence, rendering, and the workflow runner live outside and talk
//! to it through plain data.
//!
//! ## Core Workflow
//!
//! 1.  **Load your schema**: Deserialize a module's flat array of
//!     [`FieldDefinition`](schema::FieldDefinition)s from JSON.
//! 2.  **Build the tree**: Feed the array to a
//!     [`HierarchyBuilder`](hierarchy::HierarchyBuilder), which validates
//!     it, resolves code-set options through your
//!     [`CodeSetProvider`](codeset::CodeSetProvider), and emits an
//!     immutable [`ModuleTree`](hierarchy::ModuleTree).
//! 3.  **Evaluate on every change**: Hand each field's rules plus the
//!     current [`WorkflowFormData`](data::WorkflowFormData) snapshot to a
//!     [`RuleResolver`](resolver::RuleResolver) to get visibility/enabled
//!     state and workflow branch candidates.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bunki::prelude::*;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let fields: Vec<FieldDefinition> = serde_json::from_str(
//!     &std::fs::read_to_string("module.json")?,
//! )?;
//!
//! // Code sets come from wherever you keep them; the in-memory provider
//! // is enough for embedding and tests.
//! let provider = InMemoryCodeSetProvider::new();
//! let builder = HierarchyBuilder::new(&provider).with_cycle_mode(CycleMode::AutoFix);
//! let output = futures::executor::block_on(builder.build(&fields))?;
//!
//! let tree = output.tree.expect("schema had no fatal errors");
//! for node in tree.fields_in_order() {
//!     println!("{} (depth {})", node.id(), node.depth());
//! }
//!
//! // On every data change, recompute the affected field states.
//! let mut data = WorkflowFormData::new();
//! data.set("intake", "age", json!(25));
//!
//! let resolver = RuleResolver::new();
//! for node in tree.fields_in_order() {
//!     let state = resolver.resolve_field_state(&node.definition().rules, &data, "intake");
//!     println!("{}: visible={} enabled={}", node.id(), state.visible, state.enabled);
//! }
//! # Ok(())
//! # }
//! ```

pub mod codeset;
pub mod data;
pub mod error;
pub mod evaluator;
pub mod hierarchy;
pub mod prelude;
pub mod resolver;
pub mod schema;
