use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of looking up a field value in a snapshot.
///
/// `Missing` means the module or field key is absent; an explicit JSON
/// null stays `Present(Value::Null)`. The two are distinguished because
/// the existence operators treat them differently from the rest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldLookup<'a> {
    Missing,
    Present(&'a Value),
}

impl<'a> FieldLookup<'a> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    pub fn value(&self) -> Option<&'a Value> {
        match self {
            Self::Missing => None,
            Self::Present(v) => Some(v),
        }
    }
}

/// The full data snapshot of a workflow: module key to field id to value.
///
/// The evaluator only ever reads a snapshot. Callers that mutate form data
/// concurrently must hand the evaluator a copy or serialize access; the
/// type itself holds no interior locking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkflowFormData {
    modules: AHashMap<String, AHashMap<String, Value>>,
}

impl WorkflowFormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets one field value, creating the module entry on first use.
    pub fn set(
        &mut self,
        module: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<Value>,
    ) {
        self.modules
            .entry(module.into())
            .or_default()
            .insert(field.into(), value.into());
    }

    pub fn remove(&mut self, module: &str, field: &str) -> Option<Value> {
        self.modules.get_mut(module)?.remove(field)
    }

    pub fn has_module(&self, module: &str) -> bool {
        self.modules.contains_key(module)
    }

    pub fn module(&self, module: &str) -> Option<&AHashMap<String, Value>> {
        self.modules.get(module)
    }

    pub fn lookup(&self, module: &str, field: &str) -> FieldLookup<'_> {
        match self.modules.get(module).and_then(|m| m.get(field)) {
            Some(value) => FieldLookup::Present(value),
            None => FieldLookup::Missing,
        }
    }
}

impl From<AHashMap<String, AHashMap<String, Value>>> for WorkflowFormData {
    fn from(modules: AHashMap<String, AHashMap<String, Value>>) -> Self {
        Self { modules }
    }
}
