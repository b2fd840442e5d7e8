//! Shared option lists ("code sets") and the async provider contract used
//! to fetch them during a hierarchy build.

use ahash::AHashMap;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CodeSetError;
use crate::schema::DisplayOption;

/// One entry of a code set as stored at the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSetItem {
    pub value: String,
    pub label: String,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub is_default: bool,
}

/// An externally sourced, reusable option list referenced by id from field
/// definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSetSchema {
    pub id: String,
    pub code: String,
    pub items: Vec<CodeSetItem>,
}

impl CodeSetSchema {
    /// Maps the items to display options, ordered by their declared order
    /// (ties keep source order).
    pub fn to_options(&self) -> Vec<DisplayOption> {
        let mut items: Vec<&CodeSetItem> = self.items.iter().collect();
        items.sort_by_key(|item| item.order);
        items
            .into_iter()
            .map(|item| DisplayOption {
                value: item.value.clone(),
                label: item.label.clone(),
                is_default: item.is_default,
            })
            .collect()
    }
}

/// Read contract of the external code-set source.
///
/// Both calls are potentially slow, fallible I/O; `Ok(None)` means the id
/// is unknown at the source. The hierarchy builder treats any failure as
/// non-fatal and leaves the affected fields without resolved options.
#[async_trait]
pub trait CodeSetProvider: Send + Sync {
    async fn get_code_set(&self, id: &str) -> Result<Option<CodeSetSchema>, CodeSetError>;

    async fn get_code_set_as_options(
        &self,
        id: &str,
    ) -> Result<Option<Vec<DisplayOption>>, CodeSetError> {
        Ok(self.get_code_set(id).await?.map(|set| set.to_options()))
    }
}

/// Provider backed by an in-memory map. Used in tests and by embedders
/// that load their code sets up front; state is per instance, never
/// process-wide.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCodeSetProvider {
    sets: AHashMap<String, CodeSetSchema>,
}

impl InMemoryCodeSetProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, set: CodeSetSchema) {
        self.sets.insert(set.id.clone(), set);
    }

    pub fn with_set(mut self, set: CodeSetSchema) -> Self {
        self.insert(set);
        self
    }
}

#[async_trait]
impl CodeSetProvider for InMemoryCodeSetProvider {
    async fn get_code_set(&self, id: &str) -> Result<Option<CodeSetSchema>, CodeSetError> {
        Ok(self.sets.get(id).cloned())
    }
}
