use serde::{Deserialize, Serialize};

use crate::schema::rule::ConditionalRule;

/// The kind of input or display element a field renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    Text,
    TextArea,
    Number,
    Date,
    Checkbox,
    Select,
    MultiSelect,
    Radio,
    Label,
    Section,
}

/// How a child field relates to its parent container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationshipKind {
    #[default]
    Child,
    Repeating,
    Linked,
}

/// Declarative validation constraints attached to a field definition.
/// Enforcement belongs to the caller; the core only carries them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationConstraints {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub pattern: Option<String>,
}

/// A single selectable option shown for choice fields, either declared
/// inline on the field or resolved from a code set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayOption {
    pub value: String,
    pub label: String,
    #[serde(default)]
    pub is_default: bool,
}

/// Type-specific configuration, keyed by an explicit `kind` discriminator.
///
/// A closed variant set instead of one struct full of nullable option
/// groups: the discriminator decides the shape once at deserialization and
/// downstream code matches exhaustively.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FieldConfig {
    #[default]
    None,
    #[serde(rename_all = "camelCase")]
    Text {
        #[serde(default)]
        multiline: bool,
        placeholder: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Number {
        step: Option<f64>,
        #[serde(default)]
        decimal_places: Option<u8>,
    },
    #[serde(rename_all = "camelCase")]
    Date {
        min_date: Option<String>,
        max_date: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Select {
        #[serde(default)]
        multiple: bool,
        #[serde(default)]
        searchable: bool,
    },
    #[serde(rename_all = "camelCase")]
    Section {
        #[serde(default)]
        collapsible: bool,
        #[serde(default)]
        collapsed: bool,
    },
}

/// One field of a module as stored on the wire. Immutable and JSON
/// round-trippable; the hierarchy builder turns a flat array of these into
/// a [`ModuleTree`](crate::hierarchy::ModuleTree).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: Option<String>,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub relationship: RelationshipKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub validation: ValidationConstraints,
    #[serde(default)]
    pub rules: Vec<ConditionalRule>,
    /// Inline option list. When non-empty it wins over `code_set_id` and
    /// no fetch is issued for this field.
    #[serde(default)]
    pub options: Vec<DisplayOption>,
    #[serde(default)]
    pub code_set_id: Option<String>,
    #[serde(default)]
    pub config: FieldConfig,
}

impl FieldDefinition {
    /// Minimal definition used by builders and tests; everything else
    /// takes its default.
    pub fn new(id: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            field_type,
            label: None,
            order: 0,
            parent_id: None,
            relationship: RelationshipKind::default(),
            required: false,
            validation: ValidationConstraints::default(),
            rules: Vec::new(),
            options: Vec::new(),
            code_set_id: None,
            config: FieldConfig::default(),
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// True when the field should have its options resolved from a code
    /// set during a build.
    pub fn wants_code_set(&self) -> bool {
        self.code_set_id.is_some() && self.options.is_empty()
    }
}
