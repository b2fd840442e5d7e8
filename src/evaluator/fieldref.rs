use once_cell::sync::Lazy;
use regex::Regex;

use crate::data::{FieldLookup, WorkflowFormData};

/// Wire grammar of a field reference: `(<moduleKey>.)?<fieldId>`. The
/// pattern is a compatibility contract; a numeric module segment denotes a
/// module's numeric id, a non-numeric one a module name.
static FIELD_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^((?<module>[A-Za-z_]\w*|\d+)\.)?(?<field>[A-Za-z_]\w*)$")
        .expect("field reference pattern is valid")
});

/// A parsed field reference. `module` is `None` for bare references, which
/// bind to the module currently being evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldReference<'a> {
    pub module: Option<&'a str>,
    pub field: &'a str,
}

impl<'a> FieldReference<'a> {
    /// Parses `raw` against the grammar. `None` for strings outside it.
    pub fn parse(raw: &'a str) -> Option<Self> {
        let captures = FIELD_REF.captures(raw)?;
        let field = captures.name("field")?.as_str();
        let module = captures.name("module").map(|m| m.as_str());
        Some(Self { module, field })
    }
}

/// Resolves a raw reference against the snapshot.
///
/// A prefix only denotes cross-module scope when it names a module key
/// that actually exists in the data; otherwise the whole raw string is
/// treated as a field of `current_module`. Module numeric ids and names
/// are both plain snapshot keys, so one lookup covers both spellings.
pub(crate) fn resolve<'d>(
    raw: &str,
    data: &'d WorkflowFormData,
    current_module: &str,
) -> FieldLookup<'d> {
    if let Some(reference) = FieldReference::parse(raw)
        && let Some(module) = reference.module
        && data.has_module(module)
    {
        return data.lookup(module, reference.field);
    }
    data.lookup(current_module, raw)
}
