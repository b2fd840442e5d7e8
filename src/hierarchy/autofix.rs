use ahash::AHashMap;

use crate::schema::FieldDefinition;

use super::on_parent_cycle;

/// Produces a corrected copy of `fields` in which every orphaned field
/// (dangling parent reference) and every field sitting on a parent cycle
/// is re-parented to root. The input is left untouched; running the
/// transform on its own output is a no-op.
pub fn auto_fix(fields: &[FieldDefinition]) -> Vec<FieldDefinition> {
    let by_id: AHashMap<&str, usize> = fields
        .iter()
        .enumerate()
        .map(|(i, f)| (f.id.as_str(), i))
        .collect();

    fields
        .iter()
        .map(|field| {
            let mut fixed = field.clone();
            if let Some(parent) = field.parent_id.as_deref()
                && (!by_id.contains_key(parent) || on_parent_cycle(field, fields, &by_id))
            {
                fixed.parent_id = None;
            }
            fixed
        })
        .collect()
}
