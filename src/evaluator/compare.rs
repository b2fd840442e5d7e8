//! Typed comparison semantics shared by all operators: values coerce
//! numeric first, then date, then fall back to string comparison.

use std::borrow::Cow;
use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::data::FieldLookup;

/// Equality per the loose rule: numeric compare when both operands coerce
/// to numbers, else date compare, else case-insensitive string compare.
/// A missing field and an explicit null rule value both count as "no
/// value" and are equal to each other and to nothing else.
pub(crate) fn loose_eq(lhs: FieldLookup<'_>, rhs: &Value) -> bool {
    let left = normalize(lhs);
    let right = normalize_value(rhs);
    match (left, right) {
        (None, None) => true,
        (None, Some(_)) | (Some(_), None) => false,
        (Some(a), Some(b)) => eq_values(a, b),
    }
}

fn eq_values(a: &Value, b: &Value) -> bool {
    if let (Some(x), Some(y)) = (as_number(a), as_number(b)) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (as_date(a), as_date(b)) {
        return x == y;
    }
    canonical(a).to_lowercase() == canonical(b).to_lowercase()
}

/// Ordering per the loose rule: numeric parse of both operands first, then
/// date parse, then ordinal string comparison of the canonical forms.
pub(crate) fn loose_cmp(a: &Value, b: &Value) -> Ordering {
    if let (Some(x), Some(y)) = (as_number(a), as_number(b)) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
    if let (Some(x), Some(y)) = (as_date(a), as_date(b)) {
        return x.cmp(&y);
    }
    canonical(a).as_ref().cmp(canonical(b).as_ref())
}

/// Missing and explicit null collapse to `None` for equality purposes.
fn normalize(lookup: FieldLookup<'_>) -> Option<&Value> {
    match lookup {
        FieldLookup::Missing => None,
        FieldLookup::Present(value) => normalize_value(value),
    }
}

fn normalize_value(value: &Value) -> Option<&Value> {
    match value {
        Value::Null => None,
        other => Some(other),
    }
}

pub(crate) fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Accepted date spellings, tried in order: RFC 3339, bare date, local
/// date-time without offset.
pub(crate) fn as_date(value: &Value) -> Option<NaiveDateTime> {
    let text = value.as_str()?.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S").ok()
}

/// Canonical string form used by the string operators and the ordinal
/// fallback. Strings stay as-is; everything else renders as its JSON text.
pub(crate) fn canonical(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}

/// Empty = missing, null, empty string, or whitespace-only string.
pub(crate) fn is_empty(lookup: FieldLookup<'_>) -> bool {
    match lookup {
        FieldLookup::Missing => true,
        FieldLookup::Present(Value::Null) => true,
        FieldLookup::Present(Value::String(s)) => s.trim().is_empty(),
        FieldLookup::Present(_) => false,
    }
}

/// Null = missing or explicit null only.
pub(crate) fn is_null(lookup: FieldLookup<'_>) -> bool {
    matches!(
        lookup,
        FieldLookup::Missing | FieldLookup::Present(Value::Null)
    )
}
