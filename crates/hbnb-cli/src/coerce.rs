//! Turning shell words into typed field values.

use hbnb_types::{FieldKind, FieldValue};
use tracing::debug;

/// Parse a `create` parameter of the form `key=value`.
///
/// Quoted values are strings, with `_` standing for a space and `\"` for a
/// quote. Unquoted values are integers or decimals by shape; `amenity_ids`
/// also takes a comma-separated list. Anything else is skipped.
pub fn parse_param(param: &str) -> Option<(String, FieldValue)> {
    let (key, raw) = param.split_once('=')?;
    if key.is_empty() {
        return None;
    }
    let value = if let Some(text) = unquote(raw) {
        FieldValue::Str(text.replace("\\\"", "\"").replace('_', " "))
    } else if key == "amenity_ids" {
        FieldValue::Ids(split_ids(raw))
    } else if let Some(number) = number_by_shape(raw) {
        number
    } else {
        debug!(param, "skipping parameter with unrecognized value");
        return None;
    };
    Some((key.to_string(), value))
}

/// Parse an `update` value for a field of the given kind.
///
/// Unknown fields (`kind` is `None`) are passed through as strings and left
/// for the store to reject.
pub fn parse_value(kind: Option<FieldKind>, raw: &str) -> FieldValue {
    let text = unquote(raw).unwrap_or(raw);
    match kind {
        Some(FieldKind::Int) => text
            .parse()
            .map(FieldValue::Int)
            .unwrap_or_else(|_| FieldValue::from(text)),
        Some(FieldKind::Float) => text
            .parse()
            .map(FieldValue::Float)
            .unwrap_or_else(|_| FieldValue::from(text)),
        Some(FieldKind::Ids) => FieldValue::Ids(split_ids(text)),
        Some(FieldKind::Str) | None => FieldValue::from(text),
    }
}

/// Make a shaped value fit a string field.
///
/// `name=123` on a string field keeps the digits as text.
pub fn fit(kind: Option<FieldKind>, value: FieldValue) -> FieldValue {
    match (kind, value) {
        (Some(FieldKind::Str), FieldValue::Int(n)) => FieldValue::Str(n.to_string()),
        (Some(FieldKind::Str), FieldValue::Float(x)) => FieldValue::Str(x.to_string()),
        (_, value) => value,
    }
}

fn unquote(raw: &str) -> Option<&str> {
    raw.strip_prefix('"')?.strip_suffix('"')
}

fn split_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect()
}

fn number_by_shape(raw: &str) -> Option<FieldValue> {
    if raw.contains('.') {
        raw.parse().ok().map(FieldValue::Float)
    } else {
        raw.parse().ok().map(FieldValue::Int)
    }
}
