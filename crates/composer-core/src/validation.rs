//! Missing-Field Check
//!
//! Advisory only: the result drives highlighting, never blocks a submit.

use serde_json::{Map, Value};

use crate::fields::{is_other, other_base, renders_as_select, SelectOption};
use crate::model::Intent;

/// Empty string (after trim), empty array, empty object, null
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(_) => false,
    }
}

fn base_is_other(intent: &Intent, base: &str, fields: &Map<String, Value>) -> bool {
    let Some(value) = fields.get(base).and_then(Value::as_str) else {
        return false;
    };
    if is_other(value) {
        return true;
    }
    intent
        .options(base)
        .iter()
        .find(|o| o.value == value)
        .map(|o| is_other(&SelectOption::from(o).label))
        .unwrap_or(false)
}

/// Required keys of `intent` with no usable value in `fields`.
///
/// An "Other" companion (whose base renders as a select) only counts while
/// the base resolves to "other".
pub fn list_missing(intent: &Intent, fields: &Map<String, Value>) -> Vec<String> {
    intent
        .required
        .iter()
        .filter(|key| match other_base(key) {
            Some(base) if renders_as_select(intent, base) => base_is_other(intent, base, fields),
            _ => true,
        })
        .filter(|key| is_blank(fields.get(key.as_str())))
        .cloned()
        .collect()
}
