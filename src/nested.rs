//! Uniform list access over one-or-many nested record values.
//!
//! The XML-to-tree conversion collapses a single child element to a bare value
//! while repeated children become an array. Every descent into a record goes
//! through [`force_list`] so callers iterate the same way regardless of cardinality.

use serde_json::Value;

use crate::reporter::Reporter;

/// Return `value` as an ordered list of items.
///
/// - absent or `null` → empty list
/// - array → its elements, order preserved
/// - anything else → a one-element list holding it
#[must_use]
pub fn force_list(value: Option<&Value>) -> Vec<&Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().collect(),
        Some(item) => vec![item],
    }
}

/// [`force_list`] that also reports which case was taken.
pub fn force_list_traced<'a>(value: Option<&'a Value>, reporter: &dyn Reporter) -> Vec<&'a Value> {
    let items = force_list(value);
    match value {
        None | Some(Value::Null) => {
            reporter.debug("force_list received no value, returning an empty list");
        }
        Some(Value::Array(_)) => reporter.debug(&format!(
            "force_list received list of length {}, returning it unchanged",
            items.len()
        )),
        Some(item) => reporter.debug(&format!(
            "force_list received single {}, returning it in a list",
            kind_name(item)
        )),
    }
    items
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
