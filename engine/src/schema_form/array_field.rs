//! Array Field Input
//!
//! Arrays are edited as one line of comma-separated text. Items always come
//! back as strings, whatever item type the schema declares.

use serde_json::Value;

/// Split on commas, trim each item, drop empty items.
pub fn parse_list(raw: &str) -> Vec<Value> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| Value::String(item.to_string()))
        .collect()
}

/// Inverse of [`parse_list`] for display: items joined with ", "
pub fn format_list(items: &[Value]) -> String {
    items
        .iter()
        .map(|item| match item {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
