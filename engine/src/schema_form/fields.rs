//! Field Descriptors and Input Coercion
//!
//! The presentation layer renders one control per schema node. This module
//! says which control, and turns the raw text a control produces back into a
//! tree value:
//!
//! | schema              | control  | raw input becomes                         |
//! |---------------------|----------|-------------------------------------------|
//! | any node with enum  | select   | the matching enum value                   |
//! | integer / number    | numeric  | a number, or `""` when cleared            |
//! | boolean             | toggle   | `true` / `false`                          |
//! | array               | list     | comma-split, trimmed, non-empty strings   |
//! | object              | group    | (edited through its sub-fields)           |
//! | string / unknown    | text     | the text as typed                         |

use serde::Serialize;
use serde_json::{json, Number, Value};

use super::array_field::{format_list, parse_list};
use super::types::{KeyPath, SchemaKind, SchemaNode};
use super::variant_selector::{variant_options, VariantOption};
use crate::error::{FormError, FormResult};

// ============================================================================
// Descriptors
// ============================================================================

/// Control a field renders as
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "control", rename_all = "snake_case")]
pub enum FieldControl {
    Select { options: Vec<Value> },
    Numeric { integer: bool },
    Toggle,
    List,
    Group { fields: Vec<FieldDescriptor> },
    Text,
}

/// Everything the presentation layer needs to render one field
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub path: KeyPath,
    pub label: String,
    pub type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
    #[serde(flatten)]
    pub control: FieldControl,
    /// Selector entries when the node has oneOf/anyOf alternatives
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<VariantOption>,
}

/// Descriptors for the top-level fields of a tool schema
pub fn describe_fields(root: &SchemaNode) -> Vec<FieldDescriptor> {
    describe_properties(root, None)
}

/// Descriptors for the fields a variant contributes, placed under `base`
pub fn describe_variant_fields(
    node: &SchemaNode,
    base: Option<&KeyPath>,
    index: usize,
) -> FormResult<Vec<FieldDescriptor>> {
    let location = base.map(|p| p.to_string()).unwrap_or_else(|| ".".to_string());
    let variants = node.variants();
    if variants.is_empty() {
        return Err(FormError::NoVariants(location));
    }

    let variant = variants.get(index).ok_or(FormError::VariantOutOfRange {
        path: location,
        index,
        count: variants.len(),
    })?;

    Ok(describe_properties(variant, base))
}

fn describe_properties(node: &SchemaNode, base: Option<&KeyPath>) -> Vec<FieldDescriptor> {
    node.properties
        .iter()
        .map(|(name, prop)| {
            let path = match base {
                Some(base) => base.child(name),
                None => KeyPath::field(name),
            };
            describe_node(path, prop, node.is_required(name))
        })
        .collect()
}

fn describe_node(path: KeyPath, node: &SchemaNode, required: bool) -> FieldDescriptor {
    let control = control_for(node, &path);
    FieldDescriptor {
        label: node.title.clone().unwrap_or_else(|| path.name().to_string()),
        type_name: node.type_name().to_string(),
        description: node.description.clone(),
        required,
        control,
        variants: variant_options(node),
        path,
    }
}

fn control_for(node: &SchemaNode, path: &KeyPath) -> FieldControl {
    if node.is_enum() {
        return FieldControl::Select {
            options: node.enum_values.clone(),
        };
    }

    match &node.kind {
        SchemaKind::Integer => FieldControl::Numeric { integer: true },
        SchemaKind::Number => FieldControl::Numeric { integer: false },
        SchemaKind::Boolean => FieldControl::Toggle,
        SchemaKind::Array => FieldControl::List,
        SchemaKind::Object => FieldControl::Group {
            fields: describe_properties(node, Some(path)),
        },
        SchemaKind::String | SchemaKind::Unknown(_) => FieldControl::Text,
    }
}

// ============================================================================
// Input Coercion
// ============================================================================

/// Convert raw control text for the field at `path` into a tree value
pub fn coerce_input(node: &SchemaNode, path: &KeyPath, raw: &str) -> FormResult<Value> {
    let invalid = |reason: String| FormError::InvalidInput {
        path: path.to_string(),
        reason,
    };

    if node.is_enum() {
        if raw.is_empty() {
            return Ok(Value::String(String::new()));
        }
        return node
            .enum_values
            .iter()
            .find(|allowed| display_value(allowed) == raw)
            .cloned()
            .ok_or_else(|| invalid(format!("'{}' is not one of the allowed values", raw)));
    }

    match &node.kind {
        SchemaKind::Integer | SchemaKind::Number => {
            let trimmed = raw.trim();
            // A cleared numeric input stays empty until re-edited
            if trimmed.is_empty() {
                return Ok(Value::String(String::new()));
            }
            if let Ok(n) = trimmed.parse::<i64>() {
                return Ok(json!(n));
            }
            if let Ok(n) = trimmed.parse::<u64>() {
                return Ok(json!(n));
            }
            if matches!(node.kind, SchemaKind::Integer) {
                return Err(invalid(format!("'{}' is not an integer", raw)));
            }
            trimmed
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| invalid(format!("'{}' is not a number", raw)))
        }
        SchemaKind::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "on" | "yes" | "1" => Ok(Value::Bool(true)),
            "false" | "off" | "no" | "0" | "" => Ok(Value::Bool(false)),
            _ => Err(invalid(format!("'{}' is not a boolean", raw))),
        },
        SchemaKind::Array => Ok(Value::Array(parse_list(raw))),
        SchemaKind::Object => Err(invalid(
            "object fields are edited through their nested fields".to_string(),
        )),
        SchemaKind::String | SchemaKind::Unknown(_) => Ok(Value::String(raw.to_string())),
    }
}

/// Text a control shows for a current value
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => format_list(items),
        other => other.to_string(),
    }
}
