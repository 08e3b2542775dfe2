//! Initial value generation
//!
//! Derives the starting value of a field from its schema node, and seeds a
//! fresh value tree for a tool's parameter schema.

use serde_json::{json, Map, Value};

use super::types::{SchemaKind, SchemaNode};
use crate::store::ValueTree;

/// Initial value for a field.
///
/// A declared `default` is returned verbatim. Otherwise the value depends on
/// the type: `""` for strings and unknown types, `0` for numbers, `false`,
/// `[]`, and `{}` for objects. Object sub-fields are not derived here; they
/// only appear in the tree once edited.
pub fn derive_default(node: &SchemaNode) -> Value {
    if let Some(default) = &node.default {
        return default.clone();
    }

    match &node.kind {
        SchemaKind::String => Value::String(String::new()),
        SchemaKind::Integer | SchemaKind::Number => json!(0),
        SchemaKind::Boolean => Value::Bool(false),
        SchemaKind::Array => Value::Array(Vec::new()),
        SchemaKind::Object => Value::Object(Map::new()),
        SchemaKind::Unknown(_) => Value::String(String::new()),
    }
}

/// Fresh value tree with one entry per top-level property
pub fn seed_tree(root: &SchemaNode) -> ValueTree {
    root.properties
        .iter()
        .map(|(name, prop)| (name.clone(), derive_default(prop)))
        .collect()
}
