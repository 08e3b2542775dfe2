//! Required-field validation

use serde_json::Value;

use crate::error::{FormError, FormResult};
use crate::schema_form::SchemaNode;
use crate::store::ValueTree;

/// A required value counts as missing when absent, `null`, or `""`.
/// `0`, `false`, `[]` and `{}` are present.
pub fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Check the schema's top-level `required` names, stopping at the first
/// missing one.
pub fn validate_required(schema: &SchemaNode, tree: &ValueTree) -> FormResult<()> {
    match schema
        .required
        .iter()
        .find(|name| is_missing(tree.get(name.as_str())))
    {
        Some(name) => Err(FormError::MissingRequired(name.clone())),
        None => Ok(()),
    }
}

/// Every missing top-level required field, in declaration order
pub fn missing_required(schema: &SchemaNode, tree: &ValueTree) -> Vec<String> {
    schema
        .required
        .iter()
        .filter(|name| is_missing(tree.get(name.as_str())))
        .cloned()
        .collect()
}
