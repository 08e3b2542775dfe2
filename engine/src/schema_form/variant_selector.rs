//! Variant Selection
//!
//! Handles oneOf/anyOf alternatives: lists them for a selector and writes the
//! chosen variant's initial values into the value tree.

use serde::Serialize;

use super::generator::derive_default;
use super::types::{KeyPath, SchemaNode};
use crate::error::{FormError, FormResult};
use crate::store::{self, ValueTree};

/// One entry of a variant selector
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VariantOption {
    pub index: usize,
    /// Variant title, or "Variant N" (1-based) when untitled
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Selector entries for a node's alternatives
pub fn variant_options(node: &SchemaNode) -> Vec<VariantOption> {
    node.variants()
        .iter()
        .enumerate()
        .map(|(index, variant)| VariantOption {
            index,
            title: variant
                .title
                .clone()
                .unwrap_or_else(|| format!("Variant {}", index + 1)),
            description: variant.description.clone(),
        })
        .collect()
}

/// Apply variant `index` of `node`, which sits at `base` (`None` for the
/// schema root).
///
/// Every property the variant declares is overwritten with its derived
/// default. Entries the variant does not declare stay as they are, including
/// ones written by a previously selected variant.
pub fn apply_variant(
    tree: &ValueTree,
    node: &SchemaNode,
    base: Option<&KeyPath>,
    index: usize,
) -> FormResult<ValueTree> {
    let location = base.map(|p| p.to_string()).unwrap_or_else(|| ".".to_string());
    let variants = node.variants();
    if variants.is_empty() {
        return Err(FormError::NoVariants(location));
    }

    let variant = variants.get(index).ok_or(FormError::VariantOutOfRange {
        path: location.clone(),
        index,
        count: variants.len(),
    })?;

    let mut next = tree.clone();
    for (name, prop) in &variant.properties {
        let path = match base {
            Some(base) => base.child(name),
            None => KeyPath::field(name),
        };
        store::assign(&mut next, &path, derive_default(prop));
    }

    log::debug!(
        "Applied variant {} at '{}' ({} properties)",
        index,
        location,
        variant.properties.len()
    );

    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn two_variant_schema() -> SchemaNode {
        SchemaNode::from_value(&json!({
            "oneOf": [
                { "title": "A", "properties": { "x": { "type": "string" } } },
                { "title": "B", "properties": { "y": { "type": "integer" } } }
            ]
        }))
    }

    #[test]
    fn test_variant_options_titles() {
        let node = SchemaNode::from_value(&json!({
            "anyOf": [
                { "title": "By name", "description": "Look up by name" },
                { "type": "integer" }
            ]
        }));

        let options = variant_options(&node);
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].title, "By name");
        assert_eq!(options[0].description.as_deref(), Some("Look up by name"));
        assert_eq!(options[1].title, "Variant 2");
        assert_eq!(options[1].index, 1);
    }

    #[test]
    fn test_select_keeps_previous_variant_fields() {
        let schema = two_variant_schema();
        let mut tree = ValueTree::new();
        tree.insert("x".to_string(), json!("typed"));
        tree.insert("unrelated".to_string(), json!(7));

        let after = apply_variant(&tree, &schema, None, 1).unwrap();

        assert_eq!(
            Value::Object(after),
            json!({ "x": "typed", "unrelated": 7, "y": 0 })
        );
    }

    #[test]
    fn test_reselect_overwrites_declared_fields() {
        let schema = two_variant_schema();
        let mut tree = ValueTree::new();
        tree.insert("x".to_string(), json!("typed"));

        let after = apply_variant(&tree, &schema, None, 0).unwrap();
        assert_eq!(after.get("x"), Some(&json!("")));
    }

    #[test]
    fn test_nested_variant_writes_under_base() {
        let node = SchemaNode::from_value(&json!({
            "type": "object",
            "anyOf": [
                { "properties": { "id": { "type": "integer", "default": 1 } } }
            ]
        }));
        let base = KeyPath::field("target");

        let after = apply_variant(&ValueTree::new(), &node, Some(&base), 0).unwrap();
        assert_eq!(Value::Object(after), json!({ "target": { "id": 1 } }));
    }

    #[test]
    fn test_out_of_range_and_missing_variants() {
        let schema = two_variant_schema();
        assert_eq!(
            apply_variant(&ValueTree::new(), &schema, None, 2),
            Err(FormError::VariantOutOfRange {
                path: ".".to_string(),
                index: 2,
                count: 2
            })
        );

        let plain = SchemaNode::from_value(&json!({ "type": "string" }));
        let base = KeyPath::field("name");
        assert_eq!(
            apply_variant(&ValueTree::new(), &plain, Some(&base), 0),
            Err(FormError::NoVariants("name".to_string()))
        );
    }
}
