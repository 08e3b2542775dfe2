//! JSON Schema resolution with $ref support
//!
//! Resolves raw tool parameter schemas into a [`SchemaNode`] tree, handling
//! local `$ref` references, `oneOf`/`anyOf`, and nested properties.
//! Resolution never fails: anything malformed degrades to an
//! [`SchemaKind::Unknown`] node, which renders as free text.

use serde_json::Value;
use std::collections::{HashMap, HashSet};

use super::types::{SchemaKind, SchemaNode};

/// Default nesting limit for schema resolution
pub const DEFAULT_MAX_DEPTH: usize = 20;

// ============================================================================
// Resolution Context
// ============================================================================

/// Context for schema resolution, carrying available definitions
pub struct SchemaResolutionContext {
    /// Local definitions from the root schema (`#/$defs/*` or `#/definitions/*`)
    pub definitions: HashMap<String, Value>,
    /// Refs currently being expanded, for cycle detection
    visited_refs: HashSet<String>,
    pub max_depth: usize,
}

impl Default for SchemaResolutionContext {
    fn default() -> Self {
        Self {
            definitions: HashMap::new(),
            visited_refs: HashSet::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl SchemaResolutionContext {
    /// Create a new context with definitions extracted from a schema
    pub fn from_schema(schema: &Value) -> Self {
        let mut ctx = Self::default();

        for key in ["definitions", "$defs"] {
            if let Some(defs) = schema.get(key).and_then(|v| v.as_object()) {
                for (name, def) in defs {
                    ctx.definitions.insert(name.clone(), def.clone());
                }
            }
        }

        ctx
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn enter_ref(&mut self, ref_path: &str) -> bool {
        self.visited_refs.insert(ref_path.to_string())
    }

    fn exit_ref(&mut self, ref_path: &str) {
        self.visited_refs.remove(ref_path);
    }
}

impl SchemaNode {
    /// Resolve a raw schema with default limits
    pub fn from_value(schema: &Value) -> Self {
        let mut ctx = SchemaResolutionContext::from_schema(schema);
        resolve_schema(schema, &mut ctx, 0)
    }

    /// Resolve a raw schema with a custom nesting limit
    pub fn from_value_with_depth(schema: &Value, max_depth: usize) -> Self {
        let mut ctx = SchemaResolutionContext::from_schema(schema).with_max_depth(max_depth);
        resolve_schema(schema, &mut ctx, 0)
    }
}

impl From<&Value> for SchemaNode {
    fn from(schema: &Value) -> Self {
        SchemaNode::from_value(schema)
    }
}

// ============================================================================
// Schema Resolution
// ============================================================================

/// Resolve a JSON Schema value into a [`SchemaNode`] tree
pub fn resolve_schema(schema: &Value, ctx: &mut SchemaResolutionContext, depth: usize) -> SchemaNode {
    if depth > ctx.max_depth {
        log::warn!("Schema nesting exceeds {} levels, degrading to text", ctx.max_depth);
        return degraded("Max depth exceeded".to_string());
    }

    if !schema.is_object() {
        log::debug!("Non-object schema {} treated as unknown", schema);
        return SchemaNode::default();
    }

    if let Some(ref_value) = schema.get("$ref").and_then(|v| v.as_str()) {
        let mut node = resolve_ref(ref_value, ctx, depth);
        // Annotations next to a $ref refine the referenced node
        let overlay = extract_annotations(schema);
        if overlay.title.is_some() {
            node.title = overlay.title;
        }
        if overlay.description.is_some() {
            node.description = overlay.description;
        }
        if overlay.default.is_some() {
            node.default = overlay.default;
        }
        return node;
    }

    let mut node = extract_annotations(schema);
    node.kind = SchemaKind::from_tag(type_tag(schema));

    if let Some(props) = schema.get("properties").and_then(|v| v.as_object()) {
        node.properties = props
            .iter()
            .map(|(name, prop_schema)| (name.clone(), resolve_schema(prop_schema, ctx, depth + 1)))
            .collect();
    }

    if let Some(required) = schema.get("required").and_then(|v| v.as_array()) {
        for name in required.iter().filter_map(|v| v.as_str()) {
            if !node.is_required(name) {
                node.required.push(name.to_string());
            }
        }
    }

    node.one_of = resolve_alternatives(schema.get("oneOf"), ctx, depth);
    node.any_of = resolve_alternatives(schema.get("anyOf"), ctx, depth);

    node
}

/// The `type` tag; for union types like `["string", "null"]` the first
/// non-null entry wins.
fn type_tag(schema: &Value) -> Option<&str> {
    match schema.get("type")? {
        Value::String(tag) => Some(tag.as_str()),
        Value::Array(tags) => tags
            .iter()
            .filter_map(|t| t.as_str())
            .find(|t| *t != "null"),
        _ => None,
    }
}

fn resolve_alternatives(value: Option<&Value>, ctx: &mut SchemaResolutionContext, depth: usize) -> Vec<SchemaNode> {
    value
        .and_then(|v| v.as_array())
        .map(|alternatives| {
            alternatives
                .iter()
                .map(|v| resolve_schema(v, ctx, depth + 1))
                .collect()
        })
        .unwrap_or_default()
}

/// Resolve a $ref reference
fn resolve_ref(ref_value: &str, ctx: &mut SchemaResolutionContext, depth: usize) -> SchemaNode {
    if !ctx.enter_ref(ref_value) {
        log::warn!("Circular schema reference: {}", ref_value);
        return degraded(format!("Circular reference: {}", ref_value));
    }

    let def_name = ref_value
        .strip_prefix("#/definitions/")
        .or_else(|| ref_value.strip_prefix("#/$defs/"));

    let result = match def_name {
        Some(name) => match ctx.definitions.get(name).cloned() {
            Some(def_schema) => resolve_schema(&def_schema, ctx, depth + 1),
            None => degraded(format!("Definition not found: {}", name)),
        },
        None => degraded(format!("Unknown ref: {}", ref_value)),
    };

    ctx.exit_ref(ref_value);
    result
}

/// Title, description, default and enum of a schema object
fn extract_annotations(schema: &Value) -> SchemaNode {
    SchemaNode {
        title: schema.get("title").and_then(|v| v.as_str()).map(String::from),
        description: schema.get("description").and_then(|v| v.as_str()).map(String::from),
        default: schema.get("default").cloned(),
        enum_values: schema
            .get("enum")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default(),
        ..Default::default()
    }
}

fn degraded(reason: String) -> SchemaNode {
    SchemaNode {
        description: Some(reason),
        ..Default::default()
    }
}

// ============================================================================
// Tests
// ============================================================================
