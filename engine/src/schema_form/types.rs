//! Core types for schema-driven form state

use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::{FormError, FormResult};

// ============================================================================
// Schema Node
// ============================================================================

/// Type tag of a schema node
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SchemaKind {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
    /// Missing or unrecognised `type`. Keeps the raw tag when one was given.
    Unknown(Option<String>),
}

impl Default for SchemaKind {
    fn default() -> Self {
        SchemaKind::Unknown(None)
    }
}

impl SchemaKind {
    /// Map a JSON Schema `type` string onto a kind
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("string") => SchemaKind::String,
            Some("integer") => SchemaKind::Integer,
            Some("number") => SchemaKind::Number,
            Some("boolean") => SchemaKind::Boolean,
            Some("array") => SchemaKind::Array,
            Some("object") => SchemaKind::Object,
            Some(other) => SchemaKind::Unknown(Some(other.to_string())),
            None => SchemaKind::Unknown(None),
        }
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &str {
        match self {
            SchemaKind::String => "string",
            SchemaKind::Integer => "integer",
            SchemaKind::Number => "number",
            SchemaKind::Boolean => "boolean",
            SchemaKind::Array => "array",
            SchemaKind::Object => "object",
            SchemaKind::Unknown(Some(tag)) => tag,
            SchemaKind::Unknown(None) => "unknown",
        }
    }
}

/// A resolved parameter schema node.
///
/// `properties` and `required` are kept whenever the source declared them,
/// not only for `object` nodes: variants are often written as
/// `{"title": "...", "properties": {...}}` without a `type`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SchemaNode {
    pub kind: SchemaKind,
    pub title: Option<String>,
    pub description: Option<String>,
    pub default: Option<Value>,
    /// Allowed values, in declaration order
    pub enum_values: Vec<Value>,
    /// Sub-fields, in declaration order
    pub properties: Vec<(String, SchemaNode)>,
    /// Required sub-field names at this level, in declaration order
    pub required: Vec<String>,
    pub one_of: Vec<SchemaNode>,
    pub any_of: Vec<SchemaNode>,
}

impl SchemaNode {
    /// Create a bare node of the given kind
    pub fn of_kind(kind: SchemaKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    pub fn type_name(&self) -> &str {
        self.kind.type_name()
    }

    pub fn is_object(&self) -> bool {
        matches!(self.kind, SchemaKind::Object)
    }

    pub fn is_enum(&self) -> bool {
        !self.enum_values.is_empty()
    }

    /// Declared property by name
    pub fn property(&self, name: &str) -> Option<&SchemaNode> {
        self.properties
            .iter()
            .find(|(prop_name, _)| prop_name == name)
            .map(|(_, node)| node)
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    /// The alternatives offered by this node: `oneOf` when non-empty,
    /// otherwise `anyOf`.
    pub fn variants(&self) -> &[SchemaNode] {
        if !self.one_of.is_empty() {
            &self.one_of
        } else {
            &self.any_of
        }
    }

    pub fn has_variants(&self) -> bool {
        !self.variants().is_empty()
    }

    /// Sub-field lookup used for editing: declared properties first, then
    /// properties contributed by any of this node's variants.
    pub fn field(&self, name: &str) -> Option<&SchemaNode> {
        self.property(name).or_else(|| {
            self.variants()
                .iter()
                .find_map(|variant| variant.property(name))
        })
    }

    /// Like [`SchemaNode::field`], but the variant at `selected` wins over
    /// declared properties and the other variants.
    pub fn field_in_variant(&self, name: &str, selected: Option<usize>) -> Option<&SchemaNode> {
        selected
            .and_then(|index| self.variants().get(index))
            .and_then(|variant| variant.property(name))
            .or_else(|| self.field(name))
    }

    /// Walk `path` from this node through [`SchemaNode::field`]
    pub fn node_at(&self, path: &KeyPath) -> Option<&SchemaNode> {
        path.segments()
            .iter()
            .try_fold(self, |node, segment| node.field(segment))
    }
}

// ============================================================================
// Key Path
// ============================================================================

/// Dot-delimited address of one location in a value tree,
/// e.g. `"filters.date.from"`. Never empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// Parse a dotted path. Empty paths and empty segments are rejected.
    pub fn parse(s: &str) -> FormResult<Self> {
        if s.is_empty() {
            return Err(FormError::EmptyPath);
        }

        let segments: Vec<String> = s.split('.').map(String::from).collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(FormError::EmptySegment(s.to_string()));
        }

        Ok(Self { segments })
    }

    /// Single-segment path for a top-level property
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            segments: vec![name.into()],
        }
    }

    /// Path to a sub-field of this one
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut new = self.clone();
        new.segments.push(name.into());
        new
    }

    /// True when `self` lies strictly below `ancestor`
    pub fn is_below(&self, ancestor: &KeyPath) -> bool {
        self.segments.len() > ancestor.segments.len() && self.segments.starts_with(&ancestor.segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Leaf property name
    pub fn name(&self) -> &str {
        self.split_last().1
    }

    /// Interior segments and the final segment
    pub fn split_last(&self) -> (&[String], &str) {
        match self.segments.split_last() {
            Some((last, parents)) => (parents, last.as_str()),
            None => (&[], ""),
        }
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl FromStr for KeyPath {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for KeyPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ============================================================================
// Tests
// ============================================================================
