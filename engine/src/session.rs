//! One form instance for one selected tool

use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{FormError, FormResult};
use crate::schema_form::{
    apply_variant, coerce_input, describe_fields, describe_variant_fields, seed_tree, variant_options,
    FieldDescriptor, KeyPath, SchemaNode, VariantOption,
};
use crate::store::{ValueStore, ValueTree};
use crate::submission::{SubmissionController, SubmissionState, ToolInvoker};
use crate::validator::missing_required;

/// Editable form state for a tool's parameter schema.
///
/// All edits go through key-path writes on the owned [`ValueStore`]. The
/// tree is seeded from the schema when the session is created, rebuilt when
/// a different schema is selected, and re-seeded after a successful
/// submission.
pub struct FormSession {
    tool_name: String,
    schema: Arc<SchemaNode>,
    store: ValueStore,
    /// Selected variant per node; `None` is the schema root
    selected_variants: BTreeMap<Option<KeyPath>, usize>,
    controller: SubmissionController,
}

impl FormSession {
    pub fn new(tool_name: impl Into<String>, schema: Arc<SchemaNode>, invoker: Arc<dyn ToolInvoker>) -> Self {
        let store = ValueStore::new(seed_tree(&schema));
        Self {
            tool_name: tool_name.into(),
            schema,
            store,
            selected_variants: BTreeMap::new(),
            controller: SubmissionController::new(invoker),
        }
    }

    /// Switch to another tool. The tree is rebuilt only when the schema
    /// reference actually changes.
    pub fn select_tool(&mut self, tool_name: impl Into<String>, schema: Arc<SchemaNode>) {
        self.tool_name = tool_name.into();
        if !Arc::ptr_eq(&self.schema, &schema) {
            self.schema = schema;
            self.reset();
        }
    }

    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    pub fn schema(&self) -> &Arc<SchemaNode> {
        &self.schema
    }

    pub fn tree(&self) -> &ValueTree {
        self.store.tree()
    }

    pub fn snapshot(&self) -> Arc<ValueTree> {
        self.store.snapshot()
    }

    pub fn revision(&self) -> u64 {
        self.store.revision()
    }

    pub fn get(&self, path: &KeyPath) -> Option<&Value> {
        self.store.get(path)
    }

    /// Schema node for `path`. At each level the selected variant's
    /// properties are consulted before the node's own and other variants'.
    fn node_at(&self, path: &KeyPath) -> FormResult<&SchemaNode> {
        let mut node = self.schema.as_ref();
        let mut at: Option<KeyPath> = None;
        for segment in path.segments() {
            let selected = self.selected_variants.get(&at).copied();
            node = node
                .field_in_variant(segment, selected)
                .ok_or_else(|| FormError::UnknownField(path.to_string()))?;
            at = Some(match at {
                Some(parent) => parent.child(segment.as_str()),
                None => KeyPath::field(segment.as_str()),
            });
        }
        Ok(node)
    }

    /// Store an already-typed value at `path`
    pub fn set(&mut self, path: &KeyPath, value: Value) -> FormResult<()> {
        self.node_at(path)?;
        self.store.set(path, value);
        self.controller.acknowledge();
        Ok(())
    }

    /// Store raw control input at `path`, coerced for the field's control
    pub fn edit(&mut self, path: &KeyPath, raw: &str) -> FormResult<()> {
        let value = coerce_input(self.node_at(path)?, path, raw)?;
        self.store.set(path, value);
        self.controller.acknowledge();
        Ok(())
    }

    fn variant_node(&self, path: Option<&KeyPath>) -> FormResult<&SchemaNode> {
        match path {
            Some(path) => self.node_at(path),
            None => Ok(self.schema.as_ref()),
        }
    }

    /// Choose variant `index` for the node at `path` (`None` for the root)
    pub fn select_variant(&mut self, path: Option<&KeyPath>, index: usize) -> FormResult<()> {
        let next = apply_variant(self.store.tree(), self.variant_node(path)?, path, index)?;
        self.store.replace(next);
        // Selections below this node were made under the previous variant
        self.selected_variants.retain(|key, _| match (key, path) {
            (Some(key), Some(path)) => !key.is_below(path),
            (Some(_), None) => false,
            (None, _) => true,
        });
        self.selected_variants.insert(path.cloned(), index);
        self.controller.acknowledge();
        Ok(())
    }

    pub fn selected_variant(&self, path: Option<&KeyPath>) -> Option<usize> {
        self.selected_variants.get(&path.cloned()).copied()
    }

    pub fn variant_options(&self, path: Option<&KeyPath>) -> FormResult<Vec<VariantOption>> {
        Ok(variant_options(self.variant_node(path)?))
    }

    /// Descriptors for the top-level fields
    pub fn fields(&self) -> Vec<FieldDescriptor> {
        describe_fields(&self.schema)
    }

    /// Descriptors for the fields of the currently selected variant at `path`
    pub fn selected_variant_fields(&self, path: Option<&KeyPath>) -> FormResult<Vec<FieldDescriptor>> {
        match self.selected_variant(path) {
            Some(index) => describe_variant_fields(self.variant_node(path)?, path, index),
            None => Ok(Vec::new()),
        }
    }

    pub fn missing_required(&self) -> Vec<String> {
        missing_required(&self.schema, self.store.tree())
    }

    pub fn submission_state(&self) -> SubmissionState {
        self.controller.state()
    }

    /// Validate and invoke the tool with the current tree.
    ///
    /// On success the raw result is returned and the form starts over from
    /// defaults. On any failure the entered values are kept.
    pub async fn submit(&mut self) -> FormResult<Value> {
        let snapshot = self.store.snapshot();
        let result = self
            .controller
            .submit(&self.tool_name, &self.schema, &snapshot)
            .await;
        if result.is_ok() {
            self.reset();
        }
        result
    }

    fn reset(&mut self) {
        self.store.replace(seed_tree(&self.schema));
        self.selected_variants.clear();
    }
}
