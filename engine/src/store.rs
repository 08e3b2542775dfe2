//! Key-path addressed value tree
//!
//! The form's in-progress values live in one nested mapping. Fields are read
//! and written through [`KeyPath`]s; writes create missing intermediate
//! mappings on the way down.

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::schema_form::KeyPath;

/// Mapping from top-level property name to value
pub type ValueTree = Map<String, Value>;

/// Value at `path`, or `None` as soon as a segment is missing or an
/// intermediate value is not a mapping.
pub fn get<'a>(tree: &'a ValueTree, path: &KeyPath) -> Option<&'a Value> {
    let (parents, last) = path.split_last();
    let mut level = tree;
    for segment in parents {
        level = level.get(segment)?.as_object()?;
    }
    level.get(last)
}

/// Copy of `tree` with `value` stored at `path`.
///
/// The returned root is always a new mapping, so holders of the old tree see
/// no change.
pub fn set(tree: &ValueTree, path: &KeyPath, value: Value) -> ValueTree {
    let mut next = tree.clone();
    assign(&mut next, path, value);
    next
}

/// In-place write with auto-vivification: interior segments that are absent
/// or hold a non-mapping are replaced by an empty mapping.
pub(crate) fn assign(tree: &mut ValueTree, path: &KeyPath, value: Value) {
    let (parents, last) = path.split_last();
    let mut level = tree;
    for segment in parents {
        let slot = level
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        level = match slot {
            Value::Object(map) => map,
            _ => return,
        };
    }
    level.insert(last.to_string(), value);
}

// ============================================================================
// Value Store
// ============================================================================

/// Owner of one form's value tree.
///
/// Every write swaps in a new root and bumps the revision, so observers can
/// detect change with [`ValueStore::revision`] or `Arc::ptr_eq` on
/// [`ValueStore::snapshot`].
#[derive(Clone, Debug, Default)]
pub struct ValueStore {
    tree: Arc<ValueTree>,
    revision: u64,
}

impl ValueStore {
    pub fn new(tree: ValueTree) -> Self {
        Self {
            tree: Arc::new(tree),
            revision: 0,
        }
    }

    pub fn tree(&self) -> &ValueTree {
        &self.tree
    }

    /// Shared handle to the current root
    pub fn snapshot(&self) -> Arc<ValueTree> {
        Arc::clone(&self.tree)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get(&self, path: &KeyPath) -> Option<&Value> {
        get(&self.tree, path)
    }

    pub fn set(&mut self, path: &KeyPath, value: Value) {
        self.replace(set(&self.tree, path, value));
    }

    /// Swap in a whole new tree
    pub fn replace(&mut self, tree: ValueTree) {
        self.tree = Arc::new(tree);
        self.revision += 1;
    }
}
