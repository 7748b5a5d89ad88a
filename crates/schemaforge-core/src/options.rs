//! Per-conversion parsing context
//!
//! [`ParseOptions`] travels down the recursive descent: the `required` flag
//! changes per child, while the root document and the reference table are
//! shared across the whole conversion call. The table is confined to one
//! call (the converter unwraps it into the finished model), so a plain
//! `Rc<RefCell<..>>` suffices and concurrent conversions never contend.
//!
//! Copyright (c) 2025 Schemaforge Team
//! Licensed under the Apache-2.0 license

use crate::descriptor::TypeDescriptor;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Memo of built descriptors keyed by `$ref` id, plus the in-progress set
/// that guards against self-referential schemas.
#[derive(Debug, Default)]
pub struct RefTable {
    built: HashMap<String, TypeDescriptor>,
    in_progress: HashSet<String>,
}

impl RefTable {
    /// Cached descriptor for a reference id, if the target finished building
    pub fn get(&self, id: &str) -> Option<&TypeDescriptor> {
        self.built.get(id)
    }

    /// Store the finished descriptor for a reference id
    pub fn insert(&mut self, id: String, descriptor: TypeDescriptor) {
        self.in_progress.remove(&id);
        self.built.insert(id, descriptor);
    }

    /// Mark a reference id as currently being built. Returns `false` if it
    /// already was, which signals a reference cycle.
    pub fn begin(&mut self, id: &str) -> bool {
        if self.built.contains_key(id) || self.in_progress.contains(id) {
            return false;
        }
        self.in_progress.insert(id.to_string());
        true
    }

    /// Whether the id is known at all (built or mid-build)
    pub fn contains(&self, id: &str) -> bool {
        self.built.contains_key(id) || self.in_progress.contains(id)
    }

    /// Finished id→descriptor map (entries still mid-build are absent)
    pub fn built_map(&self) -> &HashMap<String, TypeDescriptor> {
        &self.built
    }

    /// Consume the table into its finished id→descriptor map
    pub fn into_built(self) -> HashMap<String, TypeDescriptor> {
        self.built
    }
}

/// Options threaded through one conversion call
#[derive(Clone)]
pub struct ParseOptions {
    /// Whether the node being parsed is a required field of its parent
    pub required: bool,
    /// Root schema document, for `$ref` pointer resolution
    pub context: Rc<Value>,
    /// Shared per-call reference table
    pub refs: Rc<RefCell<RefTable>>,
    /// Current recursion depth, checked against the converter's ceiling
    pub depth: usize,
}

impl ParseOptions {
    /// Options for a top-level conversion of `root`
    pub fn root(root: &Value) -> Self {
        Self {
            required: true,
            context: Rc::new(root.clone()),
            refs: Rc::new(RefCell::new(RefTable::default())),
            depth: 0,
        }
    }

    /// Derive options for a child node one level deeper
    pub fn child(&self, required: bool) -> Self {
        Self {
            required,
            context: Rc::clone(&self.context),
            refs: Rc::clone(&self.refs),
            depth: self.depth + 1,
        }
    }
}
