//! Top-level schema conversion entry point
//!
//! [`SchemaConverter::build`] is the sole error boundary for schema
//! compilation: it dispatches the root node, unwinds the per-call reference
//! table into the finished model, and re-checks the root default against
//! the completed type so schema bugs surface at compile time, not at first
//! use.
//!
//! Copyright (c) 2025 Schemaforge Team
//! Licensed under the Apache-2.0 license

use crate::constraints::ConstraintSet;
use crate::descriptor::TypeDescriptor;
use crate::error::{Error, Result};
use crate::model::Model;
use crate::options::ParseOptions;
use crate::parser::parse_node;
use crate::validate::Validator;
use log::debug;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Converter from JSON Schema documents to validating models
pub struct SchemaConverter;

impl SchemaConverter {
    /// Compile a schema document into a [`Model`].
    ///
    /// Object-root schemas must carry a `title`, which names the record
    /// type; other roots fall back to the name `root`.
    pub fn build(schema: &Value) -> Result<Model> {
        let root = schema.as_object().ok_or_else(|| {
            Error::structure("root", "schema document must be a JSON object")
        })?;

        let name = match root.get("title").and_then(Value::as_str) {
            Some(title) => title.to_string(),
            None if root.get("type").and_then(Value::as_str) == Some("object") => {
                return Err(Error::structure(
                    "root",
                    "object-root schema requires a 'title'",
                ))
            }
            None => "root".to_string(),
        };

        debug!("building model '{}'", name);
        let opts = ParseOptions::root(schema);
        let (descriptor, constraints) = parse_node(&name, schema, &opts)?;

        let refs = unwind_refs(opts);

        // Per-node default checks skip descriptors whose references were
        // still mid-build; once the table is complete, those deferred
        // defaults are re-validated so schema bugs never reach first use.
        check_deferred_default(&name, &descriptor, &constraints, &refs)?;
        recheck_deferred_defaults(&descriptor, &refs, &mut HashSet::new())?;

        Ok(Model::new(name, descriptor, constraints, refs))
    }
}

/// Validate one default against the finished reference table, if the
/// descriptor reaches through a reference (the per-node check skipped it).
fn check_deferred_default(
    name: &str,
    descriptor: &TypeDescriptor,
    constraints: &ConstraintSet,
    refs: &HashMap<String, TypeDescriptor>,
) -> Result<()> {
    let Some(default) = constraints.resolve_default() else {
        return Ok(());
    };
    if default.is_null() {
        return Ok(());
    }
    Validator::new(refs)
        .validate(&default, descriptor, Some(constraints), "$")
        .map_err(|err| Error::DefaultValidation {
            name: name.to_string(),
            default,
            source: err,
        })
}

/// Walk the built descriptor tree and re-run the default check for every
/// constraint set whose descriptor contains a deferred reference. The
/// `seen` set stops the walk from cycling through self-referential table
/// entries.
fn recheck_deferred_defaults(
    descriptor: &TypeDescriptor,
    refs: &HashMap<String, TypeDescriptor>,
    seen: &mut HashSet<String>,
) -> Result<()> {
    match descriptor {
        TypeDescriptor::Record(record) => {
            for field in &record.fields {
                if contains_ref(&field.descriptor) {
                    check_deferred_default(&field.name, &field.descriptor, &field.constraints, refs)?;
                }
                recheck_deferred_defaults(&field.descriptor, refs, seen)?;
            }
            Ok(())
        }
        TypeDescriptor::Collection { element, .. } => {
            recheck_deferred_defaults(element, refs, seen)
        }
        TypeDescriptor::Union { members, .. } => {
            for member in members {
                if let Some(constraints) = &member.constraints {
                    if contains_ref(&member.descriptor) {
                        check_deferred_default("branch", &member.descriptor, constraints, refs)?;
                    }
                }
                recheck_deferred_defaults(&member.descriptor, refs, seen)?;
            }
            Ok(())
        }
        TypeDescriptor::ConstEq { base, .. } => recheck_deferred_defaults(base, refs, seen),
        TypeDescriptor::Ref(id) => {
            if seen.insert(id.clone()) {
                if let Some(target) = refs.get(id) {
                    recheck_deferred_defaults(target, refs, seen)?;
                }
            }
            Ok(())
        }
        TypeDescriptor::Primitive(_)
        | TypeDescriptor::Semantic(_)
        | TypeDescriptor::Literal(_) => Ok(()),
    }
}

/// Whether a descriptor reaches through a deferred reference anywhere.
/// References themselves are not followed, so cyclic shapes terminate.
fn contains_ref(descriptor: &TypeDescriptor) -> bool {
    match descriptor {
        TypeDescriptor::Ref(_) => true,
        TypeDescriptor::Record(record) => {
            record.fields.iter().any(|f| contains_ref(&f.descriptor))
        }
        TypeDescriptor::Collection { element, .. } => contains_ref(element),
        TypeDescriptor::Union { members, .. } => {
            members.iter().any(|m| contains_ref(&m.descriptor))
        }
        TypeDescriptor::ConstEq { base, .. } => contains_ref(base),
        TypeDescriptor::Primitive(_)
        | TypeDescriptor::Semantic(_)
        | TypeDescriptor::Literal(_) => false,
    }
}

/// Convert a single schema node; the compiler's second public contract.
///
/// This is the same recursion entry the converter itself uses, exposed for
/// callers composing conversions (e.g. embedding sub-schema handling in a
/// larger pipeline).
pub fn parse_schema(
    name: &str,
    node: &Value,
    opts: &ParseOptions,
) -> Result<(TypeDescriptor, ConstraintSet)> {
    parse_node(name, node, opts)
}

fn unwind_refs(
    opts: ParseOptions,
) -> std::collections::HashMap<String, TypeDescriptor> {
    let ParseOptions { refs, .. } = opts;
    match Rc::try_unwrap(refs) {
        Ok(cell) => cell.into_inner().into_built(),
        // a clone escaped (it cannot, children are dropped) - copy instead
        Err(shared) => shared.borrow().built_map().clone(),
    }
}
