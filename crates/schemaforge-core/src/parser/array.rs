//! Array schema parser
//!
//! Resolves the element schema recursively (elements are always mandatory,
//! regardless of the array field's own optionality), chooses set semantics
//! when `uniqueItems` is set, and renames `maxItems`/`minItems` to the
//! shared length constraints. Defaults always materialize through a
//! factory: an optional field without a literal default yields null (absent
//! field, not an empty collection); a literal default yields a deep copy of
//! the literal on every call.
//!
//! Copyright (c) 2025 Schemaforge Team
//! Licensed under the Apache-2.0 license

use crate::constraints::{ConstraintKey, ConstraintSet, DefaultFactory};
use crate::descriptor::TypeDescriptor;
use crate::error::{Error, Result};
use crate::options::ParseOptions;
use crate::parser::mapper::{self, KeywordMapping};
use crate::parser::{parse_node, NodeParser};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Defaults are factory-managed here, so the universal table keeps the
/// `default` keyword out of the rename merge.
const ARRAY_UNIVERSAL: &[KeywordMapping] = &[("description", ConstraintKey::Description)];

const TYPE_MAPPINGS: &[KeywordMapping] = &[
    ("maxItems", ConstraintKey::MaxLength),
    ("minItems", ConstraintKey::MinLength),
];

pub struct ArrayParser;

impl NodeParser for ArrayParser {
    fn selector(&self) -> &'static str {
        "type:array"
    }

    fn parse(
        &self,
        name: &str,
        node: &Map<String, Value>,
        opts: &ParseOptions,
    ) -> Result<(TypeDescriptor, ConstraintSet)> {
        let items = node.get("items").ok_or_else(|| {
            Error::keyword(name, "items", "array schema requires an element schema")
        })?;

        // Elements are always mandatory, whatever the field's optionality.
        let (element, _element_constraints) = parse_node(name, items, &opts.child(true))?;

        let unique = node.get("uniqueItems").and_then(Value::as_bool).unwrap_or(false);
        let descriptor = TypeDescriptor::Collection {
            element: Box::new(element),
            unique,
        };

        let mut constraints =
            mapper::build_constraints(name, node, ARRAY_UNIVERSAL, TYPE_MAPPINGS, opts)?;

        match node.get("default") {
            None if !opts.required => {
                constraints.set_default_factory(null_factory());
            }
            Some(default) => {
                constraints.set_default_factory(literal_factory(name, default, unique)?);
            }
            None => {}
        }

        Ok((descriptor, constraints))
    }
}

/// Factory for optional arrays without a declared default: the field stays
/// absent (null), not an empty collection.
fn null_factory() -> DefaultFactory {
    Arc::new(|| Value::Null)
}

/// Factory deep-copying a literal default on every call. Under set
/// semantics the literal is deduplicated first, keeping first occurrences
/// in order, so a repeated entry does not invalidate the schema.
fn literal_factory(name: &str, default: &Value, unique: bool) -> Result<DefaultFactory> {
    let Some(items) = default.as_array() else {
        return Err(Error::constraint(
            name,
            format!(
                "Default value for array must be an iterable, got {}",
                default
            ),
        ));
    };

    let literal = if unique {
        let mut deduped: Vec<Value> = Vec::with_capacity(items.len());
        for item in items {
            if !deduped.contains(item) {
                deduped.push(item.clone());
            }
        }
        Value::Array(deduped)
    } else {
        default.clone()
    };
    Ok(Arc::new(move || literal.clone()))
}
