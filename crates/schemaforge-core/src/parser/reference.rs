//! `$ref` parser: intra-document reference resolution
//!
//! Only `#/`-prefixed JSON pointers into the conversion's root document are
//! supported. The first occurrence of an id builds the target schema and
//! caches the finished descriptor in the per-call reference table; every
//! later occurrence reuses that exact descriptor. Occurrences hit while
//! the target is still mid-build (a self-referential schema) resolve to
//! a deferred [`TypeDescriptor::Ref`], which the validation runtime looks
//! up in the finished table. This is the cycle guard: recursion stops at
//! the second visit instead of descending forever.
//!
//! Copyright (c) 2025 Schemaforge Team
//! Licensed under the Apache-2.0 license

use crate::constraints::ConstraintSet;
use crate::descriptor::TypeDescriptor;
use crate::error::{Error, Result};
use crate::options::ParseOptions;
use crate::parser::mapper::{self, UNIVERSAL_MAPPINGS};
use crate::parser::{parse_node, NodeParser};
use log::debug;
use serde_json::{Map, Value};

pub struct ReferenceParser;

impl NodeParser for ReferenceParser {
    fn selector(&self) -> &'static str {
        "$ref"
    }

    fn parse(
        &self,
        name: &str,
        node: &Map<String, Value>,
        opts: &ParseOptions,
    ) -> Result<(TypeDescriptor, ConstraintSet)> {
        let id = node
            .get("$ref")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::keyword(name, "$ref", "must be a string reference"))?;

        if !id.starts_with('#') {
            return Err(Error::keyword(
                name,
                "$ref",
                format!("only intra-document references are supported, got '{}'", id),
            ));
        }

        // Site-local constraints (description, optionality default) belong
        // to the referencing field, not the shared target descriptor.
        let constraints = mapper::build_constraints(name, node, UNIVERSAL_MAPPINGS, &[], opts)?;

        {
            let refs = opts.refs.borrow();
            if let Some(cached) = refs.get(id) {
                debug!("reusing cached descriptor for '{}'", id);
                return Ok((cached.clone(), constraints));
            }
            if refs.contains(id) {
                // target is mid-build: defer through the table
                debug!("cycle on '{}', deferring through the ref table", id);
                return Ok((TypeDescriptor::Ref(id.to_string()), constraints));
            }
        }

        let target = opts
            .context
            .pointer(&id[1..])
            .ok_or_else(|| Error::structure(name, format!("unresolved reference '{}'", id)))?
            .clone();

        opts.refs.borrow_mut().begin(id);
        let (descriptor, _target_constraints) =
            parse_node(name, &target, &opts.child(true))?;
        opts.refs
            .borrow_mut()
            .insert(id.to_string(), descriptor.clone());

        Ok((descriptor, constraints))
    }
}
