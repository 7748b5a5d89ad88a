//! anyOf combinator parser: inclusive union
//!
//! Each branch is resolved independently with no shared state. A branch's
//! constraint set rides along only when it constrains more than a bare
//! null default; redundant wrapping is dropped.
//!
//! Copyright (c) 2025 Schemaforge Team
//! Licensed under the Apache-2.0 license

use crate::constraints::ConstraintSet;
use crate::descriptor::{TypeDescriptor, UnionMember};
use crate::error::{Error, Result};
use crate::options::ParseOptions;
use crate::parser::mapper::{self, UNIVERSAL_MAPPINGS};
use crate::parser::{parse_node, NodeParser};
use serde_json::{Map, Value};

/// Resolve the branches of a combinator keyword into union members
pub(crate) fn parse_branches(
    name: &str,
    keyword: &str,
    node: &Map<String, Value>,
    opts: &ParseOptions,
) -> Result<Vec<UnionMember>> {
    let branches = match node.get(keyword) {
        Some(Value::Array(branches)) => branches,
        Some(other) => {
            return Err(Error::keyword(
                name,
                keyword,
                format!("must be an array of schemas, got {}", other),
            ))
        }
        None => {
            return Err(Error::keyword(
                name,
                keyword,
                "must be an array of schemas, got nothing",
            ))
        }
    };

    branches
        .iter()
        .map(|branch| {
            let (descriptor, constraints) =
                parse_node(name, branch, &opts.child(opts.required))?;
            let constraints = constraints.is_meaningful().then_some(constraints);
            Ok(UnionMember {
                descriptor,
                constraints,
            })
        })
        .collect()
}

pub struct AnyOfParser;

impl NodeParser for AnyOfParser {
    fn selector(&self) -> &'static str {
        "anyOf"
    }

    fn parse(
        &self,
        name: &str,
        node: &Map<String, Value>,
        opts: &ParseOptions,
    ) -> Result<(TypeDescriptor, ConstraintSet)> {
        let members = parse_branches(name, "anyOf", node, opts)?;
        let constraints = mapper::build_constraints(name, node, UNIVERSAL_MAPPINGS, &[], opts)?;

        Ok((
            TypeDescriptor::Union {
                members,
                exclusive: false,
                discriminator: None,
            },
            constraints,
        ))
    }
}
