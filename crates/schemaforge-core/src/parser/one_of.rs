//! oneOf combinator parser: exclusive union
//!
//! Branches resolve exactly like anyOf; the difference is entirely in the
//! exclusivity contract the descriptor carries: the validation runtime
//! attempts every branch independently, in registration order, and a value
//! is valid iff exactly one branch matches. A `discriminator.propertyName`
//! hint is captured on the descriptor but never overrides that check: a
//! pre-selected branch that fails still yields "no match", and two
//! matching branches are always an error.
//!
//! Copyright (c) 2025 Schemaforge Team
//! Licensed under the Apache-2.0 license

use crate::constraints::ConstraintSet;
use crate::descriptor::TypeDescriptor;
use crate::error::{Error, Result};
use crate::options::ParseOptions;
use crate::parser::any_of::parse_branches;
use crate::parser::mapper::{self, UNIVERSAL_MAPPINGS};
use crate::parser::NodeParser;
use serde_json::{Map, Value};

pub struct OneOfParser;

impl NodeParser for OneOfParser {
    fn selector(&self) -> &'static str {
        "oneOf"
    }

    fn parse(
        &self,
        name: &str,
        node: &Map<String, Value>,
        opts: &ParseOptions,
    ) -> Result<(TypeDescriptor, ConstraintSet)> {
        let members = parse_branches(name, "oneOf", node, opts)?;
        let discriminator = discriminator_hint(name, node)?;
        let constraints = mapper::build_constraints(name, node, UNIVERSAL_MAPPINGS, &[], opts)?;

        Ok((
            TypeDescriptor::Union {
                members,
                exclusive: true,
                discriminator,
            },
            constraints,
        ))
    }
}

/// Extract `discriminator.propertyName`, if present
fn discriminator_hint(name: &str, node: &Map<String, Value>) -> Result<Option<String>> {
    let Some(discriminator) = node.get("discriminator") else {
        return Ok(None);
    };
    let property = discriminator
        .get("propertyName")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            Error::keyword(
                name,
                "discriminator",
                format!("must carry a string 'propertyName', got {}", discriminator),
            )
        })?;
    Ok(Some(property.to_string()))
}
