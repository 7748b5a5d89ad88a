//! Boolean schema parser
//!
//! Copyright (c) 2025 Schemaforge Team
//! Licensed under the Apache-2.0 license

use crate::constraints::ConstraintSet;
use crate::descriptor::{PrimitiveKind, TypeDescriptor};
use crate::error::{Error, Result};
use crate::options::ParseOptions;
use crate::parser::mapper::{self, UNIVERSAL_MAPPINGS};
use crate::parser::NodeParser;
use serde_json::{Map, Value};

pub struct BooleanParser;

impl NodeParser for BooleanParser {
    fn selector(&self) -> &'static str {
        "type:boolean"
    }

    fn parse(
        &self,
        name: &str,
        node: &Map<String, Value>,
        opts: &ParseOptions,
    ) -> Result<(TypeDescriptor, ConstraintSet)> {
        let constraints = mapper::build_constraints(name, node, UNIVERSAL_MAPPINGS, &[], opts)?;

        if let Some(default) = node.get("default") {
            if !default.is_boolean() && !default.is_null() {
                return Err(Error::constraint(
                    name,
                    format!("Default value for {} must be a boolean", name),
                ));
            }
        }

        Ok((TypeDescriptor::Primitive(PrimitiveKind::Bool), constraints))
    }
}
