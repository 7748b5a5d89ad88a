//! Null schema parser
//!
//! Copyright (c) 2025 Schemaforge Team
//! Licensed under the Apache-2.0 license

use crate::constraints::ConstraintSet;
use crate::descriptor::{PrimitiveKind, TypeDescriptor};
use crate::error::Result;
use crate::options::ParseOptions;
use crate::parser::mapper::{self, UNIVERSAL_MAPPINGS};
use crate::parser::NodeParser;
use serde_json::{Map, Value};

pub struct NullParser;

impl NodeParser for NullParser {
    fn selector(&self) -> &'static str {
        "type:null"
    }

    fn parse(
        &self,
        name: &str,
        node: &Map<String, Value>,
        opts: &ParseOptions,
    ) -> Result<(TypeDescriptor, ConstraintSet)> {
        let constraints = mapper::build_constraints(name, node, UNIVERSAL_MAPPINGS, &[], opts)?;
        Ok((TypeDescriptor::Primitive(PrimitiveKind::Null), constraints))
    }
}
