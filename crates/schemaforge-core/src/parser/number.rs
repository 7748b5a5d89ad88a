//! Number schema parser
//!
//! Copyright (c) 2025 Schemaforge Team
//! Licensed under the Apache-2.0 license

use crate::constraints::ConstraintSet;
use crate::descriptor::{PrimitiveKind, TypeDescriptor};
use crate::error::{Error, Result};
use crate::options::ParseOptions;
use crate::parser::integer::NUMERIC_MAPPINGS;
use crate::parser::mapper::{self, UNIVERSAL_MAPPINGS};
use crate::parser::NodeParser;
use serde_json::{Map, Value};

pub struct NumberParser;

impl NodeParser for NumberParser {
    fn selector(&self) -> &'static str {
        "type:number"
    }

    fn parse(
        &self,
        name: &str,
        node: &Map<String, Value>,
        opts: &ParseOptions,
    ) -> Result<(TypeDescriptor, ConstraintSet)> {
        let constraints =
            mapper::build_constraints(name, node, UNIVERSAL_MAPPINGS, NUMERIC_MAPPINGS, opts)?;

        if let Some(default) = node.get("default") {
            if !default.is_number() && !default.is_null() {
                return Err(Error::constraint(
                    name,
                    format!("Default value for {} must be a number", name),
                ));
            }
        }

        Ok((TypeDescriptor::Primitive(PrimitiveKind::Float), constraints))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::ConstraintKey;
    use serde_json::json;

    fn parse(node: Value) -> Result<(TypeDescriptor, ConstraintSet)> {
        let opts = ParseOptions::root(&node);
        NumberParser.parse("price", node.as_object().unwrap(), &opts)
    }

    #[test]
    fn test_number_type_with_bounds() {
        let (descriptor, constraints) = parse(json!({
            "type": "number",
            "exclusiveMinimum": 0,
            "multipleOf": 0.5
        }))
        .unwrap();

        assert!(matches!(
            descriptor,
            TypeDescriptor::Primitive(PrimitiveKind::Float)
        ));
        assert_eq!(
            constraints.get(ConstraintKey::ExclusiveMinimum),
            Some(&json!(0))
        );
        assert_eq!(
            constraints.get(ConstraintKey::MultipleOf),
            Some(&json!(0.5))
        );
    }

    #[test]
    fn test_non_numeric_default_rejected() {
        let err = parse(json!({"type": "number", "default": "zero"})).unwrap_err();
        assert!(matches!(err, Error::ConstraintType { .. }));
    }
}
