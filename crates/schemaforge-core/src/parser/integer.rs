//! Integer schema parser
//!
//! Carries the numeric-bound keywords (`minimum`, `maximum`, exclusive
//! variants, `multipleOf`) into the constraint set and rejects defaults
//! that are not integral numbers.
//!
//! Copyright (c) 2025 Schemaforge Team
//! Licensed under the Apache-2.0 license

use crate::constraints::{ConstraintKey, ConstraintSet};
use crate::descriptor::{PrimitiveKind, TypeDescriptor};
use crate::error::{Error, Result};
use crate::options::ParseOptions;
use crate::parser::mapper::{self, KeywordMapping, UNIVERSAL_MAPPINGS};
use crate::parser::NodeParser;
use serde_json::{Map, Value};

pub(crate) const NUMERIC_MAPPINGS: &[KeywordMapping] = &[
    ("minimum", ConstraintKey::Minimum),
    ("maximum", ConstraintKey::Maximum),
    ("exclusiveMinimum", ConstraintKey::ExclusiveMinimum),
    ("exclusiveMaximum", ConstraintKey::ExclusiveMaximum),
    ("multipleOf", ConstraintKey::MultipleOf),
];

pub struct IntegerParser;

impl NodeParser for IntegerParser {
    fn selector(&self) -> &'static str {
        "type:integer"
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
            let integral = default.is_i64()
                || default.is_u64()
                || default.as_f64().is_some_and(|f| f.fract() == 0.0);
            if !integral && !default.is_null() {
                return Err(Error::constraint(
                    name,
                    format!("Default value for {} must be an integer", name),
                ));
            }
        }

        Ok((TypeDescriptor::Primitive(PrimitiveKind::Int), constraints))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(node: Value) -> Result<(TypeDescriptor, ConstraintSet)> {
        let opts = ParseOptions::root(&node);
        IntegerParser.parse("count", node.as_object().unwrap(), &opts)
    }

    #[test]
    fn test_numeric_bound_renames() {
        let (descriptor, constraints) = parse(json!({
            "type": "integer",
            "minimum": 1,
            "maximum": 100,
            "multipleOf": 5
        }))
        .unwrap();

        assert!(matches!(
            descriptor,
            TypeDescriptor::Primitive(PrimitiveKind::Int)
        ));
        assert_eq!(constraints.get(ConstraintKey::Minimum), Some(&json!(1)));
        assert_eq!(constraints.get(ConstraintKey::Maximum), Some(&json!(100)));
        assert_eq!(constraints.get(ConstraintKey::MultipleOf), Some(&json!(5)));
    }

    #[test]
    fn test_fractional_default_rejected() {
        let err = parse(json!({"type": "integer", "default": 3.14})).unwrap_err();
        assert!(matches!(err, Error::ConstraintType { .. }));
    }
}
