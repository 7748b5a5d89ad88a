//! Const schema parser
//!
//! A scalar `const` becomes a single-value literal type. A container const
//! (an array; JSON has no set literal) cannot be a literal type, so it
//! becomes the value's own collection type wrapped with a deep-equality
//! check applied at validation time. Either way the constraint set carries
//! the const value as the default.
//!
//! Copyright (c) 2025 Schemaforge Team
//! Licensed under the Apache-2.0 license

use crate::constraints::{ConstraintKey, ConstraintSet};
use crate::descriptor::{PrimitiveKind, TypeDescriptor};
use crate::error::{Error, Result};
use crate::options::ParseOptions;
use crate::parser::mapper::{self, KeywordMapping};
use crate::parser::NodeParser;
use serde_json::{Map, Value};

/// The const value doubles as the default; the plain `default` keyword is
/// deliberately absent from this table.
const CONST_MAPPINGS: &[KeywordMapping] = &[
    ("const", ConstraintKey::Default),
    ("description", ConstraintKey::Description),
];

pub struct ConstParser;

impl NodeParser for ConstParser {
    fn selector(&self) -> &'static str {
        "const"
    }

    fn parse(
        &self,
        name: &str,
        node: &Map<String, Value>,
        opts: &ParseOptions,
    ) -> Result<(TypeDescriptor, ConstraintSet)> {
        let const_value = node.get("const").ok_or_else(|| {
            Error::keyword(
                name,
                "const",
                format!("Const type {} must have 'const' property defined", name),
            )
        })?;

        let descriptor = match const_value {
            Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null => {
                TypeDescriptor::Literal(const_value.clone())
            }
            Value::Array(_) => TypeDescriptor::ConstEq {
                base: Box::new(TypeDescriptor::Collection {
                    element: Box::new(TypeDescriptor::Primitive(PrimitiveKind::Any)),
                    unique: false,
                }),
                value: const_value.clone(),
            },
            Value::Object(_) => {
                return Err(Error::constraint(
                    name,
                    format!(
                        "Const type {} must have 'const' value of allowed types: \
                         string, number, boolean, array, null",
                        name
                    ),
                ))
            }
        };

        let constraints = mapper::build_constraints(name, node, CONST_MAPPINGS, &[], opts)?;

        Ok((descriptor, constraints))
    }
}
