//! Object schema parser
//!
//! Recurses into every `properties` entry with the child's `required` flag
//! derived from the node's `required` array, collecting field specs into a
//! named record type. A declared object default is installed as a factory
//! producing a fresh value on every call, never a shared instance.
//!
//! Copyright (c) 2025 Schemaforge Team
//! Licensed under the Apache-2.0 license

use crate::constraints::ConstraintSet;
use crate::descriptor::{FieldSpec, RecordType, TypeDescriptor};
use crate::error::{Error, Result};
use crate::options::ParseOptions;
use crate::parser::mapper::{self, UNIVERSAL_MAPPINGS};
use crate::parser::{parse_node, NodeParser};
use serde_json::{Map, Value};
use std::sync::Arc;

pub struct ObjectParser;

impl NodeParser for ObjectParser {
    fn selector(&self) -> &'static str {
        "type:object"
    }

    fn parse(
        &self,
        name: &str,
        node: &Map<String, Value>,
        opts: &ParseOptions,
    ) -> Result<(TypeDescriptor, ConstraintSet)> {
        let properties = match node.get("properties") {
            None => Map::new(),
            Some(Value::Object(properties)) => properties.clone(),
            Some(other) => {
                return Err(Error::keyword(
                    name,
                    "properties",
                    format!("must be an object of schemas, got {}", other),
                ))
            }
        };
        let required_keys = required_keys(name, node)?;

        let mut fields = Vec::with_capacity(properties.len());
        for (field_name, field_schema) in &properties {
            let child_opts = opts.child(required_keys.iter().any(|k| k == field_name));
            let (descriptor, constraints) = parse_node(field_name, field_schema, &child_opts)?;
            fields.push(FieldSpec {
                name: field_name.clone(),
                descriptor,
                constraints,
            });
        }

        let record = Arc::new(RecordType {
            name: name.to_string(),
            fields,
        });

        let mut constraints =
            mapper::build_constraints(name, node, UNIVERSAL_MAPPINGS, &[], opts)?;

        // A declared object default becomes a factory so every
        // materialization gets its own fresh instance.
        if let Some(default) = node.get("default") {
            let literal = default.clone();
            constraints.set_default_factory(Arc::new(move || literal.clone()));
        }

        Ok((TypeDescriptor::Record(record), constraints))
    }
}

fn required_keys(name: &str, node: &Map<String, Value>) -> Result<Vec<String>> {
    match node.get("required") {
        None => Ok(Vec::new()),
        Some(Value::Array(keys)) => keys
            .iter()
            .map(|key| {
                key.as_str().map(str::to_string).ok_or_else(|| {
                    Error::keyword(
                        name,
                        "required",
                        format!("must be an array of property names, got {}", key),
                    )
                })
            })
            .collect(),
        Some(other) => Err(Error::keyword(
            name,
            "required",
            format!("must be an array of property names, got {}", other),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::PrimitiveKind;
    use serde_json::json;

    fn parse(node: Value) -> Result<(TypeDescriptor, ConstraintSet)> {
        let opts = ParseOptions::root(&node);
        ObjectParser.parse("placeholder", node.as_object().unwrap(), &opts)
    }

    #[test]
    fn test_fields_and_required_recursion() {
        let (descriptor, _) = parse(json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "age": {"type": "integer"}
            },
            "required": ["name"]
        }))
        .unwrap();

        let record = match descriptor {
            TypeDescriptor::Record(record) => record,
            other => panic!("expected record, got {:?}", other),
        };

        let name = record.field("name").unwrap();
        assert!(name.is_required());
        assert!(matches!(
            name.descriptor,
            TypeDescriptor::Primitive(PrimitiveKind::Str)
        ));

        let age = record.field("age").unwrap();
        assert!(!age.is_required());
        assert_eq!(age.constraints.default_value(), Some(&Value::Null));
    }

    #[test]
    fn test_object_default_becomes_factory() {
        let (_, constraints) = parse(json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "age": {"type": "integer"}
            },
            "default": {"name": "default_name", "age": 20}
        }))
        .unwrap();

        let factory = constraints.default_factory().expect("factory installed");
        let first = factory();
        let second = factory();
        assert_eq!(first, json!({"name": "default_name", "age": 20}));
        assert_eq!(first, second);

        // fresh instances: mutating one must not affect the other
        let mut first = first;
        first["age"] = json!(99);
        assert_eq!(second["age"], json!(20));
    }

    #[test]
    fn test_non_array_required_rejected() {
        let err = parse(json!({
            "type": "object",
            "properties": {"a": {"type": "string"}},
            "required": "a"
        }))
        .unwrap_err();
        assert!(matches!(err, Error::KeywordMisuse { .. }));
    }

    #[test]
    fn test_nested_objects() {
        let (descriptor, _) = parse(json!({
            "type": "object",
            "properties": {
                "address": {
                    "type": "object",
                    "properties": {
                        "street": {"type": "string"},
                        "city": {"type": "string"}
                    },
                    "required": ["street"]
                }
            },
            "required": ["address"]
        }))
        .unwrap();

        let record = match descriptor {
            TypeDescriptor::Record(record) => record,
            other => panic!("expected record, got {:?}", other),
        };
        let address = record.field("address").unwrap();
        match &address.descriptor {
            TypeDescriptor::Record(inner) => {
                assert_eq!(inner.name, "address");
                assert!(inner.field("street").unwrap().is_required());
                assert!(!inner.field("city").unwrap().is_required());
            }
            other => panic!("expected nested record, got {:?}", other),
        }
    }
}
