//! Unit tests for object schema conversion and model instantiation

use schemaforge_core::{SchemaConverter, TypeDescriptor, ValidationErrorKind};
use serde_json::{json, Value};

mod round_trip {
    use super::*;

    #[test]
    fn test_valid_instance_exposes_declared_values() {
        let model = SchemaConverter::build(&json!({
            "title": "Person",
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "age": {"type": "integer"}
            },
            "required": ["name", "age"]
        }))
        .unwrap();

        let person = model.instantiate(json!({"name": "name", "age": 10})).unwrap();
        assert_eq!(person.get("name"), Some(&json!("name")));
        assert_eq!(person.get("age"), Some(&json!(10)));
    }

    #[test]
    fn test_validate_on_assignment() {
        let model = SchemaConverter::build(&json!({
            "title": "Person",
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "age": {"type": "integer"}
            },
            "required": ["name"]
        }))
        .unwrap();

        let mut person = model.instantiate(json!({"name": "Ada"})).unwrap();
        person.set("age", json!(36)).unwrap();

        let err = person.set("age", json!("old")).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::TypeMismatch);
        // the rejected assignment leaves the previous value in place
        assert_eq!(person.get("age"), Some(&json!(36)));
    }
}

mod nesting {
    use super::*;

    #[test]
    fn test_nested_object_fields() {
        let model = SchemaConverter::build(&json!({
            "title": "Person",
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "address": {
                    "type": "object",
                    "properties": {
                        "street": {"type": "string"},
                        "city": {"type": "string"}
                    },
                    "required": ["street"]
                }
            },
            "required": ["name", "address"]
        }))
        .unwrap();

        assert!(model
            .validate(&json!({
                "name": "Ada",
                "address": {"street": "123 Main St", "city": "Anytown"}
            }))
            .is_ok());

        // inner required field enforced through the nesting
        let err = model
            .validate(&json!({"name": "Ada", "address": {"city": "Anytown"}}))
            .unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::MissingField);
        assert!(err.to_string().contains("street"));
    }

    #[test]
    fn test_nested_record_is_named_after_property() {
        let model = SchemaConverter::build(&json!({
            "title": "Person",
            "type": "object",
            "properties": {
                "address": {
                    "type": "object",
                    "properties": {"street": {"type": "string"}}
                }
            }
        }))
        .unwrap();

        let record = match model.descriptor() {
            TypeDescriptor::Record(record) => record,
            other => panic!("expected record, got {:?}", other),
        };
        assert_eq!(record.name, "Person");
        match &record.field("address").unwrap().descriptor {
            TypeDescriptor::Record(inner) => assert_eq!(inner.name, "address"),
            other => panic!("expected nested record, got {:?}", other),
        }
    }
}

mod defaults {
    use super::*;

    #[test]
    fn test_object_default_factory_returns_fresh_instances() {
        let model = SchemaConverter::build(&json!({
            "title": "Config",
            "type": "object",
            "properties": {
                "server": {
                    "type": "object",
                    "properties": {
                        "host": {"type": "string"},
                        "port": {"type": "integer"}
                    },
                    "default": {"host": "localhost", "port": 8080}
                }
            }
        }))
        .unwrap();

        let record = match model.descriptor() {
            TypeDescriptor::Record(record) => record,
            other => panic!("expected record, got {:?}", other),
        };
        let factory = record
            .field("server")
            .unwrap()
            .constraints
            .default_factory()
            .expect("object default installs a factory");

        let mut first = factory();
        let second = factory();
        assert_eq!(first, json!({"host": "localhost", "port": 8080}));
        assert_eq!(first, second);

        first["port"] = json!(9090);
        assert_eq!(second["port"], json!(8080), "instances must not share state");
    }

    #[test]
    fn test_absent_optional_object_materializes_default() {
        let model = SchemaConverter::build(&json!({
            "title": "Config",
            "type": "object",
            "properties": {
                "server": {
                    "type": "object",
                    "properties": {"host": {"type": "string"}},
                    "default": {"host": "localhost"}
                }
            }
        }))
        .unwrap();

        let config = model.instantiate(json!({})).unwrap();
        assert_eq!(config.get("server"), Some(&json!({"host": "localhost"})));
    }

    #[test]
    fn test_invalid_object_default_fails_at_build() {
        let err = SchemaConverter::build(&json!({
            "title": "Config",
            "type": "object",
            "properties": {
                "server": {
                    "type": "object",
                    "properties": {"port": {"type": "integer"}},
                    "required": ["port"],
                    "default": {"port": "not-a-number"}
                }
            }
        }))
        .unwrap_err();
        assert!(err.to_string().contains("is not valid for type"));
    }

    #[test]
    fn test_optional_scalar_defaults_to_null() {
        let model = SchemaConverter::build(&json!({
            "title": "Person",
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "nickname": {"type": "string"}
            },
            "required": ["name"]
        }))
        .unwrap();

        let person = model.instantiate(json!({"name": "Ada"})).unwrap();
        assert_eq!(person.get("nickname"), Some(&Value::Null));
    }
}
