//! Unit tests for anyOf inclusive unions

use schemaforge_core::{
    parse_schema, Error, ParseOptions, PrimitiveKind, SchemaConverter, TypeDescriptor,
    ValidationErrorKind,
};
use serde_json::{json, Value};

fn parse(node: Value) -> schemaforge_core::Result<(TypeDescriptor, schemaforge_core::ConstraintSet)> {
    let opts = ParseOptions::root(&node);
    parse_schema("placeholder", &node, &opts)
}

mod structure {
    use super::*;

    #[test]
    fn test_missing_any_of_keyword_does_not_dispatch() {
        let err = parse(json!({
            "notAnyOf": [{"type": "string"}, {"type": "integer"}]
        }))
        .unwrap_err();
        assert!(matches!(err, Error::SchemaStructure { .. }));
    }

    #[test]
    fn test_null_any_of_rejected() {
        let err = parse(json!({"anyOf": null})).unwrap_err();
        assert!(matches!(err, Error::KeywordMisuse { .. }));
    }

    #[test]
    fn test_string_or_int_members() {
        let (descriptor, _) = parse(json!({
            "anyOf": [{"type": "string"}, {"type": "integer"}]
        }))
        .unwrap();

        match descriptor {
            TypeDescriptor::Union {
                members,
                exclusive: false,
                ..
            } => {
                assert_eq!(members.len(), 2);
                assert!(matches!(
                    members[0].descriptor,
                    TypeDescriptor::Primitive(PrimitiveKind::Str)
                ));
                assert!(matches!(
                    members[1].descriptor,
                    TypeDescriptor::Primitive(PrimitiveKind::Int)
                ));
            }
            other => panic!("expected inclusive union, got {:?}", other),
        }
    }
}

mod defaults {
    use super::*;

    #[test]
    fn test_default_matching_a_branch_is_kept() {
        let (_, constraints) = parse(json!({
            "anyOf": [{"type": "string"}, {"type": "integer"}],
            "default": 42
        }))
        .unwrap();
        assert_eq!(constraints.default_value(), Some(&json!(42)));
    }

    #[test]
    fn test_default_matching_no_branch_rejected() {
        let err = parse(json!({
            "anyOf": [{"type": "string"}, {"type": "integer"}],
            "default": 3.14
        }))
        .unwrap_err();
        assert!(matches!(err, Error::DefaultValidation { .. }));
    }
}

mod value_validation {
    use super::*;

    #[test]
    fn test_any_branch_accepts() {
        let model = SchemaConverter::build(&json!({
            "title": "Loose",
            "type": "object",
            "properties": {
                "id": {"anyOf": [{"type": "string"}, {"type": "integer"}]}
            },
            "required": ["id"]
        }))
        .unwrap();

        assert!(model.validate(&json!({"id": "abc"})).is_ok());
        assert!(model.validate(&json!({"id": 7})).is_ok());

        let err = model.validate(&json!({"id": 1.5})).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::NoBranchMatch);
    }

    #[test]
    fn test_value_matching_both_branches_is_fine() {
        // inclusive union: overlap is allowed, unlike oneOf
        let model = SchemaConverter::build(&json!({
            "title": "Overlap",
            "type": "object",
            "properties": {
                "n": {"anyOf": [
                    {"type": "number", "multipleOf": 2},
                    {"type": "number", "multipleOf": 3}
                ]}
            },
            "required": ["n"]
        }))
        .unwrap();

        assert!(model.validate(&json!({"n": 6})).is_ok());
    }

    #[test]
    fn test_branch_constraints_enforced() {
        let model = SchemaConverter::build(&json!({
            "title": "Constrained",
            "type": "object",
            "properties": {
                "v": {"anyOf": [
                    {"type": "string", "minLength": 3},
                    {"type": "integer", "minimum": 10}
                ]}
            },
            "required": ["v"]
        }))
        .unwrap();

        assert!(model.validate(&json!({"v": "abc"})).is_ok());
        assert!(model.validate(&json!({"v": 12})).is_ok());
        assert!(model.validate(&json!({"v": "ab"})).is_err());
        assert!(model.validate(&json!({"v": 5})).is_err());
    }
}
