//! Schemaforge Core - JSON Schema to validating model compiler
//!
//! This crate converts a JSON-Schema-shaped document into a structured,
//! validating data type: a recursive-descent engine dispatches on schema
//! keywords, resolves nested schemas, and emits `(TypeDescriptor,
//! ConstraintSet)` pairs that the bundled validation runtime can
//! instantiate and check values against.
//!
//! # Main Components
//!
//! - **Keyword Registry & Dispatcher**: ordered selector list picking the
//!   node parser for each schema node
//! - **Node Parsers**: object, array, string, integer, number, boolean,
//!   null, const, anyOf, oneOf, and `$ref` handlers
//! - **Constraint Mapping**: centralized keyword renames and default
//!   propagation
//! - **Validation Runtime**: value validation against resolved types, with
//!   validate-on-construct / validate-on-assign model instances
//!
//! # Example
//!
//! ```
//! use schemaforge_core::SchemaConverter;
//! use serde_json::json;
//!
//! let model = SchemaConverter::build(&json!({
//!     "title": "Person",
//!     "type": "object",
//!     "properties": {
//!         "name": {"type": "string", "minLength": 1},
//!         "age": {"type": "integer", "minimum": 0}
//!     },
//!     "required": ["name"]
//! }))?;
//!
//! let person = model.instantiate(json!({"name": "Ada", "age": 36}))?;
//! assert_eq!(person.get("name"), Some(&json!("Ada")));
//! # Ok::<(), schemaforge_core::Error>(())
//! ```

pub mod constraints;
pub mod converter;
pub mod descriptor;
pub mod error;
pub mod model;
pub mod options;
pub mod parser;
pub mod validate;

// Re-export main types for convenience
pub use constraints::{ConstraintKey, ConstraintSet, DefaultFactory};
pub use converter::{parse_schema, SchemaConverter};
pub use descriptor::{
    FieldSpec, PrimitiveKind, RecordType, SemanticFormat, TypeDescriptor, UnionMember,
};
pub use error::{Error, Result};
pub use model::{Model, ModelInstance};
pub use options::ParseOptions;
pub use validate::{ValidationError, ValidationErrorKind, ValidationResult, Validator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_library_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_build_and_validate_round_trip() {
        let model = SchemaConverter::build(&json!({
            "title": "Tag",
            "type": "object",
            "properties": {"label": {"type": "string"}},
            "required": ["label"]
        }))
        .unwrap();

        assert!(model.validate(&json!({"label": "x"})).is_ok());
        assert!(model.validate(&json!({"label": 1})).is_err());
    }
}
