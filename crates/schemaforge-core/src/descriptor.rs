//! Resolved type representation for converted schemas
//!
//! A schema node compiles to a [`TypeDescriptor`]: an explicit tagged union
//! over the type shapes the converter can produce. Descriptors are built
//! bottom-up during one conversion call and never mutated afterward; the
//! only deferred member is [`TypeDescriptor::Ref`], resolved through the
//! conversion's reference table.
//!
//! Copyright (c) 2025 Schemaforge Team
//! Licensed under the Apache-2.0 license

use crate::constraints::ConstraintSet;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Scalar type kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Str,
    Bool,
    Int,
    Float,
    Null,
    /// Unconstrained element type; arises only inside container consts
    Any,
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrimitiveKind::Str => "string",
            PrimitiveKind::Bool => "boolean",
            PrimitiveKind::Int => "integer",
            PrimitiveKind::Float => "number",
            PrimitiveKind::Null => "null",
            PrimitiveKind::Any => "any",
        };
        f.write_str(name)
    }
}

/// Semantic string types produced by the `format` keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticFormat {
    Email,
    Uri,
    Ipv4,
    Ipv6,
    Date,
    Time,
    DateTime,
    Binary,
    FilePath,
}

impl SemanticFormat {
    /// The JSON Schema `format` value this semantic type corresponds to
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticFormat::Email => "email",
            SemanticFormat::Uri => "uri",
            SemanticFormat::Ipv4 => "ipv4",
            SemanticFormat::Ipv6 => "ipv6",
            SemanticFormat::Date => "date",
            SemanticFormat::Time => "time",
            SemanticFormat::DateTime => "date-time",
            SemanticFormat::Binary => "binary",
            SemanticFormat::FilePath => "file-path",
        }
    }
}

impl fmt::Display for SemanticFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One property of a record type: name, resolved type, and the constraints
/// the validation runtime enforces for it
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Property name from the schema
    pub name: String,
    /// Resolved field type
    pub descriptor: TypeDescriptor,
    /// Field constraints, including the default for optional fields
    pub constraints: ConstraintSet,
}

impl FieldSpec {
    /// A field is required exactly when its constraints carry no default.
    /// Optional fields always receive an explicit default (value or factory)
    /// during conversion, so the flag never needs separate storage.
    pub fn is_required(&self) -> bool {
        !self.constraints.has_default()
    }
}

/// A named composite type built from an object schema
#[derive(Debug, Clone)]
pub struct RecordType {
    /// Record name (schema `title` or the enclosing property name)
    pub name: String,
    /// Declared fields in schema order
    pub fields: Vec<FieldSpec>,
}

impl RecordType {
    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// One branch of a union type
#[derive(Debug, Clone)]
pub struct UnionMember {
    /// Branch type
    pub descriptor: TypeDescriptor,
    /// Branch constraints; `None` when the branch carried nothing beyond a
    /// bare null default (redundant wrapping is dropped at build time)
    pub constraints: Option<ConstraintSet>,
}

/// Resolved type of a schema node
///
/// This is an explicit tagged-union value rather than a reflection of any
/// host-language type object, so the validation runtime can walk it without
/// further interpretation of the source schema.
#[derive(Debug, Clone)]
pub enum TypeDescriptor {
    /// Scalar type
    Primitive(PrimitiveKind),
    /// String type refined by a `format` keyword
    Semantic(SemanticFormat),
    /// Array type; `unique` selects set semantics (`uniqueItems`)
    Collection {
        element: Box<TypeDescriptor>,
        unique: bool,
    },
    /// Named record type built from an object schema
    Record(Arc<RecordType>),
    /// Composition of sibling sub-schemas (`anyOf`/`oneOf`)
    Union {
        members: Vec<UnionMember>,
        /// `true` for oneOf: exactly one branch must match
        exclusive: bool,
        /// Optional `discriminator.propertyName` hint; never overrides the
        /// exclusivity check
        discriminator: Option<String>,
    },
    /// Single-value type from a scalar `const`
    Literal(Value),
    /// Deep-equality wrapper for container consts: any value of the base
    /// type that is structurally equal to `value`
    ConstEq {
        base: Box<TypeDescriptor>,
        value: Value,
    },
    /// Deferred reference into the conversion's ref table; all occurrences
    /// of one `$ref` id share the single cached descriptor
    Ref(String),
}

impl TypeDescriptor {
    /// Short human-readable name used in error messages
    pub fn describe(&self) -> String {
        match self {
            TypeDescriptor::Primitive(kind) => kind.to_string(),
            TypeDescriptor::Semantic(format) => format!("string ({})", format),
            TypeDescriptor::Collection { element, unique } => {
                if *unique {
                    format!("set of {}", element.describe())
                } else {
                    format!("array of {}", element.describe())
                }
            }
            TypeDescriptor::Record(record) => format!("object '{}'", record.name),
            TypeDescriptor::Union {
                members, exclusive, ..
            } => {
                let keyword = if *exclusive { "oneOf" } else { "anyOf" };
                format!("{} ({} branches)", keyword, members.len())
            }
            TypeDescriptor::Literal(value) => format!("const {}", value),
            TypeDescriptor::ConstEq { value, .. } => format!("const {}", value),
            TypeDescriptor::Ref(id) => format!("reference '{}'", id),
        }
    }
}
