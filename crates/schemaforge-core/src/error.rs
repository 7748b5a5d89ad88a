//! Error types for the schemaforge core library
//!
//! This module defines the compile-time error taxonomy for schema
//! conversion, using thiserror for ergonomic error definitions. Runtime
//! value-validation failures live in [`crate::validate::ValidationError`]
//! and are wrapped into [`Error::Validation`] when they surface through a
//! compile-time path (e.g. default validation).
//!
//! Copyright (c) 2025 Schemaforge Team
//! Licensed under the Apache-2.0 license

use crate::validate::ValidationError;
use thiserror::Error;

/// Main error type for schema conversion operations
#[derive(Error, Debug)]
pub enum Error {
    /// No registered parser matched the schema node
    #[error("Schema structure error at '{name}': {message}")]
    SchemaStructure { name: String, message: String },

    /// A dispatched keyword carries a value of the wrong shape
    #[error("Keyword misuse at '{name}': '{keyword}' {message}")]
    KeywordMisuse {
        name: String,
        keyword: String,
        message: String,
    },

    /// A constraint value has a type incompatible with the resolved type
    #[error("Constraint type error at '{name}': {message}")]
    ConstraintType { name: String, message: String },

    /// Unknown string `format` value
    #[error("Unsupported string format: {format}")]
    UnsupportedFormat { format: String },

    /// The schema's declared default fails its own resolved type
    #[error("Default value {default} is not valid for type '{name}': {source}")]
    DefaultValidation {
        name: String,
        default: serde_json::Value,
        #[source]
        source: ValidationError,
    },

    /// Schema nesting exceeded the converter's recursion ceiling
    #[error("Schema nesting exceeds the maximum depth of {limit} at '{name}'")]
    RecursionLimit { name: String, limit: usize },

    /// A runtime validation failure surfaced through a compile-time path
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl Error {
    /// Create a schema structure error
    pub fn structure<N, M>(name: N, message: M) -> Self
    where
        N: Into<String>,
        M: Into<String>,
    {
        Self::SchemaStructure {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a keyword misuse error
    pub fn keyword<N, K, M>(name: N, keyword: K, message: M) -> Self
    where
        N: Into<String>,
        K: Into<String>,
        M: Into<String>,
    {
        Self::KeywordMisuse {
            name: name.into(),
            keyword: keyword.into(),
            message: message.into(),
        }
    }

    /// Create a constraint type error
    pub fn constraint<N, M>(name: N, message: M) -> Self
    where
        N: Into<String>,
        M: Into<String>,
    {
        Self::ConstraintType {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for schema conversion operations
pub type Result<T> = std::result::Result<T, Error>;
