//! String schema parser
//!
//! Renames `maxLength`/`minLength`/`pattern` to their framework-neutral
//! names and maps the `format` keyword either to a richer semantic type or,
//! where no semantic type exists (`hostname`), degrades to a plain string
//! plus a fixed pattern constraint. The original format value is always
//! recorded under the `format` extra key.
//!
//! Copyright (c) 2025 Schemaforge Team
//! Licensed under the Apache-2.0 license

use crate::constraints::{ConstraintKey, ConstraintSet};
use crate::descriptor::{PrimitiveKind, SemanticFormat, TypeDescriptor};
use crate::error::{Error, Result};
use crate::options::ParseOptions;
use crate::parser::mapper::{self, KeywordMapping, UNIVERSAL_MAPPINGS};
use crate::parser::NodeParser;
use serde_json::{json, Map, Value};

const TYPE_MAPPINGS: &[KeywordMapping] = &[
    ("maxLength", ConstraintKey::MaxLength),
    ("minLength", ConstraintKey::MinLength),
    ("pattern", ConstraintKey::Pattern),
];

/// RFC 1123 hostname shape; `hostname` has no semantic type and degrades
/// to a plain string constrained by this pattern.
const HOSTNAME_PATTERN: &str = r"^[a-zA-Z0-9]([a-zA-Z0-9\-]{0,61}[a-zA-Z0-9])?(\.[a-zA-Z0-9]([a-zA-Z0-9\-]{0,61}[a-zA-Z0-9])?)*$";

fn semantic_format(format: &str) -> Option<SemanticFormat> {
    match format {
        "email" => Some(SemanticFormat::Email),
        "uri" => Some(SemanticFormat::Uri),
        "ipv4" => Some(SemanticFormat::Ipv4),
        "ipv6" => Some(SemanticFormat::Ipv6),
        "date" => Some(SemanticFormat::Date),
        "time" => Some(SemanticFormat::Time),
        "date-time" => Some(SemanticFormat::DateTime),
        "binary" => Some(SemanticFormat::Binary),
        "file-path" => Some(SemanticFormat::FilePath),
        _ => None,
    }
}

pub struct StringParser;

impl NodeParser for StringParser {
    fn selector(&self) -> &'static str {
        "type:string"
    }

    fn parse(
        &self,
        name: &str,
        node: &Map<String, Value>,
        opts: &ParseOptions,
    ) -> Result<(TypeDescriptor, ConstraintSet)> {
        let mut constraints =
            mapper::build_constraints(name, node, UNIVERSAL_MAPPINGS, TYPE_MAPPINGS, opts)?;

        let Some(format) = node.get("format") else {
            return Ok((TypeDescriptor::Primitive(PrimitiveKind::Str), constraints));
        };
        let format = format.as_str().ok_or_else(|| {
            Error::keyword(name, "format", format!("must be a string, got {}", format))
        })?;

        let descriptor = if format == "hostname" {
            constraints.insert(ConstraintKey::Pattern, json!(HOSTNAME_PATTERN));
            TypeDescriptor::Primitive(PrimitiveKind::Str)
        } else {
            match semantic_format(format) {
                Some(semantic) => TypeDescriptor::Semantic(semantic),
                None => {
                    return Err(Error::UnsupportedFormat {
                        format: format.to_string(),
                    })
                }
            }
        };

        constraints.insert(ConstraintKey::Format, json!(format));

        Ok((descriptor, constraints))
    }
}
