//! Keyword registry, dispatcher, and the shared recursion entry point
//!
//! Each node parser declares a selector: a bare keyword (`"const"`) means
//! "keyword present, any value", a compound `"group:member"` form
//! (`"type:string"`) means "keyword `group` must equal `member`". Dispatch
//! scans an explicit, statically built ordered list and returns the first
//! parser whose selector matches; the registry is populated once behind a
//! `OnceLock` and never mutated, so concurrent conversions need no locking.
//!
//! [`parse_node`] is the single entry every recursion goes through: it
//! enforces the depth ceiling, dispatches, and fail-fast validates the
//! node's own resolved default before the result bubbles up.
//!
//! Copyright (c) 2025 Schemaforge Team
//! Licensed under the Apache-2.0 license

pub mod any_of;
pub mod array;
pub mod boolean;
pub mod const_;
pub mod integer;
pub mod mapper;
pub mod null;
pub mod number;
pub mod object;
pub mod one_of;
pub mod reference;
pub mod string;

use crate::constraints::ConstraintSet;
use crate::descriptor::TypeDescriptor;
use crate::error::{Error, Result};
use crate::options::ParseOptions;
use crate::validate::{ValidationErrorKind, Validator};
use log::debug;
use serde_json::{Map, Value};
use std::sync::OnceLock;

/// Maximum schema nesting depth. Conversion is a host-stack recursion, so
/// the ceiling is enforced explicitly and exceeding it is a clean
/// [`Error::RecursionLimit`] rather than a stack overflow.
pub const MAX_DEPTH: usize = 128;

/// A parser for one schema node shape
pub trait NodeParser: Send + Sync {
    /// Selector string: `"keyword"` or `"keyword:value"`
    fn selector(&self) -> &'static str;

    /// Convert a schema node into a resolved type and its constraints
    fn parse(
        &self,
        name: &str,
        node: &Map<String, Value>,
        opts: &ParseOptions,
    ) -> Result<(TypeDescriptor, ConstraintSet)>;
}

/// Parsed form of a selector string
struct Selector {
    keyword: &'static str,
    value: Option<&'static str>,
}

impl Selector {
    fn parse(selector: &'static str) -> Self {
        match selector.split_once(':') {
            Some((keyword, value)) => Self {
                keyword,
                value: Some(value),
            },
            None => Self {
                keyword: selector,
                value: None,
            },
        }
    }

    fn matches(&self, node: &Map<String, Value>) -> bool {
        match node.get(self.keyword) {
            None => false,
            Some(_) if self.value.is_none() => true,
            Some(actual) => actual.as_str() == self.value,
        }
    }
}

/// Registration order is load-bearing: `$ref` and the combinators must win
/// over `type`-keyed parsers when both keywords are present.
fn registry() -> &'static [Box<dyn NodeParser>] {
    static REGISTRY: OnceLock<Vec<Box<dyn NodeParser>>> = OnceLock::new();
    REGISTRY
        .get_or_init(|| {
            vec![
                Box::new(reference::ReferenceParser),
                Box::new(const_::ConstParser),
                Box::new(any_of::AnyOfParser),
                Box::new(one_of::OneOfParser),
                Box::new(object::ObjectParser),
                Box::new(array::ArrayParser),
                Box::new(string::StringParser),
                Box::new(integer::IntegerParser),
                Box::new(number::NumberParser),
                Box::new(boolean::BooleanParser),
                Box::new(null::NullParser),
            ]
        })
        .as_slice()
}

/// Select the parser for a schema node, scanning candidates in
/// registration order
pub fn resolve(name: &str, node: &Map<String, Value>) -> Result<&'static dyn NodeParser> {
    for parser in registry() {
        if Selector::parse(parser.selector()).matches(node) {
            return Ok(parser.as_ref());
        }
    }
    Err(Error::structure(name, "unknown type"))
}

/// Shared recursion entry: dispatch a schema node and validate its own
/// resolved default against the resolved type.
pub fn parse_node(
    name: &str,
    node: &Value,
    opts: &ParseOptions,
) -> Result<(TypeDescriptor, ConstraintSet)> {
    if opts.depth >= MAX_DEPTH {
        return Err(Error::RecursionLimit {
            name: name.to_string(),
            limit: MAX_DEPTH,
        });
    }

    let object = node.as_object().ok_or_else(|| {
        Error::structure(name, format!("schema node must be an object, got {}", node))
    })?;

    let parser = resolve(name, object)?;
    debug!("dispatching '{}' to selector '{}'", name, parser.selector());
    let (descriptor, constraints) = parser.parse(name, object, opts)?;

    check_default(name, &descriptor, &constraints, opts)?;

    Ok((descriptor, constraints))
}

/// Fail-fast check that a node's declared default satisfies its own
/// resolved type and constraints. A null default is vacuously valid
/// (optionality, not a value). References still mid-build are skipped
/// here; the converter re-checks every deferred default once the table
/// is complete.
fn check_default(
    name: &str,
    descriptor: &TypeDescriptor,
    constraints: &ConstraintSet,
    opts: &ParseOptions,
) -> Result<()> {
    let Some(default) = constraints.resolve_default() else {
        return Ok(());
    };
    if default.is_null() {
        return Ok(());
    }

    let refs = opts.refs.borrow();
    let validator = Validator::new(refs.built_map());
    match validator.validate(&default, descriptor, Some(constraints), "$") {
        Ok(()) => Ok(()),
        Err(err) if err.kind == ValidationErrorKind::UnresolvedRef => Ok(()),
        Err(err) => Err(Error::DefaultValidation {
            name: name.to_string(),
            default,
            source: err,
        }),
    }
}
