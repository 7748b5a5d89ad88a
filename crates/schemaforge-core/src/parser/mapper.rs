//! Shared keyword-rename and default-propagation logic
//!
//! Every node parser funnels its schema keywords through
//! [`build_constraints`] so keyword translation stays centralized: a
//! parser-specific rename table is merged over the universal table
//! (`default`, `description`), only keys present in the merge are copied,
//! and optional fields without a declared default receive an explicit
//! null default. Optionality is always modeled as "absent → null default",
//! never "absent → error".
//!
//! Copyright (c) 2025 Schemaforge Team
//! Licensed under the Apache-2.0 license

use crate::constraints::{ConstraintKey, ConstraintSet};
use crate::error::{Error, Result};
use crate::options::ParseOptions;
use regex::Regex;
use serde_json::{Map, Value};

/// One keyword-rename entry: schema keyword → framework-neutral constraint
pub type KeywordMapping = (&'static str, ConstraintKey);

/// Universal mappings shared by (almost) every parser. Parsers that handle
/// defaults themselves (array) or source them from another keyword (const)
/// override this table.
pub const UNIVERSAL_MAPPINGS: &[KeywordMapping] = &[
    ("default", ConstraintKey::Default),
    ("description", ConstraintKey::Description),
];

/// Build a constraint set from a schema node.
///
/// `specific` wins over `universal` when both rename the same keyword.
pub fn build_constraints(
    name: &str,
    node: &Map<String, Value>,
    universal: &[KeywordMapping],
    specific: &[KeywordMapping],
    opts: &ParseOptions,
) -> Result<ConstraintSet> {
    let mut constraints = ConstraintSet::new();

    let merged = universal
        .iter()
        .filter(|(keyword, _)| !specific.iter().any(|(s, _)| s == keyword))
        .chain(specific.iter());

    let mut maps_default = false;
    for (keyword, key) in merged {
        if *keyword == "default" {
            maps_default = true;
        }
        if let Some(value) = node.get(*keyword) {
            if *key == ConstraintKey::Pattern {
                check_pattern(name, value)?;
            }
            constraints.insert(*key, value.clone());
        }
    }

    // Optional fields always carry an explicit default, unless the parser
    // deliberately keeps the default keyword out of its mapping (it then
    // installs a factory itself).
    if !opts.required && maps_default && !constraints.has_default() {
        constraints.set_default(Value::Null);
    }

    Ok(constraints)
}

/// Fail fast on pattern values the regex engine cannot compile
fn check_pattern(name: &str, value: &Value) -> Result<()> {
    let pattern = value.as_str().ok_or_else(|| {
        Error::constraint(name, format!("'pattern' must be a string, got {}", value))
    })?;
    Regex::new(pattern)
        .map(|_| ())
        .map_err(|err| Error::constraint(name, format!("invalid pattern '{}': {}", pattern, err)))
}
