//! Runtime value validation against resolved types
//!
//! The converter emits `(TypeDescriptor, ConstraintSet)` pairs; this module
//! is the engine that checks concrete `serde_json::Value`s against them. It
//! is a pure recursive walk with JSON-path error locations, used both at
//! schema-compile time (default validation) and by [`crate::model::Model`]
//! at instantiation and assignment.
//!
//! Copyright (c) 2025 Schemaforge Team
//! Licensed under the Apache-2.0 license

pub mod formats;

use crate::constraints::{ConstraintKey, ConstraintSet};
use crate::descriptor::{PrimitiveKind, TypeDescriptor, UnionMember};
use log::trace;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Classification of a runtime validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// Value has the wrong JSON kind for the resolved type
    TypeMismatch,
    /// Value violates a constraint (length, pattern, numeric bound)
    Constraint,
    /// A required record field is absent
    MissingField,
    /// Assignment to a field the record does not declare
    UnknownField,
    /// Exclusive union: no branch matched
    NoBranchMatch,
    /// Exclusive union: more than one branch matched
    MultipleBranchMatch,
    /// Value fails a semantic string format
    Format,
    /// Value differs from a `const` literal
    ConstMismatch,
    /// A `$ref` id is missing from the reference table
    UnresolvedRef,
}

/// Value validation error with a JSON-path location
#[derive(Debug, Clone, Error, Serialize)]
pub struct ValidationError {
    /// JSON path where the error occurred
    pub path: String,
    /// Failure classification
    pub kind: ValidationErrorKind,
    /// Human-readable error message
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation error at '{}': {}", self.path, self.message)
    }
}

impl ValidationError {
    /// Create a new validation error
    pub fn new<P, M>(path: P, kind: ValidationErrorKind, message: M) -> Self
    where
        P: Into<String>,
        M: Into<String>,
    {
        Self {
            path: path.into(),
            kind,
            message: message.into(),
        }
    }
}

/// Result type for runtime validation
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

/// Append a property segment to a JSON path
pub(crate) fn child_path(path: &str, segment: &str) -> String {
    if path == "$" {
        format!("$.{}", segment)
    } else {
        format!("{}.{}", path, segment)
    }
}

fn index_path(path: &str, index: usize) -> String {
    format!("{}[{}]", path, index)
}

/// Validation engine over one conversion's reference table
pub struct Validator<'a> {
    refs: &'a HashMap<String, TypeDescriptor>,
    /// Compiled-pattern memo, filled on first use of each pattern
    patterns: RefCell<HashMap<String, Regex>>,
}

impl<'a> Validator<'a> {
    /// Create a validator resolving `$ref` descriptors from `refs`
    pub fn new(refs: &'a HashMap<String, TypeDescriptor>) -> Self {
        Self {
            refs,
            patterns: RefCell::new(HashMap::new()),
        }
    }

    /// Compiled regex for a pattern constraint. Patterns are syntax-checked
    /// at schema-compile time, so a failure here means the constraint set
    /// was assembled by hand; it is reported, not swallowed.
    fn compiled_pattern(&self, pattern: &str, path: &str) -> ValidationResult<Regex> {
        let mut cache = self.patterns.borrow_mut();
        if let Some(regex) = cache.get(pattern) {
            return Ok(regex.clone());
        }
        let regex = Regex::new(pattern).map_err(|err| {
            ValidationError::new(
                path,
                ValidationErrorKind::Constraint,
                format!("invalid pattern '{}': {}", pattern, err),
            )
        })?;
        cache.insert(pattern.to_string(), regex.clone());
        Ok(regex)
    }

    /// Validate a value against a resolved type and its constraints
    pub fn validate(
        &self,
        value: &Value,
        descriptor: &TypeDescriptor,
        constraints: Option<&ConstraintSet>,
        path: &str,
    ) -> ValidationResult<()> {
        trace!("validating {} at {}", descriptor.describe(), path);
        self.check_type(value, descriptor, path)?;
        if let Some(constraints) = constraints {
            self.check_constraints(value, constraints, path)?;
        }
        Ok(())
    }

    fn check_type(
        &self,
        value: &Value,
        descriptor: &TypeDescriptor,
        path: &str,
    ) -> ValidationResult<()> {
        match descriptor {
            TypeDescriptor::Primitive(kind) => self.check_primitive(value, *kind, path),
            TypeDescriptor::Semantic(format) => {
                let text = value.as_str().ok_or_else(|| {
                    ValidationError::new(
                        path,
                        ValidationErrorKind::TypeMismatch,
                        format!("expected a string ({}), got {}", format, kind_name(value)),
                    )
                })?;
                formats::check_format(*format, text).map_err(|reason| {
                    ValidationError::new(path, ValidationErrorKind::Format, reason)
                })
            }
            TypeDescriptor::Collection { element, unique } => {
                self.check_collection(value, element, *unique, path)
            }
            TypeDescriptor::Record(record) => {
                let object = value.as_object().ok_or_else(|| {
                    ValidationError::new(
                        path,
                        ValidationErrorKind::TypeMismatch,
                        format!(
                            "expected object '{}', got {}",
                            record.name,
                            kind_name(value)
                        ),
                    )
                })?;

                for field in &record.fields {
                    match object.get(&field.name) {
                        Some(Value::Null) if !field.is_required() => {}
                        Some(field_value) => {
                            self.validate(
                                field_value,
                                &field.descriptor,
                                Some(&field.constraints),
                                &child_path(path, &field.name),
                            )?;
                        }
                        None if field.is_required() => {
                            return Err(ValidationError::new(
                                path,
                                ValidationErrorKind::MissingField,
                                format!("required field '{}' is missing", field.name),
                            ));
                        }
                        None => {}
                    }
                }
                Ok(())
            }
            TypeDescriptor::Union {
                members,
                exclusive,
                discriminator,
            } => self.check_union(value, members, *exclusive, discriminator.as_deref(), path),
            TypeDescriptor::Literal(literal) => {
                if value == literal {
                    Ok(())
                } else {
                    Err(ValidationError::new(
                        path,
                        ValidationErrorKind::ConstMismatch,
                        format!("Value must be equal to the constant value: {}", literal),
                    ))
                }
            }
            TypeDescriptor::ConstEq { base, value: expected } => {
                self.check_type(value, base, path)?;
                if value == expected {
                    Ok(())
                } else {
                    Err(ValidationError::new(
                        path,
                        ValidationErrorKind::ConstMismatch,
                        format!("Value must be equal to the constant value: {}", expected),
                    ))
                }
            }
            TypeDescriptor::Ref(id) => match self.refs.get(id) {
                Some(target) => self.check_type(value, target, path),
                None => Err(ValidationError::new(
                    path,
                    ValidationErrorKind::UnresolvedRef,
                    format!("unresolved reference '{}'", id),
                )),
            },
        }
    }

    fn check_primitive(
        &self,
        value: &Value,
        kind: PrimitiveKind,
        path: &str,
    ) -> ValidationResult<()> {
        let ok = match kind {
            PrimitiveKind::Str => value.is_string(),
            PrimitiveKind::Bool => value.is_boolean(),
            PrimitiveKind::Int => is_integral(value),
            PrimitiveKind::Float => value.is_number(),
            PrimitiveKind::Null => value.is_null(),
            PrimitiveKind::Any => true,
        };
        if ok {
            Ok(())
        } else {
            Err(ValidationError::new(
                path,
                ValidationErrorKind::TypeMismatch,
                format!("expected {}, got {}", kind, kind_name(value)),
            ))
        }
    }

    fn check_collection(
        &self,
        value: &Value,
        element: &TypeDescriptor,
        unique: bool,
        path: &str,
    ) -> ValidationResult<()> {
        let items = value.as_array().ok_or_else(|| {
            ValidationError::new(
                path,
                ValidationErrorKind::TypeMismatch,
                format!("expected an array, got {}", kind_name(value)),
            )
        })?;

        for (index, item) in items.iter().enumerate() {
            self.check_type(item, element, &index_path(path, index))?;
        }

        if unique {
            // Set semantics: serde_json values are not hashable, so scan
            // pairwise. Item counts stay small enough in practice.
            for (i, left) in items.iter().enumerate() {
                if items.iter().skip(i + 1).any(|right| left == right) {
                    return Err(ValidationError::new(
                        index_path(path, i),
                        ValidationErrorKind::Constraint,
                        format!("duplicate item {} in a uniqueItems array", left),
                    ));
                }
            }
        }
        Ok(())
    }

    fn check_union(
        &self,
        value: &Value,
        members: &[UnionMember],
        exclusive: bool,
        discriminator: Option<&str>,
        path: &str,
    ) -> ValidationResult<()> {
        if !exclusive {
            for member in members {
                if self
                    .validate(value, &member.descriptor, member.constraints.as_ref(), path)
                    .is_ok()
                {
                    return Ok(());
                }
            }
            return Err(ValidationError::new(
                path,
                ValidationErrorKind::NoBranchMatch,
                format!("Value {} does not match any of the anyOf schemas", value),
            ));
        }

        // Exclusivity requires attempting every branch in registration
        // order and counting successes. The discriminator is a dispatch
        // hint only: it picks which matching branch is reported, but a
        // multi-match is still an error and a failing pre-selected branch
        // still counts as no match.
        let mut matches = 0usize;
        for member in members {
            if self
                .validate(value, &member.descriptor, member.constraints.as_ref(), path)
                .is_ok()
            {
                matches += 1;
            }
        }

        match matches {
            1 => Ok(()),
            0 => Err(ValidationError::new(
                path,
                ValidationErrorKind::NoBranchMatch,
                format!("Value {} does not match any of the oneOf schemas", value),
            )),
            n => {
                let hint = discriminator
                    .map(|property| format!(" (discriminator '{}' does not resolve the ambiguity)", property))
                    .unwrap_or_default();
                Err(ValidationError::new(
                    path,
                    ValidationErrorKind::MultipleBranchMatch,
                    format!(
                        "Value {} matches multiple oneOf schemas ({} of {}, exactly one required){}",
                        value,
                        n,
                        members.len(),
                        hint
                    ),
                ))
            }
        }
    }

    fn check_constraints(
        &self,
        value: &Value,
        constraints: &ConstraintSet,
        path: &str,
    ) -> ValidationResult<()> {
        for (key, expected) in constraints.iter() {
            match key {
                ConstraintKey::MaxLength => {
                    if let Some(limit) = expected.as_u64() {
                        let length = value_length(value);
                        if let Some(length) = length {
                            if length as u64 > limit {
                                return Err(ValidationError::new(
                                    path,
                                    ValidationErrorKind::Constraint,
                                    format!("length {} exceeds max_length {}", length, limit),
                                ));
                            }
                        }
                    }
                }
                ConstraintKey::MinLength => {
                    if let Some(limit) = expected.as_u64() {
                        let length = value_length(value);
                        if let Some(length) = length {
                            if (length as u64) < limit {
                                return Err(ValidationError::new(
                                    path,
                                    ValidationErrorKind::Constraint,
                                    format!("length {} is below min_length {}", length, limit),
                                ));
                            }
                        }
                    }
                }
                ConstraintKey::Pattern => {
                    if let (Some(pattern), Some(text)) = (expected.as_str(), value.as_str()) {
                        let regex = self.compiled_pattern(pattern, path)?;
                        if !regex.is_match(text) {
                            return Err(ValidationError::new(
                                path,
                                ValidationErrorKind::Constraint,
                                format!("'{}' does not match pattern '{}'", text, pattern),
                            ));
                        }
                    }
                }
                ConstraintKey::Minimum => {
                    self.check_bound(value, expected, path, |v, b| v >= b, "minimum")?;
                }
                ConstraintKey::Maximum => {
                    self.check_bound(value, expected, path, |v, b| v <= b, "maximum")?;
                }
                ConstraintKey::ExclusiveMinimum => {
                    self.check_bound(value, expected, path, |v, b| v > b, "exclusive_minimum")?;
                }
                ConstraintKey::ExclusiveMaximum => {
                    self.check_bound(value, expected, path, |v, b| v < b, "exclusive_maximum")?;
                }
                ConstraintKey::MultipleOf => {
                    if let (Some(number), Some(step)) = (value.as_f64(), expected.as_f64()) {
                        if !is_multiple_of(number, step) {
                            return Err(ValidationError::new(
                                path,
                                ValidationErrorKind::Constraint,
                                format!("{} is not a multiple of {}", number, step),
                            ));
                        }
                    }
                }
                // Metadata keys carry no runtime check
                ConstraintKey::Default | ConstraintKey::Description | ConstraintKey::Format => {}
            }
        }
        Ok(())
    }

    fn check_bound(
        &self,
        value: &Value,
        bound: &Value,
        path: &str,
        satisfied: fn(f64, f64) -> bool,
        name: &str,
    ) -> ValidationResult<()> {
        if let (Some(number), Some(bound)) = (value.as_f64(), bound.as_f64()) {
            if !satisfied(number, bound) {
                return Err(ValidationError::new(
                    path,
                    ValidationErrorKind::Constraint,
                    format!("{} violates {} {}", number, name, bound),
                ));
            }
        }
        Ok(())
    }
}

/// Length used by min/max length constraints: character count for strings,
/// item count for arrays
fn value_length(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

/// Whether a JSON number is integral (JSON Schema `integer` semantics)
fn is_integral(value: &Value) -> bool {
    if value.is_i64() || value.is_u64() {
        return true;
    }
    value.as_f64().is_some_and(|f| f.fract() == 0.0 && f.is_finite())
}

fn is_multiple_of(value: f64, step: f64) -> bool {
    if step == 0.0 {
        return false;
    }
    let ratio = value / step;
    (ratio - ratio.round()).abs() < 1e-9
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn validator_over(refs: &HashMap<String, TypeDescriptor>) -> Validator<'_> {
        Validator::new(refs)
    }

    #[test]
    fn test_integer_rejects_fractional_number() {
        let refs = HashMap::new();
        let v = validator_over(&refs);
        let ty = TypeDescriptor::Primitive(PrimitiveKind::Int);

        assert!(v.validate(&json!(123), &ty, None, "$").is_ok());
        assert!(v.validate(&json!(123.0), &ty, None, "$").is_ok());
        let err = v.validate(&json!(123.45), &ty, None, "$").unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::TypeMismatch);
    }

    #[test]
    fn test_string_constraints() {
        let refs = HashMap::new();
        let v = validator_over(&refs);
        let ty = TypeDescriptor::Primitive(PrimitiveKind::Str);
        let mut constraints = ConstraintSet::new();
        constraints.insert(ConstraintKey::MinLength, json!(2));
        constraints.insert(ConstraintKey::MaxLength, json!(4));
        constraints.insert(ConstraintKey::Pattern, json!("^[a-z]+$"));

        assert!(v.validate(&json!("abc"), &ty, Some(&constraints), "$").is_ok());
        assert!(v.validate(&json!("a"), &ty, Some(&constraints), "$").is_err());
        assert!(v.validate(&json!("abcde"), &ty, Some(&constraints), "$").is_err());
        assert!(v.validate(&json!("ABC"), &ty, Some(&constraints), "$").is_err());
    }

    #[test]
    fn test_unique_collection_rejects_duplicates() {
        let refs = HashMap::new();
        let v = validator_over(&refs);
        let ty = TypeDescriptor::Collection {
            element: Box::new(TypeDescriptor::Primitive(PrimitiveKind::Str)),
            unique: true,
        };

        assert!(v.validate(&json!(["a", "b"]), &ty, None, "$").is_ok());
        let err = v.validate(&json!(["a", "a"]), &ty, None, "$").unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::Constraint);
        assert!(err.message.contains("duplicate"));
    }

    #[test]
    fn test_multiple_of_integral_and_float() {
        assert!(is_multiple_of(9.0, 3.0));
        assert!(is_multiple_of(0.3, 0.1));
        assert!(!is_multiple_of(5.0, 2.0));
    }

    #[test]
    fn test_pattern_memo_reused_across_validations() {
        let refs = HashMap::new();
        let v = validator_over(&refs);
        let ty = TypeDescriptor::Primitive(PrimitiveKind::Str);
        let mut constraints = ConstraintSet::new();
        constraints.insert(ConstraintKey::Pattern, json!("^[a-z]+$"));

        assert!(v.validate(&json!("abc"), &ty, Some(&constraints), "$").is_ok());
        assert!(v.validate(&json!("xyz"), &ty, Some(&constraints), "$").is_ok());
        assert_eq!(v.patterns.borrow().len(), 1, "one compilation per pattern");
    }

    #[test]
    fn test_uncompilable_pattern_is_reported_not_swallowed() {
        // reachable only through a hand-assembled constraint set; the
        // parsers reject such patterns at schema-compile time
        let refs = HashMap::new();
        let v = validator_over(&refs);
        let ty = TypeDescriptor::Primitive(PrimitiveKind::Str);
        let mut constraints = ConstraintSet::new();
        constraints.insert(ConstraintKey::Pattern, json!("([unclosed"));

        let err = v.validate(&json!("abc"), &ty, Some(&constraints), "$").unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::Constraint);
        assert!(err.message.contains("invalid pattern"));
    }

    #[test]
    fn test_error_serializes_for_reporting() {
        let err = ValidationError::new("$.age", ValidationErrorKind::Constraint, "too small");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["path"], "$.age");
        assert_eq!(json["kind"], "constraint");
    }

    #[test]
    fn test_unresolved_ref_is_reported() {
        let refs = HashMap::new();
        let v = validator_over(&refs);
        let ty = TypeDescriptor::Ref("#/definitions/missing".to_string());
        let err = v.validate(&json!(1), &ty, None, "$").unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::UnresolvedRef);
    }
}
