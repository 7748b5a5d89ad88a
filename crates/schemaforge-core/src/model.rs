//! Materialized model types and instances
//!
//! [`Model`] is what [`SchemaConverter::build`](crate::SchemaConverter::build)
//! hands back: the resolved root type, its constraints, and the finished
//! reference table. Object-root models can be instantiated into
//! [`ModelInstance`]s, which validate on construction and re-validate on
//! every field assignment.
//!
//! Copyright (c) 2025 Schemaforge Team
//! Licensed under the Apache-2.0 license

use crate::constraints::ConstraintSet;
use crate::descriptor::{RecordType, TypeDescriptor};
use crate::error::{Error, Result};
use crate::validate::{
    child_path, ValidationError, ValidationErrorKind, ValidationResult, Validator,
};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// A compiled schema, ready to validate and instantiate values
#[derive(Debug, Clone)]
pub struct Model {
    name: String,
    descriptor: TypeDescriptor,
    constraints: ConstraintSet,
    refs: Arc<HashMap<String, TypeDescriptor>>,
}

impl Model {
    pub(crate) fn new(
        name: String,
        descriptor: TypeDescriptor,
        constraints: ConstraintSet,
        refs: HashMap<String, TypeDescriptor>,
    ) -> Self {
        Self {
            name,
            descriptor,
            constraints,
            refs: Arc::new(refs),
        }
    }

    /// Model name (schema `title`, or `root` for non-object roots)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolved root type
    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    /// Root constraints
    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    /// Validate an arbitrary value against the compiled root type
    pub fn validate(&self, value: &Value) -> ValidationResult<()> {
        Validator::new(&self.refs).validate(value, &self.descriptor, Some(&self.constraints), "$")
    }

    /// Construct a validated instance from input data (object roots only).
    ///
    /// Absent optional fields are filled from their defaults, each
    /// materialized through its factory, so no two instances ever share a
    /// container. Input keys the record does not declare are dropped.
    pub fn instantiate(&self, value: Value) -> Result<ModelInstance> {
        let record = match &self.descriptor {
            TypeDescriptor::Record(record) => Arc::clone(record),
            _ => {
                return Err(Error::structure(
                    &self.name,
                    "model instantiation requires an object-root schema",
                ))
            }
        };

        let input = match value {
            Value::Object(map) => map,
            other => {
                return Err(Error::Validation(ValidationError::new(
                    "$",
                    ValidationErrorKind::TypeMismatch,
                    format!("expected an object to instantiate '{}', got {}", self.name, other),
                )))
            }
        };

        let mut values = Map::new();
        for field in &record.fields {
            match input.get(&field.name) {
                Some(field_value) => {
                    values.insert(field.name.clone(), field_value.clone());
                }
                None => match field.constraints.resolve_default() {
                    Some(default) => {
                        values.insert(field.name.clone(), default);
                    }
                    None => {
                        return Err(Error::Validation(ValidationError::new(
                            "$",
                            ValidationErrorKind::MissingField,
                            format!("required field '{}' is missing", field.name),
                        )))
                    }
                },
            }
        }

        let assembled = Value::Object(values);
        Validator::new(&self.refs).validate(&assembled, &self.descriptor, None, "$")?;

        let values = match assembled {
            Value::Object(map) => map,
            _ => unreachable!("assembled instance is an object"),
        };

        Ok(ModelInstance {
            record,
            refs: Arc::clone(&self.refs),
            values,
        })
    }
}

/// One validated instance of an object-root model
#[derive(Debug, Clone)]
pub struct ModelInstance {
    record: Arc<RecordType>,
    refs: Arc<HashMap<String, TypeDescriptor>>,
    values: Map<String, Value>,
}

impl ModelInstance {
    /// Record type this instance belongs to
    pub fn record(&self) -> &RecordType {
        &self.record
    }

    /// Current value of a field
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Assign a field, re-validating the new value first
    pub fn set(&mut self, name: &str, value: Value) -> ValidationResult<()> {
        let field = self.record.field(name).ok_or_else(|| {
            ValidationError::new(
                "$",
                ValidationErrorKind::UnknownField,
                format!("record '{}' has no field '{}'", self.record.name, name),
            )
        })?;

        // optional fields accept null (the "absent → null" model)
        if !(value.is_null() && !field.is_required()) {
            Validator::new(&self.refs).validate(
                &value,
                &field.descriptor,
                Some(&field.constraints),
                &child_path("$", name),
            )?;
        }

        self.values.insert(name.to_string(), value);
        Ok(())
    }

    /// Snapshot of the instance as a JSON object
    pub fn to_value(&self) -> Value {
        Value::Object(self.values.clone())
    }
}
