//! Constraint sets attached to resolved types
//!
//! A [`ConstraintSet`] is the framework-neutral name→value mapping every
//! parser emits next to its [`TypeDescriptor`](crate::TypeDescriptor). The
//! validation runtime reads it back when checking values; the converter
//! reads it for default resolution.
//!
//! Copyright (c) 2025 Schemaforge Team
//! Licensed under the Apache-2.0 license

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Zero-argument default producer. Every invocation returns a freshly built
/// value, so instances never share a mutable container.
pub type DefaultFactory = Arc<dyn Fn() -> Value + Send + Sync>;

/// Framework-neutral constraint names the converter commits to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConstraintKey {
    MaxLength,
    MinLength,
    Pattern,
    Minimum,
    Maximum,
    ExclusiveMinimum,
    ExclusiveMaximum,
    MultipleOf,
    Default,
    Description,
    /// Extra metadata recording the original `format` keyword
    Format,
}

impl ConstraintKey {
    /// Canonical snake_case name, as exposed to the validation framework
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintKey::MaxLength => "max_length",
            ConstraintKey::MinLength => "min_length",
            ConstraintKey::Pattern => "pattern",
            ConstraintKey::Minimum => "minimum",
            ConstraintKey::Maximum => "maximum",
            ConstraintKey::ExclusiveMinimum => "exclusive_minimum",
            ConstraintKey::ExclusiveMaximum => "exclusive_maximum",
            ConstraintKey::MultipleOf => "multiple_of",
            ConstraintKey::Default => "default",
            ConstraintKey::Description => "description",
            ConstraintKey::Format => "format",
        }
    }
}

impl fmt::Display for ConstraintKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Constraint name→value mapping plus the optional default factory slot
///
/// Invariant: a set never carries both a literal `default` and a
/// `default_factory` at the same time. The two setters each clear the other
/// slot, so the invariant holds by construction.
#[derive(Clone, Default)]
pub struct ConstraintSet {
    values: BTreeMap<ConstraintKey, Value>,
    default_factory: Option<DefaultFactory>,
}

impl ConstraintSet {
    /// Create an empty constraint set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a plain constraint value. `Default` goes through
    /// [`set_default`](Self::set_default) to uphold the factory invariant.
    pub fn insert(&mut self, key: ConstraintKey, value: Value) {
        if key == ConstraintKey::Default {
            self.set_default(value);
        } else {
            self.values.insert(key, value);
        }
    }

    /// Get a constraint value
    pub fn get(&self, key: ConstraintKey) -> Option<&Value> {
        self.values.get(&key)
    }

    /// Set a literal default, clearing any default factory
    pub fn set_default(&mut self, value: Value) {
        self.default_factory = None;
        self.values.insert(ConstraintKey::Default, value);
    }

    /// Set a default factory, clearing any literal default
    pub fn set_default_factory(&mut self, factory: DefaultFactory) {
        self.values.remove(&ConstraintKey::Default);
        self.default_factory = Some(factory);
    }

    /// Literal default, if one is set
    pub fn default_value(&self) -> Option<&Value> {
        self.values.get(&ConstraintKey::Default)
    }

    /// Default factory, if one is set
    pub fn default_factory(&self) -> Option<&DefaultFactory> {
        self.default_factory.as_ref()
    }

    /// Whether the set carries any default, literal or factory
    pub fn has_default(&self) -> bool {
        self.values.contains_key(&ConstraintKey::Default) || self.default_factory.is_some()
    }

    /// Resolve the effective default: the literal, or one factory invocation
    pub fn resolve_default(&self) -> Option<Value> {
        if let Some(value) = self.default_value() {
            return Some(value.clone());
        }
        self.default_factory.as_ref().map(|factory| factory())
    }

    /// Whether the set constrains anything beyond a bare null default.
    /// A set exactly equal to `{default: null}` is not meaningful and is
    /// dropped when wrapping union branches.
    pub fn is_meaningful(&self) -> bool {
        if self.default_factory.is_some() {
            return true;
        }
        match self.values.len() {
            0 => false,
            1 => self.values.get(&ConstraintKey::Default) != Some(&Value::Null),
            _ => true,
        }
    }

    /// Number of stored constraint values (excluding the factory slot)
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the set is completely empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.default_factory.is_none()
    }

    /// Iterate over stored constraint values in key order
    pub fn iter(&self) -> impl Iterator<Item = (ConstraintKey, &Value)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }
}

impl fmt::Debug for ConstraintSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in &self.values {
            map.entry(&key.as_str(), value);
        }
        if self.default_factory.is_some() {
            map.entry(&"default_factory", &"<factory>");
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_and_factory_never_coexist() {
        let mut set = ConstraintSet::new();
        set.set_default(json!("x"));
        assert!(set.default_value().is_some());

        set.set_default_factory(Arc::new(|| Value::Null));
        assert!(set.default_value().is_none());
        assert!(set.default_factory().is_some());

        set.set_default(json!(1));
        assert!(set.default_factory().is_none());
        assert_eq!(set.default_value(), Some(&json!(1)));
    }

    #[test]
    fn test_bare_null_default_is_not_meaningful() {
        let mut set = ConstraintSet::new();
        assert!(!set.is_meaningful());

        set.set_default(Value::Null);
        assert!(!set.is_meaningful());

        set.insert(ConstraintKey::MinLength, json!(1));
        assert!(set.is_meaningful());
    }

    #[test]
    fn test_factory_is_meaningful() {
        let mut set = ConstraintSet::new();
        set.set_default_factory(Arc::new(|| json!([])));
        assert!(set.is_meaningful());
    }

    #[test]
    fn test_resolve_default_invokes_factory() {
        let mut set = ConstraintSet::new();
        set.set_default_factory(Arc::new(|| json!([1, 2])));
        assert_eq!(set.resolve_default(), Some(json!([1, 2])));
    }
}
