// crates/propbind/src/validation.rs
// ============================================================================
// Module: Validation
// Description: Single-field and cross-field constraints over bound configs.
// Purpose: Report every violated constraint in one pass.
// Dependencies: thiserror, tracing
// ============================================================================

//! ## Overview
//! A [`Constraint`] is a pure predicate over the whole configuration instance
//! plus a message template. Single-field and cross-field constraints differ
//! only in the keys they name. [`validate`] evaluates every constraint with no
//! short-circuit and returns all failures as [`Violations`].
//!
//! Message templates may reference `{key}` (first key) and `{keys}` (all
//! keys). Values are never interpolated; each violation carries the affected
//! values separately, redacted when sensitive.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::descriptor::Configuration;
use crate::descriptor::DescriptorSet;
use crate::descriptor::RegistrationError;
use crate::redaction::DisplayValue;
use crate::registry::describe;

// ============================================================================
// SECTION: Constraints
// ============================================================================

/// Keys inspected by a constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintScope {
    /// Constraint over one field.
    SingleField(&'static str),
    /// Constraint relating several fields.
    CrossField(Vec<&'static str>),
}

impl ConstraintScope {
    /// Returns the keys named by the scope.
    #[must_use]
    pub fn keys(&self) -> &[&'static str] {
        match self {
            Self::SingleField(key) => std::slice::from_ref(key),
            Self::CrossField(keys) => keys,
        }
    }
}

/// Pure predicate evaluated against a bound instance.
type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// Declared validation rule for a configuration type.
pub struct Constraint<T> {
    /// Keys inspected by the predicate.
    scope: ConstraintScope,
    /// Message template reported on failure.
    message: &'static str,
    /// Returns true when the instance satisfies the rule.
    predicate: Predicate<T>,
}

impl<T> Constraint<T> {
    /// Creates a constraint over one field.
    pub fn single_field<P>(key: &'static str, message: &'static str, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self {
            scope: ConstraintScope::SingleField(key),
            message,
            predicate: Box::new(predicate),
        }
    }

    /// Creates a constraint relating several fields.
    ///
    /// The predicate must treat an absent prerequisite as "not applicable".
    pub fn cross_field<P>(keys: &[&'static str], message: &'static str, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self {
            scope: ConstraintScope::CrossField(keys.to_vec()),
            message,
            predicate: Box::new(predicate),
        }
    }

    /// Returns the constraint scope.
    #[must_use]
    pub const fn scope(&self) -> &ConstraintScope {
        &self.scope
    }

    /// Returns the keys named by the constraint.
    #[must_use]
    pub fn keys(&self) -> &[&'static str] {
        self.scope.keys()
    }

    /// Returns the unrendered message template.
    #[must_use]
    pub const fn message_template(&self) -> &'static str {
        self.message
    }

    /// Returns true when the instance satisfies the constraint.
    pub fn holds(&self, config: &T) -> bool {
        (self.predicate)(config)
    }

    /// Renders the message template with key placeholders filled in.
    #[must_use]
    pub fn render_message(&self) -> String {
        let keys = self.keys();
        let first = keys.first().copied().unwrap_or_default();
        self.message.replace("{keys}", &keys.join(", ")).replace("{key}", first)
    }
}

impl<T> fmt::Debug for Constraint<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constraint")
            .field("scope", &self.scope)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Violations
// ============================================================================

/// A bound instance failed a declared constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationViolation {
    /// Scope of the failed constraint.
    scope: ConstraintScope,
    /// Rendered message.
    message: String,
    /// Values of the inspected fields, redacted when sensitive.
    values: Vec<(&'static str, DisplayValue)>,
}

impl ValidationViolation {
    /// Returns the scope of the failed constraint.
    #[must_use]
    pub const fn scope(&self) -> &ConstraintScope {
        &self.scope
    }

    /// Returns the offending keys.
    #[must_use]
    pub fn keys(&self) -> &[&'static str] {
        self.scope.keys()
    }

    /// Returns the rendered message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the values of the inspected fields.
    #[must_use]
    pub fn values(&self) -> &[(&'static str, DisplayValue)] {
        &self.values
    }
}

impl fmt::Display for ValidationViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.keys().join(", "), self.message)?;
        if !self.values.is_empty() {
            let values: Vec<String> =
                self.values.iter().map(|(key, value)| format!("{key}={value}")).collect();
            write!(f, " ({})", values.join(", "))?;
        }
        Ok(())
    }
}

/// Every violation found while validating one instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{} validation violation(s): {}", .0.len(), join_violations(.0))]
pub struct Violations(Vec<ValidationViolation>);

impl Violations {
    /// Returns true when no constraint failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates violations in constraint declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationViolation> {
        self.0.iter()
    }

    /// Returns the violations as a vector.
    #[must_use]
    pub fn into_vec(self) -> Vec<ValidationViolation> {
        self.0
    }
}

/// Joins violations for the aggregate message.
fn join_violations(violations: &[ValidationViolation]) -> String {
    violations.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

// ============================================================================
// SECTION: Evaluation
// ============================================================================

impl<T> DescriptorSet<T> {
    /// Evaluates every declared constraint against `config`.
    pub fn validate(&self, config: &T) -> Violations {
        let violations: Vec<ValidationViolation> = self
            .constraints()
            .iter()
            .filter(|constraint| !constraint.holds(config))
            .map(|constraint| ValidationViolation {
                scope: constraint.scope().clone(),
                message: constraint.render_message(),
                values: constraint
                    .keys()
                    .iter()
                    .filter_map(|key| self.field(key))
                    .map(|field| (field.key(), field.display_value_of(config)))
                    .collect(),
            })
            .collect();
        debug!(config = self.name(), violations = violations.len(), "validated configuration");
        Violations(violations)
    }
}

/// Validates a bound instance against its type's declared constraints.
///
/// # Errors
///
/// Returns [`RegistrationError`] when `T` is misdeclared.
pub fn validate<T: Configuration>(config: &T) -> Result<Violations, RegistrationError> {
    Ok(describe::<T>()?.validate(config))
}
