// crates/propbind-conformance/src/error.rs
// ============================================================================
// Module: Conformance Errors
// Description: Failure reports produced by the conformance harness.
// Purpose: Describe disagreements between fixtures and binder behavior.
// Dependencies: propbind, thiserror
// ============================================================================

//! ## Overview
//! Each [`ConformanceError`] names the fixture and key involved. Values are
//! carried as [`DisplayValue`]s so sensitive fixture values stay redacted in
//! test-failure diagnostics.

// ============================================================================
// SECTION: Imports
// ============================================================================

use propbind::BindErrors;
use propbind::DisplayValue;
use propbind::RegistrationError;
use propbind::Violations;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// A single conformance failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConformanceError {
    /// The configuration type is misdeclared.
    #[error("registration failed: {0}")]
    Registration(#[from] RegistrationError),
    /// A fixture failed to bind.
    #[error("{fixture}: binding failed: {errors}")]
    Binding {
        /// Fixture label.
        fixture: String,
        /// Binding errors reported.
        errors: BindErrors,
    },
    /// A bound fixture violated declared constraints.
    #[error("{fixture}: validation failed: {violations}")]
    Validation {
        /// Fixture label.
        fixture: String,
        /// Violations reported.
        violations: Violations,
    },
    /// A declared field disagrees with the expected instance.
    #[error("{fixture}: {key} expected {expected} but was {actual}")]
    FieldMismatch {
        /// Fixture label.
        fixture: String,
        /// Field key.
        key: &'static str,
        /// Expected value, redacted when sensitive.
        expected: DisplayValue,
        /// Observed value, redacted when sensitive.
        actual: DisplayValue,
    },
    /// An explicit fixture supplies a field's default value.
    #[error("{fixture}: {key} is set to its default; explicit fixtures must use non-default values")]
    ExplicitValueIsDefault {
        /// Fixture label.
        fixture: String,
        /// Field key.
        key: &'static str,
    },
    /// Declared keys appear in no explicit fixture.
    #[error("properties not covered by any explicit mapping: {}", .keys.join(", "))]
    UncoveredKeys {
        /// Uncovered keys in declaration order.
        keys: Vec<&'static str>,
    },
    /// Binding the same map twice produced different values.
    #[error("{fixture}: binding is not idempotent for {key}")]
    NotIdempotent {
        /// Fixture label.
        fixture: String,
        /// Field key.
        key: &'static str,
    },
    /// Rebinding the redacted view changed a non-sensitive value.
    #[error("{fixture}: redacted view does not round-trip {key}")]
    RoundTripMismatch {
        /// Fixture label.
        fixture: String,
        /// Field key.
        key: &'static str,
    },
    /// A sensitive fixture value appeared in rendered output.
    #[error("{fixture}: sensitive value of {key} appears in rendered output")]
    SensitiveValueLeaked {
        /// Fixture label.
        fixture: String,
        /// Field key.
        key: &'static str,
    },
}

/// Every conformance failure found by one suite run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} conformance failure(s):\n{}", .0.len(), join_failures(.0))]
pub struct ConformanceFailures(pub(crate) Vec<ConformanceError>);

impl ConformanceFailures {
    /// Returns the number of failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when there are no failures.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates failures in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &ConformanceError> {
        self.0.iter()
    }
}

/// Formats failures one per line.
fn join_failures(failures: &[ConformanceError]) -> String {
    failures.iter().map(|failure| format!("  - {failure}")).collect::<Vec<_>>().join("\n")
}
