// crates/propbind/src/config.rs
// ============================================================================
// Module: Configuration Pipeline
// Description: Bind-then-validate entry point and the frozen result type.
// Purpose: Hand components an immutable, validated configuration or a rejection.
// Dependencies: thiserror, tracing
// ============================================================================

//! ## Overview
//! [`load`] runs the full pipeline: binding (collecting every
//! [`BindingError`](crate::BindingError)) and, when binding succeeds,
//! validation (collecting every violation). The result is a [`Validated`]
//! wrapper that only hands out shared references, so a configuration that
//! passed validation is never mutated afterwards and can be read from any
//! number of threads.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::ops::Deref;

use thiserror::Error;
use tracing::debug;

use crate::binder::BindErrors;
use crate::binder::BindMode;
use crate::binder::Binder;
use crate::descriptor::Configuration;
use crate::descriptor::RegistrationError;
use crate::properties::PropertyMap;
use crate::redaction::fmt_redacted;
use crate::registry::describe;
use crate::validation::Violations;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failure to produce a usable configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The configuration type is misdeclared (programming defect).
    #[error("configuration registration failed: {0}")]
    Registration(#[from] RegistrationError),
    /// One or more properties failed to bind.
    #[error("configuration binding failed: {0}")]
    Binding(#[from] BindErrors),
    /// The bound instance violates declared constraints.
    #[error("configuration validation failed: {0}")]
    Validation(#[from] Violations),
}

// ============================================================================
// SECTION: Validated Configuration
// ============================================================================

/// A configuration instance that passed binding and validation.
#[derive(Clone)]
pub struct Validated<T> {
    /// Frozen configuration.
    inner: T,
}

impl<T> Deref for Validated<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T> AsRef<T> for Validated<T> {
    fn as_ref(&self) -> &T {
        &self.inner
    }
}

impl<T: Configuration> fmt::Debug for Validated<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_redacted(&self.inner, f)
    }
}

// ============================================================================
// SECTION: Pipeline
// ============================================================================

/// Binds and validates `properties` into a frozen `T`.
///
/// # Errors
///
/// Returns [`ConfigError`] for registration defects, binding errors, or
/// validation violations. Validation runs only when binding succeeded.
pub fn load<T: Configuration>(
    properties: &PropertyMap,
    mode: BindMode,
) -> Result<Validated<T>, ConfigError> {
    let descriptors = describe::<T>()?;
    let config = Binder::new(mode).bind_with(descriptors, properties)?;
    let violations = descriptors.validate(&config);
    if !violations.is_empty() {
        return Err(ConfigError::Validation(violations));
    }
    debug!(config = T::NAME, properties = properties.len(), "configuration loaded");
    Ok(Validated {
        inner: config,
    })
}
