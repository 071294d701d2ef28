// crates/propbind/src/binder.rs
// ============================================================================
// Module: Binder
// Description: Applies a property map to a default configuration instance.
// Purpose: Coerce and set declared fields, accumulating every binding error.
// Dependencies: thiserror, tracing
// ============================================================================

//! ## Overview
//! Binding starts from `T::default()` and walks the property map in order.
//! Each key that matches a descriptor is coerced and set exactly once; a
//! failed coercion leaves the field at its default and records a
//! [`BindingError`]. Keys matching no descriptor are ignored in
//! [`BindMode::Lenient`] (shared property namespaces) and reported in
//! [`BindMode::Strict`]. All errors are returned together.
//!
//! Security posture: attempted values of sensitive fields are redacted in
//! errors and logs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;
use tracing::debug;
use tracing::warn;

use crate::config::ConfigError;
use crate::descriptor::Configuration;
use crate::descriptor::DescriptorSet;
use crate::descriptor::KeyMatch;
use crate::properties::PropertyMap;
use crate::redaction::DisplayValue;
use crate::registry::describe;
use crate::value::CoercionError;

// ============================================================================
// SECTION: Binding Mode
// ============================================================================

/// Policy for property keys that match no descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BindMode {
    /// Ignore unknown keys; other consumers may own them.
    #[default]
    Lenient,
    /// Report unknown keys as errors.
    Strict,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// A single key failed to bind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    /// Raw value could not be converted to the declared type.
    #[error("invalid value {value} for property {key}: {cause}")]
    Coercion {
        /// Property key as supplied.
        key: String,
        /// Attempted value, redacted when sensitive.
        value: DisplayValue,
        /// Conversion failure.
        cause: CoercionError,
    },
    /// Key matches no descriptor (strict mode only).
    #[error("unknown property {key}")]
    UnknownProperty {
        /// Property key as supplied.
        key: String,
    },
    /// Required key was not supplied.
    #[error("missing required property {key}")]
    MissingRequiredProperty {
        /// Declared key.
        key: &'static str,
    },
    /// The current key and a legacy key (or two legacy keys) were both supplied.
    #[error("properties {first} and {second} both set {key}")]
    ConflictingProperty {
        /// Declared key of the field.
        key: &'static str,
        /// Key seen first.
        first: String,
        /// Key seen second.
        second: String,
    },
}

impl BindingError {
    /// Returns the key the error is reported against.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Coercion {
                key, ..
            }
            | Self::UnknownProperty {
                key,
            } => key,
            Self::MissingRequiredProperty {
                key,
            }
            | Self::ConflictingProperty {
                key, ..
            } => key,
        }
    }
}

/// Every binding error found for one property map, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} binding error(s): {}", .0.len(), join_errors(.0))]
pub struct BindErrors(Vec<BindingError>);

impl BindErrors {
    /// Returns the number of errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when there are no errors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates errors in report order.
    pub fn iter(&self) -> impl Iterator<Item = &BindingError> {
        self.0.iter()
    }

    /// Returns the errors as a vector.
    #[must_use]
    pub fn into_vec(self) -> Vec<BindingError> {
        self.0
    }
}

/// Joins binding errors for the aggregate message.
fn join_errors(errors: &[BindingError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

// ============================================================================
// SECTION: Binder
// ============================================================================

/// Binds property maps to configuration types.
#[derive(Debug, Clone, Copy, Default)]
pub struct Binder {
    /// Unknown key policy.
    mode: BindMode,
}

impl Binder {
    /// Creates a binder with the given unknown key policy.
    #[must_use]
    pub const fn new(mode: BindMode) -> Self {
        Self {
            mode,
        }
    }

    /// Creates a binder that ignores unknown keys.
    #[must_use]
    pub const fn lenient() -> Self {
        Self::new(BindMode::Lenient)
    }

    /// Creates a binder that rejects unknown keys.
    #[must_use]
    pub const fn strict() -> Self {
        Self::new(BindMode::Strict)
    }

    /// Returns the unknown key policy.
    #[must_use]
    pub const fn mode(&self) -> BindMode {
        self.mode
    }

    /// Binds `properties` to a new `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Registration`] when `T` is misdeclared and
    /// [`ConfigError::Binding`] with every binding error otherwise.
    pub fn bind<T: Configuration>(&self, properties: &PropertyMap) -> Result<T, ConfigError> {
        let descriptors = describe::<T>()?;
        Ok(self.bind_with(descriptors, properties)?)
    }

    /// Binds `properties` using an explicit descriptor set.
    ///
    /// # Errors
    ///
    /// Returns [`BindErrors`] with every binding error found.
    pub fn bind_with<T: Default>(
        &self,
        descriptors: &DescriptorSet<T>,
        properties: &PropertyMap,
    ) -> Result<T, BindErrors> {
        let mut config = T::default();
        let mut errors = Vec::new();
        let mut bound_by: Vec<Option<&str>> = vec![None; descriptors.fields().len()];

        for (key, raw) in properties.iter() {
            let Some((position, field, matched)) = descriptors.resolve(key) else {
                match self.mode {
                    BindMode::Strict => errors.push(BindingError::UnknownProperty {
                        key: key.to_string(),
                    }),
                    BindMode::Lenient => {
                        debug!(config = descriptors.name(), key, "ignoring unknown property");
                    }
                }
                continue;
            };
            if matched == KeyMatch::Legacy {
                warn!(
                    config = descriptors.name(),
                    legacy_key = key,
                    key = field.key(),
                    "deprecated property key in use"
                );
            }
            let Some(slot) = bound_by.get_mut(position) else {
                continue;
            };
            if let Some(first) = slot {
                errors.push(BindingError::ConflictingProperty {
                    key: field.key(),
                    first: (*first).to_string(),
                    second: key.to_string(),
                });
                continue;
            }
            *slot = Some(key);
            match field.apply(&mut config, raw) {
                Ok(()) => debug!(
                    config = descriptors.name(),
                    key = field.key(),
                    value = %field.display_raw(raw),
                    "bound property"
                ),
                Err(cause) => errors.push(BindingError::Coercion {
                    key: key.to_string(),
                    value: field.display_raw(raw),
                    cause,
                }),
            }
        }

        for (field, bound) in descriptors.fields().iter().zip(&bound_by) {
            if field.is_required() && bound.is_none() {
                errors.push(BindingError::MissingRequiredProperty {
                    key: field.key(),
                });
            }
        }

        if errors.is_empty() { Ok(config) } else { Err(BindErrors(errors)) }
    }
}
