// crates/propbind-conformance/src/suite.rs
// ============================================================================
// Module: Conformance Suite
// Description: Defaults and explicit-mapping checks for configuration types.
// Purpose: Keep declared defaults, binding, and validation in agreement.
// Dependencies: propbind, tracing
// ============================================================================

//! ## Overview
//! A [`ConformanceSuite`] holds an expected default-state instance and any
//! number of (property map, expected instance) fixtures. [`ConformanceSuite::verify`]
//! checks, per fixture, that binding reproduces the expected instance in every
//! declared field, that the result validates, that binding is idempotent,
//! that the redacted view round-trips, and that sensitive fixture values never
//! reach rendered output. Across the suite every declared key must appear in
//! at least one explicit fixture.
//!
//! Equality compares declared field values through the descriptors, so the
//! configuration type does not need `PartialEq`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use propbind::Binder;
use propbind::BindingError;
use propbind::Configuration;
use propbind::DescriptorSet;
use propbind::DisplayValue;
use propbind::FieldDescriptor;
use propbind::PropertyMap;
use propbind::describe;
use tracing::debug;

use crate::error::ConformanceError;
use crate::error::ConformanceFailures;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Fixture label for the default-state check.
const DEFAULTS_FIXTURE: &str = "defaults";

// ============================================================================
// SECTION: Suite
// ============================================================================

/// Fixtures for one configuration type.
pub struct ConformanceSuite<T> {
    /// Expected default-state instance.
    defaults: Option<T>,
    /// Explicit property maps and the instances they must bind to.
    mappings: Vec<(PropertyMap, T)>,
}

impl<T: Configuration> Default for ConformanceSuite<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Configuration> ConformanceSuite<T> {
    /// Creates an empty suite.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            defaults: None,
            mappings: Vec::new(),
        }
    }

    /// Sets the expected default-state instance.
    #[must_use]
    pub fn defaults(mut self, expected: T) -> Self {
        self.defaults = Some(expected);
        self
    }

    /// Adds an explicit property map and the instance it must bind to.
    #[must_use]
    pub fn mapping(mut self, properties: PropertyMap, expected: T) -> Self {
        self.mappings.push((properties, expected));
        self
    }

    /// Runs every check and reports all failures together.
    ///
    /// # Errors
    ///
    /// Returns [`ConformanceFailures`] listing every disagreement found.
    pub fn verify(&self) -> Result<(), ConformanceFailures> {
        let descriptors = describe::<T>().map_err(|error| ConformanceFailures(vec![error.into()]))?;
        let mut failures = Vec::new();
        if let Some(expected) = &self.defaults {
            failures.extend(check_defaults(descriptors, expected));
        }
        for (position, (properties, expected)) in self.mappings.iter().enumerate() {
            let fixture = format!("mapping #{}", position + 1);
            failures.extend(check_mapping(descriptors, &fixture, properties, expected));
        }
        failures.extend(check_coverage(descriptors, self.mappings.iter().map(|(properties, _)| properties)));
        debug!(
            config = T::NAME,
            mappings = self.mappings.len(),
            failures = failures.len(),
            "conformance suite finished"
        );
        if failures.is_empty() { Ok(()) } else { Err(ConformanceFailures(failures)) }
    }
}

// ============================================================================
// SECTION: Standalone Assertions
// ============================================================================

/// Checks that binding an empty map yields `expected` in every declared field.
///
/// Types with required keys cannot bind an empty map; for them the declared
/// defaults the binder starts from are compared instead.
///
/// # Errors
///
/// Returns [`ConformanceFailures`] listing every mismatched field.
pub fn assert_defaults_match<T: Configuration>(expected: &T) -> Result<(), ConformanceFailures> {
    let descriptors = describe::<T>().map_err(|error| ConformanceFailures(vec![error.into()]))?;
    into_result(check_defaults(descriptors, expected))
}

/// Checks one explicit mapping that sets every declared key.
///
/// # Errors
///
/// Returns [`ConformanceFailures`] listing every disagreement, including
/// declared keys absent from `properties`.
pub fn assert_explicit_mapping_matches<T: Configuration>(
    properties: &PropertyMap,
    expected: &T,
) -> Result<(), ConformanceFailures> {
    let descriptors = describe::<T>().map_err(|error| ConformanceFailures(vec![error.into()]))?;
    let mut failures = check_mapping(descriptors, "mapping", properties, expected);
    failures.extend(check_coverage(descriptors, std::iter::once(properties)));
    into_result(failures)
}

/// Converts collected failures into a result.
fn into_result(failures: Vec<ConformanceError>) -> Result<(), ConformanceFailures> {
    if failures.is_empty() { Ok(()) } else { Err(ConformanceFailures(failures)) }
}

// ============================================================================
// SECTION: Checks
// ============================================================================

/// Compares the empty-map binding (or declared defaults) with `expected`.
fn check_defaults<T: Configuration>(descriptors: &DescriptorSet<T>, expected: &T) -> Vec<ConformanceError> {
    match Binder::lenient().bind_with(descriptors, &PropertyMap::new()) {
        Ok(bound) => compare_fields(descriptors, DEFAULTS_FIXTURE, expected, &bound),
        Err(errors)
            if errors.iter().all(|error| matches!(error, BindingError::MissingRequiredProperty { .. })) =>
        {
            compare_fields(descriptors, DEFAULTS_FIXTURE, expected, &T::default())
        }
        Err(errors) => vec![ConformanceError::Binding {
            fixture: DEFAULTS_FIXTURE.to_string(),
            errors,
        }],
    }
}

/// Runs every per-fixture check for one explicit mapping.
fn check_mapping<T: Configuration>(
    descriptors: &DescriptorSet<T>,
    fixture: &str,
    properties: &PropertyMap,
    expected: &T,
) -> Vec<ConformanceError> {
    let binder = Binder::strict();
    let bound = match binder.bind_with(descriptors, properties) {
        Ok(bound) => bound,
        Err(errors) => {
            return vec![ConformanceError::Binding {
                fixture: fixture.to_string(),
                errors,
            }];
        }
    };

    let mut failures = compare_fields(descriptors, fixture, expected, &bound);

    let violations = descriptors.validate(&bound);
    if !violations.is_empty() {
        failures.push(ConformanceError::Validation {
            fixture: fixture.to_string(),
            violations,
        });
    }

    for key in properties.keys() {
        if let Some(field) = field_for_key(descriptors, key)
            && field.value_of(expected) == *field.default_value()
        {
            failures.push(ConformanceError::ExplicitValueIsDefault {
                fixture: fixture.to_string(),
                key: field.key(),
            });
        }
    }

    match binder.bind_with(descriptors, properties) {
        Ok(again) => {
            for field in descriptors.fields() {
                if field.value_of(&again) != field.value_of(&bound) {
                    failures.push(ConformanceError::NotIdempotent {
                        fixture: fixture.to_string(),
                        key: field.key(),
                    });
                }
            }
        }
        Err(errors) => failures.push(ConformanceError::Binding {
            fixture: fixture.to_string(),
            errors,
        }),
    }

    failures.extend(check_round_trip(descriptors, fixture, &bound));
    failures.extend(check_sensitive_output(descriptors, fixture, properties, &bound));
    failures
}

/// Rebinds the redacted view and compares non-sensitive fields.
fn check_round_trip<T: Configuration>(
    descriptors: &DescriptorSet<T>,
    fixture: &str,
    bound: &T,
) -> Vec<ConformanceError> {
    let mut rebind_input = descriptors.render(bound).to_property_map();
    for field in descriptors.fields() {
        if field.is_sensitive()
            && field.is_required()
            && let Some(value) = field.value_of(bound).to_property_string()
        {
            rebind_input.set(field.key(), value);
        }
    }
    let rebound = match Binder::lenient().bind_with(descriptors, &rebind_input) {
        Ok(rebound) => rebound,
        Err(errors) => {
            return vec![ConformanceError::Binding {
                fixture: format!("{fixture} (redacted round-trip)"),
                errors,
            }];
        }
    };
    descriptors
        .fields()
        .iter()
        .filter(|field| !field.is_sensitive() && field.value_of(&rebound) != field.value_of(bound))
        .map(|field| ConformanceError::RoundTripMismatch {
            fixture: fixture.to_string(),
            key: field.key(),
        })
        .collect()
}

/// Checks that sensitive fields render redacted and that no rendered value
/// carries a raw sensitive fixture value.
///
/// Only rendered values are searched; keys and the redaction marker are not.
fn check_sensitive_output<T: Configuration>(
    descriptors: &DescriptorSet<T>,
    fixture: &str,
    properties: &PropertyMap,
    bound: &T,
) -> Vec<ConformanceError> {
    let rendered = descriptors.render(bound);
    let mut failures = Vec::new();
    for field in descriptors.fields().iter().filter(|field| field.is_sensitive()) {
        let raw_values: Vec<&str> = std::iter::once(field.key())
            .chain(field.legacy_keys().iter().copied())
            .filter_map(|key| properties.get(key))
            .filter(|raw| !raw.trim().is_empty())
            .collect();
        if raw_values.is_empty() {
            continue;
        }
        let masked = rendered.get(field.key()) == Some(&DisplayValue::Redacted);
        let echoed = rendered
            .iter()
            .filter_map(|(_, value)| value.as_plain())
            .any(|plain| raw_values.iter().any(|raw| plain.contains(raw)));
        if !masked || echoed {
            failures.push(ConformanceError::SensitiveValueLeaked {
                fixture: fixture.to_string(),
                key: field.key(),
            });
        }
    }
    failures
}

/// Reports declared keys that no explicit fixture sets.
fn check_coverage<'a, T>(
    descriptors: &DescriptorSet<T>,
    maps: impl Iterator<Item = &'a PropertyMap> + Clone,
) -> Option<ConformanceError> {
    let keys: Vec<&'static str> = descriptors
        .keys()
        .filter(|key| !maps.clone().any(|properties| properties.contains_key(key)))
        .collect();
    if keys.is_empty() {
        None
    } else {
        Some(ConformanceError::UncoveredKeys {
            keys,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Compares every declared field of two instances.
fn compare_fields<T>(
    descriptors: &DescriptorSet<T>,
    fixture: &str,
    expected: &T,
    actual: &T,
) -> Vec<ConformanceError> {
    descriptors
        .fields()
        .iter()
        .filter(|field| field.value_of(expected) != field.value_of(actual))
        .map(|field| ConformanceError::FieldMismatch {
            fixture: fixture.to_string(),
            key: field.key(),
            expected: field.display_value_of(expected),
            actual: field.display_value_of(actual),
        })
        .collect()
}

/// Finds the descriptor for a current or legacy key.
fn field_for_key<'a, T>(descriptors: &'a DescriptorSet<T>, key: &str) -> Option<&'a FieldDescriptor<T>> {
    descriptors
        .field(key)
        .or_else(|| descriptors.fields().iter().find(|field| field.legacy_keys().iter().any(|alias| *alias == key)))
}
