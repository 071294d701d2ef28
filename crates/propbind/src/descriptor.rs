// crates/propbind/src/descriptor.rs
// ============================================================================
// Module: Binding Descriptors
// Description: Per-field binding metadata and the configuration type contract.
// Purpose: Declare keys, value types, defaults, and sensitivity explicitly.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! A configuration type implements [`Configuration`] and declares one
//! [`FieldDescriptor`] per field through a [`DescriptorSetBuilder`]. The
//! builder captures a getter and a fluent setter per field, so the declaration
//! is explicit and type-checked rather than discovered by reflection.
//!
//! Building a [`DescriptorSet`] fails fast with a [`RegistrationError`] on
//! malformed or duplicate keys, defaults that disagree with the declared type,
//! and constraints naming undeclared keys. These are programming defects and
//! are reported before any binding is attempted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::redaction::DisplayValue;
use crate::validation::Constraint;
use crate::value::CoercionError;
use crate::value::FieldValue;
use crate::value::PropertyValue;
use crate::value::ValueType;

// ============================================================================
// SECTION: Configuration Contract
// ============================================================================

/// A configuration type bindable from a property map.
///
/// `Default` must produce the declared default of every field.
pub trait Configuration: Default + Send + Sync + 'static {
    /// Human-readable name used in docs, logs, and diagnostics.
    const NAME: &'static str;

    /// Declares the bindable fields and constraints of this type.
    fn describe(descriptors: &mut DescriptorSetBuilder<Self>);
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Misdeclared configuration type, detected when descriptors are built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// Property key is syntactically invalid.
    #[error("{config}: invalid property key `{key}`: {reason}")]
    InvalidKey {
        /// Configuration type name.
        config: &'static str,
        /// Offending key.
        key: &'static str,
        /// Why the key was rejected.
        reason: &'static str,
    },
    /// Two descriptors (or legacy aliases) share a key.
    #[error("{config}: duplicate property key `{key}`")]
    DuplicateKey {
        /// Configuration type name.
        config: &'static str,
        /// Duplicated key.
        key: &'static str,
    },
    /// Declared default is not a value of the declared type.
    #[error("{config}: default for `{key}` is not a valid {expected}")]
    DefaultTypeMismatch {
        /// Configuration type name.
        config: &'static str,
        /// Field key.
        key: &'static str,
        /// Declared value type label.
        expected: String,
    },
    /// Constraint references a key with no descriptor.
    #[error("{config}: constraint references undeclared property `{key}`")]
    UnknownConstraintKey {
        /// Configuration type name.
        config: &'static str,
        /// Undeclared key.
        key: &'static str,
    },
    /// Enum member names are empty or collide case-insensitively.
    #[error("{config}: enum {type_name} for `{key}` has empty or ambiguous member names")]
    AmbiguousEnumMembers {
        /// Configuration type name.
        config: &'static str,
        /// Field key.
        key: &'static str,
        /// Enum type name.
        type_name: &'static str,
    },
    /// Field option is not applicable to the declared type.
    #[error("{config}: invalid option for `{key}`: {reason}")]
    InvalidOption {
        /// Configuration type name.
        config: &'static str,
        /// Field key.
        key: &'static str,
        /// Why the option was rejected.
        reason: &'static str,
    },
    /// Process-wide registry returned an entry of the wrong type.
    #[error("{config}: descriptor registry entry has an unexpected type")]
    RegistryCorrupted {
        /// Configuration type name.
        config: &'static str,
    },
}

// ============================================================================
// SECTION: Field Descriptor
// ============================================================================

/// Reads a field as a type-neutral value.
type Getter<T> = Arc<dyn Fn(&T) -> FieldValue + Send + Sync>;
/// Coerces a raw string and sets the field.
type Applier<T> = Box<dyn Fn(&mut T, &str) -> Result<(), CoercionError> + Send + Sync>;

/// Binding metadata for one configuration field.
pub struct FieldDescriptor<T> {
    /// Property key.
    key: &'static str,
    /// Deprecated keys that bind to the same field.
    legacy_keys: Vec<&'static str>,
    /// Declared value type.
    value_type: ValueType,
    /// Value of the field on a default instance.
    default_value: FieldValue,
    /// Whether the value must be redacted.
    sensitive: bool,
    /// Whether the key must be supplied.
    required: bool,
    /// Human-readable description.
    description: Option<&'static str>,
    /// Field reader.
    getter: Getter<T>,
    /// Field writer.
    applier: Applier<T>,
}

impl<T> FieldDescriptor<T> {
    /// Returns the property key.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        self.key
    }

    /// Returns deprecated keys accepted for this field.
    #[must_use]
    pub fn legacy_keys(&self) -> &[&'static str] {
        &self.legacy_keys
    }

    /// Returns the declared value type.
    #[must_use]
    pub const fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    /// Returns the declared default value.
    #[must_use]
    pub const fn default_value(&self) -> &FieldValue {
        &self.default_value
    }

    /// Returns true when the field holds security-sensitive data.
    #[must_use]
    pub const fn is_sensitive(&self) -> bool {
        self.sensitive
    }

    /// Returns true when the key must be supplied.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Returns the human-readable description.
    #[must_use]
    pub const fn description(&self) -> Option<&'static str> {
        self.description
    }

    /// Reads the field from a configuration instance.
    #[must_use]
    pub fn value_of(&self, config: &T) -> FieldValue {
        (self.getter)(config)
    }

    /// Reads the field in a form safe for display.
    #[must_use]
    pub fn display_value_of(&self, config: &T) -> DisplayValue {
        if self.sensitive {
            return DisplayValue::Redacted;
        }
        self.value_of(config).to_property_string().map_or(DisplayValue::Unset, DisplayValue::Plain)
    }

    /// Returns a raw property string in a form safe for display.
    #[must_use]
    pub fn display_raw(&self, raw: &str) -> DisplayValue {
        if self.sensitive { DisplayValue::Redacted } else { DisplayValue::Plain(raw.to_string()) }
    }

    /// Coerces `raw` and writes it to the field. The field is untouched on error.
    pub(crate) fn apply(&self, config: &mut T, raw: &str) -> Result<(), CoercionError> {
        (self.applier)(config, raw)
    }
}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let default = if self.sensitive {
            DisplayValue::Redacted
        } else {
            self.default_value.to_property_string().map_or(DisplayValue::Unset, DisplayValue::Plain)
        };
        f.debug_struct("FieldDescriptor")
            .field("key", &self.key)
            .field("value_type", &self.value_type.label())
            .field("default", &default.to_string())
            .field("sensitive", &self.sensitive)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Descriptor Set
// ============================================================================

/// How a property key matched a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyMatch {
    /// The current key.
    Current,
    /// A deprecated alias.
    Legacy,
}

/// Ordered descriptors and constraints for one configuration type.
pub struct DescriptorSet<T> {
    /// Configuration type name.
    name: &'static str,
    /// Field descriptors in declaration order.
    fields: Vec<FieldDescriptor<T>>,
    /// Declared validation constraints.
    constraints: Vec<Constraint<T>>,
    /// Current and legacy keys to field position.
    index: HashMap<&'static str, (usize, KeyMatch)>,
}

impl<T> DescriptorSet<T> {
    /// Returns the configuration type name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns field descriptors in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }

    /// Returns declared constraints.
    #[must_use]
    pub fn constraints(&self) -> &[Constraint<T>] {
        &self.constraints
    }

    /// Iterates current property keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(FieldDescriptor::key)
    }

    /// Looks up a descriptor by current or legacy key.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&FieldDescriptor<T>> {
        self.resolve(key).map(|(_, field, _)| field)
    }

    /// Resolves a key to its field position, descriptor, and match kind.
    pub(crate) fn resolve(&self, key: &str) -> Option<(usize, &FieldDescriptor<T>, KeyMatch)> {
        let (position, matched) = self.index.get(key).copied()?;
        self.fields.get(position).map(|field| (position, field, matched))
    }
}

impl<T> fmt::Debug for DescriptorSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DescriptorSet")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("constraints", &self.constraints.len())
            .finish()
    }
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Collects field and constraint declarations for a configuration type.
pub struct DescriptorSetBuilder<T: Configuration> {
    /// Default instance used to record declared defaults.
    defaults: T,
    /// Declared fields.
    fields: Vec<FieldDescriptor<T>>,
    /// Declared constraints.
    constraints: Vec<Constraint<T>>,
    /// Option misuse recorded while declaring fields.
    errors: Vec<RegistrationError>,
}

impl<T: Configuration> DescriptorSetBuilder<T> {
    /// Creates an empty builder.
    pub(crate) fn new() -> Self {
        Self {
            defaults: T::default(),
            fields: Vec::new(),
            constraints: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Declares a bindable field from a getter and a fluent setter.
    ///
    /// The default is read through `getter` from `T::default()`.
    pub fn field<V, G, S>(&mut self, key: &'static str, getter: G, setter: S) -> FieldOptions<'_, T>
    where
        V: PropertyValue,
        G: Fn(&T) -> V + Send + Sync + 'static,
        S: Fn(&mut T, V) -> &mut T + Send + Sync + 'static,
    {
        let default_value = getter(&self.defaults).to_field_value();
        let getter: Getter<T> = Arc::new(move |config: &T| getter(config).to_field_value());
        let applier: Applier<T> = Box::new(move |config: &mut T, raw: &str| {
            let value = V::coerce(raw)?;
            setter(config, value);
            Ok(())
        });
        self.fields.push(FieldDescriptor {
            key,
            legacy_keys: Vec::new(),
            value_type: V::value_type(),
            default_value,
            sensitive: false,
            required: false,
            description: None,
            getter,
            applier,
        });
        let position = self.fields.len() - 1;
        FieldOptions {
            builder: self,
            position,
        }
    }

    /// Declares a validation constraint over the whole instance.
    pub fn constraint(&mut self, constraint: Constraint<T>) -> &mut Self {
        self.constraints.push(constraint);
        self
    }

    /// Validates declarations and freezes them into a descriptor set.
    pub(crate) fn build(self) -> Result<DescriptorSet<T>, RegistrationError> {
        if let Some(error) = self.errors.into_iter().next() {
            return Err(error);
        }
        let config = T::NAME;
        let mut index = HashMap::new();
        for (position, field) in self.fields.iter().enumerate() {
            let aliases = field.legacy_keys.iter().map(|key| (*key, KeyMatch::Legacy));
            for (key, matched) in std::iter::once((field.key, KeyMatch::Current)).chain(aliases) {
                validate_key(key).map_err(|reason| RegistrationError::InvalidKey {
                    config,
                    key,
                    reason,
                })?;
                if index.insert(key, (position, matched)).is_some() {
                    return Err(RegistrationError::DuplicateKey {
                        config,
                        key,
                    });
                }
            }
            if let ValueType::Enum {
                type_name,
                members,
            } = &field.value_type
                && !enum_members_distinct(members)
            {
                return Err(RegistrationError::AmbiguousEnumMembers {
                    config,
                    key: field.key,
                    type_name: *type_name,
                });
            }
            if !field.default_value.conforms_to(&field.value_type) {
                return Err(RegistrationError::DefaultTypeMismatch {
                    config,
                    key: field.key,
                    expected: field.value_type.label(),
                });
            }
        }
        for constraint in &self.constraints {
            for key in constraint.keys() {
                match index.get(key) {
                    Some((_, KeyMatch::Current)) => {}
                    _ => {
                        return Err(RegistrationError::UnknownConstraintKey {
                            config,
                            key: *key,
                        });
                    }
                }
            }
        }
        Ok(DescriptorSet {
            name: config,
            fields: self.fields,
            constraints: self.constraints,
            index,
        })
    }
}

/// Per-field options returned by [`DescriptorSetBuilder::field`].
pub struct FieldOptions<'a, T: Configuration> {
    /// Owning builder.
    builder: &'a mut DescriptorSetBuilder<T>,
    /// Position of the field being configured.
    position: usize,
}

impl<T: Configuration> FieldOptions<'_, T> {
    /// Marks the field as security-sensitive; its value is always redacted.
    pub fn sensitive(self) -> Self {
        self.update(|field| field.sensitive = true)
    }

    /// Attaches a human-readable description.
    pub fn description(self, description: &'static str) -> Self {
        self.update(|field| field.description = Some(description))
    }

    /// Requires the key to be supplied when binding.
    pub fn required(self) -> Self {
        self.update(|field| field.required = true)
    }

    /// Accepts a deprecated key for this field.
    pub fn legacy_key(self, key: &'static str) -> Self {
        self.update(|field| field.legacy_keys.push(key))
    }

    /// Adds a single-field constraint rejecting an absent optional value.
    pub fn not_null(self, message: &'static str) -> Self {
        let Some(field) = self.builder.fields.get(self.position) else {
            return self;
        };
        let key = field.key;
        if field.value_type != ValueType::OptionalString {
            self.builder.errors.push(RegistrationError::InvalidOption {
                config: T::NAME,
                key,
                reason: "not_null requires an optional<string> field",
            });
            return self;
        }
        let getter = Arc::clone(&field.getter);
        self.builder.constraints.push(Constraint::single_field(key, message, move |config: &T| {
            !getter(config).is_unset()
        }));
        self
    }

    /// Applies a mutation to the field being configured.
    fn update(self, mutate: impl FnOnce(&mut FieldDescriptor<T>)) -> Self {
        if let Some(field) = self.builder.fields.get_mut(self.position) {
            mutate(field);
        }
        self
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Checks a property key: lowercase segments of `[a-z0-9_-]` joined by dots.
fn validate_key(key: &str) -> Result<(), &'static str> {
    if key.is_empty() {
        return Err("key must not be empty");
    }
    if !key.bytes().all(|byte| {
        byte.is_ascii_lowercase() || byte.is_ascii_digit() || matches!(byte, b'.' | b'-' | b'_')
    }) {
        return Err("key may only contain lowercase letters, digits, '.', '-', and '_'");
    }
    for segment in key.split('.') {
        if segment.is_empty() {
            return Err("key must not contain empty segments");
        }
        if segment.starts_with('-') || segment.ends_with('-') {
            return Err("key segments must not start or end with '-'");
        }
    }
    Ok(())
}

/// Returns true when enum member names are non-empty and distinct ignoring case.
fn enum_members_distinct(members: &[&'static str]) -> bool {
    let mut seen = HashSet::new();
    !members.is_empty()
        && members
            .iter()
            .all(|member| !member.is_empty() && seen.insert(member.to_ascii_lowercase()))
}
