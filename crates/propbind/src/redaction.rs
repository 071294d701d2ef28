// crates/propbind/src/redaction.rs
// ============================================================================
// Module: Redaction View
// Description: Display rendering of configuration instances with secrets masked.
// Purpose: Make bound configuration safe for logs, docs, and diagnostics.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! [`render`] maps every declared key of a configuration instance to a
//! [`DisplayValue`]. Fields marked sensitive always render as
//! [`REDACTION_MARKER`], whether or not a value is set. The same
//! [`DisplayValue`] type carries attempted values inside binding errors and
//! validation violations, so no diagnostic path can print a secret.
//!
//! Non-sensitive values render as the property string that binds back to the
//! same value, so [`RenderedConfig::to_property_map`] round-trips.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;
use serde::Serializer;
use serde::ser::SerializeMap;

use crate::descriptor::Configuration;
use crate::descriptor::DescriptorSet;
use crate::descriptor::RegistrationError;
use crate::properties::PropertyMap;
use crate::registry::describe;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Marker rendered in place of any sensitive value.
pub const REDACTION_MARKER: &str = "[REDACTED]";
/// Marker rendered for an absent optional value.
const UNSET_MARKER: &str = "<unset>";

// ============================================================================
// SECTION: Display Values
// ============================================================================

/// A value in a form safe for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayValue {
    /// Sensitive value, masked.
    Redacted,
    /// Optional value that is absent.
    Unset,
    /// Non-sensitive value.
    Plain(String),
}

impl DisplayValue {
    /// Returns the plain value, if any.
    #[must_use]
    pub fn as_plain(&self) -> Option<&str> {
        match self {
            Self::Plain(value) => Some(value),
            Self::Redacted | Self::Unset => None,
        }
    }
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Redacted => f.write_str(REDACTION_MARKER),
            Self::Unset => f.write_str(UNSET_MARKER),
            Self::Plain(value) => write!(f, "'{value}'"),
        }
    }
}

// ============================================================================
// SECTION: Rendered Configuration
// ============================================================================

/// Redacted key/value view of a configuration instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedConfig {
    /// Configuration type name.
    name: &'static str,
    /// Entries in declaration order.
    entries: Vec<(&'static str, DisplayValue)>,
}

impl RenderedConfig {
    /// Returns the configuration type name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the display value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&DisplayValue> {
        self.entries.iter().find(|(entry_key, _)| *entry_key == key).map(|(_, value)| value)
    }

    /// Iterates entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &DisplayValue)> {
        self.entries.iter().map(|(key, value)| (*key, value))
    }

    /// Returns the non-sensitive, set values as a bindable property map.
    #[must_use]
    pub fn to_property_map(&self) -> PropertyMap {
        self.entries
            .iter()
            .filter_map(|(key, value)| value.as_plain().map(|plain| (*key, plain)))
            .collect()
    }

    /// Returns the view as a JSON object in declaration order (`null` for
    /// unset values).
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let object = self
            .entries
            .iter()
            .map(|(key, value)| ((*key).to_string(), display_json(value)))
            .collect::<serde_json::Map<String, serde_json::Value>>();
        serde_json::Value::Object(object)
    }
}

impl fmt::Display for RenderedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.name)?;
        for (position, (key, value)) in self.entries.iter().enumerate() {
            if position > 0 {
                f.write_str(",")?;
            }
            write!(f, " {key}={value}")?;
        }
        f.write_str(" }")
    }
}

impl Serialize for RenderedConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, &display_json(value))?;
        }
        map.end()
    }
}

/// Converts a display value to JSON.
fn display_json(value: &DisplayValue) -> serde_json::Value {
    match value {
        DisplayValue::Redacted => serde_json::Value::String(REDACTION_MARKER.to_string()),
        DisplayValue::Unset => serde_json::Value::Null,
        DisplayValue::Plain(plain) => serde_json::Value::String(plain.clone()),
    }
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

impl<T> DescriptorSet<T> {
    /// Renders `config` with sensitive fields masked.
    pub fn render(&self, config: &T) -> RenderedConfig {
        RenderedConfig {
            name: self.name(),
            entries: self
                .fields()
                .iter()
                .map(|field| (field.key(), field.display_value_of(config)))
                .collect(),
        }
    }
}

/// Renders a configuration instance with sensitive fields masked.
///
/// # Errors
///
/// Returns [`RegistrationError`] when `T` is misdeclared.
pub fn render<T: Configuration>(config: &T) -> Result<RenderedConfig, RegistrationError> {
    Ok(describe::<T>()?.render(config))
}

/// Writes the redacted view of `config`; intended for `Debug` impls.
///
/// # Errors
///
/// Returns [`fmt::Error`] when the formatter fails.
pub fn fmt_redacted<T: Configuration>(config: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match describe::<T>() {
        Ok(descriptors) => {
            let mut out = f.debug_struct(T::NAME);
            for field in descriptors.fields() {
                out.field(field.key(), &format_args!("{}", field.display_value_of(config)));
            }
            out.finish()
        }
        Err(error) => write!(f, "{} <{error}>", T::NAME),
    }
}
