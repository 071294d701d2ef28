// crates/propbind/src/schema.rs
// ============================================================================
// Module: Property Schemas
// Description: JSON schema builders for configuration property maps.
// Purpose: Provide a canonical, tool-readable contract for each config type.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Builds a JSON Schema (draft 2020-12) describing the flat property map a
//! configuration type accepts. Every property is a string; typed fields carry
//! case-insensitive patterns mirroring coercion rules. Sensitive fields are
//! marked with `x-sensitive` and never publish a default. The schema drives
//! the generated Markdown docs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use crate::binder::BindMode;
use crate::descriptor::Configuration;
use crate::descriptor::DescriptorSet;
use crate::descriptor::FieldDescriptor;
use crate::descriptor::RegistrationError;
use crate::registry::describe;
use crate::value::ValueType;

// ============================================================================
// SECTION: Public API
// ============================================================================

/// Returns the JSON schema for `T`'s property map.
///
/// # Errors
///
/// Returns [`RegistrationError`] when `T` is misdeclared.
pub fn config_schema<T: Configuration>(mode: BindMode) -> Result<Value, RegistrationError> {
    Ok(describe::<T>()?.schema(mode))
}

impl<T> DescriptorSet<T> {
    /// Builds the JSON schema for this descriptor set.
    #[must_use]
    pub fn schema(&self, mode: BindMode) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for field in self.fields() {
            properties.insert(field.key().to_string(), field_schema(field));
            for legacy in field.legacy_keys() {
                let mut alias = field_schema(field);
                if let Some(object) = alias.as_object_mut() {
                    object.insert("deprecated".to_string(), Value::Bool(true));
                    object.insert(
                        "description".to_string(),
                        Value::String(format!("Deprecated alias of `{}`.", field.key())),
                    );
                }
                properties.insert((*legacy).to_string(), alias);
            }
            if field.is_required() {
                required.push(Value::String(field.key().to_string()));
            }
        }
        json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "$id": format!("propbind://schemas/{}.schema.json", slug(self.name())),
            "title": format!("{} properties", self.name()),
            "description": format!("Flat property map accepted by {}.", self.name()),
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": mode == BindMode::Lenient
        })
    }
}

// ============================================================================
// SECTION: Field Schemas
// ============================================================================

/// Schema for one property.
fn field_schema<T>(field: &FieldDescriptor<T>) -> Value {
    let mut schema = Map::new();
    schema.insert("type".to_string(), json!("string"));
    schema.insert("x-value-type".to_string(), json!(field.value_type().label()));
    if let Some(description) = field.description() {
        schema.insert("description".to_string(), json!(description));
    }
    if field.is_sensitive() {
        schema.insert("x-sensitive".to_string(), Value::Bool(true));
    } else if let Some(default) = field.default_value().to_property_string() {
        schema.insert("default".to_string(), Value::String(default));
    }
    match field.value_type() {
        ValueType::Boolean => {
            schema.insert("pattern".to_string(), json!(case_insensitive_pattern(&["true", "false"])));
        }
        ValueType::Enum {
            members, ..
        } => {
            schema.insert("pattern".to_string(), json!(case_insensitive_pattern(members)));
            schema.insert("x-enum".to_string(), json!(members));
        }
        ValueType::Integer {
            min,
            max,
        } => {
            schema.insert("pattern".to_string(), json!("^[+-]?[0-9]+$"));
            schema.insert("x-minimum".to_string(), json!(min));
            schema.insert("x-maximum".to_string(), json!(max));
        }
        ValueType::String | ValueType::OptionalString | ValueType::StringList => {}
    }
    Value::Object(schema)
}

/// Builds an anchored regex matching any of `words` ignoring ASCII case.
fn case_insensitive_pattern(words: &[&str]) -> String {
    let alternatives: Vec<String> = words
        .iter()
        .map(|word| {
            word.chars()
                .map(|ch| {
                    let lower = ch.to_ascii_lowercase();
                    let upper = ch.to_ascii_uppercase();
                    if lower == upper {
                        regex_escape(ch)
                    } else {
                        format!("[{upper}{lower}]")
                    }
                })
                .collect()
        })
        .collect();
    format!("^(?:{})$", alternatives.join("|"))
}

/// Escapes a regex metacharacter.
fn regex_escape(ch: char) -> String {
    if "\\^$.|?*+()[]{}/-".contains(ch) { format!("\\{ch}") } else { ch.to_string() }
}

/// Converts a type name into a lowercase, hyphenated identifier.
pub(crate) fn slug(name: &str) -> String {
    let mut out = String::new();
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
        } else if !out.ends_with('-') && !out.is_empty() {
            out.push('-');
        }
    }
    out.trim_end_matches('-').to_string()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
