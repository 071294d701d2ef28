// crates/propbind/src/source.rs
// ============================================================================
// Module: Property Sources
// Description: Property map loading from text, TOML, files, and environment.
// Purpose: Produce binding input from layered, untrusted sources.
// Dependencies: thiserror, toml, tracing
// ============================================================================

//! ## Overview
//! Sources produce [`PropertyMap`]s that are layered before binding:
//! - `.properties` text: `key=value` or `key: value` lines, `#`/`!` comments.
//! - TOML documents: nested tables flatten into dotted keys.
//! - Files: size, encoding, and path limits are enforced before parsing.
//! - Environment references: values of the form `${ENV:NAME}` are replaced.
//!
//! Security posture: sources are untrusted. Errors name keys, lines, and
//! variables but never the values they carry.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::properties::PropertyMap;
use crate::value::LIST_DELIMITER;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum property file size in bytes.
pub const MAX_SOURCE_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Prefix of an environment reference.
const ENV_REFERENCE_PREFIX: &str = "${ENV:";
/// Suffix of an environment reference.
const ENV_REFERENCE_SUFFIX: &str = "}";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while loading property sources.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// Filesystem failure.
    #[error("property source io error: {0}")]
    Io(String),
    /// Path violates length limits.
    #[error("invalid property source path: {0}")]
    InvalidPath(String),
    /// File exceeds the size limit.
    #[error("property source exceeds size limit ({actual} > {limit} bytes)")]
    TooLarge {
        /// Maximum accepted size.
        limit: usize,
        /// Actual size.
        actual: usize,
    },
    /// File is not valid UTF-8.
    #[error("property source must be utf-8")]
    NotUtf8,
    /// Malformed `.properties` line.
    #[error("line {line}: {reason}")]
    Syntax {
        /// One-based line number.
        line: usize,
        /// What was wrong.
        reason: &'static str,
    },
    /// A key appears twice in one source.
    #[error("line {line}: duplicate property {key}")]
    DuplicateKey {
        /// One-based line number of the repeat.
        line: usize,
        /// Repeated key.
        key: String,
    },
    /// TOML document failed to parse.
    #[error("invalid toml: {0}")]
    Toml(String),
    /// TOML value cannot be flattened into a property.
    #[error("unsupported toml value at {key}: {reason}")]
    UnsupportedToml {
        /// Dotted key of the value.
        key: String,
        /// Why it was rejected.
        reason: &'static str,
    },
    /// Environment reference names an unset variable.
    #[error("property {key} references unset environment variable {variable}")]
    MissingEnvironmentVariable {
        /// Property key holding the reference.
        key: String,
        /// Referenced variable.
        variable: String,
    },
}

// ============================================================================
// SECTION: Text Sources
// ============================================================================

/// Parses `.properties` text.
///
/// # Errors
///
/// Returns [`SourceError`] for lines without a separator, empty keys, or
/// duplicate keys.
pub fn parse_properties(text: &str) -> Result<PropertyMap, SourceError> {
    let mut map = PropertyMap::new();
    for (index, line) in text.lines().enumerate() {
        let line_number = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }
        let Some(separator) = trimmed.find(['=', ':']) else {
            return Err(SourceError::Syntax {
                line: line_number,
                reason: "expected `key=value`",
            });
        };
        let key = trimmed[.. separator].trim();
        let value = trimmed[separator + 1 ..].trim();
        if key.is_empty() {
            return Err(SourceError::Syntax {
                line: line_number,
                reason: "property key must not be empty",
            });
        }
        map.insert(key, value).map_err(|_| SourceError::DuplicateKey {
            line: line_number,
            key: key.to_string(),
        })?;
    }
    Ok(map)
}

/// Parses a TOML document, flattening nested tables into dotted keys.
///
/// Scalars render with their natural string form; arrays of scalars join with
/// the list delimiter.
///
/// # Errors
///
/// Returns [`SourceError`] for invalid TOML or arrays containing tables or
/// nested arrays.
pub fn parse_toml(text: &str) -> Result<PropertyMap, SourceError> {
    let table: toml::Table = toml::from_str(text).map_err(|err| SourceError::Toml(err.to_string()))?;
    let mut map = PropertyMap::new();
    flatten_table(&mut map, "", &table)?;
    Ok(map)
}

/// Appends a table's entries under `prefix`.
fn flatten_table(map: &mut PropertyMap, prefix: &str, table: &toml::Table) -> Result<(), SourceError> {
    for (name, value) in table {
        let key = if prefix.is_empty() { name.clone() } else { format!("{prefix}.{name}") };
        match value {
            toml::Value::Table(nested) => flatten_table(map, &key, nested)?,
            toml::Value::Array(items) => {
                let rendered = items
                    .iter()
                    .map(|item| {
                        scalar_string(item).ok_or_else(|| SourceError::UnsupportedToml {
                            key: key.clone(),
                            reason: "arrays may only contain scalar values",
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                map.set(key, rendered.join(&LIST_DELIMITER.to_string()));
            }
            scalar => {
                let rendered = scalar_string(scalar).ok_or_else(|| SourceError::UnsupportedToml {
                    key: key.clone(),
                    reason: "unsupported value type",
                })?;
                map.set(key, rendered);
            }
        }
    }
    Ok(())
}

/// Renders a scalar TOML value as a property string.
fn scalar_string(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(text) => Some(text.clone()),
        toml::Value::Integer(number) => Some(number.to_string()),
        toml::Value::Float(number) => Some(number.to_string()),
        toml::Value::Boolean(flag) => Some(flag.to_string()),
        toml::Value::Datetime(datetime) => Some(datetime.to_string()),
        toml::Value::Array(_) | toml::Value::Table(_) => None,
    }
}

// ============================================================================
// SECTION: File Sources
// ============================================================================

/// Loads a property file; `.toml` files parse as TOML, others as properties.
///
/// # Errors
///
/// Returns [`SourceError`] when the path, size, encoding, or content is invalid.
pub fn load_file(path: &Path) -> Result<PropertyMap, SourceError> {
    validate_path(path)?;
    let bytes = fs::read(path).map_err(|err| SourceError::Io(err.to_string()))?;
    if bytes.len() > MAX_SOURCE_FILE_SIZE {
        return Err(SourceError::TooLarge {
            limit: MAX_SOURCE_FILE_SIZE,
            actual: bytes.len(),
        });
    }
    let content = std::str::from_utf8(&bytes).map_err(|_| SourceError::NotUtf8)?;
    let is_toml = path.extension().is_some_and(|extension| extension.eq_ignore_ascii_case("toml"));
    let map = if is_toml { parse_toml(content)? } else { parse_properties(content)? };
    debug!(path = %path.display(), properties = map.len(), "loaded property source");
    Ok(map)
}

/// Validates a source path against length limits.
fn validate_path(path: &Path) -> Result<(), SourceError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SourceError::InvalidPath("path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SourceError::InvalidPath("path component too long".to_string()));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Layering and Substitution
// ============================================================================

/// Overlays maps in order; later maps win for repeated keys.
#[must_use]
pub fn layer<I: IntoIterator<Item = PropertyMap>>(layers: I) -> PropertyMap {
    let mut merged = PropertyMap::new();
    for layer in layers {
        merged.overlay(&layer);
    }
    merged
}

/// Replaces `${ENV:NAME}` values using the process environment.
///
/// # Errors
///
/// Returns [`SourceError::MissingEnvironmentVariable`] for unset variables.
pub fn substitute_env(properties: &PropertyMap) -> Result<PropertyMap, SourceError> {
    substitute_env_with(properties, |name| env::var(name).ok())
}

/// Replaces `${ENV:NAME}` values using `lookup`.
///
/// Only values that consist entirely of one reference are substituted.
///
/// # Errors
///
/// Returns [`SourceError::MissingEnvironmentVariable`] when `lookup` yields
/// nothing for a referenced variable.
pub fn substitute_env_with<F>(properties: &PropertyMap, lookup: F) -> Result<PropertyMap, SourceError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut resolved = PropertyMap::new();
    for (key, value) in properties.iter() {
        let Some(variable) = env_reference(value) else {
            resolved.set(key, value);
            continue;
        };
        let substituted = lookup(variable).ok_or_else(|| SourceError::MissingEnvironmentVariable {
            key: key.to_string(),
            variable: variable.to_string(),
        })?;
        debug!(key, variable, "substituted environment reference");
        resolved.set(key, substituted);
    }
    Ok(resolved)
}

/// Returns the variable name when `value` is exactly `${ENV:NAME}`.
fn env_reference(value: &str) -> Option<&str> {
    let name = value.strip_prefix(ENV_REFERENCE_PREFIX)?.strip_suffix(ENV_REFERENCE_SUFFIX)?;
    let valid = !name.is_empty()
        && name.bytes().all(|byte| byte.is_ascii_alphanumeric() || byte == b'_');
    valid.then_some(name)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        reason = "Test-only assertions are permitted."
    )]

    use super::*;

    #[test]
    fn env_reference_requires_exact_form() {
        assert_eq!(env_reference("${ENV:DB_PASSWORD}"), Some("DB_PASSWORD"));
        assert_eq!(env_reference("prefix-${ENV:DB_PASSWORD}"), None);
        assert_eq!(env_reference("${ENV:}"), None);
        assert_eq!(env_reference("${ENV:BAD-NAME}"), None);
        assert_eq!(env_reference("${DB_PASSWORD}"), None);
    }

    #[test]
    fn validate_path_rejects_long_component() {
        let component = "a".repeat(MAX_PATH_COMPONENT_LENGTH + 1);
        let result = validate_path(Path::new(&component));
        assert!(matches!(result, Err(SourceError::InvalidPath(_))));
    }

    #[test]
    fn validate_path_rejects_long_total() {
        let segment = "a".repeat(100);
        let long = std::iter::repeat_n(segment.as_str(), 50).collect::<Vec<_>>().join("/");
        let result = validate_path(Path::new(&long));
        assert!(matches!(result, Err(SourceError::InvalidPath(_))));
    }

    #[test]
    fn scalar_string_rejects_containers() {
        assert_eq!(scalar_string(&toml::Value::Boolean(true)), Some("true".to_string()));
        assert_eq!(scalar_string(&toml::Value::Array(Vec::new())), None);
    }
}
