// crates/propbind/src/docs.rs
// ============================================================================
// Module: Config Docs Generator
// Description: Markdown generator for configuration property references.
// Purpose: Keep property docs in sync with descriptors and constraints.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! Renders a Markdown property reference for a configuration type from its
//! JSON schema and declared constraints. Output is deterministic so generated
//! files can be committed and checked for drift.
//!
//! Security posture: defaults of sensitive properties render as the redaction
//! marker.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write;
use std::fs;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::binder::BindMode;
use crate::descriptor::Configuration;
use crate::descriptor::RegistrationError;
use crate::redaction::REDACTION_MARKER;
use crate::registry::describe;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when generating or verifying config docs.
#[derive(Debug, Error)]
pub enum DocsError {
    /// The configuration type is misdeclared.
    #[error("docs registration error: {0}")]
    Registration(#[from] RegistrationError),
    /// IO failure while reading or writing docs.
    #[error("docs io error: {0}")]
    Io(String),
    /// Schema traversal or rendering error.
    #[error("docs schema error: {0}")]
    Schema(String),
    /// Generated docs do not match the committed file.
    #[error("docs drift: {0}")]
    Drift(String),
}

// ============================================================================
// SECTION: Public API
// ============================================================================

/// Generates the Markdown property reference for `T`.
///
/// # Errors
///
/// Returns [`DocsError`] when `T` is misdeclared or schema traversal fails.
pub fn config_docs_markdown<T: Configuration>() -> Result<String, DocsError> {
    let descriptors = describe::<T>()?;
    let schema = descriptors.schema(BindMode::Strict);
    let props = schema
        .get("properties")
        .and_then(Value::as_object)
        .ok_or_else(|| DocsError::Schema("schema properties missing".to_string()))?;

    let mut out = String::new();
    out.push_str("<!--\n");
    out.push_str("============================================================================\n");
    let _ = writeln!(&mut out, "Document: {} Properties", T::NAME);
    let _ = writeln!(&mut out, "Description: Reference for {} configuration properties.", T::NAME);
    out.push_str("Generated: This file is auto-generated; do not edit manually.\n");
    out.push_str("============================================================================\n");
    out.push_str("-->\n\n");

    let _ = writeln!(&mut out, "# {} Configuration\n", T::NAME);
    out.push_str("## Properties\n\n");
    out.push_str("| Property | Type | Default | Notes |\n");
    out.push_str("| --- | --- | --- | --- |\n");

    for field in descriptors.fields() {
        let key = field.key();
        let prop = props.get(key).ok_or_else(|| DocsError::Schema(format!("missing field schema: {key}")))?;
        let value_type = prop.get("x-value-type").and_then(Value::as_str).unwrap_or("string");
        let default_value = if field.is_sensitive() {
            format!("`{REDACTION_MARKER}`")
        } else {
            prop.get("default")
                .and_then(Value::as_str)
                .map_or_else(|| "n/a".to_string(), |value| format!("`{}`", md_escape(value)))
        };
        let mut notes = Vec::new();
        if let Some(description) = prop.get("description").and_then(Value::as_str) {
            notes.push(md_escape(description));
        }
        if let Some(members) = prop.get("x-enum").and_then(Value::as_array) {
            let names: Vec<String> =
                members.iter().filter_map(Value::as_str).map(|name| format!("`{name}`")).collect();
            notes.push(format!("One of {} (case-insensitive).", names.join(", ")));
        }
        if let (Some(min), Some(max)) = (prop.get("x-minimum"), prop.get("x-maximum")) {
            notes.push(format!("Range {min}..={max}."));
        }
        if field.is_required() {
            notes.push("Required.".to_string());
        }
        if field.is_sensitive() {
            notes.push("Sensitive; value is redacted.".to_string());
        }
        if !field.legacy_keys().is_empty() {
            let aliases: Vec<String> = field.legacy_keys().iter().map(|alias| format!("`{alias}`")).collect();
            notes.push(format!("Deprecated alias: {}.", aliases.join(", ")));
        }
        let _ = writeln!(&mut out, "| `{key}` | {value_type} | {default_value} | {} |", notes.join(" "));
    }

    if !descriptors.constraints().is_empty() {
        out.push_str("\n## Validation\n\n");
        for constraint in descriptors.constraints() {
            let keys: Vec<String> = constraint.keys().iter().map(|key| format!("`{key}`")).collect();
            let _ = writeln!(&mut out, "- {}: {}", keys.join(", "), md_escape(&constraint.render_message()));
        }
    }

    Ok(out)
}

/// Writes the generated docs for `T` to `path`.
///
/// # Errors
///
/// Returns [`DocsError`] when generation or file output fails.
pub fn write_config_docs<T: Configuration>(path: &Path) -> Result<(), DocsError> {
    let content = config_docs_markdown::<T>()?;
    fs::write(path, content.as_bytes()).map_err(|err| DocsError::Io(err.to_string()))
}

/// Verifies the docs at `path` match the generated output for `T`.
///
/// # Errors
///
/// Returns [`DocsError`] when the docs drift or cannot be read.
pub fn verify_config_docs<T: Configuration>(path: &Path) -> Result<(), DocsError> {
    let content = config_docs_markdown::<T>()?;
    let existing = fs::read_to_string(path).map_err(|err| DocsError::Io(err.to_string()))?;
    if existing != content {
        return Err(DocsError::Drift(format!("docs mismatch: {}", path.display())));
    }
    Ok(())
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Escapes table-breaking characters.
fn md_escape(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
