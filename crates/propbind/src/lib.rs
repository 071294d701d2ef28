// crates/propbind/src/lib.rs
// ============================================================================
// Module: Propbind Library
// Description: Declarative property binding and validation for plugin configs.
// Purpose: Turn untyped key/value properties into typed, validated configs.
// Dependencies: serde, serde_json, thiserror, toml, tracing
// ============================================================================

//! ## Overview
//! `propbind` converts an untyped [`PropertyMap`] into strongly typed
//! configuration objects. Each configuration type declares one
//! [`FieldDescriptor`] per field (key, value type, default, sensitivity,
//! description) plus validation constraints. The [`Binder`] coerces raw strings
//! into typed values, [`validate`] evaluates every constraint, and [`render`]
//! produces a redacted view safe for logs, docs, and diagnostics.
//!
//! Security posture: property values are untrusted and may carry secrets;
//! sensitive values never appear in errors, logs, or rendered output.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod binder;
pub mod config;
pub mod descriptor;
pub mod docs;
pub mod properties;
pub mod redaction;
pub mod registry;
pub mod schema;
pub mod source;
pub mod validation;
pub mod value;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use binder::BindErrors;
pub use binder::BindMode;
pub use binder::Binder;
pub use binder::BindingError;
pub use config::ConfigError;
pub use config::Validated;
pub use config::load;
pub use descriptor::Configuration;
pub use descriptor::DescriptorSet;
pub use descriptor::DescriptorSetBuilder;
pub use descriptor::FieldDescriptor;
pub use descriptor::FieldOptions;
pub use descriptor::RegistrationError;
pub use docs::config_docs_markdown;
pub use docs::verify_config_docs;
pub use docs::write_config_docs;
pub use properties::PropertyMap;
pub use properties::PropertyMapError;
pub use redaction::DisplayValue;
pub use redaction::REDACTION_MARKER;
pub use redaction::RenderedConfig;
pub use redaction::fmt_redacted;
pub use redaction::render;
pub use registry::describe;
pub use schema::config_schema;
pub use source::SourceError;
pub use validation::Constraint;
pub use validation::ConstraintScope;
pub use validation::ValidationViolation;
pub use validation::Violations;
pub use validation::validate;
pub use value::CoercionError;
pub use value::ConfigEnum;
pub use value::FieldValue;
pub use value::LIST_DELIMITER;
pub use value::PropertyValue;
pub use value::ValueType;
