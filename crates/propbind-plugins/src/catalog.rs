// crates/propbind-plugins/src/catalog.rs
// ============================================================================
// Module: Configuration Catalog
// Description: Enumerates the plugin configuration owners by name.
// Purpose: Let tooling check, document, and describe configs without generics.
// Dependencies: propbind, serde_json, thiserror, tracing
// ============================================================================

//! ## Overview
//! [`ConfigKind`] names every configuration owner in this crate and dispatches
//! the generic `propbind` operations to the matching type. Tooling selects a
//! kind by its stable name (`mysql-event-listener`, `lakehouse`,
//! `openlineage-transport`).

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use propbind::BindMode;
use propbind::ConfigError;
use propbind::Configuration;
use propbind::PropertyMap;
use propbind::RegistrationError;
use propbind::RenderedConfig;
use propbind::config_docs_markdown;
use propbind::config_schema;
use propbind::docs::DocsError;
use propbind::load;
use propbind::render;
use propbind::verify_config_docs;
use propbind::write_config_docs;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::lakehouse::LakehouseConfig;
use crate::mysql::MysqlEventListenerConfig;
use crate::openlineage::OpenLineageTransportConfig;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// A configuration kind name that matches no owner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown configuration kind `{name}` (expected one of: {})", ConfigKind::names().join(", "))]
pub struct UnknownKind {
    /// Name as supplied.
    pub name: String,
}

// ============================================================================
// SECTION: Kinds
// ============================================================================

/// Configuration owners known to tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKind {
    /// MySQL event listener.
    Mysql,
    /// Lakehouse connector.
    Lakehouse,
    /// OpenLineage transport.
    OpenLineage,
}

impl ConfigKind {
    /// Every kind in display order.
    pub const ALL: &'static [Self] = &[Self::Mysql, Self::Lakehouse, Self::OpenLineage];

    /// Returns the stable kind name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mysql => "mysql-event-listener",
            Self::Lakehouse => "lakehouse",
            Self::OpenLineage => "openlineage-transport",
        }
    }

    /// Returns every kind name in display order.
    #[must_use]
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|kind| kind.name()).collect()
    }

    /// Binds and validates `properties`, returning the redacted view.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] with every binding error or violation found.
    pub fn check(self, properties: &PropertyMap, mode: BindMode) -> Result<RenderedConfig, ConfigError> {
        debug!(
            kind = self.name(),
            properties = properties.len(),
            strict = mode == BindMode::Strict,
            "checking configuration"
        );
        match self {
            Self::Mysql => check::<MysqlEventListenerConfig>(properties, mode),
            Self::Lakehouse => check::<LakehouseConfig>(properties, mode),
            Self::OpenLineage => check::<OpenLineageTransportConfig>(properties, mode),
        }
    }

    /// Returns the JSON Schema for this kind's property map.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError`] when the owner is misdeclared.
    pub fn schema(self, mode: BindMode) -> Result<Value, RegistrationError> {
        match self {
            Self::Mysql => config_schema::<MysqlEventListenerConfig>(mode),
            Self::Lakehouse => config_schema::<LakehouseConfig>(mode),
            Self::OpenLineage => config_schema::<OpenLineageTransportConfig>(mode),
        }
    }

    /// Returns the Markdown reference for this kind.
    ///
    /// # Errors
    ///
    /// Returns [`DocsError`] when the owner is misdeclared.
    pub fn docs_markdown(self) -> Result<String, DocsError> {
        match self {
            Self::Mysql => config_docs_markdown::<MysqlEventListenerConfig>(),
            Self::Lakehouse => config_docs_markdown::<LakehouseConfig>(),
            Self::OpenLineage => config_docs_markdown::<OpenLineageTransportConfig>(),
        }
    }

    /// Writes the Markdown reference for this kind to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DocsError`] when generation or the write fails.
    pub fn write_docs(self, path: &Path) -> Result<(), DocsError> {
        match self {
            Self::Mysql => write_config_docs::<MysqlEventListenerConfig>(path),
            Self::Lakehouse => write_config_docs::<LakehouseConfig>(path),
            Self::OpenLineage => write_config_docs::<OpenLineageTransportConfig>(path),
        }
    }

    /// Checks that `path` holds the current Markdown reference for this kind.
    ///
    /// # Errors
    ///
    /// Returns [`DocsError::Drift`] when the file is stale.
    pub fn verify_docs(self, path: &Path) -> Result<(), DocsError> {
        match self {
            Self::Mysql => verify_config_docs::<MysqlEventListenerConfig>(path),
            Self::Lakehouse => verify_config_docs::<LakehouseConfig>(path),
            Self::OpenLineage => verify_config_docs::<OpenLineageTransportConfig>(path),
        }
    }
}

impl fmt::Display for ConfigKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConfigKind {
    type Err = UnknownKind;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name).ok_or_else(|| UnknownKind {
            name: name.to_string(),
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Loads `T` from `properties` and renders the redacted view.
fn check<T: Configuration>(properties: &PropertyMap, mode: BindMode) -> Result<RenderedConfig, ConfigError> {
    let config = load::<T>(properties, mode)?;
    Ok(render(config.as_ref())?)
}
