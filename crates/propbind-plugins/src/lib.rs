// crates/propbind-plugins/src/lib.rs
// ============================================================================
// Module: Propbind Plugins
// Description: Concrete configuration owners built on propbind.
// Purpose: Declare plugin configs and expose them to tooling by name.
// Dependencies: propbind, serde_json, thiserror, tracing, url
// ============================================================================

//! ## Overview
//! Each module declares one plugin configuration type through
//! [`propbind::Configuration`]. The [`catalog`] module lists them for the CLI.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod catalog;
pub mod lakehouse;
pub mod mysql;
pub mod openlineage;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use catalog::ConfigKind;
pub use catalog::UnknownKind;
pub use lakehouse::LakehouseConfig;
pub use lakehouse::TableType;
pub use mysql::MysqlEventListenerConfig;
pub use openlineage::OpenLineageTransport;
pub use openlineage::OpenLineageTransportConfig;
