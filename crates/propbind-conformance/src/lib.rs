// crates/propbind-conformance/src/lib.rs
// ============================================================================
// Module: Propbind Conformance
// Description: Reusable conformance harness for configuration types.
// Purpose: Let configuration owners prove defaults and mappings agree.
// Dependencies: propbind, thiserror, tracing
// ============================================================================

//! ## Overview
//! Configuration owners describe the instance an empty property map must bind
//! to and one or more explicit property maps with their expected instances.
//! The harness drives the bind and validate pipeline against those fixtures
//! and reports every disagreement, including declared keys that no fixture
//! exercises.
//!
//! ```ignore
//! ConformanceSuite::<MyConfig>::new()
//!     .defaults(MyConfig::default())
//!     .mapping(properties, expected)
//!     .verify()?;
//! ```

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod error;
pub mod suite;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use error::ConformanceError;
pub use error::ConformanceFailures;
pub use suite::ConformanceSuite;
pub use suite::assert_defaults_match;
pub use suite::assert_explicit_mapping_matches;
