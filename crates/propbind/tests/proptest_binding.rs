//! Binding property-based tests.
//!
//! ## Purpose
//! These tests fuzz property maps and raw values to ensure coercion and
//! binding are total, deterministic, and never leak sensitive values.
//!
//! ## What is covered
//! - Boolean coercion accepts exactly the two canonical words in any case.
//! - List coercion inverts list rendering for delimiter-free elements.
//! - Binding the rendered view of a bound instance reproduces it.
//! - Arbitrary maps bind or fail without panics, and never leak the token.
//!
//! ## What is intentionally out of scope
//! - Schema validation of fuzzed maps (covered by `schema_docs.rs`).
// crates/propbind/tests/proptest_binding.rs
// ============================================================================
// Module: Binding Property-Based Tests
// Description: Fuzz-like checks for coercion and binding.
// Purpose: Ensure binding is total and redaction holds on adversarial inputs.
// ============================================================================

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use propbind::Binder;
use propbind::BindingError;
use propbind::ConfigError;
use propbind::PropertyMap;
use propbind::PropertyValue;
use propbind::render;
use proptest::prelude::*;

mod common;
use crate::common::ServiceConfig;

const TOKEN_MARKER: &str = "zz-token-zz";

fn key_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("service.name".to_string()),
        Just("service.enabled".to_string()),
        Just("service.active".to_string()),
        Just("service.mode".to_string()),
        Just("service.endpoint".to_string()),
        Just("service.tags".to_string()),
        Just("service.port".to_string()),
        "[a-z]{1,8}\\.[a-z]{1,8}",
    ]
}

proptest! {
    #[test]
    fn boolean_coercion_matches_canonical_words(raw in "\\PC{0,8}") {
        let expected = if raw.eq_ignore_ascii_case("true") {
            Some(true)
        } else if raw.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        };
        prop_assert_eq!(bool::coerce(&raw).ok(), expected);
    }

    #[test]
    fn list_coercion_inverts_rendering(items in proptest::collection::vec("[a-z0-9]{1,6}", 1..6)) {
        let rendered = items.join(",");
        prop_assert_eq!(Vec::<String>::coerce(&rendered).unwrap(), items);
    }

    #[test]
    fn rendered_view_rebinds_to_the_same_instance(
        name in "[a-z]{1,10}",
        enabled in any::<bool>(),
        port in 1_u16..,
        tags in proptest::collection::vec("[a-z]{1,5}", 0..4),
    ) {
        let original = ServiceConfig {
            name,
            enabled,
            endpoint: enabled.then(|| "https://example.test".to_string()),
            tags,
            port,
            ..ServiceConfig::default()
        };
        let rendered = render(&original).unwrap();
        let rebound: ServiceConfig = Binder::strict().bind(&rendered.to_property_map()).unwrap();
        prop_assert_eq!(rebound, original);
    }

    #[test]
    fn arbitrary_maps_bind_deterministically_without_leaks(
        entries in proptest::collection::vec((key_strategy(), "[ -~]{0,12}"), 0..8),
    ) {
        let mut map: PropertyMap = entries.into_iter().collect();
        map.set("service.token", TOKEN_MARKER);
        let first = Binder::lenient().bind::<ServiceConfig>(&map);
        let second = Binder::lenient().bind::<ServiceConfig>(&map);
        prop_assert_eq!(&first, &second);
        match first {
            Ok(config) => {
                let debug_output = format!("{config:?}");
                prop_assert!(!debug_output.contains(TOKEN_MARKER));
                prop_assert!(!render(&config).unwrap().to_string().contains(TOKEN_MARKER));
            }
            Err(ConfigError::Binding(errors)) => {
                prop_assert!(!errors.to_string().contains(TOKEN_MARKER));
                let no_unknown = errors.iter().all(|error| !matches!(error, BindingError::UnknownProperty { .. }));
                prop_assert!(no_unknown);
            }
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }
}
