// crates/propbind-plugins/tests/common/mod.rs
// =============================================================================
// Module: Plugin Test Helpers
// Description: Shared fixtures for plugin configuration tests.
// Purpose: Reduce duplication across integration tests for propbind-plugins.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use propbind::PropertyMap;
use propbind_plugins::MysqlEventListenerConfig;
use propbind_plugins::mysql::PASSWORD_KEY;
use propbind_plugins::mysql::PRUNE_COLUMNS_KEY;
use propbind_plugins::mysql::URL_KEY;
use propbind_plugins::mysql::USER_KEY;

/// Plain MySQL JDBC URL without credentials.
pub const MYSQL_URL: &str = "jdbc:mysql://example.net:3306";

/// Builds a property map from literal pairs.
pub fn props(pairs: &[(&str, &str)]) -> PropertyMap {
    pairs.iter().copied().collect()
}

/// Explicit properties setting every MySQL listener key.
pub fn full_mysql_properties() -> PropertyMap {
    props(&[
        (URL_KEY, MYSQL_URL),
        (USER_KEY, "the-user"),
        (PASSWORD_KEY, "the-password"),
        (PRUNE_COLUMNS_KEY, "col1,col2"),
    ])
}

/// Instance matching [`full_mysql_properties`].
pub fn full_mysql_config() -> MysqlEventListenerConfig {
    let mut config = MysqlEventListenerConfig::default();
    config
        .set_url(Some(MYSQL_URL.to_string()))
        .set_user(Some("the-user".to_string()))
        .set_password(Some("the-password".to_string()))
        .set_prune_columns(vec!["col1".to_string(), "col2".to_string()]);
    config
}

/// MySQL config holding only a URL.
pub fn mysql_with_url(url: &str) -> MysqlEventListenerConfig {
    let mut config = MysqlEventListenerConfig::default();
    config.set_url(Some(url.to_string()));
    config
}
