// crates/propbind-plugins/src/mysql.rs
// ============================================================================
// Module: MySQL Event Listener Config
// Description: Connection settings for the MySQL event listener.
// Purpose: Bind and validate the listener's JDBC URL and credentials.
// Dependencies: propbind, url
// ============================================================================

//! ## Overview
//! The listener writes query events to MySQL. Its URL is required and must use
//! a MySQL Connector/J scheme. Credentials may be supplied as separate
//! properties or inside the URL query, but not both.
//!
//! Security posture: the URL and password are sensitive. Constraint messages
//! are fixed templates and never interpolate either value.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use propbind::Configuration;
use propbind::Constraint;
use propbind::DescriptorSetBuilder;
use propbind::fmt_redacted;
use url::Url;

// ============================================================================
// SECTION: Keys
// ============================================================================

/// JDBC URL of the event database.
pub const URL_KEY: &str = "mysql-event-listener.db.url";
/// Database user.
pub const USER_KEY: &str = "mysql-event-listener.db.user";
/// Database password.
pub const PASSWORD_KEY: &str = "mysql-event-listener.db.password";
/// Event columns to drop before writing.
pub const PRUNE_COLUMNS_KEY: &str = "mysql-event-listener.db.prune-columns";

/// URL schemes accepted by MySQL Connector/J; each is followed by `//`.
const MYSQL_URL_SCHEMES: &[&str] = &[
    "jdbc:mysql:",
    "jdbc:mysql:loadbalance:",
    "jdbc:mysql:replication:",
    "jdbc:mysql+srv:",
    "jdbc:mysql+srv:loadbalance:",
    "jdbc:mysql+srv:replication:",
    "mysqlx:",
    "mysqlx+srv:",
];

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// MySQL event listener configuration.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct MysqlEventListenerConfig {
    /// JDBC URL.
    url: Option<String>,
    /// Database user.
    user: Option<String>,
    /// Database password.
    password: Option<String>,
    /// Columns pruned from event data.
    prune_columns: Vec<String>,
}

impl MysqlEventListenerConfig {
    /// Returns the JDBC URL.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Sets the JDBC URL.
    pub fn set_url(&mut self, url: Option<String>) -> &mut Self {
        self.url = url;
        self
    }

    /// Returns the database user.
    #[must_use]
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Sets the database user.
    pub fn set_user(&mut self, user: Option<String>) -> &mut Self {
        self.user = user;
        self
    }

    /// Returns the database password.
    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Sets the database password.
    pub fn set_password(&mut self, password: Option<String>) -> &mut Self {
        self.password = password;
        self
    }

    /// Returns the columns pruned from event data.
    #[must_use]
    pub fn prune_columns(&self) -> &[String] {
        &self.prune_columns
    }

    /// Sets the columns pruned from event data.
    pub fn set_prune_columns(&mut self, prune_columns: Vec<String>) -> &mut Self {
        self.prune_columns = prune_columns;
        self
    }

    /// Returns true when the URL is absent or uses a MySQL scheme.
    #[must_use]
    pub fn is_valid_url(&self) -> bool {
        self.url.as_deref().is_none_or(is_mysql_url)
    }

    /// Returns true unless the user is set both here and in the URL query.
    #[must_use]
    pub fn is_user_unambiguous(&self) -> bool {
        self.user.is_none() || !self.url_has_parameter("user")
    }

    /// Returns true unless the password is set both here and in the URL query.
    #[must_use]
    pub fn is_password_unambiguous(&self) -> bool {
        self.password.is_none() || !self.url_has_parameter("password")
    }

    /// Returns true when the URL query carries `name`.
    fn url_has_parameter(&self, name: &str) -> bool {
        self.url
            .as_deref()
            .and_then(|url| Url::parse(url).ok())
            .is_some_and(|url| url.query_pairs().any(|(key, _)| key == name))
    }
}

impl Configuration for MysqlEventListenerConfig {
    const NAME: &'static str = "MysqlEventListenerConfig";

    fn describe(descriptors: &mut DescriptorSetBuilder<Self>) {
        descriptors
            .field(URL_KEY, |config: &Self| config.url.clone(), Self::set_url)
            .sensitive()
            .not_null("{key} must not be null");
        descriptors.field(USER_KEY, |config: &Self| config.user.clone(), Self::set_user);
        descriptors
            .field(PASSWORD_KEY, |config: &Self| config.password.clone(), Self::set_password)
            .sensitive();
        descriptors
            .field(PRUNE_COLUMNS_KEY, |config: &Self| config.prune_columns.clone(), Self::set_prune_columns)
            .description("List of columns to prune from the event data. Comma-separated list of column names.");
        descriptors.constraint(Constraint::single_field(
            URL_KEY,
            "Invalid JDBC URL for MySQL event listener",
            Self::is_valid_url,
        ));
        descriptors.constraint(Constraint::cross_field(
            &[URL_KEY, USER_KEY],
            "Database user is specified twice (in the JDBC URL and as a separate property)",
            Self::is_user_unambiguous,
        ));
        descriptors.constraint(Constraint::cross_field(
            &[URL_KEY, PASSWORD_KEY],
            "Database password is specified twice (in the JDBC URL and as a separate property)",
            Self::is_password_unambiguous,
        ));
    }
}

impl fmt::Debug for MysqlEventListenerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_redacted(self, f)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns true when `url` starts with a MySQL scheme followed by `//`.
fn is_mysql_url(url: &str) -> bool {
    MYSQL_URL_SCHEMES
        .iter()
        .any(|scheme| url.strip_prefix(scheme).is_some_and(|rest| rest.starts_with("//")))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
