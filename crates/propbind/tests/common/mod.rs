// crates/propbind/tests/common/mod.rs
// =============================================================================
// Module: Propbind Test Helpers
// Description: Shared configuration fixtures and log capture for tests.
// Purpose: Reduce duplication across integration tests for propbind.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::fmt;
use std::io;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;

use propbind::ConfigEnum;
use propbind::Configuration;
use propbind::Constraint;
use propbind::DescriptorSetBuilder;
use propbind::PropertyMap;
use propbind::fmt_redacted;

// =============================================================================
// SECTION: Fixtures
// =============================================================================

/// Service operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Favors throughput.
    Fast,
    /// Favors durability.
    Safe,
}

impl ConfigEnum for Mode {
    const TYPE_NAME: &'static str = "Mode";
    const MEMBERS: &'static [Self] = &[Self::Fast, Self::Safe];

    fn name(self) -> &'static str {
        match self {
            Self::Fast => "FAST",
            Self::Safe => "SAFE",
        }
    }
}

/// Configuration exercising every value type.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Service name.
    pub name: String,
    /// Whether the service is enabled.
    pub enabled: bool,
    /// Operating mode.
    pub mode: Mode,
    /// Remote endpoint.
    pub endpoint: Option<String>,
    /// Access token (sensitive).
    pub token: Option<String>,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Listen port.
    pub port: u16,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "primary".to_string(),
            enabled: false,
            mode: Mode::Safe,
            endpoint: None,
            token: None,
            tags: Vec::new(),
            port: 8080,
        }
    }
}

impl ServiceConfig {
    /// Sets the service name.
    pub fn set_name(&mut self, name: String) -> &mut Self {
        self.name = name;
        self
    }

    /// Sets the enabled flag.
    pub fn set_enabled(&mut self, enabled: bool) -> &mut Self {
        self.enabled = enabled;
        self
    }

    /// Sets the operating mode.
    pub fn set_mode(&mut self, mode: Mode) -> &mut Self {
        self.mode = mode;
        self
    }

    /// Sets the endpoint.
    pub fn set_endpoint(&mut self, endpoint: Option<String>) -> &mut Self {
        self.endpoint = endpoint;
        self
    }

    /// Sets the access token.
    pub fn set_token(&mut self, token: Option<String>) -> &mut Self {
        self.token = token;
        self
    }

    /// Sets the tags.
    pub fn set_tags(&mut self, tags: Vec<String>) -> &mut Self {
        self.tags = tags;
        self
    }

    /// Sets the listen port.
    pub fn set_port(&mut self, port: u16) -> &mut Self {
        self.port = port;
        self
    }
}

impl Configuration for ServiceConfig {
    const NAME: &'static str = "ServiceConfig";

    fn describe(descriptors: &mut DescriptorSetBuilder<Self>) {
        descriptors
            .field("service.name", |config: &Self| config.name.clone(), Self::set_name)
            .description("Service name.");
        descriptors
            .field("service.enabled", |config: &Self| config.enabled, Self::set_enabled)
            .legacy_key("service.active");
        descriptors.field("service.mode", |config: &Self| config.mode, Self::set_mode);
        descriptors.field("service.endpoint", |config: &Self| config.endpoint.clone(), Self::set_endpoint);
        descriptors
            .field("service.token", |config: &Self| config.token.clone(), Self::set_token)
            .sensitive()
            .description("Access token.");
        descriptors
            .field("service.tags", |config: &Self| config.tags.clone(), Self::set_tags)
            .description("Comma-separated tags.");
        descriptors.field("service.port", |config: &Self| config.port, Self::set_port);
        descriptors.constraint(Constraint::single_field(
            "service.port",
            "{key} must be non-zero",
            |config: &Self| config.port != 0,
        ));
        descriptors.constraint(Constraint::cross_field(
            &["service.enabled", "service.endpoint"],
            "an enabled service requires an endpoint",
            |config: &Self| !config.enabled || config.endpoint.is_some(),
        ));
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_redacted(self, f)
    }
}

/// Configuration with a required, sensitive key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenantConfig {
    /// Tenant identifier.
    pub id: String,
    /// Tenant secret.
    pub secret: String,
}

impl TenantConfig {
    /// Sets the tenant identifier.
    pub fn set_id(&mut self, id: String) -> &mut Self {
        self.id = id;
        self
    }

    /// Sets the tenant secret.
    pub fn set_secret(&mut self, secret: String) -> &mut Self {
        self.secret = secret;
        self
    }
}

impl Configuration for TenantConfig {
    const NAME: &'static str = "TenantConfig";

    fn describe(descriptors: &mut DescriptorSetBuilder<Self>) {
        descriptors.field("tenant.id", |config: &Self| config.id.clone(), Self::set_id).required();
        descriptors
            .field("tenant.secret", |config: &Self| config.secret.clone(), Self::set_secret)
            .sensitive()
            .required();
    }
}

/// Builds a property map from literal pairs.
pub fn props(pairs: &[(&str, &str)]) -> PropertyMap {
    pairs.iter().copied().collect()
}

// =============================================================================
// SECTION: Log Capture
// =============================================================================

/// Shared in-memory log sink.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Returns everything written so far.
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `action` with a trace-level subscriber and returns its output and logs.
pub fn capture_logs<R>(action: impl FnOnce() -> R) -> (R, String) {
    let capture = LogCapture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, action);
    (result, capture.contents())
}
