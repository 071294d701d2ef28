// crates/propbind-conformance/tests/common/mod.rs
// =============================================================================
// Module: Conformance Test Helpers
// Description: Configuration fixtures for harness tests.
// Purpose: Provide well-behaved and misbehaving types to run suites against.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use propbind::ConfigEnum;
use propbind::Configuration;
use propbind::Constraint;
use propbind::DescriptorSetBuilder;
use propbind::PropertyMap;

/// Event output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// JSON lines.
    Json,
    /// Plain text.
    Text,
}

impl ConfigEnum for Format {
    const TYPE_NAME: &'static str = "Format";
    const MEMBERS: &'static [Self] = &[Self::Json, Self::Text];

    fn name(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Text => "TEXT",
        }
    }
}

/// Well-behaved listener configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerConfig {
    /// Listener name.
    pub name: String,
    /// Whether the listener is enabled.
    pub enabled: bool,
    /// Output format.
    pub format: Format,
    /// Sink password (sensitive).
    pub password: Option<String>,
    /// Subscribed topics.
    pub topics: Vec<String>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            name: "events".to_string(),
            enabled: true,
            format: Format::Json,
            password: None,
            topics: Vec::new(),
        }
    }
}

impl ListenerConfig {
    /// Sets the listener name.
    pub fn set_name(&mut self, name: String) -> &mut Self {
        self.name = name;
        self
    }

    /// Sets the enabled flag.
    pub fn set_enabled(&mut self, enabled: bool) -> &mut Self {
        self.enabled = enabled;
        self
    }

    /// Sets the output format.
    pub fn set_format(&mut self, format: Format) -> &mut Self {
        self.format = format;
        self
    }

    /// Sets the sink password.
    pub fn set_password(&mut self, password: Option<String>) -> &mut Self {
        self.password = password;
        self
    }

    /// Sets the subscribed topics.
    pub fn set_topics(&mut self, topics: Vec<String>) -> &mut Self {
        self.topics = topics;
        self
    }
}

impl Configuration for ListenerConfig {
    const NAME: &'static str = "ListenerConfig";

    fn describe(descriptors: &mut DescriptorSetBuilder<Self>) {
        descriptors.field("listener.name", |config: &Self| config.name.clone(), Self::set_name);
        descriptors.field("listener.enabled", |config: &Self| config.enabled, Self::set_enabled);
        descriptors.field("listener.format", |config: &Self| config.format, Self::set_format);
        descriptors
            .field("listener.password", |config: &Self| config.password.clone(), Self::set_password)
            .sensitive();
        descriptors.field("listener.topics", |config: &Self| config.topics.clone(), Self::set_topics);
        descriptors.constraint(Constraint::single_field(
            "listener.name",
            "{key} must not be blank",
            |config: &Self| !config.name.trim().is_empty(),
        ));
    }
}

/// Returns a property map that sets every listener key.
pub fn full_listener_properties() -> PropertyMap {
    [
        ("listener.name", "audit"),
        ("listener.enabled", "false"),
        ("listener.format", "text"),
        ("listener.password", "hunter2"),
        ("listener.topics", "a, b"),
    ]
    .into_iter()
    .collect()
}

/// Returns the instance `full_listener_properties` binds to.
pub fn full_listener() -> ListenerConfig {
    let mut config = ListenerConfig::default();
    config
        .set_name("audit".to_string())
        .set_enabled(false)
        .set_format(Format::Text)
        .set_password(Some("hunter2".to_string()))
        .set_topics(vec!["a".to_string(), "b".to_string()]);
    config
}

/// Configuration whose sensitive setter copies into a non-sensitive field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeakyConfig {
    /// Sensitive key.
    pub key: Option<String>,
    /// Non-sensitive echo of the key.
    pub echo: String,
}

impl Configuration for LeakyConfig {
    const NAME: &'static str = "LeakyConfig";

    fn describe(descriptors: &mut DescriptorSetBuilder<Self>) {
        descriptors
            .field("leaky.key", |config: &Self| config.key.clone(), |config: &mut Self, value: Option<String>| {
                config.echo = value.clone().unwrap_or_default();
                config.key = value;
                config
            })
            .sensitive();
        descriptors.field("leaky.echo", |config: &Self| config.echo.clone(), |config: &mut Self, value| {
            config.echo = value;
            config
        });
    }
}

/// Configuration with a required key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredConfig {
    /// Required region.
    pub region: String,
    /// Optional retry count.
    pub retries: u32,
}

impl Default for RequiredConfig {
    fn default() -> Self {
        Self {
            region: String::new(),
            retries: 3,
        }
    }
}

impl Configuration for RequiredConfig {
    const NAME: &'static str = "RequiredConfig";

    fn describe(descriptors: &mut DescriptorSetBuilder<Self>) {
        descriptors
            .field("required.region", |config: &Self| config.region.clone(), |config: &mut Self, value| {
                config.region = value;
                config
            })
            .required();
        descriptors.field("required.retries", |config: &Self| config.retries, |config: &mut Self, value| {
            config.retries = value;
            config
        });
    }
}
