// crates/propbind-plugins/src/openlineage.rs
// ============================================================================
// Module: OpenLineage Transport Config
// Description: Transport selection for the OpenLineage event listener.
// Purpose: Bind how lineage events leave the process.
// Dependencies: propbind
// ============================================================================

//! ## Overview
//! Lineage events are either written to the console or posted over HTTP.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use propbind::ConfigEnum;
use propbind::Configuration;
use propbind::DescriptorSetBuilder;
use propbind::fmt_redacted;

// ============================================================================
// SECTION: Keys
// ============================================================================

/// Lineage transport type.
pub const TRANSPORT_TYPE_KEY: &str = "openlineage-event-listener.transport.type";

// ============================================================================
// SECTION: Transport
// ============================================================================

/// Transports available to the OpenLineage listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenLineageTransport {
    /// Write events to the console.
    Console,
    /// Post events to an HTTP endpoint.
    Http,
}

impl ConfigEnum for OpenLineageTransport {
    const TYPE_NAME: &'static str = "OpenLineageTransport";
    const MEMBERS: &'static [Self] = &[Self::Console, Self::Http];

    fn name(self) -> &'static str {
        match self {
            Self::Console => "CONSOLE",
            Self::Http => "HTTP",
        }
    }
}

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// OpenLineage transport configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct OpenLineageTransportConfig {
    /// Selected transport.
    transport: OpenLineageTransport,
}

impl Default for OpenLineageTransportConfig {
    fn default() -> Self {
        Self {
            transport: OpenLineageTransport::Console,
        }
    }
}

impl OpenLineageTransportConfig {
    /// Returns the selected transport.
    #[must_use]
    pub const fn transport(&self) -> OpenLineageTransport {
        self.transport
    }

    /// Sets the transport.
    pub const fn set_transport(&mut self, transport: OpenLineageTransport) -> &mut Self {
        self.transport = transport;
        self
    }
}

impl Configuration for OpenLineageTransportConfig {
    const NAME: &'static str = "OpenLineageTransportConfig";

    fn describe(descriptors: &mut DescriptorSetBuilder<Self>) {
        descriptors
            .field(TRANSPORT_TYPE_KEY, |config: &Self| config.transport, Self::set_transport)
            .description("Type of transport used to emit lineage information");
    }
}

impl fmt::Debug for OpenLineageTransportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_redacted(self, f)
    }
}
