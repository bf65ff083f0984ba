//! Emitter configuration.
//!
//! # Example
//!
//! ```
//! use advisor_sdk::emitter::EmitterOptions;
//! use advisor_sdk::protocol::{EventMapping, Transport};
//!
//! let options = EmitterOptions::new()
//!     .with_transport(Transport::Both)
//!     .with_event_mapping(EventMapping::schedule_call())
//!     .with_logging(true);
//!
//! assert_eq!(options.target_origin, "*");
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::Deserialize;

use crate::error::Result;
use crate::protocol::{EventMapping, Transport};

// ============================================================================
// EmitterOptions
// ============================================================================

/// How an [`Emitter`](super::Emitter) transmits signals.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmitterOptions {
    /// Channel(s) to transmit over.
    pub transport: Transport,

    /// Target origin of cross-frame posts. `*` posts to any parent.
    pub target_origin: String,

    /// Custom event type and detail field for same-document dispatch.
    pub event_mapping: EventMapping,

    /// Initial value of the `loggingEnabled` flag.
    pub logging_enabled: bool,
}

impl Default for EmitterOptions {
    fn default() -> Self {
        Self {
            transport: Transport::CrossFrame,
            target_origin: "*".to_string(),
            event_mapping: EventMapping::open_url(),
            logging_enabled: false,
        }
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl EmitterOptions {
    /// Creates options with default settings.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses options from a JSON config object.
    ///
    /// # Errors
    ///
    /// - [`Error::Json`](crate::Error::Json) if the object does not match
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl EmitterOptions {
    /// Sets the transport.
    #[inline]
    #[must_use]
    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    /// Restricts cross-frame posts to a parent at `origin`.
    #[inline]
    #[must_use]
    pub fn with_target_origin(mut self, origin: impl Into<String>) -> Self {
        self.target_origin = origin.into();
        self
    }

    /// Sets the same-document event mapping.
    #[inline]
    #[must_use]
    pub fn with_event_mapping(mut self, mapping: EventMapping) -> Self {
        self.event_mapping = mapping;
        self
    }

    /// Sets the initial logging flag.
    #[inline]
    #[must_use]
    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.logging_enabled = enabled;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
