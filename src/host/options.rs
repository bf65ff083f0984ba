//! Host controller configuration.
//!
//! Options can be built in code or read from a JSON object shaped like the
//! host page's config global:
//!
//! ```
//! use advisor_sdk::host::HostOptions;
//!
//! let options = HostOptions::from_json(r#"{
//!     "loggingEnabled": true,
//!     "modalTitle": "Talk to an advisor",
//!     "allowedOrigins": ["https://*.ads.example"],
//!     "modalStyles": { "overlay": { "zIndex": 2000 } }
//! }"#).unwrap();
//!
//! assert!(options.logging_enabled);
//! assert!(options.allowed_origins.allows("https://eu.ads.example"));
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::Deserialize;

use crate::error::Result;
use crate::protocol::{EventMapping, Transport};
use crate::render::{DEFAULT_TITLE, ModalStyles, ModalTemplate};

use super::policy::{OriginPolicy, UrlPolicy};

// ============================================================================
// HostOptions
// ============================================================================

/// Configuration of a [`HostController`](super::HostController) or a
/// standalone [`subscribe`](super::subscribe) call.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HostOptions {
    /// Dialog title. Presentation only.
    pub modal_title: String,

    /// Styling configuration. Presentation only.
    pub modal_styles: ModalStyles,

    /// Channel(s) to listen on.
    pub listen: Transport,

    /// Custom event types to accept on the same-document channel.
    pub event_mappings: Vec<EventMapping>,

    /// Sender origins accepted on the cross-frame channel.
    pub allowed_origins: OriginPolicy,

    /// URLs accepted from inbound signals.
    pub url_policy: UrlPolicy,

    /// Initial value of the `loggingEnabled` flag.
    pub logging_enabled: bool,
}

impl Default for HostOptions {
    fn default() -> Self {
        Self {
            modal_title: DEFAULT_TITLE.to_string(),
            modal_styles: ModalStyles::default(),
            listen: Transport::Both,
            event_mappings: vec![EventMapping::open_url()],
            allowed_origins: OriginPolicy::Any,
            url_policy: UrlPolicy::Opaque,
            logging_enabled: false,
        }
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl HostOptions {
    /// Creates options with default settings.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses options from a JSON config object. Missing keys keep defaults.
    ///
    /// # Errors
    ///
    /// - [`Error::Json`](crate::Error::Json) on malformed JSON or an invalid
    ///   `allowedOrigins` entry
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Returns the presentation template for these options.
    #[must_use]
    pub fn template(&self) -> ModalTemplate {
        ModalTemplate::new(self.modal_title.clone(), self.modal_styles.clone())
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl HostOptions {
    /// Sets the dialog title.
    #[inline]
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.modal_title = title.into();
        self
    }

    /// Sets the styling configuration.
    #[inline]
    #[must_use]
    pub fn with_styles(mut self, styles: ModalStyles) -> Self {
        self.modal_styles = styles;
        self
    }

    /// Sets the channel(s) to listen on.
    #[inline]
    #[must_use]
    pub fn with_listen(mut self, transport: Transport) -> Self {
        self.listen = transport;
        self
    }

    /// Accepts an additional custom event mapping.
    #[inline]
    #[must_use]
    pub fn with_event_mapping(mut self, mapping: EventMapping) -> Self {
        if !self.event_mappings.contains(&mapping) {
            self.event_mappings.push(mapping);
        }
        self
    }

    /// Sets the origin policy.
    #[inline]
    #[must_use]
    pub fn with_allowed_origins(mut self, policy: OriginPolicy) -> Self {
        self.allowed_origins = policy;
        self
    }

    /// Sets the URL policy.
    #[inline]
    #[must_use]
    pub fn with_url_policy(mut self, policy: UrlPolicy) -> Self {
        self.url_policy = policy;
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
