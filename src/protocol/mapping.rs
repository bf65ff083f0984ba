//! Transport selection and same-document event mapping.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

use super::message::{
    ADVISOR_URL_FIELD, CALENDLY_URL_FIELD, OPEN_URL, SCHEDULE_CALL, SignalMessage,
};

// ============================================================================
// Transport
// ============================================================================

/// Channel(s) a signal travels over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Transport {
    /// Structured message posted to the parent window.
    #[default]
    CrossFrame,
    /// Custom event dispatched on the current document.
    SameDocument,
    /// Both of the above.
    Both,
}

impl Transport {
    /// Returns `true` if the cross-frame channel is in use.
    #[inline]
    #[must_use]
    pub fn uses_cross_frame(self) -> bool {
        matches!(self, Self::CrossFrame | Self::Both)
    }

    /// Returns `true` if the same-document channel is in use.
    #[inline]
    #[must_use]
    pub fn uses_same_document(self) -> bool {
        matches!(self, Self::SameDocument | Self::Both)
    }
}

// ============================================================================
// EventMapping
// ============================================================================

/// Custom event type and detail field carrying the URL.
///
/// Widgets disagree on naming (`advisor:openUrl`/`advisorUrl` versus
/// `advisor:scheduleCall`/`calendlyUrl`); the mapping is picked at
/// configuration time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMapping {
    /// Custom event type.
    pub event_type: String,
    /// Field of `detail` holding the URL.
    pub url_field: String,
}

impl Default for EventMapping {
    fn default() -> Self {
        Self::open_url()
    }
}

impl EventMapping {
    /// Creates a mapping.
    #[inline]
    #[must_use]
    pub fn new(event_type: impl Into<String>, url_field: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            url_field: url_field.into(),
        }
    }

    /// `advisor:openUrl` with `detail.advisorUrl`.
    #[inline]
    #[must_use]
    pub fn open_url() -> Self {
        Self::new(OPEN_URL, ADVISOR_URL_FIELD)
    }

    /// `advisor:scheduleCall` with `detail.calendlyUrl`.
    #[inline]
    #[must_use]
    pub fn schedule_call() -> Self {
        Self::new(SCHEDULE_CALL, CALENDLY_URL_FIELD)
    }

    /// Builds the event detail for `message`.
    #[must_use]
    pub fn encode_detail(&self, message: &SignalMessage) -> Value {
        let mut detail = Map::new();
        detail.insert(self.url_field.clone(), Value::String(message.url.clone()));
        Value::Object(detail)
    }

    /// Reads a signal out of a custom event.
    ///
    /// # Errors
    ///
    /// - [`Error::ForeignMessage`] if `event_type` is not this mapping's type
    /// - [`Error::MalformedSignal`] if the detail lacks a string URL field
    pub fn decode_detail(&self, event_type: &str, detail: &Value) -> Result<SignalMessage> {
        if event_type != self.event_type {
            return Err(Error::ForeignMessage);
        }

        detail
            .get(&self.url_field)
            .and_then(Value::as_str)
            .map(SignalMessage::open_url)
            .ok_or_else(|| {
                Error::malformed(format!(
                    "{} event without string detail.{}",
                    self.event_type, self.url_field
                ))
            })
    }
}

// ============================================================================
// Tests
// ============================================================================
