//! The signal message contract.
//!
//! The only bit-exact interface between the two roles. A cross-frame post
//! carries:
//!
//! ```json
//! {
//!   "type": "advisor:openUrl",
//!   "advisorUrl": "https://calendly.com/advisor/intro"
//! }
//! ```
//!
//! `url` is accepted in place of `advisorUrl` when decoding.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Discriminator of an open-URL request, also the default custom event type.
pub const OPEN_URL: &str = "advisor:openUrl";

/// Alternate custom event type used by scheduling widgets.
pub const SCHEDULE_CALL: &str = "advisor:scheduleCall";

/// URL field of the cross-frame message and the default event detail.
pub const ADVISOR_URL_FIELD: &str = "advisorUrl";

/// Accepted in place of [`ADVISOR_URL_FIELD`] when decoding.
pub const URL_ALIAS_FIELD: &str = "url";

/// URL field of the alternate scheduling event detail.
pub const CALENDLY_URL_FIELD: &str = "calendlyUrl";

// ============================================================================
// SignalKind
// ============================================================================

/// Discriminator of a [`SignalMessage`].
///
/// Only one kind exists. Anything else on the wire is foreign traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    /// Ask the host to open a URL in its modal.
    #[serde(rename = "advisor:openUrl")]
    OpenUrl,
}

impl SignalKind {
    /// Returns the wire discriminator string.
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenUrl => OPEN_URL,
        }
    }
}

// ============================================================================
// SignalMessage
// ============================================================================

/// An open-URL request crossing the frame boundary.
///
/// The URL is opaque here. Whether it is acceptable is a host policy
/// decision, see [`UrlPolicy`](crate::host::UrlPolicy).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalMessage {
    /// Discriminator.
    #[serde(rename = "type")]
    pub kind: SignalKind,

    /// Resource to load in the host's content frame.
    #[serde(rename = "advisorUrl")]
    pub url: String,
}

impl SignalMessage {
    /// Creates an open-URL request.
    #[inline]
    #[must_use]
    pub fn open_url(url: impl Into<String>) -> Self {
        Self {
            kind: SignalKind::OpenUrl,
            url: url.into(),
        }
    }

    /// Encodes the message as structured cross-frame message data.
    pub fn to_message_data(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Decodes cross-frame message data.
    ///
    /// # Errors
    ///
    /// - [`Error::ForeignMessage`] if `data` is not an object whose `type`
    ///   is exactly [`OPEN_URL`]
    /// - [`Error::MalformedSignal`] if the discriminator matches but the
    ///   URL field is missing or not a string
    pub fn from_message_data(data: &Value) -> Result<Self> {
        let is_signal = data
            .get("type")
            .and_then(Value::as_str)
            .is_some_and(|kind| kind == OPEN_URL);
        if !is_signal {
            return Err(Error::ForeignMessage);
        }

        let url = data
            .get(ADVISOR_URL_FIELD)
            .or_else(|| data.get(URL_ALIAS_FIELD))
            .ok_or_else(|| Error::malformed("missing advisorUrl"))?
            .as_str()
            .ok_or_else(|| Error::malformed("advisorUrl is not a string"))?;

        Ok(Self::open_url(url))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_wire_shape() {
        let data = SignalMessage::open_url("https://x.test/a")
            .to_message_data()
            .unwrap();
        assert_eq!(
            data,
            json!({ "type": "advisor:openUrl", "advisorUrl": "https://x.test/a" })
        );
    }

    #[test]
    fn test_decode_accepts_url_alias() {
        let data = json!({ "type": "advisor:openUrl", "url": "https://x.test/b" });
        let message = SignalMessage::from_message_data(&data).unwrap();
        assert_eq!(message.url, "https://x.test/b");
        assert_eq!(message.kind.as_str(), OPEN_URL);
    }

    #[test]
    fn test_decode_prefers_advisor_url_over_alias() {
        let data = json!({
            "type": "advisor:openUrl",
            "advisorUrl": "https://x.test/a",
            "url": "https://x.test/b",
        });
        let message = SignalMessage::from_message_data(&data).unwrap();
        assert_eq!(message.url, "https://x.test/a");

        let data = json!({ "type": "advisor:openUrl", "advisorUrl": "https://x.test/a", "extra": 1 });
        assert_eq!(
            SignalMessage::from_message_data(&data).unwrap().url,
            "https://x.test/a"
        );
    }

    #[test]
    fn test_foreign_traffic() {
        for data in [
            json!("advisor:openUrl"),
            json!(42),
            json!(null),
            json!({ "type": "advisor:openurl", "advisorUrl": "https://x.test" }),
            json!({ "kind": "advisor:openUrl", "advisorUrl": "https://x.test" }),
            json!({ "type": "webpackOk" }),
        ] {
            let err = SignalMessage::from_message_data(&data).unwrap_err();
            assert!(matches!(err, Error::ForeignMessage), "{data}");
        }
    }

    #[test]
    fn test_missing_url_is_malformed() {
        let data = json!({ "type": "advisor:openUrl" });
        let err = SignalMessage::from_message_data(&data).unwrap_err();
        assert!(matches!(err, Error::MalformedSignal { .. }));

        let data = json!({ "type": "advisor:openUrl", "advisorUrl": 7 });
        let err = SignalMessage::from_message_data(&data).unwrap_err();
        assert!(matches!(err, Error::MalformedSignal { .. }));
    }
}
