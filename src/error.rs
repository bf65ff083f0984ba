//! Error types for the advisor SDK.
//!
//! Every internal step of the emitter and the host controller returns
//! [`Result<T>`]. The public role operations (`init`, `open_url`,
//! `open_modal`, `close_modal`) never hand these to the caller: they are
//! absorbed at the role boundary and, at most, logged.
//!
//! # Error Categories
//!
//! | Category | Variants | Boundary policy |
//! |----------|----------|-----------------|
//! | Precondition | [`Error::NotInitialized`], [`Error::ModalNotMounted`] | log, no-op |
//! | Foreign input | [`Error::ForeignMessage`] | ignore silently |
//! | Rejected input | [`Error::MalformedSignal`], [`Error::OriginRejected`], [`Error::UrlRejected`] | debug log, ignore |
//! | Recipient | [`Error::NoParentWindow`] | log, no effect |
//! | Configuration | [`Error::Config`], [`Error::Pattern`] | returned from option parsing |
//! | Environment | [`Error::Environment`], [`Error::Json`] | warn log |

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Precondition Errors
    // ========================================================================
    /// A role operation ran before `init`.
    #[error("{component} not initialized, call init() first")]
    NotInitialized {
        /// Role that was used too early.
        component: &'static str,
    },

    /// The modal container or its content frame is missing.
    #[error("Modal elements not found")]
    ModalNotMounted,

    // ========================================================================
    // Inbound Errors
    // ========================================================================
    /// Inbound traffic that does not carry the signal discriminator.
    ///
    /// Cross-frame channels carry unrelated third-party messages, so this
    /// is the expected case and is never logged.
    #[error("Foreign message")]
    ForeignMessage,

    /// Discriminator matched but the payload has no usable URL.
    #[error("Malformed signal: {message}")]
    MalformedSignal {
        /// What was wrong with the payload.
        message: String,
    },

    /// Sender origin is not on the allow-list.
    #[error("Origin not allowed: {origin}")]
    OriginRejected {
        /// Origin reported by the message event.
        origin: String,
    },

    /// URL refused by the host's URL policy.
    #[error("URL rejected: {url} ({reason})")]
    UrlRejected {
        /// The offending URL.
        url: String,
        /// Why the policy refused it.
        reason: String,
    },

    // ========================================================================
    // Recipient Errors
    // ========================================================================
    /// The emitter runs in a top-level window and has nobody to post to.
    #[error("No parent window found, cannot send message")]
    NoParentWindow,

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid configuration value.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// Origin wildcard compiled to an invalid pattern.
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    // ========================================================================
    // Environment Errors
    // ========================================================================
    /// The host environment refused a DOM operation.
    #[error("Environment error: {message}")]
    Environment {
        /// Description reported by the environment.
        message: String,
    },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a not-initialized error for the named role.
    #[inline]
    pub fn not_initialized(component: &'static str) -> Self {
        Self::NotInitialized { component }
    }

    /// Creates a malformed signal error.
    #[inline]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedSignal {
            message: message.into(),
        }
    }

    /// Creates an origin rejected error.
    #[inline]
    pub fn origin_rejected(origin: impl Into<String>) -> Self {
        Self::OriginRejected {
            origin: origin.into(),
        }
    }

    /// Creates a URL rejected error.
    #[inline]
    pub fn url_rejected(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UrlRejected {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an environment error.
    #[inline]
    pub fn environment(message: impl Into<String>) -> Self {
        Self::Environment {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if an operation ran before its role was ready.
    #[inline]
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::NotInitialized { .. } | Self::ModalNotMounted)
    }

    /// Returns `true` if this error must not produce any log output.
    #[inline]
    #[must_use]
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::ForeignMessage)
    }

    /// Returns `true` if inbound input was refused by a filter or policy.
    #[inline]
    #[must_use]
    pub fn is_rejected_input(&self) -> bool {
        matches!(
            self,
            Self::MalformedSignal { .. } | Self::OriginRejected { .. } | Self::UrlRejected { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::not_initialized("Emitter");
        assert_eq!(err.to_string(), "Emitter not initialized, call init() first");
    }

    #[test]
    fn test_url_rejected_display() {
        let err = Error::url_rejected("javascript:alert(1)", "scheme not allowed");
        assert_eq!(
            err.to_string(),
            "URL rejected: javascript:alert(1) (scheme not allowed)"
        );
    }

    #[test]
    fn test_predicates() {
        assert!(Error::ModalNotMounted.is_precondition());
        assert!(Error::ForeignMessage.is_silent());
        assert!(!Error::NoParentWindow.is_silent());
        assert!(Error::origin_rejected("https://evil.test").is_rejected_input());
        assert!(!Error::config("bad").is_rejected_input());
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
