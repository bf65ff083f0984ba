//! Signal protocol between the embedded widget and the host page.
//!
//! # Channels
//!
//! | Channel | Direction | Shape |
//! |---------|-----------|-------|
//! | Cross-frame | child frame → parent window | `{ "type": "advisor:openUrl", "advisorUrl": url }` |
//! | Same-document | document → its own listeners | custom event `advisor:openUrl`, `detail.advisorUrl` |
//!
//! The receiver accepts messages from any origin unless the host configures
//! an allow-list.

// ============================================================================
// Submodules
// ============================================================================

/// Transport selection and custom event naming.
pub mod mapping;

/// The signal message and its wire discriminator.
pub mod message;

// ============================================================================
// Re-exports
// ============================================================================

pub use mapping::{EventMapping, Transport};
pub use message::{
    ADVISOR_URL_FIELD, CALENDLY_URL_FIELD, OPEN_URL, SCHEDULE_CALL, SignalKind, SignalMessage,
};
