//! Advisor SDK - Cross-frame "open this URL" signaling for embedded ads.
//!
//! An advertisement running inside an iframe asks the page that embeds it
//! to show a scheduling page in a modal dialog. The two sides never share
//! code or memory; they agree only on a small message contract.
//!
//! # Architecture
//!
//! Two cooperating roles, each initialized independently:
//!
//! - **Emitter** (inside the embedded frame): posts the signal to the parent
//!   window, dispatches it as a same-document custom event, or both
//! - **Host Controller** (top-level page): mounts the modal once, listens
//!   for signals, and drives the `Closed ⇄ Open` lifecycle
//!
//! Neither role touches a global `window`. Both talk to the host
//! environment through the [`dom::Page`] and [`dom::ModalSurface`] traits,
//! implemented by the in-memory [`dom::MemoryBrowser`] and, with the `web`
//! feature, by a `web-sys` backend.
//!
//! # Quick Start
//!
//! ```
//! use advisor_sdk::{Emitter, HostController};
//! use advisor_sdk::dom::MemoryBrowser;
//!
//! let browser = MemoryBrowser::new("https://publisher.test");
//! let top = browser.top();
//!
//! // Host page
//! let host = HostController::new(top.clone());
//! host.init();
//!
//! // Ad iframe
//! let emitter = Emitter::new(top.create_child_frame("https://ads.test"));
//! emitter.init();
//! emitter.open_url("https://calendly.test/advisor");
//!
//! browser.run_until_idle();
//! assert!(host.is_open());
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`dom`] | Host environment traits and backends |
//! | [`emitter`] | Embedded-frame role: [`Emitter`] |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`host`] | Top-level page role: [`HostController`], [`host::subscribe`] |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`logging`] | Per-role logging switch |
//! | [`protocol`] | Message contract |
//! | [`render`] | Modal markup and stylesheet |

// ============================================================================
// Modules
// ============================================================================

/// Host environment: pages, events, backends.
pub mod dom;

/// Embedded-frame role.
pub mod emitter;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Top-level page role.
pub mod host;

/// Type-safe identifiers for windows and listeners.
pub mod identifiers;

/// Logging switch shared by a role and its handlers.
pub mod logging;

/// Signal message contract.
pub mod protocol;

/// Modal presentation.
pub mod render;

// ============================================================================
// Re-exports
// ============================================================================

// Roles
pub use emitter::{Emitter, EmitterOptions};
pub use host::{HostController, HostOptions, ModalState};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{ListenerId, WindowId};

// Protocol types
pub use protocol::{EventMapping, SignalMessage, Transport};

pub use logging::LogGate;
