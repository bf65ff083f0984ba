//! Host environment seen by the SDK roles.
//!
//! The roles never touch a global `window`. They talk to a [`Page`] (one
//! browsing context's messaging and listener registry) and, on the host
//! side, a [`ModalSurface`] (the rendering collaborator that owns the modal
//! markup).
//!
//! | Backend | Description |
//! |---------|-------------|
//! | [`memory`] | In-memory browser: window tree, task queue, modal surface |
//! | `web` | `web-sys` backend, behind the `web` cargo feature |
//!
//! Everything here is single-threaded: handles are `Rc`-based and every
//! operation returns immediately.

// ============================================================================
// Submodules
// ============================================================================

/// Listener events and targets.
pub mod event;

/// Keyboard key definitions.
pub mod keyboard;

/// In-memory browser.
pub mod memory;

/// Real-browser backend.
#[cfg(feature = "web")]
pub mod web;

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;

use crate::error::Result;
use crate::identifiers::{ListenerId, WindowId};
use crate::render::ModalTemplate;

// ============================================================================
// Re-exports
// ============================================================================

pub use event::{
    ClickEvent, CustomEvent, DomEvent, ElementRole, EventKind, EventTarget, Handler,
    KeyboardEvent, MessageEvent,
};
pub use keyboard::Key;
pub use memory::{MemoryBrowser, MemoryWindow, ModalSnapshot};

// ============================================================================
// Page
// ============================================================================

/// Messaging and listener registry of one browsing context.
pub trait Page {
    /// Returns the id of this browsing context.
    fn window_id(&self) -> WindowId;

    /// Returns `true` if a parent window exists and is not this window.
    fn has_distinct_parent(&self) -> bool;

    /// Posts structured data to the parent window.
    ///
    /// Fire-and-forget: delivery happens later, if at all, and is never
    /// acknowledged.
    ///
    /// # Errors
    ///
    /// - [`Error::NoParentWindow`](crate::Error::NoParentWindow) when
    ///   [`has_distinct_parent`](Self::has_distinct_parent) is `false`
    fn post_to_parent(&self, data: &Value, target_origin: &str) -> Result<()>;

    /// Dispatches a custom event on this document, synchronously.
    fn dispatch_custom_event(&self, event: CustomEvent) -> Result<()>;

    /// Registers a listener.
    fn add_listener(
        &self,
        target: EventTarget,
        kind: EventKind,
        handler: Handler,
    ) -> Result<ListenerId>;

    /// Removes a listener. Returns `false` if it was not registered.
    fn remove_listener(&self, id: ListenerId) -> bool;
}

// ============================================================================
// ModalSurface
// ============================================================================

/// Rendering collaborator owning the modal container and content frame.
pub trait ModalSurface {
    /// Inserts the modal markup and, once per document, its stylesheet.
    ///
    /// The modal starts hidden with an empty content frame.
    fn mount_modal(&self, template: &ModalTemplate) -> Result<()>;

    /// Returns `true` if both the container and the content frame exist.
    fn has_modal(&self) -> bool;

    /// Points the content frame at `url`; an empty string clears it.
    fn set_content_source(&self, url: &str) -> Result<()>;

    /// Shows or hides the modal container.
    fn set_modal_visible(&self, visible: bool) -> Result<()>;

    /// Suppresses or restores scrolling of the page behind the modal.
    fn set_background_scroll_locked(&self, locked: bool) -> Result<()>;
}
