//! Events a page delivers to registered listeners.

// ============================================================================
// Imports
// ============================================================================

use std::rc::Rc;

use serde_json::Value;

use crate::render::{CLOSE_BUTTON_ID, CONTENT_FRAME_ID, OVERLAY_ID};

use super::keyboard::Key;

// ============================================================================
// Types
// ============================================================================

/// Listener callback.
///
/// Pages clone the handler out of their registry before invoking it, so a
/// handler may add or remove listeners (including itself) while running.
pub type Handler = Rc<dyn Fn(&DomEvent)>;

// ============================================================================
// ElementRole
// ============================================================================

/// Parts of the modal a listener can be attached to or a click can hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementRole {
    /// Full-page backdrop; a click landing on it directly is an outside click.
    Overlay,
    /// Dialog box inside the overlay.
    Container,
    /// Close control in the dialog header.
    CloseButton,
    /// Embedded frame showing the requested URL.
    ContentFrame,
}

impl ElementRole {
    /// Returns the DOM id the default markup gives this element.
    #[must_use]
    pub fn element_id(self) -> Option<&'static str> {
        match self {
            Self::Overlay => Some(OVERLAY_ID),
            Self::CloseButton => Some(CLOSE_BUTTON_ID),
            Self::ContentFrame => Some(CONTENT_FRAME_ID),
            Self::Container => None,
        }
    }

    /// Returns the element a click on this one bubbles to next.
    #[must_use]
    pub fn parent(self) -> Option<Self> {
        match self {
            Self::CloseButton | Self::ContentFrame => Some(Self::Container),
            Self::Container => Some(Self::Overlay),
            Self::Overlay => None,
        }
    }

    /// Maps a DOM id back to its role.
    #[must_use]
    pub fn from_element_id(id: &str) -> Option<Self> {
        [Self::Overlay, Self::CloseButton, Self::ContentFrame]
            .into_iter()
            .find(|role| role.element_id() == Some(id))
    }
}

// ============================================================================
// EventTarget / EventKind
// ============================================================================

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    /// The window (cross-frame messages arrive here).
    Window,
    /// The document (custom events and keystrokes).
    Document,
    /// One of the modal's elements.
    Element(ElementRole),
}

/// Which events a listener wants.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// `message`
    Message,
    /// A custom event type such as `advisor:openUrl`.
    Custom(String),
    /// `click`
    Click,
    /// `keydown`
    KeyDown,
}

impl EventKind {
    /// Returns the DOM event type string.
    #[must_use]
    pub fn dom_type(&self) -> &str {
        match self {
            Self::Message => "message",
            Self::Custom(event_type) => event_type,
            Self::Click => "click",
            Self::KeyDown => "keydown",
        }
    }
}

// ============================================================================
// Event payloads
// ============================================================================

/// A structured message posted from another window.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageEvent {
    /// Origin of the sending window.
    pub origin: String,
    /// Structured-clone payload.
    pub data: Value,
}

/// A custom event dispatched on a document.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomEvent {
    /// Event type.
    pub event_type: String,
    /// `detail` payload.
    pub detail: Value,
    /// Whether the event bubbles to the window.
    pub bubbles: bool,
    /// Whether listeners may cancel it.
    pub cancelable: bool,
}

impl CustomEvent {
    /// Creates a bubbling, cancelable custom event.
    #[must_use]
    pub fn new(event_type: impl Into<String>, detail: Value) -> Self {
        Self {
            event_type: event_type.into(),
            detail,
            bubbles: true,
            cancelable: true,
        }
    }
}

/// A click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickEvent {
    /// Element that was hit, `None` for anything outside the modal.
    pub target: Option<ElementRole>,
}

/// A keydown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardEvent {
    /// `KeyboardEvent.key`
    pub key: String,
    /// `KeyboardEvent.code`
    pub code: String,
}

impl KeyboardEvent {
    /// Returns `true` if this is the given key.
    #[inline]
    #[must_use]
    pub fn is(&self, key: Key) -> bool {
        self.key == key.key()
    }
}

impl From<Key> for KeyboardEvent {
    fn from(key: Key) -> Self {
        Self {
            key: key.key().to_string(),
            code: key.code().to_string(),
        }
    }
}

// ============================================================================
// DomEvent
// ============================================================================

/// Any event a listener can receive.
#[derive(Debug, Clone, PartialEq)]
pub enum DomEvent {
    /// Cross-frame message.
    Message(MessageEvent),
    /// Same-document custom event.
    Custom(CustomEvent),
    /// Click.
    Click(ClickEvent),
    /// Keydown.
    KeyDown(KeyboardEvent),
}

impl DomEvent {
    /// Returns the kind listeners register for.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Message(_) => EventKind::Message,
            Self::Custom(event) => EventKind::Custom(event.event_type.clone()),
            Self::Click(_) => EventKind::Click,
            Self::KeyDown(_) => EventKind::KeyDown,
        }
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
    fn test_click_bubbles_to_overlay() {
        let mut path = vec![ElementRole::CloseButton];
        while let Some(parent) = path.last().and_then(|role| role.parent()) {
            path.push(parent);
        }
        assert_eq!(
            path,
            [
                ElementRole::CloseButton,
                ElementRole::Container,
                ElementRole::Overlay
            ]
        );
    }

    #[test]
    fn test_element_id_round_trip() {
        assert_eq!(
            ElementRole::from_element_id("advisorModalOverlay"),
            Some(ElementRole::Overlay)
        );
        assert_eq!(ElementRole::from_element_id("somethingElse"), None);
        assert_eq!(ElementRole::Container.element_id(), None);
    }

    #[test]
    fn test_event_kind() {
        let event = DomEvent::Custom(CustomEvent::new("advisor:openUrl", json!({})));
        assert_eq!(event.kind(), EventKind::Custom("advisor:openUrl".into()));
        assert_eq!(event.kind().dom_type(), "advisor:openUrl");
        assert_eq!(
            DomEvent::KeyDown(Key::Escape.into()).kind().dom_type(),
            "keydown"
        );
    }
}
