//! Embedded-frame role.
//!
//! The [`Emitter`] lives inside the advertisement iframe. It cannot see the
//! host DOM and does not know whether anybody is listening; it only
//! transmits [`SignalMessage`]s.
//!
//! # Example
//!
//! ```
//! use advisor_sdk::Emitter;
//! use advisor_sdk::dom::MemoryBrowser;
//!
//! let browser = MemoryBrowser::new("https://host.test");
//! let ad_frame = browser.top().create_child_frame("https://ads.test");
//!
//! let emitter = Emitter::new(ad_frame);
//! emitter.init();
//! emitter.open_url("https://calendly.test/abc");
//!
//! assert_eq!(browser.pending_tasks(), 1);
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Emitter configuration.
pub mod options;

// ============================================================================
// Imports
// ============================================================================

use std::cell::Cell;
use std::fmt;

use crate::dom::{CustomEvent, Page};
use crate::error::{Error, Result};
use crate::logging::LogGate;
use crate::protocol::SignalMessage;

pub use options::EmitterOptions;

// ============================================================================
// Constants
// ============================================================================

/// Log prefix of the emitter role.
pub const EMITTER_COMPONENT: &str = "AdvisorAdSDK";

// ============================================================================
// Emitter
// ============================================================================

/// Sends open-URL requests toward the host page.
///
/// All operations return immediately and never fail toward the caller:
/// problems are logged through the emitter's [`LogGate`] and dropped.
pub struct Emitter<P: Page> {
    page: P,
    options: EmitterOptions,
    log: LogGate,
    initialized: Cell<bool>,
}

impl<P: Page> fmt::Debug for Emitter<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("window", &self.page.window_id())
            .field("options", &self.options)
            .field("initialized", &self.initialized.get())
            .finish_non_exhaustive()
    }
}

impl<P: Page> Emitter<P> {
    /// Creates an emitter with default options.
    #[must_use]
    pub fn new(page: P) -> Self {
        Self::with_options(page, EmitterOptions::default())
    }

    /// Creates an emitter with the given options.
    #[must_use]
    pub fn with_options(page: P, options: EmitterOptions) -> Self {
        let log = LogGate::new(EMITTER_COMPONENT, options.logging_enabled);
        Self {
            page,
            options,
            log,
            initialized: Cell::new(false),
        }
    }

    /// Returns the logging switch; clones stay linked to this emitter.
    #[inline]
    #[must_use]
    pub fn log_gate(&self) -> &LogGate {
        &self.log
    }

    /// Returns the options.
    #[inline]
    #[must_use]
    pub fn options(&self) -> &EmitterOptions {
        &self.options
    }

    /// Returns `true` once [`init`](Self::init) has run.
    #[inline]
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized.get()
    }

    /// Marks the emitter ready. Repeated calls only log.
    pub fn init(&self) {
        if self.initialized.replace(true) {
            self.log.info(format_args!("SDK already initialized"));
            return;
        }
        self.log.info(format_args!("Advisor Ad SDK initialized"));
    }

    /// Asks the host to open `url` in its modal.
    ///
    /// A no-op (with a logged warning) before [`init`](Self::init). The
    /// request is unacknowledged: whether a host received it cannot be
    /// observed.
    pub fn open_url(&self, url: &str) {
        if let Err(e) = self.try_open_url(url) {
            self.absorb(&e);
        }
    }

    fn try_open_url(&self, url: &str) -> Result<()> {
        if !self.is_initialized() {
            return Err(Error::not_initialized("SDK"));
        }
        self.log.info(format_args!("Opening advisor URL: {url}"));

        let message = SignalMessage::open_url(url);
        let transport = self.options.transport;

        // A missing parent must not stop the same-document dispatch.
        let cross_frame = if transport.uses_cross_frame() {
            self.post_cross_frame(&message)
        } else {
            Ok(())
        };
        if transport.uses_same_document() {
            self.dispatch_same_document(&message)?;
        }
        cross_frame
    }

    fn post_cross_frame(&self, message: &SignalMessage) -> Result<()> {
        if !self.page.has_distinct_parent() {
            return Err(Error::NoParentWindow);
        }
        let data = message.to_message_data()?;
        self.page.post_to_parent(&data, &self.options.target_origin)?;
        self.log.info(format_args!("Sent advisor URL via postMessage"));
        Ok(())
    }

    fn dispatch_same_document(&self, message: &SignalMessage) -> Result<()> {
        let mapping = &self.options.event_mapping;
        let event = CustomEvent::new(mapping.event_type.clone(), mapping.encode_detail(message));
        self.page.dispatch_custom_event(event)?;
        self.log.info(format_args!("Sent advisor URL via custom event"));
        Ok(())
    }

    fn absorb(&self, err: &Error) {
        match err {
            Error::NoParentWindow => self.log.info(format_args!("{err}")),
            _ => self.log.warn(format_args!("{err}")),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::RefCell;
    use std::rc::Rc;

    use serde_json::json;

    use crate::dom::{DomEvent, EventKind, EventTarget, MemoryBrowser, MemoryWindow};
    use crate::protocol::{EventMapping, Transport};

    fn record(window: &MemoryWindow, target: EventTarget, kind: EventKind) -> Rc<RefCell<Vec<DomEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        window
            .add_listener(
                target,
                kind,
                Rc::new(move |event: &DomEvent| sink.borrow_mut().push(event.clone())),
            )
            .unwrap();
        events
    }

    #[test]
    fn test_init_is_idempotent() {
        let browser = MemoryBrowser::new("https://host.test");
        let emitter = Emitter::new(browser.top());
        assert!(!emitter.is_initialized());

        emitter.init();
        emitter.init();
        assert!(emitter.is_initialized());
    }

    #[test]
    fn test_open_url_before_init_sends_nothing() {
        let browser = MemoryBrowser::new("https://host.test");
        let child = browser.top().create_child_frame("https://ads.test");
        let emitter = Emitter::new(child);

        emitter.open_url("https://x.test/a");
        assert_eq!(browser.pending_tasks(), 0);
    }

    #[test]
    fn test_cross_frame_post() {
        let browser = MemoryBrowser::new("https://host.test");
        let top = browser.top();
        let received = record(&top, EventTarget::Window, EventKind::Message);
        let emitter = Emitter::new(top.create_child_frame("https://ads.test"));
        emitter.init();

        emitter.open_url("https://x.test/a");
        browser.run_until_idle();

        let received = received.borrow();
        assert_eq!(received.len(), 1);
        let DomEvent::Message(message) = &received[0] else {
            panic!("expected a message event");
        };
        assert_eq!(message.origin, "https://ads.test");
        assert_eq!(
            message.data,
            json!({ "type": "advisor:openUrl", "advisorUrl": "https://x.test/a" })
        );
    }

    #[test]
    fn test_no_parent_is_absorbed() {
        let browser = MemoryBrowser::new("https://host.test");
        let emitter = Emitter::with_options(browser.top(), EmitterOptions::new().with_logging(true));
        emitter.init();

        emitter.open_url("https://x.test/a");
        assert_eq!(browser.pending_tasks(), 0);
    }

    #[test]
    fn test_both_transports_without_parent_still_dispatch_event() {
        let browser = MemoryBrowser::new("https://host.test");
        let top = browser.top();
        let kind = EventKind::Custom("advisor:scheduleCall".into());
        let events = record(&top, EventTarget::Document, kind);

        let options = EmitterOptions::new()
            .with_transport(Transport::Both)
            .with_event_mapping(EventMapping::schedule_call());
        let emitter = Emitter::with_options(top, options);
        emitter.init();
        emitter.open_url("https://calendly.test/abc");

        let events = events.borrow();
        assert_eq!(events.len(), 1);
        let DomEvent::Custom(event) = &events[0] else {
            panic!("expected a custom event");
        };
        assert_eq!(event.detail, json!({ "calendlyUrl": "https://calendly.test/abc" }));
        assert!(event.bubbles && event.cancelable);
        assert_eq!(browser.pending_tasks(), 0);
    }
}
