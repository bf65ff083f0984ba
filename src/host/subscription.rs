//! Inbound signal listening.
//!
//! [`subscribe`] registers the message and custom-event listeners described
//! by [`HostOptions`] and hands every accepted [`SignalMessage`] to a
//! callback. The host controller's persistent listener is one of these.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::rc::Rc;

use serde_json::Value;
use tracing::debug;

use crate::dom::{DomEvent, EventKind, EventTarget, Handler, Page};
use crate::error::{Error, Result};
use crate::identifiers::ListenerId;
use crate::logging::LogGate;
use crate::protocol::{EventMapping, SignalMessage};

use super::HOST_COMPONENT;
use super::options::HostOptions;
use super::policy::{OriginPolicy, UrlPolicy};

// ============================================================================
// InboundFilter
// ============================================================================

/// Decides which inbound events are signals.
struct InboundFilter {
    mappings: Vec<EventMapping>,
    origins: OriginPolicy,
    urls: UrlPolicy,
}

impl InboundFilter {
    fn accept(&self, event: &DomEvent) -> Result<SignalMessage> {
        let message = match event {
            DomEvent::Message(message) => {
                // Discriminator first: foreign traffic stays silent whatever its origin.
                let signal = SignalMessage::from_message_data(&message.data)?;
                self.origins.check(&message.origin)?;
                signal
            }
            DomEvent::Custom(custom) => self.decode_custom(&custom.event_type, &custom.detail)?,
            DomEvent::Click(_) | DomEvent::KeyDown(_) => return Err(Error::ForeignMessage),
        };
        self.urls.check(&message.url)?;
        Ok(message)
    }

    /// Tries every mapping registered for `event_type`; the first that
    /// finds its URL field wins.
    fn decode_custom(&self, event_type: &str, detail: &Value) -> Result<SignalMessage> {
        let mut decoded = Err(Error::ForeignMessage);
        for mapping in self.mappings.iter().filter(|m| m.event_type == event_type) {
            decoded = mapping.decode_detail(event_type, detail);
            if decoded.is_ok() {
                break;
            }
        }
        decoded
    }
}

// ============================================================================
// Subscription
// ============================================================================

/// Live inbound listeners; removed on [`unsubscribe`](Self::unsubscribe) or
/// drop.
pub struct Subscription<P: Page> {
    page: P,
    listeners: Vec<ListenerId>,
}

impl<P: Page> fmt::Debug for Subscription<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("window", &self.page.window_id())
            .field("listeners", &self.listeners)
            .finish()
    }
}

impl<P: Page + Clone> Subscription<P> {
    /// Registers the listeners, logging through `log`.
    pub(crate) fn new<F>(page: &P, options: &HostOptions, log: LogGate, callback: F) -> Result<Self>
    where
        F: Fn(SignalMessage) + 'static,
    {
        let filter = InboundFilter {
            mappings: options.event_mappings.clone(),
            origins: options.allowed_origins.clone(),
            urls: options.url_policy,
        };
        let handler: Handler = Rc::new(move |event: &DomEvent| match filter.accept(event) {
            Ok(message) => {
                log.info(format_args!("Received advisor URL: {}", message.url));
                callback(message);
            }
            Err(e) if e.is_silent() => {}
            Err(e) => log.debug(format_args!("Ignoring inbound signal: {e}")),
        });

        let mut registrations = Vec::new();
        if options.listen.uses_cross_frame() {
            registrations.push((EventTarget::Window, EventKind::Message));
        }
        if options.listen.uses_same_document() {
            for mapping in &options.event_mappings {
                let kind = EventKind::Custom(mapping.event_type.clone());
                if !registrations.iter().any(|(_, k)| *k == kind) {
                    registrations.push((EventTarget::Document, kind));
                }
            }
        }

        let mut subscription = Self {
            page: page.clone(),
            listeners: Vec::with_capacity(registrations.len()),
        };
        for (target, kind) in registrations {
            // Dropping `subscription` on error removes what was added so far.
            let id = page.add_listener(target, kind, Rc::clone(&handler))?;
            subscription.listeners.push(id);
        }
        debug!(
            window = %page.window_id(),
            listeners = subscription.listeners.len(),
            "Inbound listeners registered"
        );
        Ok(subscription)
    }
}

impl<P: Page> Subscription<P> {
    /// Returns the registered listener ids.
    #[inline]
    #[must_use]
    pub fn listener_ids(&self) -> &[ListenerId] {
        &self.listeners
    }

    /// Removes the listeners.
    pub fn unsubscribe(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        for id in self.listeners.drain(..) {
            self.page.remove_listener(id);
        }
    }
}

impl<P: Page> Drop for Subscription<P> {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Listens for signals on `page` and calls `callback` with each accepted one.
///
/// Unlike [`HostController`](super::HostController) this owns no modal; it
/// is the receive half for hosts that render the scheduling UI themselves.
///
/// # Errors
///
/// Fails if the page refuses a listener registration.
///
/// # Example
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// use advisor_sdk::Emitter;
/// use advisor_sdk::dom::MemoryBrowser;
/// use advisor_sdk::host::{HostOptions, subscribe};
///
/// let browser = MemoryBrowser::new("https://host.test");
/// let top = browser.top();
/// let urls = Rc::new(RefCell::new(Vec::new()));
/// let sink = Rc::clone(&urls);
/// let subscription = subscribe(&top, &HostOptions::default(), move |signal| {
///     sink.borrow_mut().push(signal.url);
/// })
/// .unwrap();
///
/// let emitter = Emitter::new(top.create_child_frame("https://ads.test"));
/// emitter.init();
/// emitter.open_url("https://calendly.test/abc");
/// browser.run_until_idle();
///
/// assert_eq!(*urls.borrow(), ["https://calendly.test/abc"]);
/// subscription.unsubscribe();
/// ```
pub fn subscribe<P, F>(page: &P, options: &HostOptions, callback: F) -> Result<Subscription<P>>
where
    P: Page + Clone,
    F: Fn(SignalMessage) + 'static,
{
    let log = LogGate::new(HOST_COMPONENT, options.logging_enabled);
    Subscription::new(page, options, log, callback)
}

// ============================================================================
// Tests
// ============================================================================
