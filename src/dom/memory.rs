//! In-memory browser.
//!
//! Models just enough of a browser for both SDK roles to run without one:
//!
//! - a tree of windows (a top-level page and nested iframes), each with an
//!   origin and a document
//! - a listener registry with DOM-like dispatch (registration order,
//!   bubbling along the modal's element chain, listeners removed mid-dispatch
//!   are skipped)
//! - a FIFO task queue for cross-frame messages, drained by
//!   [`MemoryBrowser::run_until_idle`]; custom events dispatch synchronously
//! - a [`ModalSurface`] per document that records the mounted markup,
//!   visibility, content-frame source and body scroll lock
//!
//! # Example
//!
//! ```
//! use advisor_sdk::dom::{MemoryBrowser, Page};
//!
//! let browser = MemoryBrowser::new("https://host.test");
//! let top = browser.top();
//! let ad = top.create_child_frame("https://ads.test");
//!
//! assert!(ad.has_distinct_parent());
//! assert!(!top.has_distinct_parent());
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use serde_json::Value;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::identifiers::{ListenerId, WindowId};
use crate::render::{ModalTemplate, STYLESHEET_ID};

use super::event::{
    ClickEvent, CustomEvent, DomEvent, ElementRole, EventKind, EventTarget, Handler,
    MessageEvent,
};
use super::keyboard::Key;
use super::{ModalSurface, Page};

// ============================================================================
// Internal State
// ============================================================================

/// One listener registration.
struct Registration {
    window: WindowId,
    target: EventTarget,
    kind: EventKind,
    handler: Handler,
}

/// Queued cross-frame delivery.
struct Task {
    window: WindowId,
    event: DomEvent,
}

/// Mounted modal of one document.
struct ModalNode {
    markup: String,
    visible: bool,
    content_source: String,
}

#[derive(Default)]
struct DocumentState {
    modal: Option<ModalNode>,
    /// Installed stylesheets as (id, css).
    stylesheets: Vec<(String, String)>,
    mount_count: usize,
    /// Inline `overflow` of the body.
    body_overflow: Option<String>,
    /// Body `overflow` saved by the scroll lock.
    saved_overflow: Option<Option<String>>,
}

struct WindowState {
    origin: String,
    parent: Option<WindowId>,
    document: DocumentState,
}

struct BrowserState {
    windows: FxHashMap<WindowId, WindowState>,
    next_window: u32,
    listeners: FxHashMap<ListenerId, Registration>,
    next_listener: ListenerId,
    tasks: VecDeque<Task>,
}

// ============================================================================
// ModalSnapshot
// ============================================================================

/// Observable state of a mounted modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalSnapshot {
    /// Whether the container carries the visible class.
    pub visible: bool,
    /// Current content-frame source, empty when cleared.
    pub content_source: String,
    /// Markup that was inserted.
    pub markup: String,
}

// ============================================================================
// MemoryBrowser
// ============================================================================

/// Shared handle to an in-memory browser.
#[derive(Clone)]
pub struct MemoryBrowser {
    inner: Rc<RefCell<BrowserState>>,
}

impl fmt::Debug for MemoryBrowser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("MemoryBrowser")
            .field("windows", &state.windows.len())
            .field("listeners", &state.listeners.len())
            .field("pending_tasks", &state.tasks.len())
            .finish()
    }
}

impl MemoryBrowser {
    /// Creates a browser with one top-level window at `top_origin`.
    #[must_use]
    pub fn new(top_origin: impl Into<String>) -> Self {
        let mut windows = FxHashMap::default();
        windows.insert(
            WindowId::top(),
            WindowState {
                origin: top_origin.into(),
                parent: None,
                document: DocumentState::default(),
            },
        );

        Self {
            inner: Rc::new(RefCell::new(BrowserState {
                windows,
                next_window: 1,
                listeners: FxHashMap::default(),
                next_listener: ListenerId::new(1),
                tasks: VecDeque::new(),
            })),
        }
    }

    /// Returns the top-level window.
    #[must_use]
    pub fn top(&self) -> MemoryWindow {
        MemoryWindow {
            id: WindowId::top(),
            browser: self.clone(),
        }
    }

    /// Returns a handle to an existing window.
    #[must_use]
    pub fn window(&self, id: WindowId) -> Option<MemoryWindow> {
        self.inner
            .borrow()
            .windows
            .contains_key(&id)
            .then(|| MemoryWindow {
                id,
                browser: self.clone(),
            })
    }

    /// Returns the number of queued cross-frame deliveries.
    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.inner.borrow().tasks.len()
    }

    /// Delivers queued messages in FIFO order until the queue is empty.
    ///
    /// Messages posted by listeners during the run are delivered too.
    /// Returns the number of deliveries.
    pub fn run_until_idle(&self) -> usize {
        let mut delivered = 0;
        loop {
            let task = self.inner.borrow_mut().tasks.pop_front();
            let Some(task) = task else {
                break;
            };
            self.dispatch(task.window, &[EventTarget::Window], &task.event);
            delivered += 1;
        }
        trace!(delivered, "Task queue idle");
        delivered
    }

    fn create_window(&self, origin: String, parent: WindowId) -> MemoryWindow {
        let id = {
            let mut state = self.inner.borrow_mut();
            let id = WindowId::new(state.next_window);
            state.next_window += 1;
            state.windows.insert(
                id,
                WindowState {
                    origin,
                    parent: Some(parent),
                    document: DocumentState::default(),
                },
            );
            id
        };
        debug!(window = %id, parent = %parent, "Child frame created");

        MemoryWindow {
            id,
            browser: self.clone(),
        }
    }

    fn enqueue(&self, window: WindowId, event: DomEvent) {
        self.inner
            .borrow_mut()
            .tasks
            .push_back(Task { window, event });
    }

    /// Runs the listeners of `window` along `path`, innermost target first.
    ///
    /// Handlers are collected before any of them runs; one removed by an
    /// earlier handler is skipped.
    fn dispatch(&self, window: WindowId, path: &[EventTarget], event: &DomEvent) -> usize {
        let kind = event.kind();
        let handlers: Vec<(ListenerId, Handler)> = {
            let state = self.inner.borrow();
            let mut collected = Vec::new();
            for target in path {
                let mut matched: Vec<(ListenerId, Handler)> = state
                    .listeners
                    .iter()
                    .filter(|(_, reg)| {
                        reg.window == window && reg.target == *target && reg.kind == kind
                    })
                    .map(|(id, reg)| (*id, Rc::clone(&reg.handler)))
                    .collect();
                matched.sort_by_key(|(id, _)| *id);
                collected.extend(matched);
            }
            collected
        };

        let mut invoked = 0;
        for (id, handler) in handlers {
            let live = self.inner.borrow().listeners.contains_key(&id);
            if live {
                handler(event);
                invoked += 1;
            }
        }
        trace!(window = %window, event = kind.dom_type(), invoked, "Event dispatched");
        invoked
    }
}

// ============================================================================
// MemoryWindow
// ============================================================================

/// One browsing context of a [`MemoryBrowser`].
#[derive(Clone)]
pub struct MemoryWindow {
    id: WindowId,
    browser: MemoryBrowser,
}

impl fmt::Debug for MemoryWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryWindow")
            .field("id", &self.id)
            .field("origin", &self.origin())
            .finish_non_exhaustive()
    }
}

impl MemoryWindow {
    /// Returns the owning browser.
    #[inline]
    #[must_use]
    pub fn browser(&self) -> &MemoryBrowser {
        &self.browser
    }

    /// Returns this window's origin.
    #[must_use]
    pub fn origin(&self) -> String {
        self.browser
            .inner
            .borrow()
            .windows
            .get(&self.id)
            .map(|w| w.origin.clone())
            .unwrap_or_default()
    }

    /// Creates an iframe inside this window's document.
    #[must_use]
    pub fn create_child_frame(&self, origin: impl Into<String>) -> MemoryWindow {
        self.browser.create_window(origin.into(), self.id)
    }

    /// Queues a message to this window as if posted from `origin`.
    ///
    /// Used to inject third-party traffic.
    pub fn deliver_message(&self, origin: impl Into<String>, data: Value) {
        self.browser.enqueue(
            self.id,
            DomEvent::Message(MessageEvent {
                origin: origin.into(),
                data,
            }),
        );
    }

    /// Clicks an element of the modal, or the page outside it with `None`.
    ///
    /// Hidden modal elements cannot be hit. Returns the number of listeners
    /// invoked.
    pub fn click(&self, target: Option<ElementRole>) -> usize {
        if target.is_some() && !self.snapshot().is_some_and(|m| m.visible) {
            return 0;
        }

        let mut path = Vec::new();
        let mut current = target;
        while let Some(role) = current {
            path.push(EventTarget::Element(role));
            current = role.parent();
        }
        path.push(EventTarget::Document);
        path.push(EventTarget::Window);

        self.browser
            .dispatch(self.id, &path, &DomEvent::Click(ClickEvent { target }))
    }

    /// Presses a key with focus in this document.
    pub fn press_key(&self, key: Key) -> usize {
        self.browser.dispatch(
            self.id,
            &[EventTarget::Document, EventTarget::Window],
            &DomEvent::KeyDown(key.into()),
        )
    }

    /// Returns the mounted modal, if any.
    #[must_use]
    pub fn snapshot(&self) -> Option<ModalSnapshot> {
        self.read_document(|doc| {
            doc.modal.as_ref().map(|m| ModalSnapshot {
                visible: m.visible,
                content_source: m.content_source.clone(),
                markup: m.markup.clone(),
            })
        })
        .flatten()
    }

    /// Returns how many times a modal was mounted in this document.
    #[must_use]
    pub fn mount_count(&self) -> usize {
        self.read_document(|doc| doc.mount_count).unwrap_or_default()
    }

    /// Returns the CSS of an installed stylesheet.
    #[must_use]
    pub fn stylesheet(&self, id: &str) -> Option<String> {
        self.read_document(|doc| {
            doc.stylesheets
                .iter()
                .find(|(sheet_id, _)| sheet_id == id)
                .map(|(_, css)| css.clone())
        })
        .flatten()
    }

    /// Returns the body's inline `overflow`, if set.
    #[must_use]
    pub fn body_overflow(&self) -> Option<String> {
        self.read_document(|doc| doc.body_overflow.clone())
            .flatten()
    }

    /// Returns `true` while background scrolling is suppressed.
    #[must_use]
    pub fn is_scroll_locked(&self) -> bool {
        self.body_overflow().as_deref() == Some("hidden")
    }

    /// Sets the body's inline `overflow`, as page code would.
    pub fn set_body_overflow(&self, value: Option<&str>) {
        let _ = self.write_document(|doc| doc.body_overflow = value.map(str::to_string));
    }

    /// Returns the number of listeners registered in this window.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.browser
            .inner
            .borrow()
            .listeners
            .values()
            .filter(|reg| reg.window == self.id)
            .count()
    }

    /// Returns the number of listeners for one event kind in this window.
    #[must_use]
    pub fn listener_count_of(&self, kind: &EventKind) -> usize {
        self.browser
            .inner
            .borrow()
            .listeners
            .values()
            .filter(|reg| reg.window == self.id && reg.kind == *kind)
            .count()
    }

    fn read_document<R>(&self, f: impl FnOnce(&DocumentState) -> R) -> Option<R> {
        let state = self.browser.inner.borrow();
        state.windows.get(&self.id).map(|w| f(&w.document))
    }

    fn write_document<R>(&self, f: impl FnOnce(&mut DocumentState) -> R) -> Result<R> {
        let mut state = self.browser.inner.borrow_mut();
        let window = state
            .windows
            .get_mut(&self.id)
            .ok_or_else(|| Error::environment(format!("window {} is gone", self.id)))?;
        Ok(f(&mut window.document))
    }
}

// ============================================================================
// MemoryWindow - Page
// ============================================================================

impl Page for MemoryWindow {
    fn window_id(&self) -> WindowId {
        self.id
    }

    fn has_distinct_parent(&self) -> bool {
        self.browser
            .inner
            .borrow()
            .windows
            .get(&self.id)
            .and_then(|w| w.parent)
            .is_some_and(|parent| parent != self.id)
    }

    fn post_to_parent(&self, data: &Value, target_origin: &str) -> Result<()> {
        let (parent, parent_origin, origin) = {
            let state = self.browser.inner.borrow();
            let window = state
                .windows
                .get(&self.id)
                .ok_or_else(|| Error::environment(format!("window {} is gone", self.id)))?;
            let parent = window.parent.ok_or(Error::NoParentWindow)?;
            let parent_origin = state
                .windows
                .get(&parent)
                .map(|w| w.origin.clone())
                .ok_or(Error::NoParentWindow)?;
            (parent, parent_origin, window.origin.clone())
        };

        if target_origin != "*" && target_origin != parent_origin {
            // Browsers drop these without telling the sender.
            debug!(
                window = %self.id,
                target_origin,
                parent_origin = %parent_origin,
                "Target origin mismatch, message dropped"
            );
            return Ok(());
        }

        self.browser.enqueue(
            parent,
            DomEvent::Message(MessageEvent {
                origin,
                data: data.clone(),
            }),
        );
        Ok(())
    }

    fn dispatch_custom_event(&self, event: CustomEvent) -> Result<()> {
        let path: &[EventTarget] = if event.bubbles {
            &[EventTarget::Document, EventTarget::Window]
        } else {
            &[EventTarget::Document]
        };
        self.browser
            .dispatch(self.id, path, &DomEvent::Custom(event));
        Ok(())
    }

    fn add_listener(
        &self,
        target: EventTarget,
        kind: EventKind,
        handler: Handler,
    ) -> Result<ListenerId> {
        let mut state = self.browser.inner.borrow_mut();
        let id = state.next_listener;
        state.next_listener = id.next();
        trace!(window = %self.id, listener = %id, event = kind.dom_type(), ?target, "Listener added");
        state.listeners.insert(
            id,
            Registration {
                window: self.id,
                target,
                kind,
                handler,
            },
        );
        Ok(id)
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        let removed = self.browser.inner.borrow_mut().listeners.remove(&id);
        trace!(window = %self.id, listener = %id, removed = removed.is_some(), "Listener removed");
        removed.is_some()
    }
}

// ============================================================================
// MemoryWindow - ModalSurface
// ============================================================================

impl ModalSurface for MemoryWindow {
    fn mount_modal(&self, template: &ModalTemplate) -> Result<()> {
        let markup = template.markup();
        let stylesheet = template.stylesheet();

        self.write_document(|doc| {
            if doc.modal.is_some() {
                return Err(Error::environment("modal already mounted"));
            }
            doc.modal = Some(ModalNode {
                markup,
                visible: false,
                content_source: String::new(),
            });
            if !doc.stylesheets.iter().any(|(id, _)| id == STYLESHEET_ID) {
                doc.stylesheets.push((STYLESHEET_ID.to_string(), stylesheet));
            }
            doc.mount_count += 1;
            Ok(())
        })?
    }

    fn has_modal(&self) -> bool {
        self.read_document(|doc| doc.modal.is_some())
            .unwrap_or(false)
    }

    fn set_content_source(&self, url: &str) -> Result<()> {
        self.write_document(|doc| {
            let modal = doc.modal.as_mut().ok_or(Error::ModalNotMounted)?;
            modal.content_source = url.to_string();
            Ok(())
        })?
    }

    fn set_modal_visible(&self, visible: bool) -> Result<()> {
        self.write_document(|doc| {
            let modal = doc.modal.as_mut().ok_or(Error::ModalNotMounted)?;
            modal.visible = visible;
            Ok(())
        })?
    }

    fn set_background_scroll_locked(&self, locked: bool) -> Result<()> {
        self.write_document(|doc| {
            if locked {
                if doc.saved_overflow.is_none() {
                    doc.saved_overflow = Some(doc.body_overflow.take());
                }
                doc.body_overflow = Some("hidden".to_string());
            } else if let Some(previous) = doc.saved_overflow.take() {
                doc.body_overflow = previous;
            }
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
