//! `web-sys` backend.
//!
//! [`WebPage`] binds the SDK roles to the browsing context they run in.
//! Listener closures are owned by the page and dropped when removed.
//!
//! ```ignore
//! let page = WebPage::current()?;
//! let host = HostController::new(page);
//! host.init();
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

use js_sys::JSON;
use rustc_hash::FxHashMap;
use serde_json::Value;
use tracing::debug;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, HtmlIFrameElement, Window};

use crate::error::{Error, Result};
use crate::identifiers::{ListenerId, WindowId};
use crate::render::{
    CONTENT_FRAME_ID, ModalTemplate, OVERLAY_ID, STYLESHEET_ID, VISIBLE_CLASS,
};

use super::event::{
    ClickEvent, CustomEvent, DomEvent, ElementRole, EventKind, EventTarget, Handler,
    KeyboardEvent, MessageEvent,
};
use super::{ModalSurface, Page};

// ============================================================================
// Constants
// ============================================================================

/// Selector of the container, which carries no id.
const CONTAINER_SELECTOR: &str = ".advisor-modal-container";

/// Frame ids handed out by this module instance; `0` is the top window.
static NEXT_FRAME_ID: AtomicU32 = AtomicU32::new(1);

fn next_frame_id() -> WindowId {
    WindowId::new(NEXT_FRAME_ID.fetch_add(1, Ordering::Relaxed))
}

// ============================================================================
// WebPage
// ============================================================================

struct WebListener {
    target: web_sys::EventTarget,
    dom_type: String,
    closure: Closure<dyn Fn(web_sys::Event)>,
}

struct WebState {
    id: WindowId,
    window: Window,
    document: Document,
    listeners: RefCell<FxHashMap<ListenerId, WebListener>>,
    next_listener: Cell<ListenerId>,
    saved_overflow: RefCell<Option<String>>,
}

/// Handle to the current browsing context.
#[derive(Clone)]
pub struct WebPage {
    inner: Rc<WebState>,
}

impl fmt::Debug for WebPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebPage")
            .field("window", &self.window_id())
            .field("listeners", &self.inner.listeners.borrow().len())
            .finish_non_exhaustive()
    }
}

impl WebPage {
    /// Binds to the global `window`.
    ///
    /// A framed page gets a fresh frame id per call. Ids are unique within
    /// one module instance only, so two frames each running the SDK may
    /// both log as `frame-1`.
    ///
    /// # Errors
    ///
    /// - [`Error::Environment`] outside a browser context
    pub fn current() -> Result<Self> {
        let window = web_sys::window().ok_or_else(|| Error::environment("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| Error::environment("window has no document"))?;

        let id = if distinct_parent(&window).is_some() {
            next_frame_id()
        } else {
            WindowId::top()
        };

        Ok(Self {
            inner: Rc::new(WebState {
                id,
                window,
                document,
                listeners: RefCell::new(FxHashMap::default()),
                next_listener: Cell::new(ListenerId::new(1)),
                saved_overflow: RefCell::new(None),
            }),
        })
    }

    fn parent(&self) -> Option<Window> {
        distinct_parent(&self.inner.window)
    }

    fn body(&self) -> Result<HtmlElement> {
        self.inner
            .document
            .body()
            .ok_or_else(|| Error::environment("document has no body"))
    }

    fn element(&self, id: &str) -> Option<Element> {
        self.inner.document.get_element_by_id(id)
    }

    fn overlay(&self) -> Result<Element> {
        self.element(OVERLAY_ID).ok_or(Error::ModalNotMounted)
    }

    fn resolve(&self, target: EventTarget) -> Result<web_sys::EventTarget> {
        match target {
            EventTarget::Window => Ok(self.inner.window.clone().into()),
            EventTarget::Document => Ok(self.inner.document.clone().into()),
            EventTarget::Element(role) => {
                let element = match role.element_id() {
                    Some(id) => self.element(id),
                    None => self
                        .inner
                        .document
                        .query_selector(CONTAINER_SELECTOR)
                        .map_err(|e| js_error("querySelector", &e))?,
                };
                element
                    .map(Into::into)
                    .ok_or(Error::ModalNotMounted)
            }
        }
    }
}

// ============================================================================
// Conversion
// ============================================================================

fn distinct_parent(window: &Window) -> Option<Window> {
    let parent = window.parent().ok().flatten()?;
    let this: &JsValue = window.as_ref();
    let other: &JsValue = parent.as_ref();
    (other != this).then_some(parent)
}

fn js_error(context: &str, err: &JsValue) -> Error {
    Error::environment(format!("{context} failed: {err:?}"))
}

fn to_js(value: &Value) -> Result<JsValue> {
    JSON::parse(&serde_json::to_string(value)?).map_err(|e| js_error("JSON.parse", &e))
}

/// Non-serializable values (functions, `undefined`) read as `null`.
fn from_js(value: &JsValue) -> Value {
    JSON::stringify(value)
        .ok()
        .and_then(|s| s.as_string())
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or(Value::Null)
}

fn convert(kind: &EventKind, event: &web_sys::Event) -> Option<DomEvent> {
    match kind {
        EventKind::Message => {
            let message = event.dyn_ref::<web_sys::MessageEvent>()?;
            Some(DomEvent::Message(MessageEvent {
                origin: message.origin(),
                data: from_js(&message.data()),
            }))
        }
        EventKind::Custom(event_type) => {
            let custom = event.dyn_ref::<web_sys::CustomEvent>()?;
            Some(DomEvent::Custom(CustomEvent {
                event_type: event_type.clone(),
                detail: from_js(&custom.detail()),
                bubbles: custom.bubbles(),
                cancelable: custom.cancelable(),
            }))
        }
        EventKind::Click => {
            let target = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|element| {
                    ElementRole::from_element_id(&element.id()).or_else(|| {
                        element
                            .class_list()
                            .contains("advisor-modal-container")
                            .then_some(ElementRole::Container)
                    })
                });
            Some(DomEvent::Click(ClickEvent { target }))
        }
        EventKind::KeyDown => {
            let key = event.dyn_ref::<web_sys::KeyboardEvent>()?;
            Some(DomEvent::KeyDown(KeyboardEvent {
                key: key.key(),
                code: key.code(),
            }))
        }
    }
}

// ============================================================================
// Page Implementation
// ============================================================================

impl Page for WebPage {
    fn window_id(&self) -> WindowId {
        self.inner.id
    }

    fn has_distinct_parent(&self) -> bool {
        self.parent().is_some()
    }

    fn post_to_parent(&self, data: &Value, target_origin: &str) -> Result<()> {
        let parent = self.parent().ok_or(Error::NoParentWindow)?;
        parent
            .post_message(&to_js(data)?, target_origin)
            .map_err(|e| js_error("postMessage", &e))
    }

    fn dispatch_custom_event(&self, event: CustomEvent) -> Result<()> {
        let init = web_sys::CustomEventInit::new();
        init.set_bubbles(event.bubbles);
        init.set_cancelable(event.cancelable);
        init.set_detail(&to_js(&event.detail)?);

        let dom_event =
            web_sys::CustomEvent::new_with_event_init_dict(&event.event_type, &init)
                .map_err(|e| js_error("new CustomEvent", &e))?;
        self.inner
            .document
            .dispatch_event(&dom_event)
            .map_err(|e| js_error("dispatchEvent", &e))?;
        Ok(())
    }

    fn add_listener(
        &self,
        target: EventTarget,
        kind: EventKind,
        handler: Handler,
    ) -> Result<ListenerId> {
        let js_target = self.resolve(target)?;
        let dom_type = kind.dom_type().to_string();

        let closure = Closure::<dyn Fn(web_sys::Event)>::new(move |event: web_sys::Event| {
            if let Some(event) = convert(&kind, &event) {
                handler(&event);
            }
        });
        js_target
            .add_event_listener_with_callback(&dom_type, closure.as_ref().unchecked_ref())
            .map_err(|e| js_error("addEventListener", &e))?;

        let id = self.inner.next_listener.get();
        self.inner.next_listener.set(id.next());
        self.inner.listeners.borrow_mut().insert(
            id,
            WebListener {
                target: js_target,
                dom_type,
                closure,
            },
        );
        debug!(listener = %id, ?target, "Listener added");
        Ok(id)
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        let Some(listener) = self.inner.listeners.borrow_mut().remove(&id) else {
            return false;
        };
        let _ = listener.target.remove_event_listener_with_callback(
            &listener.dom_type,
            listener.closure.as_ref().unchecked_ref(),
        );
        drop(listener);
        debug!(listener = %id, "Listener removed");
        true
    }
}

// ============================================================================
// ModalSurface Implementation
// ============================================================================

impl ModalSurface for WebPage {
    fn mount_modal(&self, template: &ModalTemplate) -> Result<()> {
        if self.has_modal() {
            return Err(Error::environment("modal already mounted"));
        }

        if self.element(STYLESHEET_ID).is_none() {
            let head = self
                .inner
                .document
                .head()
                .ok_or_else(|| Error::environment("document has no head"))?;
            let style = format!(
                "<style id=\"{STYLESHEET_ID}\">{}</style>",
                template.stylesheet()
            );
            head.insert_adjacent_html("beforeend", &style)
                .map_err(|e| js_error("insertAdjacentHTML", &e))?;
        }

        self.body()?
            .insert_adjacent_html("beforeend", &template.markup())
            .map_err(|e| js_error("insertAdjacentHTML", &e))
    }

    fn has_modal(&self) -> bool {
        self.element(OVERLAY_ID).is_some() && self.element(CONTENT_FRAME_ID).is_some()
    }

    fn set_content_source(&self, url: &str) -> Result<()> {
        let frame = self
            .element(CONTENT_FRAME_ID)
            .ok_or(Error::ModalNotMounted)?
            .dyn_into::<HtmlIFrameElement>()
            .map_err(|_| Error::environment("content frame is not an iframe"))?;
        frame.set_src(url);
        Ok(())
    }

    fn set_modal_visible(&self, visible: bool) -> Result<()> {
        let classes = self.overlay()?.class_list();
        let result = if visible {
            classes.add_1(VISIBLE_CLASS)
        } else {
            classes.remove_1(VISIBLE_CLASS)
        };
        result.map_err(|e| js_error("classList", &e))
    }

    fn set_background_scroll_locked(&self, locked: bool) -> Result<()> {
        let style = self.body()?.style();
        let mut saved = self.inner.saved_overflow.borrow_mut();

        if locked {
            if saved.is_none() {
                *saved = Some(style.get_property_value("overflow").unwrap_or_default());
            }
            style
                .set_property("overflow", "hidden")
                .map_err(|e| js_error("style.overflow", &e))
        } else if let Some(previous) = saved.take() {
            if previous.is_empty() {
                style
                    .remove_property("overflow")
                    .map(drop)
                    .map_err(|e| js_error("style.overflow", &e))
            } else {
                style
                    .set_property("overflow", &previous)
                    .map_err(|e| js_error("style.overflow", &e))
            }
        } else {
            Ok(())
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_ids_are_distinct() {
        let first = next_frame_id();
        let second = next_frame_id();
        assert_ne!(first, second);
        assert!(!first.is_top());
        assert!(!second.is_top());
    }
}
