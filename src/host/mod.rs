//! Top-level page role.
//!
//! The [`HostController`] owns the modal that displays scheduling pages.
//! It mounts the modal once, listens for signals from embedded frames, and
//! drives the `Closed ⇄ Open` lifecycle.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`modal`] | Lifecycle state machine |
//! | [`options`] | [`HostOptions`] builder and JSON config |
//! | [`policy`] | Origin and URL acceptance policies |
//! | [`subscription`] | Inbound listeners, [`subscribe`] |
//!
//! # Example
//!
//! ```
//! use advisor_sdk::{Emitter, HostController};
//! use advisor_sdk::dom::{Key, MemoryBrowser};
//!
//! let browser = MemoryBrowser::new("https://host.test");
//! let top = browser.top();
//!
//! let host = HostController::new(top.clone());
//! host.init();
//!
//! let emitter = Emitter::new(top.create_child_frame("https://ads.test"));
//! emitter.init();
//! emitter.open_url("https://calendly.test/abc");
//! browser.run_until_idle();
//! assert!(host.is_open());
//!
//! top.press_key(Key::Escape);
//! assert!(!host.is_open());
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Modal lifecycle.
pub mod modal;

/// Host configuration.
pub mod options;

/// Acceptance policies.
pub mod policy;

/// Inbound listeners.
pub mod subscription;

// ============================================================================
// Imports
// ============================================================================

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::dom::{
    DomEvent, ElementRole, EventKind, EventTarget, Handler, Key, ModalSurface, Page,
};
use crate::error::{Error, Result};
use crate::identifiers::ListenerId;
use crate::logging::LogGate;

use modal::{InteractionListeners, Modal};

pub use modal::ModalState;
pub use options::HostOptions;
pub use policy::{OriginPattern, OriginPolicy, UrlPolicy};
pub use subscription::{Subscription, subscribe};

// ============================================================================
// Constants
// ============================================================================

/// Log prefix of the host role.
pub const HOST_COMPONENT: &str = "AdvisorAdHostSDK";

// ============================================================================
// HostController
// ============================================================================

/// Receives signals and presents them in a modal.
///
/// Operations never fail toward the caller; problems are logged through
/// the controller's [`LogGate`]. Listener handlers hold only a weak
/// reference, so dropping the controller tears everything down.
pub struct HostController<P>
where
    P: Page + ModalSurface + Clone + 'static,
{
    inner: Rc<ControllerInner<P>>,
}

struct ControllerInner<P>
where
    P: Page + ModalSurface + Clone + 'static,
{
    page: P,
    options: HostOptions,
    log: LogGate,
    state: RefCell<ControllerState<P>>,
}

struct ControllerState<P: Page> {
    initialized: bool,
    modal: Modal,
    inbound: Option<Subscription<P>>,
}

impl<P> fmt::Debug for HostController<P>
where
    P: Page + ModalSurface + Clone + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("HostController")
            .field("window", &self.inner.page.window_id())
            .field("initialized", &state.initialized)
            .field("state", &state.modal.state())
            .field("interactions", &state.modal.has_interactions())
            .field("inbound", &state.inbound)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl<P> HostController<P>
where
    P: Page + ModalSurface + Clone + 'static,
{
    /// Creates a controller with default options.
    #[must_use]
    pub fn new(page: P) -> Self {
        Self::with_options(page, HostOptions::default())
    }

    /// Creates a controller with default options and the given logging flag.
    #[must_use]
    pub fn with_logging(page: P, enabled: bool) -> Self {
        Self::with_options(page, HostOptions::default().with_logging(enabled))
    }

    /// Creates a controller with the given options.
    #[must_use]
    pub fn with_options(page: P, options: HostOptions) -> Self {
        let log = LogGate::new(HOST_COMPONENT, options.logging_enabled);
        Self {
            inner: Rc::new(ControllerInner {
                page,
                options,
                log,
                state: RefCell::new(ControllerState {
                    initialized: false,
                    modal: Modal::default(),
                    inbound: None,
                }),
            }),
        }
    }
}

// ============================================================================
// Accessors
// ============================================================================

impl<P> HostController<P>
where
    P: Page + ModalSurface + Clone + 'static,
{
    /// Returns the logging switch; clones stay linked to this controller.
    #[inline]
    #[must_use]
    pub fn log_gate(&self) -> &LogGate {
        &self.inner.log
    }

    /// Returns the options.
    #[inline]
    #[must_use]
    pub fn options(&self) -> &HostOptions {
        &self.inner.options
    }

    /// Returns `true` once [`init`](Self::init) has run.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.inner.state.borrow().initialized
    }

    /// Returns the modal state.
    #[must_use]
    pub fn state(&self) -> ModalState {
        self.inner.state.borrow().modal.state()
    }

    /// Returns `true` while the modal is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state() == ModalState::Open
    }
}

// ============================================================================
// Operations
// ============================================================================

impl<P> HostController<P>
where
    P: Page + ModalSurface + Clone + 'static,
{
    /// Mounts the modal and starts listening for signals.
    ///
    /// Runs once; repeated calls only log.
    pub fn init(&self) {
        self.inner.init();
    }

    /// Opens the modal on `url`, or re-points it if already open.
    ///
    /// A logged no-op if the modal is not mounted.
    pub fn open_modal(&self, url: &str) {
        self.inner.open_modal(url);
    }

    /// Closes the modal. A no-op if it is closed.
    pub fn close_modal(&self) {
        self.inner.close_modal();
    }
}

// ============================================================================
// ControllerInner
// ============================================================================

impl<P> ControllerInner<P>
where
    P: Page + ModalSurface + Clone + 'static,
{
    fn init(self: &Rc<Self>) {
        {
            let mut state = self.state.borrow_mut();
            if state.initialized {
                self.log.info(format_args!("SDK already initialized"));
                return;
            }
            state.initialized = true;
        }
        self.log.info(format_args!("Advisor Ad Host SDK initialized"));

        if let Err(e) = self.mount() {
            self.absorb(&e);
        }
        if let Err(e) = self.listen() {
            self.absorb(&e);
        }
    }

    fn mount(&self) -> Result<()> {
        if self.page.has_modal() {
            return Ok(());
        }
        self.page.mount_modal(&self.options.template())?;
        self.log.info(format_args!("Modal UI created and added to page"));
        Ok(())
    }

    fn listen(self: &Rc<Self>) -> Result<()> {
        let weak = Rc::downgrade(self);
        let subscription = Subscription::new(
            &self.page,
            &self.options,
            self.log.clone(),
            move |signal| {
                if let Some(inner) = weak.upgrade() {
                    inner.open_modal(&signal.url);
                }
            },
        )?;
        self.state.borrow_mut().inbound = Some(subscription);
        self.log.info(format_args!("Listening for advisor URL events"));
        Ok(())
    }

    fn open_modal(self: &Rc<Self>, url: &str) {
        if let Err(e) = self.try_open_modal(url) {
            self.absorb(&e);
        }
    }

    fn try_open_modal(self: &Rc<Self>, url: &str) -> Result<()> {
        if !self.page.has_modal() {
            return Err(Error::ModalNotMounted);
        }
        self.log.info(format_args!("Opening modal with URL: {url}"));

        let mut state = self.state.borrow_mut();
        let transition = state
            .modal
            .open(&self.page, url, || self.attach_interactions())?;
        debug!(window = %self.page.window_id(), ?transition, "Modal opened");
        Ok(())
    }

    fn close_modal(&self) {
        if let Err(e) = self.try_close_modal() {
            self.absorb(&e);
        }
    }

    fn try_close_modal(&self) -> Result<()> {
        if !self.page.has_modal() {
            return Ok(());
        }
        let mut state = self.state.borrow_mut();
        if state.modal.state() == ModalState::Closed {
            return Ok(());
        }
        self.log.info(format_args!("Closing modal"));
        let transition = state.modal.close(&self.page)?;
        debug!(window = %self.page.window_id(), ?transition, "Modal closed");
        Ok(())
    }

    fn attach_interactions(self: &Rc<Self>) -> Result<InteractionListeners> {
        let outside_click = self.close_on(
            EventTarget::Element(ElementRole::Overlay),
            EventKind::Click,
            |event| matches!(event, DomEvent::Click(c) if c.target == Some(ElementRole::Overlay)),
        )?;
        let close_button = self.close_on(
            EventTarget::Element(ElementRole::CloseButton),
            EventKind::Click,
            |_| true,
        );
        let close_button = match close_button {
            Ok(id) => id,
            Err(e) => {
                self.page.remove_listener(outside_click);
                return Err(e);
            }
        };
        let escape_key = self.close_on(EventTarget::Document, EventKind::KeyDown, |event| {
            matches!(event, DomEvent::KeyDown(k) if k.is(Key::Escape))
        });
        let escape_key = match escape_key {
            Ok(id) => id,
            Err(e) => {
                self.page.remove_listener(outside_click);
                self.page.remove_listener(close_button);
                return Err(e);
            }
        };

        Ok(InteractionListeners {
            outside_click,
            close_button,
            escape_key,
        })
    }

    fn close_on<F>(
        self: &Rc<Self>,
        target: EventTarget,
        kind: EventKind,
        applies: F,
    ) -> Result<ListenerId>
    where
        F: Fn(&DomEvent) -> bool + 'static,
    {
        let weak: Weak<Self> = Rc::downgrade(self);
        let handler: Handler = Rc::new(move |event: &DomEvent| {
            if !applies(event) {
                return;
            }
            if let Some(inner) = weak.upgrade() {
                inner.close_modal();
            }
        });
        self.page.add_listener(target, kind, handler)
    }

    fn absorb(&self, err: &Error) {
        match err {
            Error::ModalNotMounted => self
                .log
                .info(format_args!("Modal elements not found, cannot open modal")),
            e if e.is_silent() => {}
            e if e.is_precondition() || e.is_rejected_input() => {
                self.log.debug(format_args!("{e}"));
            }
            e => self.log.warn(format_args!("{e}")),
        }
    }
}

impl<P> Drop for ControllerInner<P>
where
    P: Page + ModalSurface + Clone + 'static,
{
    fn drop(&mut self) {
        // Nothing could dismiss a modal left open past this point.
        let _ = self.state.get_mut().modal.close(&self.page);
    }
}

// ============================================================================
// Tests
// ============================================================================
