//! Modal lifecycle state machine.
//!
//! ```text
//!             open(url)                   open(url')
//!   Closed ─────────────▶ Open ◀──────────────┐
//!     ▲                    │  └────────────────┘  re-point only
//!     └────────────────────┘
//!   close(): outside click, close button, Escape, or programmatic
//! ```
//!
//! Interaction listeners are attached once per `Closed → Open` and detached
//! on every `Open → Closed`, so at most one set exists at a time.

// ============================================================================
// Imports
// ============================================================================

use crate::dom::{ModalSurface, Page};
use crate::error::Result;
use crate::identifiers::ListenerId;

// ============================================================================
// ModalState
// ============================================================================

/// Visibility state of the host modal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ModalState {
    /// Hidden, content frame empty.
    #[default]
    Closed,
    /// Visible, content frame loaded, interaction listeners attached.
    Open,
}

// ============================================================================
// InteractionListeners
// ============================================================================

/// Per-open listeners that close the modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct InteractionListeners {
    pub outside_click: ListenerId,
    pub close_button: ListenerId,
    pub escape_key: ListenerId,
}

impl InteractionListeners {
    fn ids(self) -> [ListenerId; 3] {
        [self.outside_click, self.close_button, self.escape_key]
    }
}

// ============================================================================
// Transition
// ============================================================================

/// What an open or close call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transition {
    /// `Closed → Open`.
    Opened,
    /// Already open; the content frame was re-pointed.
    Repointed,
    /// `Open → Closed`.
    Closed,
    /// Close while closed.
    Unchanged,
}

// ============================================================================
// Modal
// ============================================================================

/// Lifecycle bookkeeping of the mounted modal.
#[derive(Debug, Default)]
pub(crate) struct Modal {
    state: ModalState,
    interactions: Option<InteractionListeners>,
}

impl Modal {
    #[inline]
    pub fn state(&self) -> ModalState {
        self.state
    }

    #[inline]
    pub fn has_interactions(&self) -> bool {
        self.interactions.is_some()
    }

    /// Loads `url` and shows the modal.
    ///
    /// `attach` runs only when no interaction listeners are attached. A
    /// visible modal always has them: if `attach` fails the modal is hidden
    /// again, while a failed scroll lock is reported after attaching.
    pub fn open<S, F>(&mut self, surface: &S, url: &str, attach: F) -> Result<Transition>
    where
        S: ModalSurface,
        F: FnOnce() -> Result<InteractionListeners>,
    {
        let was_open = self.state == ModalState::Open;

        surface.set_content_source(url)?;
        if let Err(e) = surface.set_modal_visible(true) {
            if !was_open {
                let _ = surface.set_content_source("");
            }
            return Err(e);
        }
        let locked = surface.set_background_scroll_locked(true);
        if self.interactions.is_none() {
            match attach() {
                Ok(listeners) => self.interactions = Some(listeners),
                Err(e) => {
                    let _ = surface.set_modal_visible(false);
                    let _ = surface.set_background_scroll_locked(false);
                    let _ = surface.set_content_source("");
                    self.state = ModalState::Closed;
                    return Err(e);
                }
            }
        }
        self.state = ModalState::Open;
        locked?;

        Ok(if was_open {
            Transition::Repointed
        } else {
            Transition::Opened
        })
    }

    /// Hides the modal, clears the content frame and detaches listeners.
    ///
    /// Listeners are detached and the state becomes `Closed` even if a
    /// surface step fails; the first failure is returned afterwards.
    pub fn close<P>(&mut self, page: &P) -> Result<Transition>
    where
        P: Page + ModalSurface,
    {
        if self.state == ModalState::Closed {
            return Ok(Transition::Unchanged);
        }

        let hidden = page.set_modal_visible(false);
        let unlocked = page.set_background_scroll_locked(false);
        let cleared = page.set_content_source("");
        self.detach_interactions(page);
        self.state = ModalState::Closed;

        hidden.and(unlocked).and(cleared)?;
        Ok(Transition::Closed)
    }

    /// Removes the interaction listeners, if attached.
    fn detach_interactions<P: Page>(&mut self, page: &P) {
        if let Some(listeners) = self.interactions.take() {
            for id in listeners.ids() {
                page.remove_listener(id);
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::Cell;
    use std::rc::Rc;

    use crate::dom::{DomEvent, EventKind, EventTarget, MemoryBrowser, MemoryWindow};
    use crate::error::Error;
    use crate::render::ModalTemplate;

    fn mounted() -> MemoryWindow {
        let top = MemoryBrowser::new("https://host.test").top();
        top.mount_modal(&ModalTemplate::default()).unwrap();
        top
    }

    fn attach(page: &MemoryWindow, calls: &Rc<Cell<usize>>) -> Result<InteractionListeners> {
        calls.set(calls.get() + 1);
        let noop = || Rc::new(|_: &DomEvent| {});
        Ok(InteractionListeners {
            outside_click: page.add_listener(EventTarget::Document, EventKind::Click, noop())?,
            close_button: page.add_listener(EventTarget::Document, EventKind::Click, noop())?,
            escape_key: page.add_listener(EventTarget::Document, EventKind::KeyDown, noop())?,
        })
    }

    #[test]
    fn test_open_then_close() {
        let page = mounted();
        let calls = Rc::new(Cell::new(0));
        let mut modal = Modal::default();

        let opened = modal.open(&page, "https://x.test/a", || attach(&page, &calls));
        assert_eq!(opened.unwrap(), Transition::Opened);
        assert_eq!(modal.state(), ModalState::Open);
        assert!(page.is_scroll_locked());
        assert_eq!(page.listener_count(), 3);

        assert_eq!(modal.close(&page).unwrap(), Transition::Closed);
        let snapshot = page.snapshot().unwrap();
        assert!(!snapshot.visible);
        assert_eq!(snapshot.content_source, "");
        assert!(!page.is_scroll_locked());
        assert_eq!(page.listener_count(), 0);
        assert!(!modal.has_interactions());
    }

    #[test]
    fn test_reopen_attaches_once() {
        let page = mounted();
        let calls = Rc::new(Cell::new(0));
        let mut modal = Modal::default();

        modal.open(&page, "https://x.test/a", || attach(&page, &calls)).unwrap();
        let again = modal.open(&page, "https://x.test/b", || attach(&page, &calls));

        assert_eq!(again.unwrap(), Transition::Repointed);
        assert_eq!(calls.get(), 1);
        assert_eq!(page.listener_count(), 3);
        assert_eq!(page.snapshot().unwrap().content_source, "https://x.test/b");
    }

    /// Delegates to a memory window, failing the configured step.
    struct Faulty {
        page: MemoryWindow,
        fail_scroll_lock: bool,
    }

    impl ModalSurface for Faulty {
        fn mount_modal(&self, template: &ModalTemplate) -> Result<()> {
            self.page.mount_modal(template)
        }

        fn has_modal(&self) -> bool {
            self.page.has_modal()
        }

        fn set_content_source(&self, url: &str) -> Result<()> {
            self.page.set_content_source(url)
        }

        fn set_modal_visible(&self, visible: bool) -> Result<()> {
            self.page.set_modal_visible(visible)
        }

        fn set_background_scroll_locked(&self, locked: bool) -> Result<()> {
            if self.fail_scroll_lock {
                return Err(Error::environment("document has no body"));
            }
            self.page.set_background_scroll_locked(locked)
        }
    }

    #[test]
    fn test_failed_scroll_lock_still_attaches() {
        let surface = Faulty {
            page: mounted(),
            fail_scroll_lock: true,
        };
        let calls = Rc::new(Cell::new(0));
        let mut modal = Modal::default();

        let opened = modal.open(&surface, "https://x.test/a", || attach(&surface.page, &calls));
        assert!(matches!(opened, Err(Error::Environment { .. })));
        assert_eq!(modal.state(), ModalState::Open);
        assert!(modal.has_interactions());
        assert_eq!(surface.page.listener_count(), 3);

        modal.close(&surface.page).unwrap();
        assert!(!surface.page.snapshot().unwrap().visible);
        assert_eq!(surface.page.listener_count(), 0);
    }

    #[test]
    fn test_failed_attach_hides_modal() {
        let page = mounted();
        let mut modal = Modal::default();

        let opened = modal.open(&page, "https://x.test/a", || Err(Error::ModalNotMounted));
        assert!(matches!(opened, Err(Error::ModalNotMounted)));
        assert_eq!(modal.state(), ModalState::Closed);
        assert!(!modal.has_interactions());

        let snapshot = page.snapshot().unwrap();
        assert!(!snapshot.visible);
        assert_eq!(snapshot.content_source, "");
        assert!(!page.is_scroll_locked());
    }

    #[test]
    fn test_close_while_closed_is_unchanged() {
        let page = mounted();
        let mut modal = Modal::default();
        assert_eq!(modal.close(&page).unwrap(), Transition::Unchanged);
        assert_eq!(modal.state(), ModalState::Closed);
    }
}
