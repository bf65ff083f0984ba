//! Default modal presentation.
//!
//! Produces the markup and stylesheet a [`ModalSurface`](crate::dom::ModalSurface)
//! inserts. The lifecycle code never reads either; it only relies on the
//! element ids below.

// ============================================================================
// Submodules
// ============================================================================

/// Styling configuration.
pub mod styles;

// ============================================================================
// Imports
// ============================================================================

use std::fmt::Write;

pub use styles::ModalStyles;

// ============================================================================
// Constants
// ============================================================================

/// Id of the full-page overlay, which is also the modal container.
pub const OVERLAY_ID: &str = "advisorModalOverlay";

/// Id of the close control.
pub const CLOSE_BUTTON_ID: &str = "advisorModalClose";

/// Id of the content frame.
pub const CONTENT_FRAME_ID: &str = "advisorModalIframe";

/// Id of the `<style>` element, installed once per document.
pub const STYLESHEET_ID: &str = "advisor-modal-styles";

/// Class toggled on the overlay to show it.
pub const VISIBLE_CLASS: &str = "show";

/// Default dialog title.
pub const DEFAULT_TITLE: &str = "Schedule a Call";

// ============================================================================
// ModalTemplate
// ============================================================================

/// Title and styles of the modal to mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalTemplate {
    /// Dialog title, rendered as text.
    pub title: String,
    /// Styling configuration.
    pub styles: ModalStyles,
}

impl Default for ModalTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE, ModalStyles::default())
    }
}

impl ModalTemplate {
    /// Creates a template.
    #[must_use]
    pub fn new(title: impl Into<String>, styles: ModalStyles) -> Self {
        Self {
            title: title.into(),
            styles,
        }
    }

    /// Returns the modal markup, hidden and with an empty content frame.
    #[must_use]
    pub fn markup(&self) -> String {
        format!(
            r#"<div class="advisor-modal-overlay" id="{OVERLAY_ID}">
  <div class="advisor-modal-container">
    <div class="advisor-modal-header">
      <h3 class="advisor-modal-title">{title}</h3>
      <button class="advisor-modal-close" id="{CLOSE_BUTTON_ID}">&times;</button>
    </div>
    <div class="advisor-modal-content">
      <iframe id="{CONTENT_FRAME_ID}" class="advisor-modal-iframe" title="Advisor Scheduling" allow="camera; microphone; geolocation"></iframe>
    </div>
  </div>
</div>"#,
            title = escape_html(&self.title),
        )
    }

    /// Returns the stylesheet body (without the `<style>` wrapper).
    #[must_use]
    pub fn stylesheet(&self) -> String {
        let s = &self.styles;
        let mut css = String::new();

        let _ = writeln!(
            css,
            ".advisor-modal-overlay {{ position: fixed; top: 0; left: 0; width: 100vw; height: 100vh; \
             background: {}; backdrop-filter: {}; display: none; z-index: {}; }}",
            s.overlay.background, s.overlay.backdrop_filter, s.overlay.z_index
        );
        let _ = writeln!(
            css,
            ".advisor-modal-overlay.{VISIBLE_CLASS} {{ display: block; }}"
        );
        let _ = writeln!(
            css,
            ".advisor-modal-container {{ position: absolute; width: {}; height: {}; top: 50%; left: 50%; \
             transform: translate(-50%, -50%); background: {}; border-radius: {}; overflow: hidden; \
             box-shadow: {}; }}",
            s.container.width,
            s.container.height,
            s.container.background,
            s.container.border_radius,
            s.container.box_shadow
        );
        let _ = writeln!(
            css,
            ".advisor-modal-header {{ display: flex; justify-content: space-between; align-items: center; \
             padding: {}; border-bottom: {}; }}",
            s.header.padding, s.header.border_bottom
        );
        let _ = writeln!(
            css,
            ".advisor-modal-title {{ font-size: {}; font-weight: {}; color: {}; margin: 0; }}",
            s.title.font_size, s.title.font_weight, s.title.color
        );
        let _ = writeln!(
            css,
            ".advisor-modal-close {{ background: none; border: none; font-size: {}; cursor: pointer; \
             color: {}; padding: 4px; border-radius: 4px; transition: background-color 0.2s ease; }}",
            s.close_button.font_size, s.close_button.color
        );
        let _ = writeln!(
            css,
            ".advisor-modal-close:hover {{ background: {}; }}",
            s.close_button.hover_background
        );
        let _ = writeln!(
            css,
            ".advisor-modal-content {{ height: calc(100% - 80px); padding: {}; }}",
            s.content.padding
        );
        let _ = writeln!(
            css,
            ".advisor-modal-iframe {{ width: 100%; height: 100%; border: none; border-radius: {}; }}",
            s.iframe.border_radius
        );
        let _ = writeln!(
            css,
            "@media (max-width: {}) {{ .advisor-modal-container {{ width: {}; height: {}; }} }}",
            s.mobile.max_width, s.mobile.container_width, s.mobile.container_height
        );

        // A value carrying `</style>` must not end the element it is mounted in.
        css.replace('<', "\\3c ")
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Escapes text for use inside element content.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
