//! Keyboard keys the SDK reacts to or synthesizes.
//!
//! Only a handful of control keys matter here: the host closes its modal on
//! [`Key::Escape`], and the in-memory browser uses the others to check that
//! unrelated keystrokes are ignored.

// ============================================================================
// Key Enum
// ============================================================================

/// Control keys, identified by their DOM `KeyboardEvent.key` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Escape key
    Escape,
    /// Enter/Return key
    Enter,
    /// Tab key
    Tab,
    /// Space bar
    Space,
    /// Backspace key
    Backspace,
}

impl Key {
    /// Returns the key properties: (key, code, keyCode).
    #[must_use]
    pub fn properties(self) -> (&'static str, &'static str, u32) {
        match self {
            Key::Escape => ("Escape", "Escape", 27),
            Key::Enter => ("Enter", "Enter", 13),
            Key::Tab => ("Tab", "Tab", 9),
            Key::Space => (" ", "Space", 32),
            Key::Backspace => ("Backspace", "Backspace", 8),
        }
    }

    /// Returns the `KeyboardEvent.key` value.
    #[inline]
    #[must_use]
    pub fn key(self) -> &'static str {
        self.properties().0
    }

    /// Returns the `KeyboardEvent.code` value.
    #[inline]
    #[must_use]
    pub fn code(self) -> &'static str {
        self.properties().1
    }

    /// Returns the legacy keyCode.
    #[inline]
    #[must_use]
    pub fn key_code(self) -> u32 {
        self.properties().2
    }

    /// Looks a key up by its `KeyboardEvent.key` value.
    ///
    /// Matching is exact: `"escape"` and `"Esc"` are not [`Key::Escape`].
    #[must_use]
    pub fn from_key_value(value: &str) -> Option<Self> {
        [Key::Escape, Key::Enter, Key::Tab, Key::Space, Key::Backspace]
            .into_iter()
            .find(|key| key.key() == value)
    }
}

// ============================================================================
// Tests
// ============================================================================
