//! Type-safe identifiers.
//!
//! Newtype wrappers keep listener registrations and browsing contexts from
//! being mixed up at compile time.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

// ============================================================================
// ListenerId
// ============================================================================

/// Handle to one listener registration on a [`Page`](crate::dom::Page).
///
/// Pages hand out ids in increasing order; dispatch runs listeners in id
/// order, which is registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Creates a listener id from its raw value.
    #[inline]
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns the id that follows this one.
    #[inline]
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

// ============================================================================
// WindowId
// ============================================================================

/// Identifies a browsing context (top-level window or iframe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(u32);

impl WindowId {
    /// Creates a window id from its raw value.
    #[inline]
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// The top-level window of a page.
    #[inline]
    #[must_use]
    pub const fn top() -> Self {
        Self(0)
    }

    /// Returns `true` for the top-level window.
    #[inline]
    #[must_use]
    pub const fn is_top(self) -> bool {
        self.0 == 0
    }

    /// Returns the raw value.
    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_top() {
            f.write_str("top")
        } else {
            write!(f, "frame-{}", self.0)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
