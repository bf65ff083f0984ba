//! Runtime-gated logging.
//!
//! Each role carries a [`LogGate`]: a shared `loggingEnabled` flag that host
//! code may flip at any time. The flag is read on every call, never cached,
//! and only when it is set does the gate forward to `tracing`.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

// ============================================================================
// LogGate
// ============================================================================

/// Shared logging switch for one SDK role.
///
/// Clones share the same flag, so a host can keep a clone and toggle
/// logging for a running emitter or controller.
#[derive(Clone)]
pub struct LogGate {
    /// Prefix identifying the role in log lines (`AdvisorAdSDK`, ...).
    component: &'static str,
    /// The `loggingEnabled` flag.
    enabled: Arc<AtomicBool>,
}

impl fmt::Debug for LogGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogGate")
            .field("component", &self.component)
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl LogGate {
    /// Creates a gate for `component` with the given initial state.
    #[must_use]
    pub fn new(component: &'static str, enabled: bool) -> Self {
        Self {
            component,
            enabled: Arc::new(AtomicBool::new(enabled)),
        }
    }

    /// Returns the role prefix.
    #[inline]
    #[must_use]
    pub fn component(&self) -> &'static str {
        self.component
    }

    /// Returns the current flag value.
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Turns logging on or off for every holder of this gate.
    #[inline]
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    /// Emits a debug line when enabled.
    pub fn debug(&self, message: fmt::Arguments<'_>) {
        if self.is_enabled() {
            debug!(sdk = self.component, "{message}");
        }
    }

    /// Emits an info line when enabled.
    pub fn info(&self, message: fmt::Arguments<'_>) {
        if self.is_enabled() {
            info!(sdk = self.component, "{message}");
        }
    }

    /// Emits a warning when enabled.
    pub fn warn(&self, message: fmt::Arguments<'_>) {
        if self.is_enabled() {
            warn!(sdk = self.component, "{message}");
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
    fn test_clones_share_flag() {
        let gate = LogGate::new("AdvisorAdSDK", false);
        let handle = gate.clone();
        assert!(!gate.is_enabled());

        handle.set_enabled(true);
        assert!(gate.is_enabled());
        assert_eq!(gate.component(), "AdvisorAdSDK");
    }

    #[test]
    fn test_disabled_gate_is_quiet() {
        let gate = LogGate::new("AdvisorAdHostSDK", false);
        gate.warn(format_args!("not emitted"));
        gate.info(format_args!("not emitted either"));
    }
}
