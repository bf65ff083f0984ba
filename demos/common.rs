//! Shared utilities for demos.
//!
//! Provides common functionality used across all demos:
//! - Command-line argument parsing
//! - Logging initialization
//! - Modal state printing

#![allow(dead_code)]

// ============================================================================
// Imports
// ============================================================================

use tracing_subscriber::EnvFilter;

use advisor_sdk::dom::MemoryWindow;

// ============================================================================
// Types
// ============================================================================

/// Command-line arguments for demos.
#[derive(Debug, Clone)]
pub struct Args {
    pub debug: bool,
    pub quiet: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse() -> Self {
        let args: Vec<String> = std::env::args().collect();
        Self {
            debug: args.iter().any(|a| a == "--debug"),
            quiet: args.iter().any(|a| a == "--quiet"),
        }
    }

    /// Whether the SDK roles should log.
    pub fn sdk_logging(&self) -> bool {
        !self.quiet
    }
}

// ============================================================================
// Functions
// ============================================================================

/// Initialize tracing/logging.
pub fn init_logging(debug: bool) {
    let filter = if debug {
        "advisor_sdk=debug"
    } else {
        "advisor_sdk=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();
}

/// Print the modal as the host page currently shows it.
pub fn print_modal(page: &MemoryWindow) {
    match page.snapshot() {
        Some(modal) => println!(
            "        modal: visible={} src={:?} scroll_locked={} listeners={}",
            modal.visible,
            modal.content_source,
            page.is_scroll_locked(),
            page.listener_count()
        ),
        None => println!("        modal: not mounted"),
    }
}
