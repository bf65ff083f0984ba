//! Cross-frame signaling demonstration.
//!
//! Demonstrates:
//! - A host page and a nested ad iframe in the in-memory browser
//! - Emitter posting `advisor:openUrl` to its parent
//! - Host opening, re-pointing and closing the modal
//!
//! Usage:
//!   cargo run --example 001_cross_frame
//!   cargo run --example 001_cross_frame -- --debug
//!   cargo run --example 001_cross_frame -- --quiet

mod common;

// ============================================================================
// Imports
// ============================================================================

use anyhow::{Result, ensure};

use advisor_sdk::dom::{ElementRole, Key, MemoryBrowser};
use advisor_sdk::{Emitter, EmitterOptions, HostController};
use common::{Args, print_modal};

// ============================================================================
// Main
// ============================================================================

fn main() {
    let args = Args::parse();
    common::init_logging(args.debug);

    if let Err(e) = run(&args) {
        eprintln!("\n[ERROR] {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    println!("=== 001: Cross-Frame Signal ===\n");

    // ========================================================================
    // Setup
    // ========================================================================

    println!("[Setup] Creating host page and ad iframe...");
    let browser = MemoryBrowser::new("https://publisher.test");
    let top = browser.top();
    let ad_frame = top.create_child_frame("https://ads.test");

    let host = HostController::with_logging(top.clone(), args.sdk_logging());
    host.init();
    host.init();

    let emitter = Emitter::with_options(
        ad_frame,
        EmitterOptions::new().with_logging(args.sdk_logging()),
    );
    println!("        ✓ host={top:?}\n");

    // ========================================================================
    // Before init
    // ========================================================================

    println!("[1] Emitting before init...");
    emitter.open_url("https://calendly.test/too-early");
    println!("        queued tasks: {}", browser.pending_tasks());
    ensure!(browser.pending_tasks() == 0, "signal sent before init");

    // ========================================================================
    // Open
    // ========================================================================

    println!("\n[2] Emitting after init...");
    emitter.init();
    emitter.open_url("https://calendly.test/advisor/30min");
    let delivered = browser.run_until_idle();
    println!("        delivered tasks: {delivered}");
    print_modal(&top);
    ensure!(host.is_open(), "modal did not open");

    // ========================================================================
    // Re-point
    // ========================================================================

    println!("\n[3] Second signal while open...");
    emitter.open_url("https://calendly.test/advisor/60min");
    browser.run_until_idle();
    print_modal(&top);

    // ========================================================================
    // Close
    // ========================================================================

    println!("\n[4] Clicking inside the dialog, then pressing Escape...");
    top.click(Some(ElementRole::ContentFrame));
    print_modal(&top);
    top.press_key(Key::Escape);
    print_modal(&top);
    ensure!(!host.is_open(), "Escape did not close the modal");

    println!("\n=== Complete ===");
    Ok(())
}
