//! Same-document signaling demonstration.
//!
//! Demonstrates:
//! - Emitter using the custom-event transport inside the host document
//! - The alternate `advisor:scheduleCall` / `calendlyUrl` mapping
//! - A standalone `subscribe` listener next to the host controller
//!
//! Usage:
//!   cargo run --example 002_same_document
//!   cargo run --example 002_same_document -- --debug

mod common;

// ============================================================================
// Imports
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Result, ensure};

use advisor_sdk::dom::{ElementRole, MemoryBrowser};
use advisor_sdk::host::subscribe;
use advisor_sdk::{
    Emitter, EmitterOptions, EventMapping, HostController, HostOptions, Transport,
};
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
    println!("=== 002: Same-Document Signal ===\n");

    // ========================================================================
    // Setup
    // ========================================================================

    println!("[Setup] Creating page with host controller and subscriber...");
    let browser = MemoryBrowser::new("https://publisher.test");
    let top = browser.top();

    let host_options = HostOptions::new()
        .with_listen(Transport::SameDocument)
        .with_event_mapping(EventMapping::schedule_call())
        .with_logging(args.sdk_logging());
    let host = HostController::with_options(top.clone(), host_options.clone());
    host.init();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let subscription = subscribe(&top, &host_options, move |signal| {
        sink.borrow_mut().push(signal.url);
    })?;
    println!("        ✓ subscription={subscription:?}\n");

    // ========================================================================
    // Emit
    // ========================================================================

    println!("[1] Emitting advisor:scheduleCall in the same document...");
    let emitter = Emitter::with_options(
        top.clone(),
        EmitterOptions::new()
            .with_transport(Transport::SameDocument)
            .with_event_mapping(EventMapping::schedule_call())
            .with_logging(args.sdk_logging()),
    );
    emitter.init();
    emitter.open_url("https://calendly.test/advisor/intro");
    print_modal(&top);
    println!("        subscriber saw: {:?}", seen.borrow());
    ensure!(host.is_open(), "modal did not open");
    ensure!(seen.borrow().len() == 1, "subscriber missed the signal");

    // ========================================================================
    // Close
    // ========================================================================

    println!("\n[2] Clicking the close button...");
    top.click(Some(ElementRole::CloseButton));
    print_modal(&top);

    println!("\n[3] Dropping the subscription...");
    let before = top.listener_count();
    subscription.unsubscribe();
    println!("        listeners: {before} -> {}", top.listener_count());

    println!("\n=== Complete ===");
    Ok(())
}
