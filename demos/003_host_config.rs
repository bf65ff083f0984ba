//! Host configuration demonstration.
//!
//! Demonstrates:
//! - Loading `HostOptions` from a JSON config object
//! - Origin allow-list with a subdomain wildcard
//! - `httpOnly` URL policy on inbound signals
//! - Custom title and styles in the mounted stylesheet
//!
//! Usage:
//!   cargo run --example 003_host_config
//!   cargo run --example 003_host_config -- --debug

mod common;

// ============================================================================
// Imports
// ============================================================================

use anyhow::{Context, Result, ensure};

use advisor_sdk::dom::MemoryBrowser;
use advisor_sdk::render::STYLESHEET_ID;
use advisor_sdk::{Emitter, HostController, HostOptions};
use common::{Args, print_modal};

// ============================================================================
// Constants
// ============================================================================

const CONFIG: &str = r#"{
    "loggingEnabled": true,
    "modalTitle": "Talk to an advisor",
    "allowedOrigins": ["https://*.ads.test"],
    "urlPolicy": "httpOnly",
    "modalStyles": {
        "overlay": { "zIndex": 5000 },
        "container": { "borderRadius": "4px" }
    }
}"#;

// ============================================================================
// Main
// ============================================================================

fn main() {
    let args = Args::parse();
    common::init_logging(args.debug);

    if let Err(e) = run(&args) {
        eprintln!("\n[ERROR] {e:#}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    println!("=== 003: Host Configuration ===\n");

    // ========================================================================
    // Setup
    // ========================================================================

    println!("[Setup] Parsing host config...");
    let options = HostOptions::from_json(CONFIG)
        .context("parsing host config")?
        .with_logging(args.sdk_logging());
    println!("        ✓ title={:?}", options.modal_title);

    let browser = MemoryBrowser::new("https://publisher.test");
    let top = browser.top();
    let host = HostController::with_options(top.clone(), options);
    host.init();

    let css = top.stylesheet(STYLESHEET_ID).context("stylesheet missing")?;
    println!("        ✓ stylesheet carries z-index 5000: {}\n", css.contains("z-index: 5000"));

    // ========================================================================
    // Rejected origin
    // ========================================================================

    println!("[1] Signal from an unlisted origin...");
    let rogue = Emitter::new(top.create_child_frame("https://tracker.test"));
    rogue.init();
    rogue.open_url("https://calendly.test/advisor");
    browser.run_until_idle();
    print_modal(&top);
    ensure!(!host.is_open(), "unlisted origin opened the modal");

    // ========================================================================
    // Rejected URL
    // ========================================================================

    println!("\n[2] Signal with a non-http URL from a listed origin...");
    let ad = Emitter::new(top.create_child_frame("https://eu.ads.test"));
    ad.init();
    ad.open_url("javascript:alert(1)");
    browser.run_until_idle();
    print_modal(&top);
    ensure!(!host.is_open(), "javascript: URL opened the modal");

    // ========================================================================
    // Accepted
    // ========================================================================

    println!("\n[3] Valid signal from a listed origin...");
    ad.open_url("https://calendly.test/advisor");
    browser.run_until_idle();
    print_modal(&top);
    ensure!(host.is_open(), "modal did not open");

    host.close_modal();
    println!("\n=== Complete ===");
    Ok(())
}
