//! Signal round-trip benchmark suite.
//!
//! Measures the in-memory cost of the message contract and the host
//! lifecycle:
//! - Decoding inbound message data (accepted, foreign, malformed)
//! - Emitter post + host open across one frame boundary
//! - Open/close cycles with interaction listener churn
//!
//! Run with: cargo bench --bench signal_roundtrip
//! Results saved to: target/criterion/

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use serde_json::json;

use advisor_sdk::dom::{Key, MemoryBrowser};
use advisor_sdk::host::OriginPolicy;
use advisor_sdk::{Emitter, HostController, HostOptions, SignalMessage};

// ============================================================================
// Benchmark Parameters
// ============================================================================

const SIGNAL_COUNTS: &[usize] = &[1, 10, 100];
const URL: &str = "https://calendly.test/advisor/30min";

// ============================================================================
// Benchmark: Message Decoding
// ============================================================================

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    let cases = [
        ("accepted", json!({ "type": "advisor:openUrl", "advisorUrl": URL })),
        ("foreign", json!({ "type": "webpackHotUpdate", "hash": "abc123" })),
        ("malformed", json!({ "type": "advisor:openUrl", "advisorUrl": 42 })),
    ];
    for (name, data) in &cases {
        group.bench_with_input(BenchmarkId::new("message", name), data, |b, data| {
            b.iter(|| SignalMessage::from_message_data(black_box(data)));
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Cross-Frame Round Trip
// ============================================================================

fn bench_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("round_trip");

    for &count in SIGNAL_COUNTS {
        group.bench_with_input(BenchmarkId::new("signals", count), &count, |b, &count| {
            b.iter(|| run_round_trip(count, OriginPolicy::Any));
        });
    }

    let allow_list = OriginPolicy::allow_list(["https://*.ads.test", "https://publisher.test"])
        .expect("valid patterns");
    group.bench_function("signals_allow_list/100", |b| {
        b.iter(|| run_round_trip(100, allow_list.clone()));
    });

    group.finish();
}

// ============================================================================
// Benchmark: Open/Close Cycles
// ============================================================================

fn bench_lifecycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("lifecycle");

    let browser = MemoryBrowser::new("https://publisher.test");
    let top = browser.top();
    let host = HostController::new(top.clone());
    host.init();

    group.bench_function("open_escape", |b| {
        b.iter(|| {
            host.open_modal(black_box(URL));
            top.press_key(Key::Escape);
        });
    });
    group.bench_function("repoint", |b| {
        host.open_modal(URL);
        b.iter(|| host.open_modal(black_box(URL)));
        host.close_modal();
    });

    group.finish();
}

// ============================================================================
// Helper Functions
// ============================================================================

fn run_round_trip(count: usize, origins: OriginPolicy) -> bool {
    let browser = MemoryBrowser::new("https://publisher.test");
    let top = browser.top();
    let host = HostController::with_options(
        top.clone(),
        HostOptions::default().with_allowed_origins(origins),
    );
    host.init();

    let emitter = Emitter::new(top.create_child_frame("https://eu.ads.test"));
    emitter.init();
    for _ in 0..count {
        emitter.open_url(URL);
    }
    browser.run_until_idle();
    host.is_open()
}

criterion_group!(benches, bench_decode, bench_round_trip, bench_lifecycle);
criterion_main!(benches);
