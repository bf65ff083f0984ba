//! End-to-end signal flow between an ad frame and its host page.

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;
use serde_json::json;

use advisor_sdk::dom::{CustomEvent, ElementRole, EventKind, Key, MemoryBrowser, MemoryWindow, Page};
use advisor_sdk::host::{OriginPolicy, UrlPolicy, subscribe};
use advisor_sdk::render::STYLESHEET_ID;
use advisor_sdk::{
    Emitter, EmitterOptions, EventMapping, HostController, HostOptions, ModalState, Transport,
};

// ============================================================================
// Fixtures
// ============================================================================

struct Fixture {
    browser: MemoryBrowser,
    top: MemoryWindow,
    host: HostController<MemoryWindow>,
}

impl Fixture {
    fn new(options: HostOptions) -> Self {
        let browser = MemoryBrowser::new("https://publisher.test");
        let top = browser.top();
        let host = HostController::with_options(top.clone(), options);
        host.init();
        Self { browser, top, host }
    }

    fn emitter(&self, origin: &str) -> Emitter<MemoryWindow> {
        let emitter = Emitter::new(self.top.create_child_frame(origin));
        emitter.init();
        emitter
    }

    fn content_source(&self) -> String {
        self.top
            .snapshot()
            .map(|m| m.content_source)
            .unwrap_or_default()
    }

    fn interaction_listeners(&self) -> usize {
        self.top.listener_count_of(&EventKind::Click) + self.top.listener_count_of(&EventKind::KeyDown)
    }
}

// ============================================================================
// Scenario
// ============================================================================

#[test]
fn test_ad_frame_opens_host_modal() {
    let fx = Fixture::new(HostOptions::default());
    let emitter = fx.emitter("https://ads.test");

    emitter.open_url("https://calendly.test/abc");
    assert!(!fx.host.is_open(), "delivery is asynchronous");

    fx.browser.run_until_idle();
    let modal = fx.top.snapshot().unwrap();
    assert!(modal.visible);
    assert_eq!(modal.content_source, "https://calendly.test/abc");
    assert!(fx.top.is_scroll_locked());

    fx.top.press_key(Key::Escape);
    let modal = fx.top.snapshot().unwrap();
    assert!(!modal.visible);
    assert_eq!(modal.content_source, "");
    assert!(!fx.top.is_scroll_locked());
}

#[test]
fn test_nested_frame_reaches_only_its_parent() {
    let fx = Fixture::new(HostOptions::default());
    let wrapper = fx.top.create_child_frame("https://ssp.test");
    let nested = Emitter::new(wrapper.create_child_frame("https://ads.test"));
    nested.init();

    nested.open_url("https://calendly.test/abc");
    fx.browser.run_until_idle();

    assert!(!fx.host.is_open());
}

#[test]
fn test_emitter_before_init_sends_nothing() {
    let fx = Fixture::new(HostOptions::default());
    let emitter = Emitter::new(fx.top.create_child_frame("https://ads.test"));

    emitter.open_url("https://calendly.test/abc");
    assert_eq!(fx.browser.pending_tasks(), 0);
    assert!(!fx.host.is_open());
}

#[test]
fn test_host_before_init_ignores_signals() {
    let browser = MemoryBrowser::new("https://publisher.test");
    let top = browser.top();
    let host = HostController::new(top.clone());
    let emitter = Emitter::new(top.create_child_frame("https://ads.test"));
    emitter.init();

    emitter.open_url("https://calendly.test/abc");
    browser.run_until_idle();
    host.open_modal("https://calendly.test/abc");

    assert_eq!(host.state(), ModalState::Closed);
    assert!(top.snapshot().is_none());
}

// ============================================================================
// Filtering
// ============================================================================

#[test]
fn test_foreign_traffic_is_ignored() {
    let fx = Fixture::new(HostOptions::default());

    for data in [
        json!({ "type": "webpackOk" }),
        json!({ "type": "advisor:openurl", "advisorUrl": "https://x.test" }),
        json!({ "advisorUrl": "https://x.test" }),
        json!(["advisor:openUrl", "https://x.test"]),
        json!(null),
        json!({ "type": "advisor:openUrl", "advisorUrl": 7 }),
    ] {
        fx.top.deliver_message("https://ads.test", data);
    }
    fx.browser.run_until_idle();

    assert!(!fx.host.is_open());
    assert_eq!(fx.content_source(), "");
}

#[test]
fn test_url_alias_is_accepted() {
    let fx = Fixture::new(HostOptions::default());
    fx.top.deliver_message(
        "https://ads.test",
        json!({ "type": "advisor:openUrl", "url": "https://calendly.test/alias" }),
    );
    fx.browser.run_until_idle();
    assert_eq!(fx.content_source(), "https://calendly.test/alias");
}

#[test]
fn test_advisor_url_and_alias_together() {
    let fx = Fixture::new(HostOptions::default());
    fx.top.deliver_message(
        "https://ads.test",
        json!({
            "type": "advisor:openUrl",
            "advisorUrl": "https://calendly.test/abc",
            "url": "https://calendly.test/other",
        }),
    );
    fx.browser.run_until_idle();
    assert!(fx.host.is_open());
    assert_eq!(fx.content_source(), "https://calendly.test/abc");
}

#[test]
fn test_origin_allow_list() {
    let origins = OriginPolicy::allow_list(["https://*.ads.test"]).unwrap();
    let fx = Fixture::new(HostOptions::default().with_allowed_origins(origins));

    fx.emitter("https://tracker.test").open_url("https://evil.test");
    fx.browser.run_until_idle();
    assert!(!fx.host.is_open());

    fx.emitter("https://eu.ads.test").open_url("https://calendly.test/abc");
    fx.browser.run_until_idle();
    assert_eq!(fx.content_source(), "https://calendly.test/abc");
}

#[test]
fn test_url_policy_does_not_apply_to_direct_calls() {
    let fx = Fixture::new(HostOptions::default().with_url_policy(UrlPolicy::HttpOnly));

    fx.emitter("https://ads.test").open_url("javascript:alert(1)");
    fx.browser.run_until_idle();
    assert!(!fx.host.is_open());

    fx.host.open_modal("/relative/booking");
    assert_eq!(fx.content_source(), "/relative/booking");
}

// ============================================================================
// Transports
// ============================================================================

#[test]
fn test_same_document_schedule_call() {
    let options = HostOptions::default()
        .with_listen(Transport::SameDocument)
        .with_event_mapping(EventMapping::schedule_call());
    let fx = Fixture::new(options);

    let emitter = Emitter::with_options(
        fx.top.clone(),
        EmitterOptions::new()
            .with_transport(Transport::SameDocument)
            .with_event_mapping(EventMapping::schedule_call()),
    );
    emitter.init();
    emitter.open_url("https://calendly.test/intro");

    assert_eq!(fx.content_source(), "https://calendly.test/intro");
}

#[test]
fn test_cross_frame_only_host_ignores_custom_events() {
    let fx = Fixture::new(HostOptions::default().with_listen(Transport::CrossFrame));
    fx.top
        .dispatch_custom_event(CustomEvent::new(
            "advisor:openUrl",
            json!({ "advisorUrl": "https://calendly.test/abc" }),
        ))
        .unwrap();
    assert!(!fx.host.is_open());
}

#[test]
fn test_subscriber_and_host_share_a_page() {
    let fx = Fixture::new(HostOptions::default());
    let urls = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&urls);
    let subscription = subscribe(&fx.top, &HostOptions::default(), move |signal| {
        sink.borrow_mut().push(signal.url);
    })
    .unwrap();

    fx.emitter("https://ads.test").open_url("https://calendly.test/abc");
    fx.browser.run_until_idle();
    assert_eq!(*urls.borrow(), ["https://calendly.test/abc"]);
    assert!(fx.host.is_open());

    let with_subscription = fx.top.listener_count();
    drop(subscription);
    assert_eq!(fx.top.listener_count(), with_subscription - 2);
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_init_mounts_one_modal() {
    let fx = Fixture::new(HostOptions::default().with_title("Book <now>"));
    fx.host.init();
    fx.host.init();

    assert_eq!(fx.top.mount_count(), 1);
    assert!(fx.top.stylesheet(STYLESHEET_ID).is_some());
    assert!(fx.top.snapshot().unwrap().markup.contains("Book &lt;now&gt;"));
}

#[test]
fn test_each_document_gets_its_own_stylesheet() {
    let browser = MemoryBrowser::new("https://publisher.test");
    let top = browser.top();
    let frame = top.create_child_frame("https://publisher.test");

    let outer = HostController::new(top.clone());
    let inner = HostController::new(frame.clone());
    outer.init();
    inner.init();

    assert!(top.stylesheet(STYLESHEET_ID).is_some());
    assert!(frame.stylesheet(STYLESHEET_ID).is_some());
    assert_eq!(top.mount_count(), 1);
}

#[test]
fn test_close_paths() {
    let fx = Fixture::new(HostOptions::default());

    fx.host.open_modal("https://calendly.test/a");
    fx.top.click(Some(ElementRole::Overlay));
    assert!(!fx.host.is_open());

    fx.host.open_modal("https://calendly.test/b");
    fx.top.click(Some(ElementRole::CloseButton));
    assert!(!fx.host.is_open());

    fx.host.open_modal("https://calendly.test/c");
    fx.host.close_modal();
    assert!(!fx.host.is_open());
    assert_eq!(fx.interaction_listeners(), 0);

    // Closing a closed modal.
    fx.host.close_modal();
    fx.top.press_key(Key::Escape);
    assert_eq!(fx.host.state(), ModalState::Closed);
}

#[test]
fn test_previous_body_overflow_is_restored() {
    let fx = Fixture::new(HostOptions::default());
    fx.top.set_body_overflow(Some("scroll"));

    fx.host.open_modal("https://calendly.test/a");
    assert_eq!(fx.top.body_overflow().as_deref(), Some("hidden"));
    fx.host.open_modal("https://calendly.test/b");
    fx.host.close_modal();

    assert_eq!(fx.top.body_overflow().as_deref(), Some("scroll"));
}

#[test]
fn test_handler_can_reopen_from_within_dispatch() {
    let fx = Fixture::new(HostOptions::default());
    let top = fx.top.clone();
    let reopen = top.clone();
    // Window listeners run after the document-level Escape listener.
    top.add_listener(
        advisor_sdk::dom::EventTarget::Window,
        EventKind::KeyDown,
        Rc::new(move |_: &advisor_sdk::dom::DomEvent| {
            reopen.deliver_message(
                "https://ads.test",
                json!({ "type": "advisor:openUrl", "advisorUrl": "https://calendly.test/again" }),
            );
        }),
    )
    .unwrap();

    fx.host.open_modal("https://calendly.test/first");
    fx.top.press_key(Key::Escape);
    assert!(!fx.host.is_open());

    fx.browser.run_until_idle();
    assert_eq!(fx.content_source(), "https://calendly.test/again");
    assert_eq!(fx.interaction_listeners(), 3 + 1);
}

// ============================================================================
// Properties
// ============================================================================

#[derive(Debug, Clone)]
enum Step {
    Open(u8),
    Signal(u8),
    Escape,
    Overlay,
    CloseButton,
    InsideClick,
    Close,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0u8..4).prop_map(Step::Open),
        (0u8..4).prop_map(Step::Signal),
        Just(Step::Escape),
        Just(Step::Overlay),
        Just(Step::CloseButton),
        Just(Step::InsideClick),
        Just(Step::Close),
    ]
}

fn url(n: u8) -> String {
    format!("https://calendly.test/slot/{n}")
}

proptest! {
    #[test]
    fn prop_init_is_idempotent(calls in 1usize..16) {
        let browser = MemoryBrowser::new("https://publisher.test");
        let top = browser.top();
        let host = HostController::new(top.clone());
        for _ in 0..calls {
            host.init();
        }
        prop_assert_eq!(top.mount_count(), 1);
        prop_assert_eq!(top.listener_count(), 2);
    }

    #[test]
    fn prop_last_signal_wins(slots in proptest::collection::vec(0u8..32, 1..12)) {
        let fx = Fixture::new(HostOptions::default());
        let emitter = fx.emitter("https://ads.test");
        for &slot in &slots {
            emitter.open_url(&url(slot));
        }
        fx.browser.run_until_idle();

        let last = slots.last().copied().unwrap_or_default();
        prop_assert_eq!(fx.content_source(), url(last));
        prop_assert_eq!(fx.top.mount_count(), 1);
        prop_assert_eq!(fx.interaction_listeners(), 3);
    }

    #[test]
    fn prop_foreign_types_never_open(kind in "[a-zA-Z:]{0,20}", value in ".*") {
        prop_assume!(kind != "advisor:openUrl");
        let fx = Fixture::new(HostOptions::default());
        fx.top.deliver_message("https://ads.test", json!({ "type": kind, "advisorUrl": value }));
        fx.browser.run_until_idle();
        prop_assert!(!fx.host.is_open());
    }

    #[test]
    fn prop_listener_hygiene(steps in proptest::collection::vec(step(), 0..40)) {
        let fx = Fixture::new(HostOptions::default());
        let emitter = fx.emitter("https://ads.test");
        let persistent = fx.top.listener_count();

        for step in steps {
            match step {
                Step::Open(n) => fx.host.open_modal(&url(n)),
                Step::Signal(n) => {
                    emitter.open_url(&url(n));
                    fx.browser.run_until_idle();
                }
                Step::Escape => { fx.top.press_key(Key::Escape); }
                Step::Overlay => { fx.top.click(Some(ElementRole::Overlay)); }
                Step::CloseButton => { fx.top.click(Some(ElementRole::CloseButton)); }
                Step::InsideClick => { fx.top.click(Some(ElementRole::ContentFrame)); }
                Step::Close => fx.host.close_modal(),
            }

            let expected = if fx.host.is_open() { 3 } else { 0 };
            prop_assert_eq!(fx.interaction_listeners(), expected);
            prop_assert_eq!(fx.top.listener_count(), persistent + expected);
            prop_assert_eq!(fx.top.is_scroll_locked(), fx.host.is_open());
            if !fx.host.is_open() {
                prop_assert_eq!(fx.content_source(), "");
            }
        }
    }
}
