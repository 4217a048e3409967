use std::sync::Once;
use std::sync::Arc;
use std::time::Duration;

use console_events::{ConsoleEvent, EventBus};
use console_swap::{
    AttachError, BeginGuard, BufferTarget, FailureKind, FetchSettings, Location, ReqwestFetcher,
    SwapEngine, SwapOptions, SwapOutcome,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::sync::broadcast::Receiver;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(client_logging::initialize_for_tests);
}

struct Harness {
    engine: SwapEngine,
    target: Arc<BufferTarget>,
    bus: EventBus,
}

fn attach(source_url: &str, base_href: &str, debounce: Duration) -> Harness {
    let fetcher = Arc::new(ReqwestFetcher::new(FetchSettings::default()).expect("client"));
    let target = Arc::new(BufferTarget::new());
    let location = Arc::new(Location::new(base_href).expect("href"));
    let bus = EventBus::default();
    let engine = SwapEngine::attach(
        fetcher,
        Some(target.clone()),
        location,
        bus.clone(),
        SwapOptions {
            source_url: source_url.to_string(),
            debounce,
            ..SwapOptions::default()
        },
    )
    .expect("attach");
    Harness {
        engine,
        target,
        bus,
    }
}

fn drain(events: &mut Receiver<ConsoleEvent>) -> Vec<ConsoleEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

#[tokio::test]
async fn replace_swaps_target_and_emits_begin_then_success() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fragment"))
        .and(header("x-requested-with", "XMLHttpRequest"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<ul>fresh</ul>", "text/html"))
        .mount(&server)
        .await;

    let source = format!("{}/fragment", server.uri());
    let harness = attach(&source, &server.uri(), Duration::ZERO);
    let mut events = harness.bus.subscribe();

    let outcome = harness.engine.replace(None).await.expect("swap ok");

    assert_eq!(outcome, SwapOutcome::Applied);
    assert_eq!(harness.target.contents(), "<ul>fresh</ul>");
    assert!(!harness.engine.is_loading());
    assert_eq!(
        drain(&mut events),
        vec![
            ConsoleEvent::SwapBegin {
                request_url: source.clone()
            },
            ConsoleEvent::SwapSuccess {
                request_url: source,
                results: "<ul>fresh</ul>".to_string()
            },
        ]
    );
}

#[tokio::test]
async fn http_failure_leaves_target_untouched_and_emits_error() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fragment"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>before</p>", "text/html"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let source = format!("{}/fragment", server.uri());
    let harness = attach(&source, &server.uri(), Duration::ZERO);
    harness.engine.replace(None).await.expect("first swap");

    let mut events = harness.bus.subscribe();
    let broken = format!("{}/broken", server.uri());
    let err = harness.engine.replace(Some(&broken)).await.unwrap_err();

    assert_eq!(err.kind, FailureKind::HttpStatus(500));
    assert_eq!(harness.target.contents(), "<p>before</p>");
    assert!(!harness.engine.is_loading());
    let events = drain(&mut events);
    assert!(matches!(
        events.last(),
        Some(ConsoleEvent::SwapError { request_url, .. }) if *request_url == broken
    ));
}

#[tokio::test]
async fn json_response_also_emits_structured_event() {
    init_logging();
    let server = MockServer::start().await;
    let payload = json!({
        "html": "<ul><li>Sam</li></ul>",
        "ping_url": "https://cms.example.com/session/1/ping/",
    });
    Mock::given(method("GET"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload.clone()))
        .mount(&server)
        .await;

    let source = format!("{}/session", server.uri());
    let harness = attach(&source, &server.uri(), Duration::ZERO);
    let mut events = harness.bus.subscribe();

    harness.engine.replace(None).await.expect("swap ok");

    let events = drain(&mut events);
    assert!(events.contains(&ConsoleEvent::SwapJson { data: payload }));
}

#[tokio::test]
async fn begin_guard_veto_stops_before_any_network_call() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fragment"))
        .respond_with(ResponseTemplate::new(200).set_body_string("nope"))
        .expect(0)
        .mount(&server)
        .await;

    struct DenyAll;
    impl BeginGuard for DenyAll {
        fn allow(&self, _request_url: &str) -> bool {
            false
        }
    }

    let source = format!("{}/fragment", server.uri());
    let harness = attach(&source, &server.uri(), Duration::ZERO);
    harness.engine.add_begin_guard(Box::new(DenyAll));

    let outcome = harness.engine.replace(None).await.expect("vetoed");

    assert_eq!(outcome, SwapOutcome::Vetoed);
    assert_eq!(harness.target.contents(), "");
    assert!(!harness.engine.is_loading());
}

#[tokio::test]
async fn quiet_flag_suppresses_change_notification() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fragment"))
        .respond_with(ResponseTemplate::new(200).set_body_string("quietly"))
        .mount(&server)
        .await;

    let fetcher = Arc::new(ReqwestFetcher::new(FetchSettings::default()).expect("client"));
    let target = Arc::new(BufferTarget::new());
    let location = Arc::new(Location::new(&server.uri()).expect("href"));
    let engine = SwapEngine::attach(
        fetcher,
        Some(target.clone()),
        location,
        EventBus::default(),
        SwapOptions {
            source_url: format!("{}/fragment", server.uri()),
            debounce: Duration::ZERO,
            quiet: true,
            ..SwapOptions::default()
        },
    )
    .expect("attach");

    engine.replace(None).await.expect("swap ok");

    assert_eq!(target.contents(), "quietly");
    assert_eq!(target.changes(), 0);
}

#[tokio::test]
async fn attach_fails_loudly_on_missing_wiring() {
    init_logging();
    let fetcher: Arc<ReqwestFetcher> =
        Arc::new(ReqwestFetcher::new(FetchSettings::default()).expect("client"));
    let location = Arc::new(Location::new("https://cms.example.com/pages/").expect("href"));

    let err = SwapEngine::attach(
        fetcher.clone(),
        None,
        location.clone(),
        EventBus::default(),
        SwapOptions {
            source_url: "https://cms.example.com/pages/results/".to_string(),
            ..SwapOptions::default()
        },
    )
    .unwrap_err();
    assert_eq!(err, AttachError::MissingTarget);

    let err = SwapEngine::attach(
        fetcher,
        Some(Arc::new(BufferTarget::new())),
        location,
        EventBus::default(),
        SwapOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err, AttachError::MissingSourceUrl);
}
