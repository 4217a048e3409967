use std::sync::Arc;
use std::time::Duration;

use console_events::EventBus;
use console_swap::{
    BufferTarget, FetchSettings, Location, ReqwestFetcher, SwapEngine, SwapOptions, SwapOutcome,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn attach(
    source_url: &str,
    base_href: &str,
    debounce: Duration,
) -> (SwapEngine, Arc<BufferTarget>, Arc<Location>) {
    let fetcher = Arc::new(ReqwestFetcher::new(FetchSettings::default()).expect("client"));
    let target = Arc::new(BufferTarget::new());
    let location = Arc::new(Location::new(base_href).expect("href"));
    let engine = SwapEngine::attach(
        fetcher,
        Some(target.clone()),
        location.clone(),
        EventBus::default(),
        SwapOptions {
            source_url: source_url.to_string(),
            debounce,
            ..SwapOptions::default()
        },
    )
    .expect("attach");
    (engine, target, location)
}

#[tokio::test]
async fn rapid_triggers_collapse_to_one_request_with_the_last_value() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/results"))
        .and(query_param("q", "espresso"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<li>espresso</li>"))
        .expect(1)
        .mount(&server)
        .await;

    let source = format!("{}/results", server.uri());
    let (engine, target, location) = attach(&source, &server.uri(), Duration::from_millis(50));

    // Three keystrokes inside one debounce window.
    let (first, second, third) = tokio::join!(
        engine.search("e"),
        engine.search("es"),
        engine.search("espresso"),
    );

    assert_eq!(first.expect("first"), SwapOutcome::Superseded);
    assert_eq!(second.expect("second"), SwapOutcome::Superseded);
    assert_eq!(third.expect("third"), SwapOutcome::Applied);
    assert_eq!(target.contents(), "<li>espresso</li>");
    assert_eq!(location.query(), "q=espresso");
}

#[tokio::test]
async fn search_is_a_noop_on_trimmed_equality() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/results"))
        .respond_with(ResponseTemplate::new(200).set_body_string("never"))
        .expect(0)
        .mount(&server)
        .await;

    let source = format!("{}/results", server.uri());
    let base = format!("{}/pages/?q=espresso", server.uri());
    let (engine, target, location) = attach(&source, &base, Duration::ZERO);

    let outcome = engine.search("  espresso  ").await.expect("noop");

    assert_eq!(outcome, SwapOutcome::NoChange);
    assert_eq!(target.contents(), "");
    assert_eq!(location.query(), "q=espresso");
}

#[tokio::test]
async fn failing_fetch_leaves_the_visible_url_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/results"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let source = format!("{}/results", server.uri());
    let base = format!("{}/pages/?q=espresso", server.uri());
    let (engine, _target, location) = attach(&source, &base, Duration::ZERO);

    let err = engine.search("latte").await.unwrap_err();

    assert!(matches!(
        err.kind,
        console_swap::FailureKind::HttpStatus(503)
    ));
    assert_eq!(location.query(), "q=espresso");
}

#[tokio::test]
async fn successful_search_advances_the_url_and_clears_pagination() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/results"))
        .and(query_param("q", "latte"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<li>latte</li>"))
        .mount(&server)
        .await;

    let source = format!("{}/results", server.uri());
    let base = format!("{}/pages/?q=espresso&p=3", server.uri());
    let (engine, target, location) = attach(&source, &base, Duration::ZERO);

    let outcome = engine.search("latte").await.expect("swap");

    assert_eq!(outcome, SwapOutcome::Applied);
    assert_eq!(target.contents(), "<li>latte</li>");
    assert_eq!(location.query(), "q=latte");
}

#[tokio::test]
async fn submit_serializes_fields_without_touching_the_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/results"))
        .and(query_param("collection", "7"))
        .and(query_param("order", "name"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<li>filtered</li>"))
        .expect(1)
        .mount(&server)
        .await;

    let source = format!("{}/results", server.uri());
    let base = format!("{}/pages/?q=espresso", server.uri());
    let (engine, target, location) = attach(&source, &base, Duration::ZERO);

    let fields = vec![
        ("collection".to_string(), "7".to_string()),
        ("order".to_string(), "name".to_string()),
    ];
    let outcome = engine.submit(&fields).await.expect("swap");

    assert_eq!(outcome, SwapOutcome::Applied);
    assert_eq!(target.contents(), "<li>filtered</li>");
    assert_eq!(location.query(), "q=espresso");
}
