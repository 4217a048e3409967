use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use client_logging::{client_debug, client_info, client_warn};
use console_core::ReplayTarget;
use console_events::{ConsoleEvent, EventBus};
use console_session::{
    ActionRunner, ConfirmationDialog, SessionOptions, SessionSynchronizer, UnsavedField,
};
use console_swap::{
    BufferTarget, FetchSettings, Location, ReqwestFetcher, SwapEngine, SwapOptions,
};
use tokio::sync::broadcast::error::RecvError;

use crate::config::ClientConfig;

/// Headless stand-in for the page's dialog chrome: the contract is honored,
/// the presentation is a log line.
struct LogDialog;

impl ConfirmationDialog for LogDialog {
    fn show(&self, label: &str) {
        client_info!("confirmation dialog shown for '{}'", label);
    }
    fn hide(&self) {
        client_info!("confirmation dialog hidden");
    }
    fn close_others(&self) {
        client_debug!("other dialogs closed");
    }
}

struct LogRunner;

impl ActionRunner for LogRunner {
    fn run(&self, target: &ReplayTarget) {
        client_info!("replaying action {:?}", target);
    }
}

/// Wires the swap engine and session synchronizer together over one bus and
/// runs until interrupted.
pub async fn run(config: ClientConfig) -> Result<()> {
    let bus = EventBus::default();
    let fetcher = Arc::new(ReqwestFetcher::new(FetchSettings::default())?);
    let content = Arc::new(BufferTarget::new());
    let location = Arc::new(Location::new(&config.base_url)?);

    let engine = SwapEngine::attach(
        fetcher,
        Some(content),
        location,
        bus.clone(),
        SwapOptions {
            source_url: config.session_url.clone(),
            debounce: Duration::from_millis(config.debounce_ms),
            quiet: config.quiet,
            ..SwapOptions::default()
        },
    )?;
    let ping_listener = engine.listen_for_pings();

    let sessions = Arc::new(BufferTarget::new());
    let sync = SessionSynchronizer::new(
        bus.clone(),
        Arc::new(engine.clone()),
        sessions,
        Arc::new(LogDialog),
        Arc::new(LogRunner),
        Some(Arc::new(UnsavedField::new())),
        SessionOptions {
            interval_ms: config.interval_ms,
            intercept: config.intercept,
        },
    );
    let ingestion = sync.attach();

    let traffic = spawn_traffic_log(&bus);
    client_info!(
        "console client attached, polling {} every {}ms",
        config.session_url,
        config.interval_ms
    );

    tokio::signal::ctrl_c().await?;
    client_info!("shutting down");
    sync.set_interval(0);
    ingestion.abort();
    ping_listener.abort();
    traffic.abort();
    Ok(())
}

fn spawn_traffic_log(bus: &EventBus) -> tokio::task::JoinHandle<()> {
    let mut events = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(ConsoleEvent::SwapBegin { request_url }) => {
                    client_debug!("swap begin url={}", request_url);
                }
                Ok(ConsoleEvent::SwapSuccess { request_url, results }) => {
                    client_info!(
                        "swap success url={} body_len={}",
                        request_url,
                        results.len()
                    );
                }
                Ok(ConsoleEvent::SwapError { request_url, error }) => {
                    client_warn!("swap error url={} error={}", request_url, error);
                }
                Ok(ConsoleEvent::SwapJson { data }) => {
                    let others = data
                        .get("other_sessions")
                        .and_then(|sessions| sessions.as_array())
                        .map(Vec::len)
                        .unwrap_or(0);
                    client_info!("session descriptor received, {} other editor(s)", others);
                }
                Ok(ConsoleEvent::Ping) => client_debug!("ping"),
                Ok(ConsoleEvent::PageHidden) => client_info!("page hidden"),
                Ok(ConsoleEvent::PageVisible) => client_info!("page visible"),
                Ok(ConsoleEvent::UnsavedAdded) => client_info!("unsaved changes present"),
                Ok(ConsoleEvent::UnsavedCleared) => client_info!("unsaved changes cleared"),
                Err(RecvError::Lagged(skipped)) => {
                    client_debug!("traffic log lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}
