use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use client_logging::{client_debug, client_error};
use console_core::{encode_pairs, reconcile_search, DEFAULT_CLEAR_PARAMS, DEFAULT_SEARCH_PARAM};
use console_events::{ConsoleEvent, EventBus};
use thiserror::Error;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{FailureKind, FetchError, FragmentFetcher, Location, SwapOutcome, SwapTarget};

/// Default debounce window for every entry point, in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 200;

/// Loading state only becomes visible after this delay, so fast responses
/// never flicker.
const LOADING_DELAY: Duration = Duration::from_millis(200);

/// Attach-time configuration errors. These indicate a wiring bug in the host,
/// not a runtime condition, and are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttachError {
    #[error("no swap target resolved")]
    MissingTarget,
    #[error("no source url configured")]
    MissingSourceUrl,
}

/// Listener polled when a swap is about to begin. Returning `false` cancels
/// the swap before any network call or loading state.
pub trait BeginGuard: Send + Sync {
    fn allow(&self, request_url: &str) -> bool;
}

#[derive(Debug, Clone)]
pub struct SwapOptions {
    /// URL template every entry point resolves against.
    pub source_url: String,
    /// Query parameter bound to the live-search input.
    pub search_param: String,
    /// Debounce window applied to every entry point.
    pub debounce: Duration,
    /// Parameters dropped when the search value changes.
    pub clear_params: Vec<String>,
    /// Suppress the target's downstream change notification on apply.
    pub quiet: bool,
}

impl Default for SwapOptions {
    fn default() -> Self {
        Self {
            source_url: String::new(),
            search_param: DEFAULT_SEARCH_PARAM.to_string(),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            clear_params: DEFAULT_CLEAR_PARAMS
                .iter()
                .map(|param| param.to_string())
                .collect(),
            quiet: false,
        }
    }
}

/// Performs "refresh this region from this URL" with at-most-one-in-flight
/// semantics. Cloning yields another handle onto the same instance.
#[derive(Clone)]
pub struct SwapEngine {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for SwapEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwapEngine").finish_non_exhaustive()
    }
}

struct Inner {
    fetcher: Arc<dyn FragmentFetcher>,
    target: Arc<dyn SwapTarget>,
    location: Arc<Location>,
    bus: EventBus,
    options: SwapOptions,
    source_url: Mutex<String>,
    guards: Mutex<Vec<Box<dyn BeginGuard>>>,
    /// Currency token: completion handlers compare their captured generation
    /// against this before applying effects.
    generation: AtomicU64,
    debounce_seq: AtomicU64,
    cancel: Mutex<CancellationToken>,
    loading: AtomicBool,
}

impl SwapEngine {
    /// Resolves the engine's one target and source URL. A missing target or
    /// an empty source URL is fatal here, not a runtime condition.
    pub fn attach(
        fetcher: Arc<dyn FragmentFetcher>,
        target: Option<Arc<dyn SwapTarget>>,
        location: Arc<Location>,
        bus: EventBus,
        options: SwapOptions,
    ) -> Result<Self, AttachError> {
        let Some(target) = target else {
            client_error!("swap attach failed: no target resolved");
            return Err(AttachError::MissingTarget);
        };
        if options.source_url.trim().is_empty() {
            client_error!("swap attach failed: no source url configured");
            return Err(AttachError::MissingSourceUrl);
        }

        let source_url = options.source_url.clone();
        Ok(Self {
            inner: Arc::new(Inner {
                fetcher,
                target,
                location,
                bus,
                options,
                source_url: Mutex::new(source_url),
                guards: Mutex::new(Vec::new()),
                generation: AtomicU64::new(0),
                debounce_seq: AtomicU64::new(0),
                cancel: Mutex::new(CancellationToken::new()),
                loading: AtomicBool::new(false),
            }),
        })
    }

    /// Registers a guard polled on every begin notification.
    pub fn add_begin_guard(&self, guard: Box<dyn BeginGuard>) {
        self.inner.guards.lock().unwrap().push(guard);
    }

    /// Current source URL. Rotated by session-descriptor ingestion.
    pub fn source_url(&self) -> String {
        self.inner.source_url.lock().unwrap().clone()
    }

    pub fn set_source_url(&self, url: impl Into<String>) {
        *self.inner.source_url.lock().unwrap() = url.into();
    }

    pub fn is_loading(&self) -> bool {
        self.inner.loading.load(Ordering::SeqCst)
    }

    /// Spawns a task that treats every `Ping` bus event as a `replace`
    /// against the current source URL.
    pub fn listen_for_pings(&self) -> tokio::task::JoinHandle<()> {
        let engine = self.clone();
        let mut events = self.inner.bus.subscribe();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(ConsoleEvent::Ping) => {
                        let _ = engine.replace(None).await;
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        client_debug!("ping listener lagged, skipped {} events", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }

    /// Ad-hoc trigger: refresh the region from `url`, falling back to the
    /// configured source URL.
    pub async fn replace(&self, url: Option<&str>) -> Result<SwapOutcome, FetchError> {
        if !self.debounced().await {
            return Ok(SwapOutcome::Superseded);
        }
        let request_url = match url {
            Some(url) => url.to_string(),
            None => self.source_url(),
        };
        self.perform(request_url).await
    }

    /// Live-search entry point. No-ops when the trimmed value equals the
    /// trimmed current query parameter; otherwise refreshes and, only after
    /// success, advances the visible URL.
    pub async fn search(&self, value: &str) -> Result<SwapOutcome, FetchError> {
        if !self.debounced().await {
            return Ok(SwapOutcome::Superseded);
        }

        let current_query = self.inner.location.query();
        let Some(new_query) = reconcile_search(
            &current_query,
            &self.inner.options.search_param,
            value,
            &self.inner.options.clear_params,
        ) else {
            client_debug!("search value unchanged, no fetch");
            return Ok(SwapOutcome::NoChange);
        };

        let request_url = url_with_query(&self.source_url(), &new_query)?;
        let outcome = self.perform(request_url).await?;
        if outcome == SwapOutcome::Applied {
            self.inner.location.set_query(&new_query);
        }
        Ok(outcome)
    }

    /// Bare form submission: serialize fields against the configured source
    /// URL. Never touches the visible URL.
    pub async fn submit(&self, fields: &[(String, String)]) -> Result<SwapOutcome, FetchError> {
        if !self.debounced().await {
            return Ok(SwapOutcome::Superseded);
        }
        let request_url = url_with_query(&self.source_url(), &encode_pairs(fields))?;
        self.perform(request_url).await
    }

    /// Coalesces rapid triggers: sleeps the debounce window and reports
    /// whether this call is still the latest one.
    async fn debounced(&self) -> bool {
        let seq = self.inner.debounce_seq.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.inner.options.debounce.is_zero() {
            tokio::time::sleep(self.inner.options.debounce).await;
        }
        seq == self.inner.debounce_seq.load(Ordering::SeqCst)
    }

    /// The one primitive every entry point layers on.
    async fn perform(&self, request_url: String) -> Result<SwapOutcome, FetchError> {
        // Supersede any in-flight request. Token and generation are swapped
        // under the same lock so they stay paired.
        let (token, generation) = {
            let mut current = self.inner.cancel.lock().unwrap();
            current.cancel();
            let token = CancellationToken::new();
            *current = token.clone();
            let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
            (token, generation)
        };

        self.inner.bus.publish(ConsoleEvent::SwapBegin {
            request_url: request_url.clone(),
        });
        if !self.begin_allowed(&request_url) {
            client_debug!("swap vetoed by begin guard url={}", request_url);
            return Ok(SwapOutcome::Vetoed);
        }

        // Loading becomes visible only if the request is still in flight
        // after the delay.
        {
            let engine = self.clone();
            let token = token.clone();
            tokio::spawn(async move {
                tokio::time::sleep(LOADING_DELAY).await;
                if !token.is_cancelled() {
                    engine.inner.loading.store(true, Ordering::SeqCst);
                }
            });
        }

        let result = tokio::select! {
            _ = token.cancelled() => {
                client_debug!("swap superseded in flight url={}", request_url);
                return Ok(SwapOutcome::Superseded);
            }
            result = self.inner.fetcher.fetch(&request_url) => result,
        };

        // Cleanup and apply are both gated on currency: a superseded call
        // must not clear loading state it no longer owns.
        let is_current =
            generation == self.inner.generation.load(Ordering::SeqCst) && !token.is_cancelled();

        match result {
            Err(error) => {
                if is_current {
                    self.inner.loading.store(false, Ordering::SeqCst);
                    // Retire the token so the pending loading task no-ops.
                    token.cancel();
                }
                client_error!("swap fetch failed url={} error={}", request_url, error);
                self.inner.bus.publish(ConsoleEvent::SwapError {
                    request_url,
                    error: error.to_string(),
                });
                Err(error)
            }
            Ok(output) => {
                if !is_current {
                    client_debug!("stale swap response discarded url={}", request_url);
                    return Ok(SwapOutcome::Superseded);
                }
                self.inner.target.replace(&output.body);
                if !self.inner.options.quiet {
                    self.inner.target.notify_changed();
                }
                self.inner.loading.store(false, Ordering::SeqCst);
                token.cancel();
                self.inner.bus.publish(ConsoleEvent::SwapSuccess {
                    request_url,
                    results: output.body,
                });
                if let Some(data) = output.json {
                    self.inner.bus.publish(ConsoleEvent::SwapJson { data });
                }
                Ok(SwapOutcome::Applied)
            }
        }
    }

    fn begin_allowed(&self, request_url: &str) -> bool {
        self.inner
            .guards
            .lock()
            .unwrap()
            .iter()
            .all(|guard| guard.allow(request_url))
    }
}

fn url_with_query(base: &str, query: &str) -> Result<String, FetchError> {
    let mut url =
        Url::parse(base).map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
    if query.is_empty() {
        url.set_query(None);
    } else {
        url.set_query(Some(query));
    }
    Ok(url.to_string())
}
