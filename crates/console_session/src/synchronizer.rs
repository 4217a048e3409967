use std::sync::{Arc, Mutex};
use std::time::Duration;

use client_logging::{client_debug, client_info};
use console_core::{
    update, Effect, Msg, ReplayTarget, SyncState, SyncViewModel, DEFAULT_HEARTBEAT_MS,
};
use console_events::{ConsoleEvent, EventBus};
use console_swap::SwapTarget;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::{ActionRunner, ConfirmationDialog, PollTarget, ReloadMode, UnsavedField};

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Heartbeat interval in milliseconds. Zero or out-of-range suspends.
    pub interval_ms: u64,
    /// Whether submit-like actions are intercepted for confirmation.
    pub intercept: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_HEARTBEAT_MS,
            intercept: false,
        }
    }
}

/// What the host should do with the submit-like action it just reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterceptDecision {
    /// Let the action run its default behavior.
    Proceed,
    /// The action was captured; hold it until the dialog resolves.
    Intercepted,
}

/// Owns the heartbeat timer and drives the pure state machine from bus
/// events. Cloning yields another handle onto the same instance.
#[derive(Clone)]
pub struct SessionSynchronizer {
    inner: Arc<Inner>,
}

struct Inner {
    bus: EventBus,
    state: Mutex<SyncState>,
    poll_target: Arc<dyn PollTarget>,
    sessions_target: Arc<dyn SwapTarget>,
    dialog: Arc<dyn ConfirmationDialog>,
    runner: Arc<dyn ActionRunner>,
    /// Absent when the page has no unsaved-changes field; updates no-op.
    unsaved_field: Option<Arc<UnsavedField>>,
    release_url: Mutex<Option<String>>,
    reload_mode: Mutex<ReloadMode>,
    /// Explicitly owned, restartable interval handle. Reconfiguring cancels
    /// and recreates rather than layering a second timer.
    heartbeat: Mutex<Option<JoinHandle<()>>>,
}

impl SessionSynchronizer {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        bus: EventBus,
        poll_target: Arc<dyn PollTarget>,
        sessions_target: Arc<dyn SwapTarget>,
        dialog: Arc<dyn ConfirmationDialog>,
        runner: Arc<dyn ActionRunner>,
        unsaved_field: Option<Arc<UnsavedField>>,
        options: SessionOptions,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                bus,
                state: Mutex::new(SyncState::new(options.intercept, options.interval_ms)),
                poll_target,
                sessions_target,
                dialog,
                runner,
                unsaved_field,
                release_url: Mutex::new(None),
                reload_mode: Mutex::new(ReloadMode::Direct),
                heartbeat: Mutex::new(None),
            }),
        }
    }

    /// Starts the heartbeat (first ping fires immediately) and the bus
    /// ingestion task. Must be called within a tokio runtime.
    pub fn attach(&self) -> JoinHandle<()> {
        // Subscribe before the first ping can produce a response.
        let mut events = self.inner.bus.subscribe();

        let view = self.view();
        if view.heartbeat_active {
            self.start_heartbeat(view.interval_ms);
        }

        let sync = self.clone();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(ConsoleEvent::SwapJson { data }) => {
                        sync.apply(Msg::DescriptorReceived(data));
                    }
                    Ok(ConsoleEvent::UnsavedAdded) => {
                        sync.apply(Msg::UnsavedAdded);
                    }
                    Ok(ConsoleEvent::UnsavedCleared) => {
                        sync.apply(Msg::UnsavedCleared);
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        client_debug!("session ingestion lagged, skipped {} events", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }

    /// Atomically replaces (or suspends) the heartbeat timer.
    pub fn set_interval(&self, interval_ms: u64) {
        self.apply(Msg::IntervalChanged(interval_ms));
    }

    /// Re-emits the platform visibility state as a domain event.
    pub fn page_visibility_changed(&self, hidden: bool) {
        self.apply(Msg::VisibilityChanged { hidden });
    }

    /// Reports a submit-like trigger. `Intercepted` means the host must
    /// suppress the action's default behavior and wait for the dialog.
    pub fn submit_attempted(&self, label: &str, target: ReplayTarget) -> InterceptDecision {
        let effects = self.apply(Msg::SubmitAttempted {
            label: label.to_string(),
            target,
        });
        if effects
            .iter()
            .any(|effect| matches!(effect, Effect::ShowConfirmation { .. }))
        {
            InterceptDecision::Intercepted
        } else {
            InterceptDecision::Proceed
        }
    }

    /// The dialog's confirm control was activated.
    pub fn confirm(&self) {
        self.apply(Msg::DialogConfirmed);
    }

    /// The dialog was hidden without confirming.
    pub fn dismiss(&self) {
        self.apply(Msg::DialogDismissed);
    }

    pub fn release_url(&self) -> Option<String> {
        self.inner.release_url.lock().unwrap().clone()
    }

    pub fn reload_mode(&self) -> ReloadMode {
        *self.inner.reload_mode.lock().unwrap()
    }

    pub fn view(&self) -> SyncViewModel {
        self.inner.state.lock().unwrap().view()
    }

    fn apply(&self, msg: Msg) -> Vec<Effect> {
        let effects = {
            let mut state = self.inner.state.lock().unwrap();
            let (next, effects) = update(state.clone(), msg);
            *state = next;
            effects
        };
        for effect in &effects {
            self.execute(effect);
        }
        effects
    }

    fn execute(&self, effect: &Effect) {
        match effect {
            Effect::RestartHeartbeat { interval_ms } => self.start_heartbeat(*interval_ms),
            Effect::SuspendHeartbeat => {
                if let Some(handle) = self.inner.heartbeat.lock().unwrap().take() {
                    handle.abort();
                    client_info!("heartbeat suspended");
                }
            }
            Effect::BroadcastVisibility { hidden } => {
                let event = if *hidden {
                    ConsoleEvent::PageHidden
                } else {
                    ConsoleEvent::PageVisible
                };
                self.inner.bus.publish(event);
            }
            Effect::RenderSessions { html } => self.inner.sessions_target.replace(html),
            Effect::SetPingUrl { url } => {
                client_debug!("session ping url rotated to {}", url);
                self.inner.poll_target.set_poll_url(url);
            }
            Effect::SetReleaseUrl { url } => {
                *self.inner.release_url.lock().unwrap() = Some(url.clone());
            }
            Effect::SetUnsavedField { checked } => {
                if let Some(field) = &self.inner.unsaved_field {
                    field.set_checked(*checked);
                }
            }
            Effect::RequireReloadConfirmation => {
                *self.inner.reload_mode.lock().unwrap() = ReloadMode::Confirm;
            }
            Effect::RestoreDirectReload => {
                *self.inner.reload_mode.lock().unwrap() = ReloadMode::Direct;
            }
            Effect::CloseOtherDialogs => self.inner.dialog.close_others(),
            Effect::ShowConfirmation { label } => self.inner.dialog.show(label),
            Effect::AllowAction { .. } => {}
            Effect::ReplayAction { target } => {
                self.inner.dialog.hide();
                self.replay(target);
            }
        }
    }

    fn replay(&self, target: &ReplayTarget) {
        client_info!("replaying confirmed action {:?}", target);
        self.inner.runner.run(target);
    }

    fn start_heartbeat(&self, interval_ms: u64) {
        let mut slot = self.inner.heartbeat.lock().unwrap();
        if let Some(handle) = slot.take() {
            handle.abort();
        }
        let bus = self.inner.bus.clone();
        *slot = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_millis(interval_ms));
            loop {
                ticker.tick().await;
                bus.publish(ConsoleEvent::Ping);
            }
        }));
        client_info!("heartbeat armed every {}ms", interval_ms);
    }
}
