//! Typed publish/subscribe contract between the console client components.
//!
//! The swap engine and the session synchronizer never call each other
//! directly; every integration point between them (and with the rest of the
//! page) is one of these events on a shared broadcast bus.

use tokio::sync::broadcast;

/// Every event that crosses a component boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleEvent {
    /// A swap is about to start for `request_url`. Informational on the bus;
    /// vetoing happens through the engine's registered begin guards.
    SwapBegin { request_url: String },
    /// A swap completed and the target was updated with `results`.
    SwapSuccess { request_url: String, results: String },
    /// A swap failed; the target was left untouched.
    SwapError { request_url: String, error: String },
    /// A swap response carried a structured JSON body.
    SwapJson { data: serde_json::Value },
    /// Heartbeat: something should poll the server for fresh session state.
    Ping,
    /// The page became hidden.
    PageHidden,
    /// The page became visible again.
    PageVisible,
    /// An editor-of-record reported unsaved changes.
    UnsavedAdded,
    /// An editor-of-record reported all changes saved.
    UnsavedCleared,
}

/// In-process broadcast bus carrying [`ConsoleEvent`]s.
///
/// Cloning the bus clones a handle onto the same channel, so any number of
/// components can publish and subscribe independently.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ConsoleEvent>,
}

impl EventBus {
    /// Creates a bus retaining up to `capacity` undelivered events per
    /// subscriber before lagging.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to every current subscriber.
    ///
    /// Publishing with no subscribers is not an error; the event is dropped.
    pub fn publish(&self, event: ConsoleEvent) {
        let _ = self.sender.send(event);
    }

    /// Opens a new subscription starting from the next published event.
    pub fn subscribe(&self) -> broadcast::Receiver<ConsoleEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
