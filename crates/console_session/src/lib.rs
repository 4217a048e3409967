//! Session synchronizer runtime: heartbeat scheduling, bus ingestion and
//! effect execution around the pure state machine in `console_core`.
//!
//! The synchronizer never calls the swap engine's fetch path. It emits `Ping`
//! events and consumes `SwapJson` events; the only direct touch point is
//! rewriting the engine's declarative source URL when the server rotates the
//! session's ping target.
mod handles;
mod synchronizer;

pub use handles::{ActionRunner, ConfirmationDialog, PollTarget, ReloadMode, UnsavedField};
pub use synchronizer::{InterceptDecision, SessionOptions, SessionSynchronizer};
