use crate::ReplayTarget;

/// Side effects requested by the pure update function. The runtime crate
/// interprets these against its handles; the core never performs them itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Replace the heartbeat timer with one firing every `interval_ms`.
    RestartHeartbeat { interval_ms: u64 },
    /// Tear down the heartbeat timer entirely.
    SuspendHeartbeat,
    /// Re-emit the platform visibility change as a domain event.
    BroadcastVisibility { hidden: bool },
    /// Replace the "other sessions" fragment with `html`.
    RenderSessions { html: String },
    /// Point the next heartbeat poll at `url`.
    SetPingUrl { url: String },
    /// Point the session-release action at `url`.
    SetReleaseUrl { url: String },
    /// Materialize the unsaved-changes flag into the hidden form field.
    SetUnsavedField { checked: bool },
    /// Make the reload affordance ask for confirmation before reloading.
    RequireReloadConfirmation,
    /// Restore the reload affordance's direct-reload wiring.
    RestoreDirectReload,
    /// Preemptively hide any other confirmation dialog for this resource.
    CloseOtherDialogs,
    /// Show the confirmation dialog, labeling its confirm control.
    ShowConfirmation { label: String },
    /// Interception is off: let the action proceed untouched.
    AllowAction { target: ReplayTarget },
    /// The user confirmed: replay the intercepted action exactly once.
    ReplayAction { target: ReplayTarget },
}
