use crate::view_model::SyncViewModel;

/// Default heartbeat interval in milliseconds.
pub const DEFAULT_HEARTBEAT_MS: u64 = 10_000;

/// Intervals at or above this value (or equal to zero) suspend the heartbeat
/// rather than arming a timer. Mirrors the platform's signed 32-bit timer
/// range; suspension is not an error.
pub const HEARTBEAT_DISABLE_AT: u64 = 1 << 31;

/// What replaying an intercepted action means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayTarget {
    /// Re-trigger the edit form's own submission.
    FormSubmit,
    /// Re-invoke the named workflow action.
    WorkflowAction(String),
}

/// The last user-initiated submit-like action held back for confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAction {
    pub label: String,
    pub target: ReplayTarget,
}

/// Submission-interception phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// A submit-like action was captured and the dialog is showing.
    AwaitingConfirmation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncState {
    intercept_enabled: bool,
    interval_ms: u64,
    phase: Phase,
    pending: Option<PendingAction>,
    unsaved: bool,
    hidden: bool,
}

impl SyncState {
    pub fn new(intercept_enabled: bool, interval_ms: u64) -> Self {
        Self {
            intercept_enabled,
            interval_ms,
            phase: Phase::Idle,
            pending: None,
            unsaved: false,
            hidden: false,
        }
    }

    pub fn view(&self) -> SyncViewModel {
        SyncViewModel {
            phase: self.phase,
            pending_label: self.pending.as_ref().map(|action| action.label.clone()),
            unsaved: self.unsaved,
            hidden: self.hidden,
            interval_ms: self.interval_ms,
            heartbeat_active: self.heartbeat_active(),
        }
    }

    /// Whether the configured interval arms a timer at all.
    pub fn heartbeat_active(&self) -> bool {
        self.interval_ms != 0 && self.interval_ms < HEARTBEAT_DISABLE_AT
    }

    pub fn intercept_enabled(&self) -> bool {
        self.intercept_enabled
    }

    pub(crate) fn set_interval(&mut self, interval_ms: u64) {
        self.interval_ms = interval_ms;
    }

    pub(crate) fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub(crate) fn set_unsaved(&mut self, unsaved: bool) {
        self.unsaved = unsaved;
    }

    /// Captures (or overwrites) the pending action and enters
    /// `AwaitingConfirmation`.
    pub(crate) fn capture(&mut self, pending: PendingAction) {
        self.pending = Some(pending);
        self.phase = Phase::AwaitingConfirmation;
    }

    /// Takes the pending action and returns to `Idle`.
    pub(crate) fn resolve(&mut self) -> Option<PendingAction> {
        self.phase = Phase::Idle;
        self.pending.take()
    }
}

impl Default for SyncState {
    fn default() -> Self {
        Self::new(false, DEFAULT_HEARTBEAT_MS)
    }
}
