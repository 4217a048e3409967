use crate::ReplayTarget;

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Heartbeat interval reconfigured at runtime, in milliseconds.
    IntervalChanged(u64),
    /// Platform page-visibility changed.
    VisibilityChanged { hidden: bool },
    /// A structured session payload arrived from a swap response.
    DescriptorReceived(serde_json::Value),
    /// An editor-of-record reported unsaved changes.
    UnsavedAdded,
    /// An editor-of-record reported all changes saved.
    UnsavedCleared,
    /// A submit-like action was triggered by the user.
    SubmitAttempted {
        label: String,
        target: ReplayTarget,
    },
    /// The confirmation dialog's confirm control was activated.
    DialogConfirmed,
    /// The confirmation dialog was hidden without confirming.
    DialogDismissed,
    /// Fallback for placeholder wiring.
    NoOp,
}
