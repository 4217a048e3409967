use std::sync::atomic::{AtomicBool, Ordering};

use console_core::ReplayTarget;
use console_swap::SwapEngine;

/// Wherever the next heartbeat poll should be fetched from.
///
/// The server may rotate this every round; the synchronizer writes the most
/// recently received ping URL here and never caches a stale one.
pub trait PollTarget: Send + Sync {
    fn set_poll_url(&self, url: &str);
}

impl PollTarget for SwapEngine {
    fn set_poll_url(&self, url: &str) {
        self.set_source_url(url);
    }
}

/// The confirmation dialog's event contract. Its visual presentation is
/// someone else's problem.
pub trait ConfirmationDialog: Send + Sync {
    /// Show the dialog with the confirm control labeled `label`.
    fn show(&self, label: &str);
    /// Hide the dialog.
    fn hide(&self);
    /// Preemptively hide any other dialog sharing this resource.
    fn close_others(&self);
}

/// Replays an intercepted submit-like action.
pub trait ActionRunner: Send + Sync {
    fn run(&self, target: &ReplayTarget);
}

/// Hidden form field materializing the unsaved-changes flag, so it survives
/// a normal form submission.
#[derive(Debug, Default)]
pub struct UnsavedField {
    checked: AtomicBool,
}

impl UnsavedField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_checked(&self) -> bool {
        self.checked.load(Ordering::SeqCst)
    }

    pub(crate) fn set_checked(&self, checked: bool) {
        self.checked.store(checked, Ordering::SeqCst);
    }
}

/// Which of two mutually exclusive behaviors the reload affordance performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReloadMode {
    /// Reload immediately.
    #[default]
    Direct,
    /// Show a confirmation dialog first; there are unsaved changes.
    Confirm,
}
