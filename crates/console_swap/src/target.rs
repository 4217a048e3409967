use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// The one region an engine instance is allowed to write into. Resolved once
/// at attach time; only non-superseded successful completions may call it.
pub trait SwapTarget: Send + Sync {
    /// Replaces the region's contents with `html` verbatim.
    fn replace(&self, html: &str);

    /// Downstream change notification after an apply. Suppressed by the
    /// engine's quiet flag.
    fn notify_changed(&self) {}
}

/// In-memory target for headless hosts and tests.
#[derive(Debug, Default)]
pub struct BufferTarget {
    contents: Mutex<String>,
    changes: AtomicUsize,
}

impl BufferTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        self.contents.lock().unwrap().clone()
    }

    /// How many change notifications have been delivered.
    pub fn changes(&self) -> usize {
        self.changes.load(Ordering::SeqCst)
    }
}

impl SwapTarget for BufferTarget {
    fn replace(&self, html: &str) {
        *self.contents.lock().unwrap() = html.to_string();
    }

    fn notify_changed(&self) {
        self.changes.fetch_add(1, Ordering::SeqCst);
    }
}
