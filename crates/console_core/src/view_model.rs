use crate::Phase;

/// Read-only projection of [`crate::SyncState`] for runtimes and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncViewModel {
    pub phase: Phase,
    pub pending_label: Option<String>,
    pub unsaved: bool,
    pub hidden: bool,
    pub interval_ms: u64,
    pub heartbeat_active: bool,
}
