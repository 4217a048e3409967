//! Console swap engine: guarded, cancelable fragment refreshes.
//!
//! One engine instance owns one swap target and one source URL. All entry
//! points funnel through a single primitive with at-most-one-in-flight
//! semantics; completion handlers check a currency token before touching the
//! target, so a slow stale response can never clobber newer content.
mod fetch;
mod location;
mod swap;
mod target;
mod types;

pub use fetch::{
    FetchSettings, FragmentFetcher, ReqwestFetcher, PARTIAL_REQUEST_HEADER, PARTIAL_REQUEST_VALUE,
};
pub use location::Location;
pub use swap::{AttachError, BeginGuard, SwapEngine, SwapOptions, DEFAULT_DEBOUNCE_MS};
pub use target::{BufferTarget, SwapTarget};
pub use types::{FailureKind, FetchError, FetchOutput, SwapOutcome};
