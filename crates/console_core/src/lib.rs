//! Console core: pure state machine and query helpers for the admin client.
//!
//! Nothing in this crate performs IO. The session synchronizer's behavior is
//! expressed as a pure `update` function over [`SyncState`]; the runtime
//! crates interpret the returned [`Effect`]s.
mod descriptor;
mod effect;
mod msg;
mod query;
mod state;
mod update;
mod view_model;

pub use descriptor::{OtherSession, SessionDescriptor};
pub use effect::Effect;
pub use msg::Msg;
pub use state::{
    PendingAction, Phase, ReplayTarget, SyncState, DEFAULT_HEARTBEAT_MS, HEARTBEAT_DISABLE_AT,
};
pub use query::{
    encode_pairs, param_value, reconcile_search, DEFAULT_CLEAR_PARAMS, DEFAULT_SEARCH_PARAM,
};
pub use update::update;
pub use view_model::SyncViewModel;
