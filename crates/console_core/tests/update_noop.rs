use console_core::{update, Msg, SyncState};

#[test]
fn update_is_noop() {
    let state = SyncState::default();
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}
