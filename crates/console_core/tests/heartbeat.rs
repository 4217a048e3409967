use console_core::{update, Effect, Msg, SyncState, HEARTBEAT_DISABLE_AT};

#[test]
fn changing_the_interval_replaces_the_timer() {
    let state = SyncState::default();

    let (state, effects) = update(state, Msg::IntervalChanged(5_000));

    assert_eq!(state.view().interval_ms, 5_000);
    assert!(state.view().heartbeat_active);
    assert_eq!(
        effects,
        vec![Effect::RestartHeartbeat { interval_ms: 5_000 }]
    );
}

#[test]
fn zero_interval_suspends_the_heartbeat() {
    let state = SyncState::default();

    let (state, effects) = update(state, Msg::IntervalChanged(0));

    assert!(!state.view().heartbeat_active);
    assert_eq!(effects, vec![Effect::SuspendHeartbeat]);
}

#[test]
fn out_of_range_interval_suspends_the_heartbeat() {
    let state = SyncState::default();

    let (state, effects) = update(state, Msg::IntervalChanged(HEARTBEAT_DISABLE_AT));

    assert!(!state.view().heartbeat_active);
    assert_eq!(effects, vec![Effect::SuspendHeartbeat]);
}

#[test]
fn suspended_heartbeat_can_be_rearmed() {
    let state = SyncState::default();
    let (state, _effects) = update(state, Msg::IntervalChanged(0));

    let (state, effects) = update(state, Msg::IntervalChanged(10_000));

    assert!(state.view().heartbeat_active);
    assert_eq!(
        effects,
        vec![Effect::RestartHeartbeat {
            interval_ms: 10_000
        }]
    );
}

#[test]
fn visibility_changes_are_rebroadcast() {
    let state = SyncState::default();

    let (state, effects) = update(state, Msg::VisibilityChanged { hidden: true });
    assert!(state.view().hidden);
    assert_eq!(effects, vec![Effect::BroadcastVisibility { hidden: true }]);

    let (state, effects) = update(state, Msg::VisibilityChanged { hidden: false });
    assert!(!state.view().hidden);
    assert_eq!(effects, vec![Effect::BroadcastVisibility { hidden: false }]);
}
