use crate::{Effect, Msg, PendingAction, SessionDescriptor, SyncState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: SyncState, msg: Msg) -> (SyncState, Vec<Effect>) {
    let effects = match msg {
        Msg::IntervalChanged(interval_ms) => {
            state.set_interval(interval_ms);
            if state.heartbeat_active() {
                // The runtime cancels-and-recreates; two layered timers would
                // double the poll rate.
                vec![Effect::RestartHeartbeat { interval_ms }]
            } else {
                vec![Effect::SuspendHeartbeat]
            }
        }
        Msg::VisibilityChanged { hidden } => {
            state.set_hidden(hidden);
            vec![Effect::BroadcastVisibility { hidden }]
        }
        Msg::DescriptorReceived(value) => {
            let descriptor = SessionDescriptor::from_value(&value);
            // The html fragment is always updated; the URL fields only when
            // the payload actually carried them.
            let mut effects = vec![Effect::RenderSessions {
                html: descriptor.html,
            }];
            if let Some(url) = descriptor.ping_url {
                effects.push(Effect::SetPingUrl { url });
            }
            if let Some(url) = descriptor.release_url {
                effects.push(Effect::SetReleaseUrl { url });
            }
            effects
        }
        Msg::UnsavedAdded => {
            state.set_unsaved(true);
            vec![
                Effect::SetUnsavedField { checked: true },
                Effect::RequireReloadConfirmation,
            ]
        }
        Msg::UnsavedCleared => {
            state.set_unsaved(false);
            vec![
                Effect::SetUnsavedField { checked: false },
                Effect::RestoreDirectReload,
            ]
        }
        Msg::SubmitAttempted { label, target } => {
            if !state.intercept_enabled() {
                return (state, vec![Effect::AllowAction { target }]);
            }
            // A second trigger while awaiting overwrites the pending action
            // and re-shows the dialog; there is no separate branch.
            state.capture(PendingAction {
                label: label.clone(),
                target,
            });
            vec![Effect::CloseOtherDialogs, Effect::ShowConfirmation { label }]
        }
        Msg::DialogConfirmed => match state.resolve() {
            Some(pending) => vec![Effect::ReplayAction {
                target: pending.target,
            }],
            None => Vec::new(),
        },
        Msg::DialogDismissed => {
            // Discard without replaying. After a confirm the slot is already
            // empty, so the dialog's own hide event is a no-op.
            let _ = state.resolve();
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
