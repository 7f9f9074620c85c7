use serde::Serialize;
use tracing::warn;

use crate::{
    dto::{
        matches::MatchDto,
        sse::{MATCHES_CHANGED_EVENT, MatchesChangedEvent, ServerEvent, SystemStatus},
    },
    state::SharedState,
};

const EVENT_SYSTEM_STATUS: &str = "system.status";

/// Broadcast the full match list after a successful write.
pub fn broadcast_matches_changed(state: &SharedState, matches: Vec<MatchDto>) {
    send_event(state, MATCHES_CHANGED_EVENT, &MatchesChangedEvent(matches));
}

/// Broadcast whether the backend currently serves requests.
pub fn broadcast_system_status(state: &SharedState) {
    let payload = SystemStatus {
        degraded: state.is_degraded(),
    };
    send_event(state, EVENT_SYSTEM_STATUS, &payload);
}

/// Serialise `payload` into a named event without broadcasting it.
pub fn build_event(event: &str, payload: &impl Serialize) -> Option<ServerEvent> {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => Some(event),
        Err(err) => {
            warn!(event, error = %err, "failed to serialize SSE payload");
            None
        }
    }
}

fn send_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    if let Some(event) = build_event(event, payload) {
        state.events().broadcast(event);
    }
}
