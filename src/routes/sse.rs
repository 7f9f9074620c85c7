use std::convert::Infallible;

use axum::{Router, extract::State, response::sse::Sse, routing::get};
use futures::Stream;
use tracing::info;

use crate::{services::sse_service, state::SharedState};

#[utoipa::path(
    get,
    path = "/api/matches/events",
    tag = "sse",
    responses((status = 200, description = "`matches.changed` events carrying the full match list", content_type = "text/event-stream", body = String))
)]
/// Push the match list to subscribers after every write.
pub async fn match_events(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>> {
    let receiver = sse_service::subscribe(&state);
    info!("New match events SSE connection");
    let initial = sse_service::initial_events(&state).await;
    sse_service::to_sse_stream(receiver, initial)
}

/// Configure the SSE endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/matches/events", get(match_events))
}
