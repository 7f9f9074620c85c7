use axum::Router;

use crate::state::SharedState;

pub mod docs;
pub mod health;
pub mod matches;
pub mod sse;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    Router::new()
        .nest("/api", matches::router().merge(sse::router()))
        .merge(health::router())
        .merge(docs::router())
        .with_state(state)
}
