//! Match CRUD on top of the installed [`MatchStore`](crate::dao::match_store::MatchStore).

use tracing::{info, warn};

use crate::{
    dao::models::MatchId,
    dto::matches::{CreateMatchRequest, MatchDto, UpdateMatchRequest},
    error::ServiceError,
    services::sse_events,
    state::SharedState,
};

const MATCH_NOT_FOUND: &str = "Match not found";

/// Parse a path segment into a match identifier.
pub fn parse_match_id(raw: &str) -> Result<MatchId, ServiceError> {
    raw.trim()
        .parse::<MatchId>()
        .map_err(|_| ServiceError::validation("id", format!("id must be an integer (got `{raw}`)")))
}

/// Every stored match ordered by id. The first entry is the one on screen.
pub async fn list_matches(state: &SharedState) -> Result<Vec<MatchDto>, ServiceError> {
    let store = state.require_match_store().await?;
    let matches = store.list().await?;
    Ok(matches.into_iter().map(MatchDto::from).collect())
}

/// Fetch one match.
pub async fn get_match(state: &SharedState, id: MatchId) -> Result<MatchDto, ServiceError> {
    let store = state.require_match_store().await?;
    store
        .find(id)
        .await?
        .map(MatchDto::from)
        .ok_or_else(|| ServiceError::NotFound(MATCH_NOT_FOUND.into()))
}

/// Replace every stored match with a new one.
pub async fn create_match(
    state: &SharedState,
    request: CreateMatchRequest,
) -> Result<MatchDto, ServiceError> {
    let store = state.require_match_store().await?;
    let created = MatchDto::from(store.replace_all(request.into()).await?);
    info!(
        match_id = created.id,
        home = %created.home_team,
        away = %created.away_team,
        "match created; previous matches replaced"
    );

    notify_changed(state).await;
    Ok(created)
}

/// Apply the supplied fields to an existing match.
pub async fn update_match(
    state: &SharedState,
    id: MatchId,
    request: UpdateMatchRequest,
) -> Result<MatchDto, ServiceError> {
    let store = state.require_match_store().await?;
    let updated = store
        .update(id, request.into())
        .await?
        .map(MatchDto::from)
        .ok_or_else(|| ServiceError::NotFound(MATCH_NOT_FOUND.into()))?;

    notify_changed(state).await;
    Ok(updated)
}

/// Remove a match. Deleting an unknown id succeeds.
pub async fn delete_match(state: &SharedState, id: MatchId) -> Result<(), ServiceError> {
    let store = state.require_match_store().await?;
    store.delete(id).await?;
    info!(match_id = id, "match deleted");

    notify_changed(state).await;
    Ok(())
}

async fn notify_changed(state: &SharedState) {
    match list_matches(state).await {
        Ok(matches) => sse_events::broadcast_matches_changed(state, matches),
        Err(err) => warn!(error = %err, "could not reload matches for SSE broadcast"),
    }
}
