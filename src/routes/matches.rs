use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::{
        matches::{CreateMatchRequest, MatchDto, UpdateMatchRequest},
        validation::ValidatedJson,
    },
    error::{AppError, ErrorBody},
    services::match_service,
    state::SharedState,
};

/// Match CRUD routes, mounted under `/api`.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/matches", get(list_matches).post(create_match))
        .route(
            "/matches/{id}",
            get(get_match).put(update_match).delete(delete_match),
        )
}

#[utoipa::path(
    get,
    path = "/api/matches",
    tag = "matches",
    responses(
        (status = 200, description = "All matches ordered by id", body = [MatchDto]),
        (status = 503, description = "Storage unavailable or not configured", body = ErrorBody)
    )
)]
/// List every stored match; the first one is the match on screen.
pub async fn list_matches(
    State(state): State<SharedState>,
) -> Result<Json<Vec<MatchDto>>, AppError> {
    Ok(Json(match_service::list_matches(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/matches/{id}",
    tag = "matches",
    params(("id" = i32, Path, description = "Match identifier")),
    responses(
        (status = 200, description = "Match found", body = MatchDto),
        (status = 400, description = "Identifier is not an integer", body = ErrorBody),
        (status = 404, description = "No match with this identifier", body = ErrorBody)
    )
)]
/// Fetch a single match.
pub async fn get_match(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<MatchDto>, AppError> {
    let id = match_service::parse_match_id(&id)?;
    Ok(Json(match_service::get_match(&state, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/matches",
    tag = "matches",
    request_body = CreateMatchRequest,
    responses(
        (status = 201, description = "Match created, previous matches removed", body = MatchDto),
        (status = 400, description = "Invalid payload", body = ErrorBody)
    )
)]
/// Create a match, replacing every existing one.
pub async fn create_match(
    State(state): State<SharedState>,
    ValidatedJson(payload): ValidatedJson<CreateMatchRequest>,
) -> Result<(StatusCode, Json<MatchDto>), AppError> {
    let created = match_service::create_match(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/api/matches/{id}",
    tag = "matches",
    params(("id" = i32, Path, description = "Match identifier")),
    request_body = UpdateMatchRequest,
    responses(
        (status = 200, description = "Match updated", body = MatchDto),
        (status = 400, description = "Invalid payload or identifier", body = ErrorBody),
        (status = 404, description = "No match with this identifier", body = ErrorBody)
    )
)]
/// Apply a partial update to a match.
pub async fn update_match(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateMatchRequest>,
) -> Result<Json<MatchDto>, AppError> {
    let id = match_service::parse_match_id(&id)?;
    Ok(Json(match_service::update_match(&state, id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/matches/{id}",
    tag = "matches",
    params(("id" = i32, Path, description = "Match identifier")),
    responses(
        (status = 204, description = "Match removed (or already absent)"),
        (status = 400, description = "Identifier is not an integer", body = ErrorBody)
    )
)]
/// Delete a match.
pub async fn delete_match(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = match_service::parse_match_id(&id)?;
    match_service::delete_match(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
