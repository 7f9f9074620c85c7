use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the live scoreboard API.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::matches::list_matches,
        crate::routes::matches::get_match,
        crate::routes::matches::create_match,
        crate::routes::matches::update_match,
        crate::routes::matches::delete_match,
        crate::routes::sse::match_events,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::matches::MatchDto,
            crate::dto::matches::CreateMatchRequest,
            crate::dto::matches::UpdateMatchRequest,
            crate::dto::sse::Handshake,
            crate::dto::sse::SystemStatus,
            crate::error::ErrorBody,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "matches", description = "Match CRUD; creating a match replaces all others"),
        (name = "sse", description = "Server-sent events streams"),
    )
)]
pub struct ApiDoc;
