use serde::Serialize;
use utoipa::ToSchema;

/// Simple health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("ok", "degraded" or "unconfigured").
    pub status: String,
    /// Setup hint, present only while no database is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HealthResponse {
    /// Create a health response indicating the system is operational.
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            message: None,
        }
    }

    /// Create a health response indicating the system is in degraded mode.
    pub fn degraded() -> Self {
        Self {
            status: "degraded".to_string(),
            message: None,
        }
    }

    /// No `DATABASE_URL` was supplied; carries the setup instructions.
    pub fn unconfigured(message: impl Into<String>) -> Self {
        Self {
            status: "unconfigured".to_string(),
            message: Some(message.into()),
        }
    }
}
