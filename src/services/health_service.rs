use tracing::warn;

use crate::{
    dto::health::HealthResponse,
    error::DATABASE_SETUP_MESSAGE,
    state::{SharedState, StorageStatus},
};

/// Report the storage status, pinging the backend when one is installed.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    match state.require_match_store().await {
        Ok(store) => {
            if let Err(err) = store.health_check().await {
                warn!(error = %err, "storage health check failed");
            }
        }
        Err(err) => warn!(error = %err, "storage unavailable"),
    }

    match state.status() {
        StorageStatus::Ready => HealthResponse::ok(),
        StorageStatus::Degraded => HealthResponse::degraded(),
        StorageStatus::Unconfigured => HealthResponse::unconfigured(DATABASE_SETUP_MESSAGE),
    }
}
