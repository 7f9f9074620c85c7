//! Live scoreboard server entrypoint wiring REST, SSE and the storage supervisor.

use std::net::SocketAddr;

use anyhow::Context;
use axum::Router;
use live_scoreboard::{
    config::AppConfig,
    dao::match_store::{check_scheme, connect_store},
    error::panic_response,
    logging, routes,
    services::storage_supervisor,
    state::{AppState, SharedState},
};
use tokio::net::TcpListener;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing(logging::SERVER_FILTER);

    let config = AppConfig::load();
    let app_state = build_state(&config)?;

    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Start unconfigured without `DATABASE_URL`, otherwise hand the URL to the storage supervisor.
fn build_state(config: &AppConfig) -> anyhow::Result<SharedState> {
    let Some(url) = config.database_url.clone() else {
        warn!("DATABASE_URL is not set; match endpoints answer 503 until it is configured");
        return Ok(AppState::unconfigured());
    };

    let scheme = check_scheme(&url).context("checking DATABASE_URL")?;
    info!(%scheme, "storage backend selected");

    let state = AppState::new();
    let mongo_db = config.mongo_db.clone();
    tokio::spawn(storage_supervisor::run(state.clone(), move || {
        let url = url.clone();
        let mongo_db = mongo_db.clone();
        async move { connect_store(&url, Some(&mongo_db)).await }
    }));
    Ok(state)
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                warn!(error = %err, "SIGTERM handler unavailable; waiting for Ctrl+C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
