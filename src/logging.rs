//! Tracing subscriber setup shared by every binary.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used by the server when `RUST_LOG` is unset.
pub const SERVER_FILTER: &str = "info,tower_http=debug";
/// Filter used by the consoles, which keep stdout for their own output.
pub const CONSOLE_FILTER: &str = "warn,live_scoreboard=info";

/// Configure tracing subscribers so logs include spans by default.
///
/// Logs go to stderr; `RUST_LOG` overrides `default_filter`.
pub fn init_tracing(default_filter: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
