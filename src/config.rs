//! Application-level configuration loading: JSON file first, then environment overrides.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

use crate::clock::{MatchClock, REGULATION_SECONDS};

/// Default location on disk where the binaries look for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "SCOREBOARD_CONFIG_PATH";

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MONGO_DB: &str = "scoreboard";
const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_SYNC_THROTTLE_MS: u64 = 250;
const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;
const DEFAULT_TICK_INTERVAL_MS: u64 = 1_000;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Immutable runtime configuration shared by the server and the consoles.
pub struct AppConfig {
    /// Port the HTTP server binds on all interfaces.
    pub port: u16,
    /// Storage backend location; `None` leaves the server unconfigured (503).
    pub database_url: Option<String>,
    /// Database name used by the MongoDB backend.
    pub mongo_db: String,
    /// Base URL the admin and display consoles talk to.
    pub api_url: String,
    reset_seconds: u32,
    sync_throttle_ms: u64,
    poll_interval_ms: u64,
    tick_interval_ms: u64,
}

impl AppConfig {
    /// Load the configuration file (if any) and apply environment overrides.
    pub fn load() -> Self {
        Self::from_file().with_env_overrides(|key| env::var(key).ok())
    }

    fn from_file() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    info!(path = %path.display(), "loaded configuration file");
                    raw.into()
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Apply `PORT`/`SERVER_PORT`, `DATABASE_URL`, `MONGO_DB` and `SCOREBOARD_API_URL`.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(raw) = non_empty("PORT").or_else(|| non_empty("SERVER_PORT")) {
            match raw.trim().parse::<u16>() {
                Ok(port) => self.port = port,
                Err(err) => warn!(value = %raw, error = %err, "ignoring invalid port override"),
            }
        }
        if let Some(url) = non_empty("DATABASE_URL") {
            self.database_url = Some(url);
        }
        if let Some(name) = non_empty("MONGO_DB") {
            self.mongo_db = name;
        }
        if let Some(url) = non_empty("SCOREBOARD_API_URL") {
            self.api_url = url;
        }
        self
    }

    /// Clock value a reset starts the countdown from.
    pub fn reset_clock(&self) -> MatchClock {
        MatchClock::from_seconds(self.reset_seconds)
    }

    /// Minimum spacing between background time syncs.
    pub fn sync_throttle(&self) -> Duration {
        Duration::from_millis(self.sync_throttle_ms)
    }

    /// Interval between two polls of the API.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Countdown tick cadence.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        RawConfig::default().into()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    port: Option<u16>,
    database_url: Option<String>,
    mongo_db: Option<String>,
    api_url: Option<String>,
    reset_seconds: Option<u32>,
    sync_throttle_ms: Option<u64>,
    poll_interval_ms: Option<u64>,
    tick_interval_ms: Option<u64>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        Self {
            port: value.port.unwrap_or(DEFAULT_PORT),
            database_url: value.database_url.filter(|url| !url.trim().is_empty()),
            mongo_db: value.mongo_db.unwrap_or_else(|| DEFAULT_MONGO_DB.into()),
            api_url: value.api_url.unwrap_or_else(|| DEFAULT_API_URL.into()),
            reset_seconds: value.reset_seconds.unwrap_or(REGULATION_SECONDS),
            sync_throttle_ms: value.sync_throttle_ms.unwrap_or(DEFAULT_SYNC_THROTTLE_MS),
            poll_interval_ms: value
                .poll_interval_ms
                .filter(|ms| *ms > 0)
                .unwrap_or(DEFAULT_POLL_INTERVAL_MS),
            tick_interval_ms: value
                .tick_interval_ms
                .filter(|ms| *ms > 0)
                .unwrap_or(DEFAULT_TICK_INTERVAL_MS),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_match_the_scoreboard_cadence() {
        let config = AppConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_url, None);
        assert_eq!(config.reset_clock().to_string(), "12:00");
        assert_eq!(config.sync_throttle(), Duration::from_millis(250));
        assert_eq!(config.poll_interval(), Duration::from_secs(2));
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
    }

    #[test]
    fn file_values_are_partial() {
        let raw: RawConfig = serde_json::from_str(r#"{"port": 9000, "poll_interval_ms": 500}"#).unwrap();
        let config = AppConfig::from(raw);
        assert_eq!(config.port, 9000);
        assert_eq!(config.poll_interval(), Duration::from_millis(500));
        assert_eq!(config.mongo_db, "scoreboard");
    }

    #[test]
    fn env_overrides_win_and_port_falls_back_to_server_port() {
        let config = AppConfig::default().with_env_overrides(lookup(&[
            ("SERVER_PORT", "3000"),
            ("DATABASE_URL", "memory://"),
            ("SCOREBOARD_API_URL", "http://scores:3000"),
        ]));
        assert_eq!(config.port, 3000);
        assert_eq!(config.database_url.as_deref(), Some("memory://"));
        assert_eq!(config.api_url, "http://scores:3000");
    }

    #[test]
    fn empty_database_url_counts_as_missing() {
        let config = AppConfig::default().with_env_overrides(lookup(&[("DATABASE_URL", " ")]));
        assert_eq!(config.database_url, None);
    }

    #[test]
    fn invalid_port_is_ignored() {
        let config = AppConfig::default().with_env_overrides(lookup(&[("PORT", "eighty")]));
        assert_eq!(config.port, 8080);
    }
}
