//! Service configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). The store selection is resolved here
//! into a [`StoreConfig`], whose `Unconfigured` variant stands for "no
//! database credentials were provided".

use std::net::SocketAddr;

/// Top-level service configuration.
///
/// Loaded once at startup via [`TallyConfig::from_env`].
#[derive(Debug, Clone)]
pub struct TallyConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Which submissions store to use.
    pub store: StoreConfig,

    /// Minimum seconds between two submissions from one session.
    pub rate_limit_window_secs: u64,

    /// Capacity of the EventBus broadcast channel.
    pub event_bus_capacity: usize,

    /// Emit logs as JSON lines instead of human-readable text.
    pub log_json: bool,

    /// Upper bound in seconds on handling one HTTP request.
    pub request_timeout_secs: u64,
}

/// Submissions store selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// PostgreSQL via sqlx.
    Postgres(PostgresSettings),
    /// Volatile in-process store.
    Memory,
    /// No store available; intake and stats report `ServiceUnavailable`.
    Unconfigured,
}

/// Connection settings for the PostgreSQL store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresSettings {
    /// PostgreSQL connection string.
    pub database_url: String,

    /// Maximum number of database connections in the pool.
    pub max_connections: u32,

    /// Minimum idle connections in the pool.
    pub min_connections: u32,

    /// Timeout in seconds for acquiring a database connection.
    pub connect_timeout_secs: u64,

    /// Apply embedded migrations at startup.
    pub run_migrations: bool,
}

/// Configuration errors that abort startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `LISTEN_ADDR` is not a socket address.
    #[error("invalid LISTEN_ADDR {value:?}: {source}")]
    ListenAddr {
        /// Offending value.
        value: String,
        /// Parse failure.
        source: std::net::AddrParseError,
    },

    /// `STORE_BACKEND` names an unknown backend.
    #[error("unknown STORE_BACKEND {0:?} (expected \"postgres\" or \"memory\")")]
    StoreBackend(String),
}

impl TallyConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `LISTEN_ADDR` is set but cannot be
    /// parsed, or if `STORE_BACKEND` is not a known backend.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`TallyConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_raw = lookup("LISTEN_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let listen_addr: SocketAddr = listen_raw
            .parse()
            .map_err(|source| ConfigError::ListenAddr {
                value: listen_raw.clone(),
                source,
            })?;

        let backend = lookup("STORE_BACKEND")
            .map(|v| v.trim().to_ascii_lowercase())
            .unwrap_or_else(|| "postgres".to_string());

        let store = match backend.as_str() {
            "memory" => StoreConfig::Memory,
            "postgres" => match lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
                Some(database_url) => StoreConfig::Postgres(PostgresSettings {
                    database_url,
                    max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10),
                    min_connections: parse_or(&lookup, "DATABASE_MIN_CONNECTIONS", 1),
                    connect_timeout_secs: parse_or(&lookup, "DATABASE_CONNECT_TIMEOUT_SECS", 5),
                    run_migrations: parse_bool_or(&lookup, "DATABASE_RUN_MIGRATIONS", true),
                }),
                None => StoreConfig::Unconfigured,
            },
            other => return Err(ConfigError::StoreBackend(other.to_string())),
        };

        Ok(Self {
            listen_addr,
            store,
            rate_limit_window_secs: parse_or(&lookup, "RATE_LIMIT_WINDOW_SECS", 60),
            event_bus_capacity: parse_or(&lookup, "EVENT_BUS_CAPACITY", 1024),
            log_json: lookup("LOG_FORMAT").is_some_and(|v| v.eq_ignore_ascii_case("json")),
            request_timeout_secs: parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30),
        })
    }
}

/// Parses a variable as `T`, returning `default` on missing or invalid
/// values.
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Parses a variable as a boolean. Accepts `"true"`, `"1"`, `"false"`,
/// `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_bool_or<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("true" | "1") => true,
        Some("false" | "0") => false,
        _ => default,
    }
}
