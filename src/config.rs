//! Process configuration read from the environment.

use crate::persistence::PersistencePolicy;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::Level;

const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_TIMEOUT_MS: u64 = 5000;
const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_BACKOFF_MS: u64 = 100;

/// A configuration variable held a value that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value {value:?} for {variable}: {reason}")]
pub struct ConfigError {
    /// Name of the offending variable.
    pub variable: &'static str,
    /// The raw value.
    pub value: String,
    /// Why it was rejected.
    pub reason: String,
}

/// Runtime settings for the server binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Listen address.
    pub bind_addr: SocketAddr,
    /// `PostgreSQL` URL; `None` selects in-memory adapters.
    pub database_url: Option<String>,
    /// Maximum pooled connections.
    pub pool_size: u32,
    /// Timeout and retry bounds for persistence calls.
    pub persistence: PersistencePolicy,
    /// Most verbose tracing level emitted.
    pub log_level: Level,
}

impl AppConfig {
    /// Reads configuration from the process environment, loading `.env`
    /// first when present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first variable that fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through an arbitrary key lookup. Unset and blank
    /// variables take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first variable that fails to parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let bind_addr = parse_or(
            read("FIELDLINE_BIND_ADDR"),
            "FIELDLINE_BIND_ADDR",
            default_bind_addr,
        )?;
        let pool_size = parse_or(read("DATABASE_POOL_SIZE"), "DATABASE_POOL_SIZE", || {
            DEFAULT_POOL_SIZE
        })?;
        let timeout_ms = parse_or(
            read("PERSISTENCE_TIMEOUT_MS"),
            "PERSISTENCE_TIMEOUT_MS",
            || DEFAULT_TIMEOUT_MS,
        )?;
        let max_attempts = parse_or(
            read("PERSISTENCE_MAX_ATTEMPTS"),
            "PERSISTENCE_MAX_ATTEMPTS",
            || DEFAULT_MAX_ATTEMPTS,
        )?;
        let backoff_ms = parse_or(
            read("PERSISTENCE_BACKOFF_MS"),
            "PERSISTENCE_BACKOFF_MS",
            || DEFAULT_BACKOFF_MS,
        )?;
        let log_level = parse_or(read("LOG_LEVEL"), "LOG_LEVEL", || Level::INFO)?;

        if pool_size == 0 {
            return Err(ConfigError {
                variable: "DATABASE_POOL_SIZE",
                value: pool_size.to_string(),
                reason: "must be at least 1".to_owned(),
            });
        }

        Ok(Self {
            bind_addr,
            database_url: read("DATABASE_URL"),
            pool_size,
            persistence: PersistencePolicy::new(
                Duration::from_millis(timeout_ms),
                max_attempts,
                Duration::from_millis(backoff_ms),
            ),
            log_level,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            database_url: None,
            pool_size: DEFAULT_POOL_SIZE,
            persistence: PersistencePolicy::default(),
            log_level: Level::INFO,
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8000))
}

fn parse_or<T>(
    raw: Option<String>,
    variable: &'static str,
    default: impl FnOnce() -> T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(value) = raw else {
        return Ok(default());
    };
    value.parse().map_err(|err: T::Err| ConfigError {
        variable,
        reason: err.to_string(),
        value,
    })
}
