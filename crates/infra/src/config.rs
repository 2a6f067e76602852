//! Application configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CATALOG_BIND_ADDR` - Listen address (default: 0.0.0.0:8080)
//! - `USE_PERSISTENT_STORES` - Use Postgres instead of the in-memory store (default: false)
//! - `DATABASE_URL` - `PostgreSQL` connection string (required when persistent)
//! - `DATABASE_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `DEBUG_MODE` - Raise the default log level to `debug` (default: false)
//!
//! Booleans accept `true/false`, `yes/no`, `on/off`, `1/0` (case-insensitive).

use std::net::SocketAddr;

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingEnvVar(&'static str),
    #[error("invalid environment variable {name}: {reason}")]
    InvalidEnvVar { name: &'static str, reason: String },
}

/// Where products are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    InMemory,
    Postgres {
        database_url: String,
        max_connections: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreConfig,
    pub debug: bool,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or a value is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bind_raw = get("CATALOG_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| invalid("CATALOG_BIND_ADDR", e.to_string()))?;

        let debug = get("DEBUG_MODE")
            .map(|v| parse_bool("DEBUG_MODE", &v))
            .transpose()?
            .unwrap_or(false);

        let persistent = get("USE_PERSISTENT_STORES")
            .map(|v| parse_bool("USE_PERSISTENT_STORES", &v))
            .transpose()?
            .unwrap_or(false);

        let store = if persistent {
            let database_url = get("DATABASE_URL").ok_or(ConfigError::MissingEnvVar("DATABASE_URL"))?;
            let max_connections = match get("DATABASE_MAX_CONNECTIONS") {
                Some(raw) => match raw.trim().parse::<u32>() {
                    Ok(0) => return Err(invalid("DATABASE_MAX_CONNECTIONS", "must be at least 1")),
                    Ok(n) => n,
                    Err(e) => return Err(invalid("DATABASE_MAX_CONNECTIONS", e.to_string())),
                },
                None => DEFAULT_MAX_CONNECTIONS,
            };
            StoreConfig::Postgres {
                database_url,
                max_connections,
            }
        } else {
            StoreConfig::InMemory
        };

        Ok(Self {
            bind_addr,
            store,
            debug,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            store: StoreConfig::InMemory,
            debug: false,
        }
    }
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidEnvVar {
        name,
        reason: reason.into(),
    }
}

fn parse_bool(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => Err(invalid(name, format!("expected a boolean, got {other:?}"))),
    }
}
