//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CANTEEN_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)
//!
//! ## Optional
//! - `CANTEEN_HOST` - Bind address (default: 127.0.0.1)
//! - `CANTEEN_PORT` - Listen port (default: 5000)
//! - `CANTEEN_CHECKOUT_TIMEOUT_MS` - Upper bound for each persistence call
//!   inside a checkout (default: 10000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_PORT: &str = "5000";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_CHECKOUT_TIMEOUT_MS: &str = "10000";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Canteen server configuration.
#[derive(Debug, Clone)]
pub struct CanteenConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Upper bound for each persistence call inside a checkout
    pub checkout_timeout: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

impl CanteenConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("CANTEEN_DATABASE_URL")?;
        let host = parse_env("CANTEEN_HOST", DEFAULT_HOST)?;
        let port = parse_env("CANTEEN_PORT", DEFAULT_PORT)?;
        let timeout_ms: u64 = parse_env("CANTEEN_CHECKOUT_TIMEOUT_MS", DEFAULT_CHECKOUT_TIMEOUT_MS)?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            database_url,
            host,
            port,
            checkout_timeout: Duration::from_millis(timeout_ms),
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Parse an environment variable with a default value.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_parse() {
        let host: IpAddr = DEFAULT_HOST.parse().expect("default host is valid");
        assert_eq!(host.to_string(), "127.0.0.1");
        let port: u16 = DEFAULT_PORT.parse().expect("default port is valid");
        assert_eq!(port, 5000);
        let ms: u64 = DEFAULT_CHECKOUT_TIMEOUT_MS
            .parse()
            .expect("default timeout is valid");
        assert_eq!(ms, 10_000);
    }

    #[test]
    fn test_socket_addr() {
        let config = CanteenConfig {
            database_url: SecretString::from("postgres://localhost/canteen"),
            host: "0.0.0.0".parse().expect("valid"),
            port: 5000,
            checkout_timeout: Duration::from_secs(10),
            sentry_dsn: None,
            sentry_environment: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "0.0.0.0");
        assert_eq!(addr.port(), 5000);
    }

    #[test]
    fn test_debug_redacts_database_url() {
        let config = CanteenConfig {
            database_url: SecretString::from("postgres://user:hunter2@db/canteen"),
            host: "127.0.0.1".parse().expect("valid"),
            port: 5000,
            checkout_timeout: Duration::from_secs(10),
            sentry_dsn: None,
            sentry_environment: None,
        };

        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("hunter2"));
    }
}
