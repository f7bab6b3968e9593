//! Router configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ROUTER_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `ROUTER_HOST` - Bind address (default: 127.0.0.1)
//! - `ROUTER_PORT` - Listen port (default: 3002)
//! - `ROUTER_BASE_URL` - Public URL (default: <http://localhost:3002>)
//! - `FALLBACK_LATITUDE` - Latitude given to orders without one (default: 30.0444)
//! - `FALLBACK_LONGITUDE` - Longitude given to orders without one (default: 31.2357)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 0.1)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

use print_router_core::{Coordinates, FALLBACK_COORDINATES};

const DEFAULT_PORT: &str = "3002";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Router application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL
    pub base_url: String,
    /// Coordinates written to orders that arrive without a location
    pub fallback_coordinates: Coordinates,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

impl ServerConfig {
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

        let database_url = get_database_url("ROUTER_DATABASE_URL")?;
        let host = get_env_or_default("ROUTER_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ROUTER_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("ROUTER_PORT", DEFAULT_PORT)
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ROUTER_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("ROUTER_BASE_URL", "http://localhost:3002");
        let fallback_coordinates = fallback_coordinates_from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.1);

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            fallback_coordinates,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Local defaults around an explicit database URL.
    ///
    /// Used by tooling and tests that do not read the environment.
    #[must_use]
    pub fn with_database_url(database_url: SecretString) -> Self {
        Self {
            database_url,
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3002,
            base_url: "http://localhost:3002".to_string(),
            fallback_coordinates: FALLBACK_COORDINATES,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.1,
        }
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

/// Read the fallback point, defaulting each axis independently.
fn fallback_coordinates_from_env() -> Result<Coordinates, ConfigError> {
    let latitude = parse_degrees(
        "FALLBACK_LATITUDE",
        get_optional_env("FALLBACK_LATITUDE"),
        FALLBACK_COORDINATES.latitude(),
    )?;
    let longitude = parse_degrees(
        "FALLBACK_LONGITUDE",
        get_optional_env("FALLBACK_LONGITUDE"),
        FALLBACK_COORDINATES.longitude(),
    )?;

    Coordinates::new(latitude, longitude)
        .map_err(|e| ConfigError::InvalidEnvVar("FALLBACK_*".to_string(), e.to_string()))
}

fn parse_degrees(key: &str, raw: Option<String>, default: f64) -> Result<f64, ConfigError> {
    raw.map_or(Ok(default), |value| {
        value
            .trim()
            .parse::<f64>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Get database URL with fallback to generic `DATABASE_URL` (used by Fly.io postgres attach).
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

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    fn test_config() -> ServerConfig {
        ServerConfig::with_database_url(SecretString::from("postgres://localhost/print_router"))
    }

    #[test]
    fn test_socket_addr() {
        let addr = test_config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3002);
    }

    #[test]
    fn test_debug_redacts_database_url() {
        let config = test_config();
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("postgres://localhost/print_router"));
        assert_eq!(
            config.database_url.expose_secret(),
            "postgres://localhost/print_router"
        );
    }

    #[test]
    fn test_parse_degrees_defaults_when_unset() {
        assert_eq!(parse_degrees("LAT", None, 30.0444).unwrap(), 30.0444);
    }

    #[test]
    fn test_parse_degrees_trims_and_parses() {
        assert_eq!(
            parse_degrees("LAT", Some(" 29.9792 ".to_string()), 0.0).unwrap(),
            29.9792
        );
    }

    #[test]
    fn test_parse_degrees_rejects_garbage() {
        let err = parse_degrees("LAT", Some("north".to_string()), 0.0).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "LAT"));
    }
}
