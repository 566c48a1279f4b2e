//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; defaults suit a local single-machine install.
//!
//! - `PEDIDOS_DATABASE_URL` - `SQLite` connection string (falls back to `DATABASE_URL`,
//!   then `sqlite://pedidos.db?mode=rwc`)
//! - `PEDIDOS_HOST` - Bind address (default: 127.0.0.1)
//! - `PEDIDOS_PORT` - Listen port (default: 3000)
//! - `PEDIDOS_BASE_URL` - Public URL, decides whether session cookies are `Secure`
//!   (default: `http://localhost:3000`)
//! - `PEDIDOS_ADMIN_PASSWORD` - Password given to the bootstrapped `admin@sys.com`
//!   account when it is first created (default: `123`)
//! - `PEDIDOS_LOG_JSON` - Emit JSON log lines instead of text when set
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0 - 1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0 - 1.0 (default: 0.0)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Database used when no URL is configured.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://pedidos.db?mode=rwc";

/// Password for the bootstrapped admin when none is configured.
pub const DEFAULT_ADMIN_PASSWORD: &str = "123";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server application configuration.
#[derive(Clone)]
pub struct ServerConfig {
    /// `SQLite` database connection URL
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the server
    pub base_url: String,
    /// Initial password of the bootstrapped admin account
    pub admin_password: SecretString,
    /// Whether `admin_password` fell back to [`DEFAULT_ADMIN_PASSWORD`]
    pub admin_password_is_default: bool,
    /// Emit JSON formatted logs
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry transaction sample rate
    pub sentry_traces_sample_rate: f32,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("database_url", &"[REDACTED]")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("base_url", &self.base_url)
            .field("admin_password", &"[REDACTED]")
            .field("admin_password_is_default", &self.admin_password_is_default)
            .field("log_json", &self.log_json)
            .field("sentry_dsn", &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"))
            .field("sentry_environment", &self.sentry_environment)
            .field("sentry_sample_rate", &self.sentry_sample_rate)
            .field("sentry_traces_sample_rate", &self.sentry_traces_sample_rate)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("PEDIDOS_DATABASE_URL");
        let host = parse_env("PEDIDOS_HOST", "127.0.0.1")?;
        let port = parse_env("PEDIDOS_PORT", "3000")?;
        let base_url = get_env_or_default("PEDIDOS_BASE_URL", "http://localhost:3000");

        let (admin_password, admin_password_is_default) =
            match get_optional_env("PEDIDOS_ADMIN_PASSWORD") {
                Some(value) if !value.is_empty() => (SecretString::from(value), false),
                _ => (SecretString::from(DEFAULT_ADMIN_PASSWORD), true),
            };

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            admin_password,
            admin_password_is_default,
            log_json: get_optional_env("PEDIDOS_LOG_JSON").is_some(),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Local defaults pointed at the given database.
    ///
    /// Binds to an ephemeral port on loopback; used by tests and tooling that
    /// do not read the environment.
    #[must_use]
    pub fn with_database_url(database_url: &str) -> Self {
        Self {
            database_url: SecretString::from(database_url),
            host: IpAddr::from([127, 0, 0, 1]),
            port: 0,
            base_url: "http://localhost".to_string(),
            admin_password: SecretString::from(DEFAULT_ADMIN_PASSWORD),
            admin_password_is_default: true,
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`, then the local file.
fn get_database_url(primary_key: &str) -> SecretString {
    std::env::var(primary_key)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_or_else(
            |_| SecretString::from(DEFAULT_DATABASE_URL),
            SecretString::from,
        )
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, using `default` when it is unset.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_socket_addr() {
        let mut config = ServerConfig::with_database_url("sqlite::memory:");
        config.port = 3000;

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_is_secure_follows_base_url_scheme() {
        let mut config = ServerConfig::with_database_url("sqlite::memory:");
        assert!(!config.is_secure());

        config.base_url = "https://pedidos.example.com".to_string();
        assert!(config.is_secure());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut config = ServerConfig::with_database_url("sqlite:///var/lib/secret-path.db");
        config.admin_password = SecretString::from("hunter2-admin");
        config.sentry_dsn = Some("https://key@sentry.example.com/1".to_string());

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("secret-path"));
        assert!(!debug_output.contains("hunter2-admin"));
        assert!(!debug_output.contains("key@sentry"));
        assert_eq!(config.admin_password.expose_secret(), "hunter2-admin");
    }

    #[test]
    fn test_parse_env_reports_variable_name() {
        let err = parse_env::<u16>("PEDIDOS_TEST_UNSET_PORT_VAR", "not-a-port").unwrap_err();
        assert!(err.to_string().contains("PEDIDOS_TEST_UNSET_PORT_VAR"));
    }
}
