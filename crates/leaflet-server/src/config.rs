//! Server configuration from environment variables.

use std::env;

/// Longest accepted session token lifetime: one year.
pub const MAX_JWT_EXPIRY_HOURS: u64 = 24 * 365;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server port to listen on.
    pub port: u16,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// CORS allowed origins (comma-separated or "*" for all).
    pub cors_allowed_origins: String,
    /// HMAC secret for signing session tokens.
    pub jwt_secret: String,
    /// Session token lifetime.
    pub jwt_expiry_hours: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `JWT_SECRET`: Token signing secret
    ///
    /// Optional:
    /// - `PORT`: Server port (default: 3000)
    /// - `LOG_LEVEL`: Logging level (default: "info")
    /// - `CORS_ALLOWED_ORIGINS`: Allowed CORS origins (default: "*")
    /// - `JWT_EXPIRY_HOURS`: Token lifetime in hours, at most a year (default: 24)
    ///
    /// The database is configured separately through `StoreConfig`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| ConfigError::MissingEnvVar("JWT_SECRET".to_string()))?;
        if jwt_secret.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "JWT_SECRET".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let cors_allowed_origins =
            env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string());

        let jwt_expiry_hours = match env::var("JWT_EXPIRY_HOURS") {
            Ok(s) => s.parse().map_err(|_| ConfigError::InvalidValue {
                name: "JWT_EXPIRY_HOURS".to_string(),
                reason: format!("not a number: {s}"),
            })?,
            Err(_) => 24,
        };
        if jwt_expiry_hours == 0 || jwt_expiry_hours > MAX_JWT_EXPIRY_HOURS {
            return Err(ConfigError::InvalidValue {
                name: "JWT_EXPIRY_HOURS".to_string(),
                reason: format!("must be between 1 and {MAX_JWT_EXPIRY_HOURS}, got {jwt_expiry_hours}"),
            });
        }

        Ok(Self {
            port,
            log_level,
            cors_allowed_origins,
            jwt_secret,
            jwt_expiry_hours,
        })
    }

    /// Get the socket address for the server.
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        std::net::SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Invalid environment variable value.
    #[error("invalid value for environment variable {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}
