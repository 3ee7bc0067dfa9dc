//! Configuration for the Auth API service.

use std::time::Duration;

use warden_auth_core::AuthConfig;

/// Auth API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub http_port: u16,

    /// Database URL
    pub database_url: String,

    /// Auth core configuration
    pub auth: AuthConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Database
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        // Server port
        let http_port = std::env::var("HTTP_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("HTTP_PORT"))?;

        // Token secret (minimum 32 bytes, checked by the auth core)
        let token_secret =
            std::env::var("TOKEN_SECRET").map_err(|_| ConfigError::Missing("TOKEN_SECRET"))?;

        // Access token lifetime (default 1 hour)
        let access_ttl_secs: u64 = std::env::var("ACCESS_TTL_SECS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("ACCESS_TTL_SECS"))?;

        // Refresh ceiling (default 7 days)
        let refresh_ttl_secs: u64 = std::env::var("REFRESH_TTL_SECS")
            .unwrap_or_else(|_| (7 * 24 * 3600).to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("REFRESH_TTL_SECS"))?;

        let auth = AuthConfig::try_new(token_secret)
            .map_err(|e| ConfigError::AuthConfig(e.to_string()))?
            .with_access_ttl(Duration::from_secs(access_ttl_secs))
            .with_refresh_ttl(Duration::from_secs(refresh_ttl_secs));

        Ok(Self {
            http_port,
            database_url,
            auth,
        })
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Auth config error: {0}")]
    AuthConfig(String),
}
