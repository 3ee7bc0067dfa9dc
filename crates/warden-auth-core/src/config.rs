//! Configuration types for the auth core

use std::time::Duration;

/// Default access token lifetime (1 hour)
const DEFAULT_ACCESS_TTL: Duration = Duration::from_secs(60 * 60);

/// Default refresh ceiling (7 days)
const DEFAULT_REFRESH_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Auth core configuration
///
/// The token secret is loaded once at startup and immutable thereafter;
/// every component receives it by construction, never from ambient globals.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Signing secret for the token codec (minimum 32 bytes)
    pub token_secret: String,
    /// Access token lifetime
    pub access_ttl: Duration,
    /// Refresh ceiling: how long a family stays refreshable after creation
    pub refresh_ttl: Duration,
}

impl AuthConfig {
    /// Minimum accepted secret length in bytes
    pub const MIN_SECRET_LEN: usize = 32;

    /// Create a new config, validating the signing secret
    pub fn try_new(token_secret: impl Into<String>) -> Result<Self, AuthConfigError> {
        let token_secret = token_secret.into();
        if token_secret.len() < Self::MIN_SECRET_LEN {
            return Err(AuthConfigError::SecretTooShort {
                actual: token_secret.len(),
                minimum: Self::MIN_SECRET_LEN,
            });
        }
        Ok(Self {
            token_secret,
            access_ttl: DEFAULT_ACCESS_TTL,
            refresh_ttl: DEFAULT_REFRESH_TTL,
        })
    }

    /// Set the access token lifetime
    pub fn with_access_ttl(mut self, ttl: Duration) -> Self {
        self.access_ttl = ttl;
        self
    }

    /// Set the refresh ceiling
    pub fn with_refresh_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_ttl = ttl;
        self
    }
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthConfigError {
    #[error("token secret too short: got {actual} bytes, need at least {minimum}")]
    SecretTooShort { actual: usize, minimum: usize },
}
