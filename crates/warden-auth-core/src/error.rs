//! Auth errors
//!
//! The client-facing kinds below are the whole vocabulary callers branch on;
//! infrastructure failures stay in their own variants and are never folded
//! into a client-facing kind. In particular `RevokedToken` (terminal, client
//! must re-login) is always distinguishable from a transient store outage
//! (retryable).

use thiserror::Error;

use crate::password::CredentialError;
use crate::token::TokenError;

/// Authentication errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// Malformed input to register/login (missing identifier, weak credential)
    #[error("validation failed: {0}")]
    ValidationFailed(String),

    /// Wrong credential or unknown identifier at login.
    /// Deliberately identical for both cases to avoid identifier enumeration.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Registration conflict: (role, identifier) already taken
    #[error("identifier already registered for this role")]
    IdentifierTaken,

    /// Token fails signature, structural or kind checks
    #[error("invalid token")]
    InvalidToken,

    /// Token's own expiry or the family's refresh ceiling has lapsed
    #[error("token expired")]
    Expired,

    /// Family explicitly revoked, or replay detected
    #[error("token revoked")]
    RevokedToken,

    /// Principal deleted or deactivated since issuance
    #[error("principal unavailable")]
    PrincipalUnavailable,

    /// Store failure (retryable infrastructure error)
    #[error("store error: {0}")]
    Store(String),

    /// Internal error (signing, hashing, corrupted state)
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ValidationFailed(_) => 400,
            Self::AuthenticationFailed
            | Self::InvalidToken
            | Self::Expired
            | Self::RevokedToken
            | Self::PrincipalUnavailable => 401,
            Self::IdentifierTaken => 409,
            Self::Store(_) | Self::Internal(_) => 500,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ValidationFailed(_) => "VALIDATION_FAILED",
            Self::AuthenticationFailed => "AUTHENTICATION_FAILED",
            Self::IdentifierTaken => "IDENTIFIER_TAKEN",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::Expired => "TOKEN_EXPIRED",
            Self::RevokedToken => "TOKEN_REVOKED",
            Self::PrincipalUnavailable => "PRINCIPAL_UNAVAILABLE",
            Self::Store(_) => "STORE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether a caller may meaningfully retry the same request
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

impl From<warden_db::DbError> for AuthError {
    fn from(err: warden_db::DbError) -> Self {
        tracing::error!("store error: {}", err);
        Self::Store(err.to_string())
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Malformed | TokenError::InvalidSignature | TokenError::WrongKind { .. } => {
                Self::InvalidToken
            }
            TokenError::Expired => Self::Expired,
            TokenError::Encoding(msg) => Self::Internal(msg),
        }
    }
}

impl From<CredentialError> for AuthError {
    fn from(err: CredentialError) -> Self {
        Self::Internal(err.to_string())
    }
}
