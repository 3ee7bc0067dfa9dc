//! Token codec: signed, tamper-evident claim tokens
//!
//! Wire format is `base64url(JSON claims) "." base64url(HMAC-SHA256)`.
//! Verification is a pure function of the token bytes and the server secret:
//! no store access, no async. Revocation state is consulted separately, and
//! only for refresh tokens.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use warden_types::{FamilyId, PrincipalId, Role};

use crate::crypto::{constant_time_eq, SigningKey};

/// Token kind discriminator
///
/// Immutable once signed. Access tokens never reach the refresh path and
/// refresh tokens never authenticate a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Access => write!(f, "access"),
            TokenKind::Refresh => write!(f, "refresh"),
        }
    }
}

/// The claim set signed inside every token
///
/// Claims stay minimal: identity, role tag, kind, expiry window, family and
/// rotation sequence. Profile data is always fetched fresh at resolution
/// time, never trusted from a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject principal
    pub principal_id: PrincipalId,
    /// Role tag the principal authenticated under
    pub role: Role,
    /// Access or refresh
    pub kind: TokenKind,
    /// Issue instant (unix seconds)
    pub issued: i64,
    /// Expiry instant (unix seconds)
    pub expires: i64,
    /// Token family this token descends from
    pub family_id: FamilyId,
    /// Rotation sequence within the family (0 for a freshly issued pair)
    pub seq: i64,
}

impl TokenClaims {
    /// Check whether the claims are expired at `now` (unix seconds)
    pub fn is_expired_at(&self, now: i64) -> bool {
        now > self.expires
    }
}

/// Token codec errors
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Token structure cannot be parsed
    #[error("malformed token")]
    Malformed,

    /// Signature does not match the payload
    #[error("invalid token signature")]
    InvalidSignature,

    /// Token's own expiry has lapsed
    #[error("token expired")]
    Expired,

    /// Structurally valid token of the wrong kind for this operation
    #[error("expected {expected} token")]
    WrongKind { expected: TokenKind },

    /// Claims could not be serialized at issue time
    #[error("token encoding failed: {0}")]
    Encoding(String),
}

/// Signs claims into token strings and verifies them back
#[derive(Debug, Clone)]
pub struct TokenCodec {
    key: SigningKey,
}

impl TokenCodec {
    /// Create a codec over a pre-validated signing key
    pub fn new(key: SigningKey) -> Self {
        Self { key }
    }

    /// Serialize and sign a claim set
    ///
    /// Deterministic in the claims and the secret; no side effects.
    pub fn issue(&self, claims: &TokenClaims) -> Result<String, TokenError> {
        let payload_json =
            serde_json::to_vec(claims).map_err(|e| TokenError::Encoding(e.to_string()))?;
        let payload = URL_SAFE_NO_PAD.encode(&payload_json);
        let signature = URL_SAFE_NO_PAD.encode(self.key.sign(payload.as_bytes()));
        Ok(format!("{payload}.{signature}"))
    }

    /// Verify signature and expiry, returning the decoded claims
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let (payload, signature) = split_token(token).ok_or(TokenError::Malformed)?;

        // Signature first, in constant time, before touching the payload
        let expected = URL_SAFE_NO_PAD.encode(self.key.sign(payload.as_bytes()));
        if !constant_time_eq(signature.as_bytes(), expected.as_bytes()) {
            tracing::debug!("token signature mismatch");
            return Err(TokenError::InvalidSignature);
        }

        let payload_json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| TokenError::Malformed)?;
        let claims: TokenClaims =
            serde_json::from_slice(&payload_json).map_err(|_| TokenError::Malformed)?;

        // A signed claim set with a non-positive window is still garbage
        if claims.expires <= claims.issued {
            return Err(TokenError::Malformed);
        }

        if claims.is_expired_at(Utc::now().timestamp()) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    /// Verify an access token, rejecting refresh tokens
    pub fn verify_access(&self, token: &str) -> Result<TokenClaims, TokenError> {
        self.verify_kind(token, TokenKind::Access)
    }

    /// Verify a refresh token, rejecting access tokens
    pub fn verify_refresh(&self, token: &str) -> Result<TokenClaims, TokenError> {
        self.verify_kind(token, TokenKind::Refresh)
    }

    fn verify_kind(&self, token: &str, expected: TokenKind) -> Result<TokenClaims, TokenError> {
        let claims = self.verify(token)?;
        if claims.kind != expected {
            return Err(TokenError::WrongKind { expected });
        }
        Ok(claims)
    }
}

/// Split a token into (payload, signature) at the last delimiter
fn split_token(token: &str) -> Option<(&str, &str)> {
    let (payload, signature) = token.rsplit_once('.')?;
    if payload.is_empty() || signature.is_empty() {
        return None;
    }
    Some((payload, signature))
}
