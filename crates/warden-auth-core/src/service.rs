//! Auth service - ties together credential verification, issuance, rotation
//! and principal resolution
//!
//! One generic service covers every role: the role is a tag carried through
//! claims and store lookups, not a reason to duplicate components.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use warden_db::{CreatePrincipal, FamilyRepository, PrincipalRepository, PrincipalRow};
use warden_types::{PrincipalId, Role, SessionPair};

use crate::config::AuthConfig;
use crate::crypto::SigningKey;
use crate::error::AuthError;
use crate::issuer::{stored_role, SessionIssuer};
use crate::password::CredentialHasher;
use crate::rotation::RefreshRotator;
use crate::token::TokenCodec;

/// Shortest accepted credential, in bytes
const MIN_CREDENTIAL_LEN: usize = 8;

/// Longest accepted identifier, in bytes
const MAX_IDENTIFIER_LEN: usize = 254;

/// The resolved identity attached to authenticated requests
///
/// This is the only place role information crosses into business logic;
/// downstream handlers never re-derive the role from raw claims.
#[derive(Debug, Clone)]
pub struct AuthenticatedPrincipal {
    /// Principal ID
    pub principal_id: PrincipalId,
    /// Role the principal is registered under
    pub role: Role,
    /// Login identifier (email or external id)
    pub identifier: String,
}

/// Resolution contract consumed by request middleware
#[async_trait]
pub trait PrincipalResolver: Send + Sync {
    /// Verify an access token and resolve its principal
    async fn authenticate(&self, access_token: &str) -> Result<AuthenticatedPrincipal, AuthError>;
}

/// Authentication service
///
/// Provides the full session lifecycle for an arbitrary set of roles:
/// - register / login (credential store + hashing primitive)
/// - refresh rotation and logout (revocation ledger)
/// - access-token resolution for protected operations
pub struct AuthService<P: PrincipalRepository, F: FamilyRepository> {
    codec: TokenCodec,
    issuer: SessionIssuer<F>,
    rotator: RefreshRotator<P, F>,
    principals: Arc<P>,
    hasher: Arc<dyn CredentialHasher>,
}

impl<P: PrincipalRepository, F: FamilyRepository> AuthService<P, F> {
    /// Create a new auth service
    pub fn new(
        config: AuthConfig,
        principals: Arc<P>,
        families: Arc<F>,
        hasher: Arc<dyn CredentialHasher>,
    ) -> Self {
        // AuthConfig::try_new already enforced the minimum secret length
        let key = SigningKey::new(&config.token_secret)
            .expect("token secret length validated by AuthConfig");
        let codec = TokenCodec::new(key);
        let issuer = SessionIssuer::new(codec.clone(), &config, Arc::clone(&families));
        let rotator = RefreshRotator::new(
            codec.clone(),
            issuer.clone(),
            Arc::clone(&principals),
            families,
        );

        Self {
            codec,
            issuer,
            rotator,
            principals,
            hasher,
        }
    }

    // =========================================================================
    // Registration and Login
    // =========================================================================

    /// Register a new principal under a role and open its first session
    pub async fn register(
        &self,
        role: &Role,
        identifier: &str,
        credential: &str,
    ) -> Result<(PrincipalRow, SessionPair), AuthError> {
        let identifier = validate_identifier(identifier)?;
        validate_credential(credential)?;

        let credential_hash = self.hasher.hash(credential)?;

        let principal = self
            .principals
            .create(CreatePrincipal {
                id: Uuid::new_v4(),
                role: role.to_string(),
                identifier: identifier.to_string(),
                credential_hash,
            })
            .await
            .map_err(|e| match e {
                warden_db::DbError::Conflict => AuthError::IdentifierTaken,
                other => other.into(),
            })?;

        tracing::debug!(principal = %principal.id, role = %role, "registered new principal");

        let pair = self.issuer.issue_for(&principal).await?;
        Ok((principal, pair))
    }

    /// Verify a credential and open a new session
    ///
    /// Unknown identifier, wrong credential and ineligible principal all
    /// produce the same `AuthenticationFailed`.
    pub async fn login(
        &self,
        role: &Role,
        identifier: &str,
        credential: &str,
    ) -> Result<(PrincipalRow, SessionPair), AuthError> {
        let identifier = validate_identifier(identifier)?;
        validate_credential(credential)?;

        let principal = match self
            .principals
            .find_by_identifier(role.as_str(), identifier)
            .await?
        {
            Some(p) if p.is_eligible() => p,
            _ => {
                tracing::debug!(role = %role, "login failed: unknown or ineligible principal");
                return Err(AuthError::AuthenticationFailed);
            }
        };

        if !self.hasher.verify(credential, &principal.credential_hash)? {
            tracing::debug!(principal = %principal.id, "login failed: credential mismatch");
            return Err(AuthError::AuthenticationFailed);
        }

        let pair = self.issuer.issue_for(&principal).await?;
        Ok((principal, pair))
    }

    // =========================================================================
    // Token Lifecycle
    // =========================================================================

    /// Rotate a refresh token into a new session pair
    pub async fn refresh(&self, refresh_token: &str) -> Result<SessionPair, AuthError> {
        self.rotator.rotate(refresh_token).await
    }

    /// Revoke the family of a presented refresh token
    pub async fn logout(&self, refresh_token: &str) -> Result<(), AuthError> {
        self.rotator.revoke_presented(refresh_token).await
    }

    /// Revoke every family of a principal, returning how many were live
    pub async fn logout_all(&self, principal_id: PrincipalId) -> Result<u64, AuthError> {
        self.rotator.revoke_all_for(principal_id.0).await
    }

    // =========================================================================
    // Principal Resolution
    // =========================================================================

    /// Verify an access token and load its principal
    ///
    /// Pure verification plus one principal read; no ledger access and no
    /// writes, so repeated calls with the same token are free of side
    /// effects.
    pub async fn authenticate(
        &self,
        access_token: &str,
    ) -> Result<AuthenticatedPrincipal, AuthError> {
        let claims = self.codec.verify_access(access_token)?;

        let principal = match self.principals.find_by_id(claims.principal_id.0).await? {
            Some(p) if p.is_eligible() => p,
            _ => {
                tracing::debug!(
                    principal = %claims.principal_id,
                    "access token for unavailable principal"
                );
                return Err(AuthError::PrincipalUnavailable);
            }
        };

        Ok(AuthenticatedPrincipal {
            principal_id: PrincipalId(principal.id),
            role: stored_role(&principal)?,
            identifier: principal.identifier,
        })
    }
}

#[async_trait]
impl<P: PrincipalRepository, F: FamilyRepository> PrincipalResolver for AuthService<P, F> {
    async fn authenticate(&self, access_token: &str) -> Result<AuthenticatedPrincipal, AuthError> {
        AuthService::authenticate(self, access_token).await
    }
}

impl<P: PrincipalRepository, F: FamilyRepository> std::fmt::Debug for AuthService<P, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService").finish_non_exhaustive()
    }
}

/// Validate a login identifier, returning it trimmed
fn validate_identifier(identifier: &str) -> Result<&str, AuthError> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Err(AuthError::ValidationFailed("identifier is required".into()));
    }
    if identifier.len() > MAX_IDENTIFIER_LEN {
        return Err(AuthError::ValidationFailed(format!(
            "identifier longer than {MAX_IDENTIFIER_LEN} bytes"
        )));
    }
    Ok(identifier)
}

/// Validate a plaintext credential
fn validate_credential(credential: &str) -> Result<(), AuthError> {
    if credential.len() < MIN_CREDENTIAL_LEN {
        return Err(AuthError::ValidationFailed(format!(
            "credential shorter than {MIN_CREDENTIAL_LEN} characters"
        )));
    }
    Ok(())
}
