//! Session issuance
//!
//! Mints access/refresh pairs for already-verified principals. A fresh pair
//! opens a new token family in the revocation ledger; rotation pairs reuse
//! the family and inherit its refresh ceiling unchanged.

use chrono::{Duration as ChronoDuration, Utc};
use std::sync::Arc;

use warden_db::{CreateFamily, FamilyRepository, FamilyRow, PrincipalRow};
use warden_types::{FamilyId, PrincipalId, Role, SessionPair};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::token::{TokenClaims, TokenCodec, TokenKind};

/// Mints session pairs and registers their families
pub struct SessionIssuer<F: FamilyRepository> {
    codec: TokenCodec,
    families: Arc<F>,
    access_ttl: ChronoDuration,
    refresh_ttl: ChronoDuration,
}

// Manual impl: the repository sits behind an Arc, so no F: Clone bound
impl<F: FamilyRepository> Clone for SessionIssuer<F> {
    fn clone(&self) -> Self {
        Self {
            codec: self.codec.clone(),
            families: Arc::clone(&self.families),
            access_ttl: self.access_ttl,
            refresh_ttl: self.refresh_ttl,
        }
    }
}

impl<F: FamilyRepository> SessionIssuer<F> {
    /// Create a new session issuer
    pub fn new(codec: TokenCodec, config: &AuthConfig, families: Arc<F>) -> Self {
        Self {
            codec,
            families,
            access_ttl: ChronoDuration::seconds(config.access_ttl.as_secs() as i64),
            refresh_ttl: ChronoDuration::seconds(config.refresh_ttl.as_secs() as i64),
        }
    }

    /// Mint a fresh session pair for a verified principal
    ///
    /// Opens a new token family: the refresh token carries sequence 0 and the
    /// ledger row starts at `next_seq = 1`. The refresh ceiling is fixed here
    /// and never moves afterwards.
    pub async fn issue_for(&self, principal: &PrincipalRow) -> Result<SessionPair, AuthError> {
        let now = Utc::now();
        let family_id = FamilyId::new();
        let expired_at = now + self.access_ttl;
        let refreshable_until = now + self.refresh_ttl;

        let role = stored_role(principal)?;
        let principal_id = PrincipalId(principal.id);

        let access = self.codec.issue(&TokenClaims {
            principal_id,
            role: role.clone(),
            kind: TokenKind::Access,
            issued: now.timestamp(),
            expires: expired_at.timestamp(),
            family_id,
            seq: 0,
        })?;

        let refresh = self.codec.issue(&TokenClaims {
            principal_id,
            role,
            kind: TokenKind::Refresh,
            issued: now.timestamp(),
            expires: refreshable_until.timestamp(),
            family_id,
            seq: 0,
        })?;

        self.families
            .create(CreateFamily {
                id: family_id.0,
                principal_id: principal.id,
                refreshable_until,
            })
            .await?;

        tracing::debug!(principal = %principal_id, family = %family_id, "issued new session pair");

        Ok(SessionPair {
            access,
            refresh,
            expired_at,
            refreshable_until,
        })
    }

    /// Mint a successor pair inside an existing family
    ///
    /// The refresh token carries the family's `next_seq` and expires at the
    /// family's original ceiling. The caller owns the ledger advance; this
    /// method performs no writes.
    pub(crate) fn issue_rotation(
        &self,
        principal: &PrincipalRow,
        family: &FamilyRow,
    ) -> Result<SessionPair, AuthError> {
        let now = Utc::now();
        let expired_at = now + self.access_ttl;
        let refreshable_until = family.refreshable_until;
        let family_id = FamilyId(family.id);

        let role = stored_role(principal)?;
        let principal_id = PrincipalId(principal.id);

        let access = self.codec.issue(&TokenClaims {
            principal_id,
            role: role.clone(),
            kind: TokenKind::Access,
            issued: now.timestamp(),
            expires: expired_at.timestamp(),
            family_id,
            seq: family.next_seq,
        })?;

        let refresh = self.codec.issue(&TokenClaims {
            principal_id,
            role,
            kind: TokenKind::Refresh,
            issued: now.timestamp(),
            expires: refreshable_until.timestamp(),
            family_id,
            seq: family.next_seq,
        })?;

        Ok(SessionPair {
            access,
            refresh,
            expired_at,
            refreshable_until,
        })
    }
}

impl<F: FamilyRepository> std::fmt::Debug for SessionIssuer<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionIssuer")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

/// Parse the role tag stored on a principal row
///
/// Stored roles were validated at registration; failure here means the store
/// was corrupted out of band.
pub(crate) fn stored_role(principal: &PrincipalRow) -> Result<Role, AuthError> {
    Role::new(&principal.role)
        .map_err(|e| AuthError::Internal(format!("stored role tag is invalid: {e}")))
}
