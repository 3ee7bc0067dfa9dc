//! Refresh rotation
//!
//! Exchanges a presented refresh token for a successor pair exactly once.
//! Within a family, rotations are linearized by the ledger's conditional
//! sequence advance. Any presentation of a stale sequence (including the
//! loser of a concurrent rotation race) revokes the entire family on the
//! assumption that reuse means the token leaked.

use chrono::Utc;
use std::sync::Arc;

use warden_db::{FamilyRepository, PrincipalRepository};
use warden_types::SessionPair;

use crate::error::AuthError;
use crate::issuer::SessionIssuer;
use crate::token::TokenCodec;

/// Rotates refresh tokens and revokes token families
pub struct RefreshRotator<P: PrincipalRepository, F: FamilyRepository> {
    codec: TokenCodec,
    issuer: SessionIssuer<F>,
    principals: Arc<P>,
    families: Arc<F>,
}

// Manual impl: repositories sit behind Arcs, so no P/F Clone bounds
impl<P: PrincipalRepository, F: FamilyRepository> Clone for RefreshRotator<P, F> {
    fn clone(&self) -> Self {
        Self {
            codec: self.codec.clone(),
            issuer: self.issuer.clone(),
            principals: Arc::clone(&self.principals),
            families: Arc::clone(&self.families),
        }
    }
}

impl<P: PrincipalRepository, F: FamilyRepository> RefreshRotator<P, F> {
    /// Create a new rotator
    pub fn new(
        codec: TokenCodec,
        issuer: SessionIssuer<F>,
        principals: Arc<P>,
        families: Arc<F>,
    ) -> Self {
        Self {
            codec,
            issuer,
            principals,
            families,
        }
    }

    /// Exchange a refresh token for a new session pair
    ///
    /// State machine per family: `ACTIVE(seq = n)` advances to
    /// `ACTIVE(seq = n + 1)` on the one valid rotation; any other sequence,
    /// explicit logout, or principal deactivation sends it to `REVOKED`.
    pub async fn rotate(&self, refresh_token: &str) -> Result<SessionPair, AuthError> {
        let claims = self.codec.verify_refresh(refresh_token)?;

        let family = self
            .families
            .get(claims.family_id.0)
            .await?
            .ok_or(AuthError::RevokedToken)?;

        if family.revoked {
            tracing::debug!(family = %claims.family_id, "refresh against revoked family");
            return Err(AuthError::RevokedToken);
        }

        // A presented token is current iff its sequence is exactly one behind
        // the ledger. Anything else is a replay: poison the whole family.
        if claims.seq + 1 != family.next_seq {
            tracing::warn!(
                family = %claims.family_id,
                presented_seq = claims.seq,
                next_seq = family.next_seq,
                "refresh token replay detected, revoking family"
            );
            self.families.revoke(family.id).await?;
            return Err(AuthError::RevokedToken);
        }

        // Ledger ceiling is authoritative even though the token's own expiry
        // equals it; rotation never extends a session past this instant.
        if family.is_past_ceiling(Utc::now()) {
            return Err(AuthError::Expired);
        }

        let principal = match self.principals.find_by_id(claims.principal_id.0).await? {
            Some(p) if p.is_eligible() => p,
            _ => {
                tracing::warn!(
                    family = %claims.family_id,
                    principal = %claims.principal_id,
                    "principal unavailable at rotation, revoking family"
                );
                self.families.revoke(family.id).await?;
                return Err(AuthError::PrincipalUnavailable);
            }
        };

        let pair = self.issuer.issue_rotation(&principal, &family)?;

        // Single atomic compare-and-advance. Losing the race means another
        // rotation consumed this token concurrently; that is a reuse.
        if !self.families.advance(family.id, claims.seq + 1).await? {
            tracing::warn!(
                family = %claims.family_id,
                "concurrent rotation detected, revoking family"
            );
            self.families.revoke(family.id).await?;
            return Err(AuthError::RevokedToken);
        }

        tracing::debug!(family = %claims.family_id, seq = family.next_seq, "rotated session pair");

        Ok(pair)
    }

    /// Revoke the family of a presented refresh token (logout)
    ///
    /// Idempotent: revoking an already-revoked or unknown family is not an
    /// error.
    pub async fn revoke_presented(&self, refresh_token: &str) -> Result<(), AuthError> {
        let claims = self.codec.verify_refresh(refresh_token)?;
        self.families.revoke(claims.family_id.0).await?;
        tracing::debug!(family = %claims.family_id, "family revoked by logout");
        Ok(())
    }

    /// Revoke every family belonging to a principal (logout everywhere,
    /// deactivation containment)
    pub async fn revoke_all_for(&self, principal_id: uuid::Uuid) -> Result<u64, AuthError> {
        let revoked = self.families.revoke_all_for_principal(principal_id).await?;
        tracing::debug!(principal = %principal_id, revoked, "revoked all families");
        Ok(revoked)
    }
}

impl<P: PrincipalRepository, F: FamilyRepository> std::fmt::Debug for RefreshRotator<P, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshRotator").finish_non_exhaustive()
    }
}
