//! Axum extractors for principal resolution.
//!
//! These extractors read the [`AuthContext`] the [`crate::ResolverLayer`]
//! attaches to request extensions.
//!
//! # Usage
//!
//! ```ignore
//! use warden_axum::{MaybePrincipal, RequirePrincipal, RequireRole};
//! use warden_types::Role;
//!
//! // Requires authentication (401 if not authenticated)
//! async fn protected(principal: RequirePrincipal) -> String {
//!     format!("Hello, {}!", principal.identifier)
//! }
//!
//! // Optional authentication
//! async fn maybe(principal: MaybePrincipal) -> String {
//!     match principal.0 {
//!         Some(ctx) => format!("Hello, {}!", ctx.identifier),
//!         None => "Hello, guest!".to_string(),
//!     }
//! }
//! ```

use std::ops::Deref;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use warden_types::Role;

use crate::context::AuthContext;
use crate::error::ResolveError;

/// Extension key for storing the auth context in request extensions.
#[derive(Debug, Clone)]
pub struct AuthContextExt(pub AuthContext);

/// Extractor that requires authentication.
///
/// Returns 401 Unauthorized if no valid principal was resolved.
#[derive(Debug, Clone)]
pub struct RequirePrincipal(pub AuthContext);

impl Deref for RequirePrincipal {
    type Target = AuthContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for RequirePrincipal
where
    S: Send + Sync,
{
    type Rejection = ResolveError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContextExt>()
            .cloned()
            .map(|ext| Self(ext.0))
            .ok_or(ResolveError::Unauthenticated)
    }
}

/// Extractor for optional authentication.
///
/// Returns `None` if no principal was resolved, rather than failing.
#[derive(Debug, Clone)]
pub struct MaybePrincipal(pub Option<AuthContext>);

impl Deref for MaybePrincipal {
    type Target = Option<AuthContext>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for MaybePrincipal
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let context = parts
            .extensions
            .get::<AuthContextExt>()
            .cloned()
            .map(|ext| ext.0);
        Ok(Self(context))
    }
}

/// Role gate over a resolved context.
///
/// Returns 403 Forbidden when the principal's role does not match. This is
/// the one place the unauthenticated/forbidden distinction is decided: a
/// missing principal is 401, a mismatched role is 403.
#[derive(Debug, Clone)]
pub struct RequireRole {
    /// The authenticated context.
    pub context: AuthContext,
    /// The role that was checked.
    pub required: Role,
}

impl Deref for RequireRole {
    type Target = AuthContext;

    fn deref(&self) -> &Self::Target {
        &self.context
    }
}

impl RequireRole {
    /// Gate a resolved context on a role.
    pub fn new(context: AuthContext, required: &Role) -> Result<Self, ResolveError> {
        if context.has_role(required) {
            Ok(Self {
                context,
                required: required.clone(),
            })
        } else {
            Err(ResolveError::forbidden(required.as_str()))
        }
    }
}
