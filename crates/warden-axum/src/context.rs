//! Authentication context types.
//!
//! The [`AuthContext`] struct carries the resolved principal into request
//! handlers. It is the only channel through which role information reaches
//! business logic; handlers never re-derive the role from raw claims.

use warden_auth_core::AuthenticatedPrincipal;
use warden_types::{PrincipalId, Role};

/// Resolved principal attached to authenticated requests.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// The authenticated principal's ID.
    pub principal_id: PrincipalId,
    /// The role the principal is registered under.
    pub role: Role,
    /// The principal's login identifier.
    pub identifier: String,
}

impl AuthContext {
    /// Check whether the principal holds the given role.
    #[must_use]
    pub fn has_role(&self, role: &Role) -> bool {
        &self.role == role
    }
}

impl From<AuthenticatedPrincipal> for AuthContext {
    fn from(principal: AuthenticatedPrincipal) -> Self {
        Self {
            principal_id: principal.principal_id,
            role: principal.role,
            identifier: principal.identifier,
        }
    }
}
