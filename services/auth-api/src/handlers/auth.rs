//! Authentication handlers (register, login, refresh, logout, me)
//!
//! Register and login are role-parameterized through the path: one logical
//! instance of each operation exists per role, served by the same handler.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use warden_axum::RequirePrincipal;
use warden_db::PrincipalRow;
use warden_types::{Role, SessionPair};

use crate::error::ApiResult;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub identifier: String,
    pub credential: String,
}

#[derive(Debug, Serialize)]
pub struct PrincipalInfo {
    pub id: String,
    pub role: String,
    pub identifier: String,
}

impl From<&PrincipalRow> for PrincipalInfo {
    fn from(row: &PrincipalRow) -> Self {
        Self {
            id: row.id.to_string(),
            role: row.role.clone(),
            identifier: row.identifier.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub principal: PrincipalInfo,
    pub session: SessionPair,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub revoked: bool,
}

#[derive(Debug, Serialize)]
pub struct LogoutAllResponse {
    pub revoked_families: u64,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub principal_id: String,
    pub role: String,
    pub identifier: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/auth/{role}/register
///
/// Create a principal under a role and open its first session
pub async fn register(
    State(state): State<AppState>,
    Path(role): Path<Role>,
    Json(req): Json<CredentialsRequest>,
) -> ApiResult<impl IntoResponse> {
    let (principal, session) = state
        .auth
        .register(&role, &req.identifier, &req.credential)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            principal: PrincipalInfo::from(&principal),
            session,
        }),
    ))
}

/// POST /api/v1/auth/{role}/login
///
/// Verify credentials and open a new session
pub async fn login(
    State(state): State<AppState>,
    Path(role): Path<Role>,
    Json(req): Json<CredentialsRequest>,
) -> ApiResult<Json<SessionResponse>> {
    let (principal, session) = state
        .auth
        .login(&role, &req.identifier, &req.credential)
        .await?;

    Ok(Json(SessionResponse {
        principal: PrincipalInfo::from(&principal),
        session,
    }))
}

/// POST /api/v1/auth/refresh
///
/// Rotate a refresh token into a new session pair
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<SessionPair>> {
    let pair = state.auth.refresh(&req.refresh_token).await?;
    Ok(Json(pair))
}

/// POST /api/v1/auth/logout
///
/// Revoke the family of the presented refresh token
pub async fn logout(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<LogoutResponse>> {
    state.auth.logout(&req.refresh_token).await?;
    Ok(Json(LogoutResponse { revoked: true }))
}

/// POST /api/v1/auth/logout_all
///
/// Revoke every session family of the authenticated principal
pub async fn logout_all(
    State(state): State<AppState>,
    principal: RequirePrincipal,
) -> ApiResult<Json<LogoutAllResponse>> {
    let revoked_families = state.auth.logout_all(principal.principal_id).await?;
    Ok(Json(LogoutAllResponse { revoked_families }))
}

/// GET /api/v1/auth/me
///
/// Current principal, resolved fresh from the store by the middleware
pub async fn me(principal: RequirePrincipal) -> Json<MeResponse> {
    Json(MeResponse {
        principal_id: principal.principal_id.to_string(),
        role: principal.role.to_string(),
        identifier: principal.identifier.clone(),
    })
}
