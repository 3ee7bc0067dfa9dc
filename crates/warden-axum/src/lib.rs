//! Warden Axum Integration
//!
//! Axum middleware and extractors for the Warden principal resolver.
//!
//! # Overview
//!
//! - **Middleware**: [`ResolverLayer`] verifies the bearer token on every
//!   request and attaches an [`AuthContext`] to request extensions.
//! - **Extractors**: [`RequirePrincipal`], [`MaybePrincipal`] and
//!   [`RequireRole`] give handlers typed access to that context.
//! - **Errors**: [`ResolveError`] keeps the 401 (unauthenticated) vs 403
//!   (wrong role) split callers rely on for retry semantics.
//!
//! # Quick Start
//!
//! ```ignore
//! use warden_axum::{RequirePrincipal, ResolverLayer};
//! use axum::{routing::get, Router};
//!
//! async fn protected(principal: RequirePrincipal) -> String {
//!     format!("Hello, {}!", principal.identifier)
//! }
//!
//! let app = Router::new()
//!     .route("/api/protected", get(protected))
//!     .layer(ResolverLayer::new(auth_service));
//! ```

pub mod context;
pub mod error;
pub mod extractors;
pub mod layer;

pub use context::AuthContext;
pub use error::ResolveError;
pub use extractors::{AuthContextExt, MaybePrincipal, RequirePrincipal, RequireRole};
pub use layer::{ResolverLayer, ResolverService};
