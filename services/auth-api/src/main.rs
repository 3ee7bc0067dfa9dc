//! Warden Auth API
//!
//! Authentication microservice: registration, login, refresh rotation,
//! logout and principal resolution over the Warden auth core.

mod config;
mod error;
mod handlers;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tracing_subscriber::EnvFilter;

use warden_auth_core::{AuthService, BcryptHasher, PrincipalResolver};
use warden_axum::ResolverLayer;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting Warden Auth API");

    let config = Config::from_env()?;

    // Database and repositories
    let pool = warden_db::create_pool(&config.database_url).await?;
    let repos = warden_db::Repositories::new(pool.clone());

    // Auth service over the Postgres repositories
    let auth = AuthService::new(
        config.auth.clone(),
        Arc::new(repos.principals),
        Arc::new(repos.families),
        Arc::new(BcryptHasher::new()),
    );

    let state = AppState::new(auth, pool, config);
    let resolver: Arc<dyn PrincipalResolver> = state.auth.clone();

    // Routes behind the principal resolver
    let protected = Router::new()
        .route("/api/v1/auth/me", get(handlers::me))
        .route("/api/v1/auth/logout_all", post(handlers::logout_all))
        .layer(ResolverLayer::new(resolver));

    let app = Router::new()
        .route("/health", get(handlers::health))
        .route("/ready", get(handlers::ready))
        .route("/api/v1/auth/{role}/register", post(handlers::register))
        .route("/api/v1/auth/{role}/login", post(handlers::login))
        .route("/api/v1/auth/refresh", post(handlers::refresh))
        .route("/api/v1/auth/logout", post(handlers::logout))
        .merge(protected)
        .with_state(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.http_port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
