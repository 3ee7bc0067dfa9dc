//! Tower middleware for principal resolution.
//!
//! [`ResolverLayer`] verifies the bearer token of each incoming request
//! through a [`PrincipalResolver`] and, on success, attaches the resolved
//! [`AuthContext`] to request extensions for the extractors to pick up.
//!
//! Requests without a resolvable principal pass through *without* a context:
//! route-level extractors decide whether that is a 401. Infrastructure
//! failures short-circuit as 500 so a store outage is never mistaken for a
//! bad token.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use tower::{Layer, Service};

use warden_auth_core::{AuthError, PrincipalResolver};

use crate::context::AuthContext;
use crate::extractors::AuthContextExt;

/// Tower layer that resolves principals on incoming requests.
#[derive(Clone)]
pub struct ResolverLayer {
    resolver: Arc<dyn PrincipalResolver>,
}

impl ResolverLayer {
    /// Create a new resolver layer.
    #[must_use]
    pub fn new(resolver: Arc<dyn PrincipalResolver>) -> Self {
        Self { resolver }
    }
}

impl<S> Layer<S> for ResolverLayer {
    type Service = ResolverService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ResolverService {
            inner,
            resolver: Arc::clone(&self.resolver),
        }
    }
}

/// The resolver middleware service.
#[derive(Clone)]
pub struct ResolverService<S> {
    inner: S,
    resolver: Arc<dyn PrincipalResolver>,
}

impl<S, ResBody> Service<Request<Body>> for ResolverService<S>
where
    S: Service<Request<Body>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    ResBody: Default + Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future =
        Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let resolver = Arc::clone(&self.resolver);
        // Swap in the clone so the ready-polled instance is the one we call
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            if let Some(token) = bearer_token(&req) {
                match resolver.authenticate(&token).await {
                    Ok(principal) => {
                        req.extensions_mut()
                            .insert(AuthContextExt(AuthContext::from(principal)));
                    }
                    Err(err @ (AuthError::Store(_) | AuthError::Internal(_))) => {
                        tracing::error!(error = %err, "principal resolution infrastructure failure");
                        let response = Response::builder()
                            .status(StatusCode::INTERNAL_SERVER_ERROR)
                            .body(ResBody::default())
                            .expect("static response construction");
                        return Ok(response);
                    }
                    Err(err) => {
                        // Unresolvable token: pass through unauthenticated,
                        // protected routes reject via their extractor
                        tracing::debug!(error = %err, "bearer token did not resolve");
                    }
                }
            }

            inner.call(req).await
        })
    }
}

/// Extract the bearer token from the Authorization header.
fn bearer_token(req: &Request<Body>) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with_auth(value: &str) -> Request<Body> {
        Request::builder()
            .header(header::AUTHORIZATION, value)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_bearer_token_extraction() {
        let req = request_with_auth("Bearer abc.def");
        assert_eq!(bearer_token(&req).as_deref(), Some("abc.def"));

        let req = request_with_auth("Basic dXNlcjpwYXNz");
        assert_eq!(bearer_token(&req), None);

        let req = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(bearer_token(&req), None);
    }
}
