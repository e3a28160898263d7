//! Authentication Middleware
//!
//! Axum middleware for bearer token validation.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::auth::{jwt::TokenVerifier, models::AuthUser};

/// Authentication middleware that validates access tokens and injects the account id
pub struct AuthMiddleware;

impl AuthMiddleware {
    /// Reject the request with 403 unless it carries a valid `Bearer` token.
    ///
    /// A missing header, a malformed header and a bad token are indistinguishable
    /// to the client.
    pub async fn validate_token(
        State(verifier): State<Arc<TokenVerifier>>,
        mut req: Request,
        next: Next,
    ) -> Result<Response, StatusCode> {
        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_bearer_token);

        let Some(token) = token else {
            tracing::debug!("[AuthMiddleware] Missing or malformed Authorization header");
            return Err(StatusCode::FORBIDDEN);
        };

        let id = match verifier.verify(token) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("[AuthMiddleware] Token rejected for {} {}: {}", req.method(), req.uri(), e);
                return Err(StatusCode::FORBIDDEN);
            }
        };
        tracing::debug!("[AuthMiddleware] Authenticated user {}", id);

        req.extensions_mut().insert(AuthUser { id });
        Ok(next.run(req).await)
    }
}

/// Split `<scheme> <token>` once and accept the `bearer` scheme in any case.
pub fn parse_bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }
    Some(token)
}
