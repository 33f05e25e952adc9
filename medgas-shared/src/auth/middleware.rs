/// Request authentication primitives for Axum
///
/// The session token travels in the `auth_token` cookie. A
/// `Authorization: Bearer <token>` header is accepted as a fallback so the
/// JSON API can be driven by non-browser clients.
///
/// [`authenticate`] turns a raw token into an [`AuthContext`]; the HTTP
/// layer inserts that context into request extensions, and handlers take it
/// as an extractor.
///
/// # Example
///
/// ```no_run
/// use medgas_shared::auth::middleware::AuthContext;
///
/// async fn whoami(auth: AuthContext) -> String {
///     format!("{} ({})", auth.username, auth.role)
/// }
/// ```

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use super::jwt::{validate_token, Claims};
use crate::models::user::Role;

/// Name of the session cookie
pub const AUTH_COOKIE: &str = "auth_token";

/// Authenticated identity attached to each request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthContext {
    pub user_id: i32,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl From<Claims> for AuthContext {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
            email: claims.email,
            role: claims.role,
        }
    }
}

/// Authentication failure
///
/// Deliberately carries no detail: a missing, malformed, forged and expired
/// token all produce the same response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Unauthorized")]
pub struct AuthError;

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "success": false,
                "error": "unauthorized",
                "message": "Unauthorized",
            })),
        )
            .into_response()
    }
}

/// Validates a raw token and builds the request identity
pub fn authenticate(token: Option<&str>, secret: &str) -> Result<AuthContext, AuthError> {
    let token = token.filter(|t| !t.is_empty()).ok_or(AuthError)?;

    match validate_token(token, secret) {
        Ok(claims) => Ok(claims.into()),
        Err(e) => {
            debug!(reason = %e, "Rejected session token");
            Err(AuthError)
        }
    }
}

/// Reads the `Authorization: Bearer` header, if any
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AuthError)
    }
}
