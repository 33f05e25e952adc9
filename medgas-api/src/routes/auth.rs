/// Session endpoints
///
/// - `POST /api/auth/login` - Verify credentials and set the `auth_token` cookie
/// - `POST /api/auth/logout` - Clear the cookie
/// - `GET /api/auth/me` - The identity carried by the current session
///
/// Accounts are provisioned elsewhere; there is no registration endpoint.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use medgas_shared::auth::{
    jwt::{self, Claims},
    middleware::{AuthContext, AUTH_COOKIE},
    password,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: AuthContext,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: AuthContext,
}

/// Verifies credentials and issues a signed session token
///
/// Unknown email, wrong password and an unusable stored hash all produce
/// the same 401.
pub(crate) async fn issue_session(
    state: &AppState,
    email: &str,
    password_attempt: &str,
) -> ApiResult<(AuthContext, String)> {
    let credentials = match state.store.find_credentials(email).await? {
        Some(credentials) => credentials,
        None => {
            info!("Login attempt for unknown account");
            return Err(ApiError::Unauthorized);
        }
    };

    if !password::verify_login(password_attempt, &credentials.password_hash) {
        warn!(user_id = credentials.id, "Login failed: wrong password");
        return Err(ApiError::Unauthorized);
    }

    let claims = Claims::new(
        credentials.id,
        credentials.username,
        credentials.email,
        credentials.role,
        state.config.session_ttl(),
    );
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    info!(user_id = claims.sub, role = %claims.role, "Session issued");
    Ok((claims.into(), token))
}

pub(crate) fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.api.cookie_secure)
        .build()
}

pub(crate) fn clear_session(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(AUTH_COOKIE).path("/"))
}

/// Login endpoint
///
/// ```text
/// POST /api/auth/login
/// Content-Type: application/json
///
/// { "email": "admin@example.org", "password": "..." }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Body is not valid JSON
/// - `401 Unauthorized`: Invalid credentials
/// - `422 Unprocessable Entity`: Validation failed
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<(CookieJar, Json<LoginResponse>)> {
    let Json(req) = body?;
    req.validate()?;

    let (user, token) = issue_session(&state, &req.email, &req.password).await?;

    Ok((
        jar.add(session_cookie(&state, token)),
        Json(LoginResponse {
            success: true,
            user,
        }),
    ))
}

pub async fn logout(jar: CookieJar) -> (CookieJar, Json<crate::envelope::MessageEnvelope<()>>) {
    (
        clear_session(jar),
        Json(crate::envelope::MessageEnvelope::message("Logged out")),
    )
}

pub async fn me(auth: AuthContext) -> Json<MeResponse> {
    Json(MeResponse { user: auth })
}
