/// Session authentication layers
///
/// Both layers read the token from the `auth_token` cookie, falling back to
/// a Bearer header, and insert an [`AuthContext`] into request extensions.
/// They differ only in how they answer an unauthenticated request:
///
/// - [`require_api_auth`]: 401 JSON envelope
/// - [`require_page_auth`]: redirect to `/login`

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use medgas_shared::auth::middleware::{authenticate, bearer_token, AuthContext, AuthError, AUTH_COOKIE};

use crate::app::AppState;

fn resolve(state: &AppState, jar: &CookieJar, req: &Request) -> Result<AuthContext, AuthError> {
    let token = jar
        .get(AUTH_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .or_else(|| bearer_token(req.headers()).map(str::to_string));

    authenticate(token.as_deref(), state.jwt_secret())
}

pub async fn require_api_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth = resolve(&state, &jar, &req)?;
    req.extensions_mut().insert(auth);
    Ok(next.run(req).await)
}

pub async fn require_page_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    match resolve(&state, &jar, &req) {
        Ok(auth) => {
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Err(_) => Redirect::to("/login").into_response(),
    }
}
