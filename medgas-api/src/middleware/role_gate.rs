/// Role gate layers
///
/// Applied with `route_layer` so the allow-list travels with the routes it
/// protects. Runs after authentication and before the handler; a denied
/// request never reaches the handler or the store.
///
/// ```no_run
/// use axum::{middleware::from_fn_with_state, routing::get, Router};
/// use medgas_api::middleware::role_gate::role_gate;
/// use medgas_shared::auth::authorization::AllowList;
///
/// let admin_only: Router = Router::new()
///     .route("/api/reports/hospitals-served", get(|| async { "ok" }))
///     .route_layer(from_fn_with_state(AllowList::ADMIN, role_gate));
/// ```

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use medgas_shared::auth::{
    authorization::{evaluate, Access, AllowList},
    middleware::AuthContext,
};
use tracing::debug;

use crate::{error::ApiError, pages};

pub async fn role_gate(
    State(allow): State<AllowList>,
    auth: AuthContext,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    match evaluate(auth.role, &allow) {
        Access::Allowed => Ok(next.run(req).await),
        Access::Denied => {
            debug!(user_id = auth.user_id, role = %auth.role, path = %req.uri().path(), "Role denied");
            Err(ApiError::Forbidden("Insufficient permissions".to_string()))
        }
    }
}

/// Page variant: renders the forbidden page instead of a JSON envelope
pub async fn page_gate(
    State(allow): State<AllowList>,
    auth: AuthContext,
    req: Request,
    next: Next,
) -> Response {
    match evaluate(auth.role, &allow) {
        Access::Allowed => next.run(req).await,
        Access::Denied => {
            debug!(user_id = auth.user_id, role = %auth.role, path = %req.uri().path(), "Page denied");
            (StatusCode::FORBIDDEN, pages::forbidden(&auth)).into_response()
        }
    }
}
