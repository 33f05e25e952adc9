/// Diagnostic endpoints (admin only, mounted when `ENABLE_DEBUG_ROUTES=true`)
///
/// - `GET /api/debug/schema/:table` - Column layout of an allow-listed table
/// - `GET /api/debug/users` - A few user rows, never including password hashes
/// - `GET /api/debug/time` - The database server's clock
///
/// Unlike the resource handlers, failures here return the driver message.

use crate::{
    app::AppState,
    envelope::{ItemEnvelope, ListEnvelope},
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use medgas_shared::{
    models::{
        schema::{ColumnDescription, SchemaTable},
        user::User,
    },
    store::StoreError,
};
use serde::Serialize;

const USER_SAMPLE_SIZE: i64 = 5;

#[derive(Debug, Serialize)]
pub struct ServerTime {
    pub database_time: DateTime<Utc>,
    pub server_time: DateTime<Utc>,
}

fn diagnostic(err: StoreError) -> ApiError {
    ApiError::Diagnostic(err.to_string())
}

pub async fn describe_table(
    State(state): State<AppState>,
    table: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<ListEnvelope<ColumnDescription>>> {
    let Path(table) = table?;
    let table: SchemaTable = table
        .parse()
        .map_err(|_| ApiError::BadRequest("Unknown table".to_string()))?;

    let columns = state.store.describe_table(table).await.map_err(diagnostic)?;
    Ok(Json(ListEnvelope::new(columns)))
}

pub async fn sample_users(State(state): State<AppState>) -> ApiResult<Json<ListEnvelope<User>>> {
    let users = state
        .store
        .sample_users(USER_SAMPLE_SIZE)
        .await
        .map_err(diagnostic)?;
    Ok(Json(ListEnvelope::new(users)))
}

pub async fn server_time(State(state): State<AppState>) -> ApiResult<Json<ItemEnvelope<ServerTime>>> {
    let database_time = state.store.server_time().await.map_err(diagnostic)?;
    Ok(Json(ItemEnvelope::new(ServerTime {
        database_time,
        server_time: Utc::now(),
    })))
}
