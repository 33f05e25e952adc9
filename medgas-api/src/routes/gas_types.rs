/// Gas type endpoints
///
/// - `GET /api/gas-types` - List (any role)
/// - `POST /api/gas-types` - Create (admin, storekeeper)

use crate::{
    app::AppState,
    envelope::{ListEnvelope, MessageEnvelope},
    error::ApiResult,
    routes::trim_field,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use medgas_shared::models::gas_type::GasType;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateGasTypeRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
}

pub async fn list_gas_types(State(state): State<AppState>) -> ApiResult<Json<ListEnvelope<GasType>>> {
    let gas_types = state.store.list_gas_types().await?;
    Ok(Json(ListEnvelope::new(gas_types)))
}

pub async fn create_gas_type(
    State(state): State<AppState>,
    body: Result<Json<CreateGasTypeRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MessageEnvelope<GasType>>)> {
    let Json(mut req) = body?;
    trim_field(&mut req.name);
    req.validate()?;

    let gas_type = state.store.create_gas_type(&req.name).await?;

    info!(gas_type_id = gas_type.id, name = %gas_type.name, "Gas type created");
    Ok((
        StatusCode::CREATED,
        Json(MessageEnvelope::with_data("Gas type created", gas_type)),
    ))
}
