/// Supply (delivery) endpoints
///
/// - `GET /api/supplies` - List (admin, storekeeper)
/// - `GET /api/supplies/:id` - Detail (admin, storekeeper)
/// - `POST /api/supplies` - Record a delivery (admin, storekeeper)
/// - `GET /api/supplies/:id/signatures` - Both parties' signatures (any role)
///
/// Signatures are stored as data URLs and only returned by the signatures
/// endpoint; list and detail rows leave them out.

use crate::{
    app::AppState,
    envelope::{ItemEnvelope, ListEnvelope, MessageEnvelope},
    error::{ApiError, ApiResult},
    routes::{row_id, trim_field},
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use medgas_shared::{
    auth::middleware::AuthContext,
    models::supply::{CreateSupply, Supply, SupplySignatures},
};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSupplyRequest {
    #[validate(length(min = 1, max = 255, message = "Hospital name must be 1-255 characters"))]
    pub hospital_name: String,

    #[validate(range(min = 0.0, message = "Total price cannot be negative"))]
    pub total_price: f64,

    #[validate(length(min = 1, max = 255, message = "Recipient name must be 1-255 characters"))]
    pub recipient_name: String,

    pub recipient_signature: Option<String>,

    #[validate(length(min = 1, max = 255, message = "Driver name must be 1-255 characters"))]
    pub driver_name: String,

    pub deliverer_signature: Option<String>,
}

pub async fn list_supplies(State(state): State<AppState>) -> ApiResult<Json<ListEnvelope<Supply>>> {
    let supplies = state.store.list_supplies().await?;
    Ok(Json(ListEnvelope::new(supplies)))
}

pub async fn get_supply(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<ItemEnvelope<Supply>>> {
    let Path(id) = id?;
    let id = row_id(id)?;

    let supply = state
        .store
        .find_supply(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Supply not found".to_string()))?;

    Ok(Json(ItemEnvelope::new(supply)))
}

pub async fn create_supply(
    State(state): State<AppState>,
    auth: AuthContext,
    body: Result<Json<CreateSupplyRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MessageEnvelope<Supply>>)> {
    let Json(mut req) = body?;
    trim_field(&mut req.hospital_name);
    trim_field(&mut req.recipient_name);
    trim_field(&mut req.driver_name);
    req.validate()?;

    let supply = state
        .store
        .create_supply(CreateSupply {
            hospital_name: req.hospital_name,
            total_price: req.total_price,
            recipient_name: req.recipient_name,
            recipient_signature: req.recipient_signature.filter(|s| !s.is_empty()),
            driver_name: req.driver_name,
            deliverer_signature: req.deliverer_signature.filter(|s| !s.is_empty()),
        })
        .await?;

    info!(supply_id = supply.id, user_id = auth.user_id, "Supply recorded");
    Ok((
        StatusCode::CREATED,
        Json(MessageEnvelope::with_data("Supply recorded", supply)),
    ))
}

/// Answers the bare signature object, without an envelope
pub async fn supply_signatures(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<SupplySignatures>> {
    let Path(id) = id?;
    let id = row_id(id)?;

    let signatures = state
        .store
        .supply_signatures(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Supply not found".to_string()))?;

    Ok(Json(signatures))
}
