/// Inventory endpoints
///
/// - `GET /api/inventory/summary` - Stock per gas type (any role)
/// - `PUT /api/inventory/:gas_type_id` - Replace the totals for one gas type (admin, storekeeper)
///
/// The summary answers `{ "data": [...] }` without a count; an empty
/// inventory table is a normal, successful answer.

use crate::{
    app::AppState,
    envelope::MessageEnvelope,
    error::ApiResult,
    routes::row_id,
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use medgas_shared::{
    auth::middleware::AuthContext,
    models::inventory::{InventoryLevels, InventorySummary},
};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

#[derive(Debug, Serialize)]
pub struct InventorySummaryResponse {
    pub data: Vec<InventorySummary>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpsertInventoryRequest {
    #[validate(range(min = 0, message = "Cylinder count cannot be negative"))]
    pub total_cylinders: i32,

    #[validate(range(min = 0.0, message = "Liters cannot be negative"))]
    pub total_liters: f64,
}

pub async fn inventory_summary(
    State(state): State<AppState>,
) -> ApiResult<Json<InventorySummaryResponse>> {
    let data = state.store.inventory_summary().await?;
    Ok(Json(InventorySummaryResponse { data }))
}

pub async fn upsert_inventory(
    State(state): State<AppState>,
    auth: AuthContext,
    gas_type_id: Result<Path<i32>, PathRejection>,
    body: Result<Json<UpsertInventoryRequest>, JsonRejection>,
) -> ApiResult<Json<MessageEnvelope<InventoryLevels>>> {
    let Path(gas_type_id) = gas_type_id?;
    let gas_type_id = row_id(gas_type_id)?;
    let Json(req) = body?;
    req.validate()?;

    let levels = InventoryLevels {
        total_cylinders: req.total_cylinders,
        total_liters: req.total_liters,
    };
    state.store.set_inventory(gas_type_id, levels).await?;

    info!(
        gas_type_id,
        total_cylinders = levels.total_cylinders,
        total_liters = levels.total_liters,
        user_id = auth.user_id,
        "Inventory updated"
    );
    Ok(Json(MessageEnvelope::with_data("Inventory updated", levels)))
}
