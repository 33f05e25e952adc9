/// Invoice endpoints (admin only)
///
/// - `GET /api/invoices` - List
/// - `GET /api/invoices/:id` - Detail
/// - `POST /api/invoices/:id/status` - `{ "newStatus": "paid" }` → `{ "success": true }`
/// - `POST /api/invoices/update` - `{ "invoiceId": 7, "status": "paid" }` →
///   `{ "success": true, "message": "Invoice marked as paid" }`
///
/// Both writes validate the status before touching the store, and announce
/// `/invoices` and `/invoices/:id` as stale only after the row was updated.

use crate::{
    app::AppState,
    envelope::{Ack, ItemEnvelope, ListEnvelope, MessageEnvelope},
    error::{ApiError, ApiResult},
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
    models::invoice::{Invoice, InvoiceStatus},
};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetStatusRequest {
    pub new_status: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInvoiceRequest {
    pub invoice_id: i32,
    pub status: String,
}

fn parse_status(raw: &str) -> ApiResult<InvoiceStatus> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest("Status must be 'paid' or 'unpaid'".to_string()))
}

/// Writes the status, then signals revalidation
async fn apply_status(
    state: &AppState,
    auth: &AuthContext,
    id: i32,
    status: InvoiceStatus,
) -> ApiResult<()> {
    if !state.store.update_invoice_status(id, status).await? {
        return Err(ApiError::NotFound("Invoice not found".to_string()));
    }

    info!(invoice_id = id, status = %status, user_id = auth.user_id, "Invoice status updated");
    state.revalidator.invoice_changed(id);
    Ok(())
}

pub async fn list_invoices(State(state): State<AppState>) -> ApiResult<Json<ListEnvelope<Invoice>>> {
    let invoices = state.store.list_invoices().await?;
    Ok(Json(ListEnvelope::new(invoices)))
}

pub async fn get_invoice(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<ItemEnvelope<Invoice>>> {
    let Path(id) = id?;
    let id = row_id(id)?;

    let invoice = state
        .store
        .find_invoice(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invoice not found".to_string()))?;

    Ok(Json(ItemEnvelope::new(invoice)))
}

pub async fn set_invoice_status(
    State(state): State<AppState>,
    auth: AuthContext,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<SetStatusRequest>, JsonRejection>,
) -> ApiResult<Json<Ack>> {
    let Path(id) = id?;
    let id = row_id(id)?;
    let Json(req) = body?;
    let status = parse_status(&req.new_status)?;

    apply_status(&state, &auth, id, status).await?;
    Ok(Json(Ack::ok()))
}

pub async fn update_invoice(
    State(state): State<AppState>,
    auth: AuthContext,
    body: Result<Json<UpdateInvoiceRequest>, JsonRejection>,
) -> ApiResult<Json<MessageEnvelope<()>>> {
    let Json(req) = body?;
    let id = row_id(req.invoice_id)?;
    let status = parse_status(&req.status)?;

    apply_status(&state, &auth, id, status).await?;
    Ok(Json(MessageEnvelope::message(format!(
        "Invoice marked as {}",
        status
    ))))
}
