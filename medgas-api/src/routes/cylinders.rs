/// Cylinder endpoints
///
/// - `GET /api/cylinders?status=filled` - List, optionally by status (any role)
/// - `GET /api/cylinders/:id` - Detail (any role)
/// - `POST /api/cylinders` - Register a cylinder (admin, storekeeper)
/// - `PATCH /api/cylinders/:id/status` - Change status (admin, storekeeper, technician)
/// - `POST /api/cylinders/:id/assign` - Attach to a supply (admin, storekeeper)

use crate::{
    app::AppState,
    envelope::{ItemEnvelope, ListEnvelope, MessageEnvelope},
    error::{ApiError, ApiResult},
    routes::{row_id, trim_field},
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use medgas_shared::{
    auth::middleware::AuthContext,
    models::cylinder::{CreateCylinder, Cylinder, CylinderStatus},
};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

#[derive(Debug, Deserialize)]
pub struct ListCylindersQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCylinderRequest {
    #[validate(length(min = 1, max = 50, message = "Code must be 1-50 characters"))]
    pub code: String,

    #[validate(length(min = 1, max = 20, message = "Size must be 1-20 characters"))]
    pub size: String,

    #[validate(range(min = 1, message = "Invalid gas type"))]
    pub gas_type_id: Option<i32>,

    /// Defaults to `empty`
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AssignRequest {
    #[validate(range(min = 1, message = "Invalid supply id"))]
    pub supply_id: i32,
}

fn parse_status(raw: &str) -> ApiResult<CylinderStatus> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest("Invalid status".to_string()))
}

pub async fn list_cylinders(
    State(state): State<AppState>,
    query: Result<Query<ListCylindersQuery>, QueryRejection>,
) -> ApiResult<Json<ListEnvelope<Cylinder>>> {
    let Query(query) = query?;
    let status = query
        .status
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(parse_status)
        .transpose()?;

    let cylinders = state.store.list_cylinders(status).await?;
    Ok(Json(ListEnvelope::new(cylinders)))
}

pub async fn get_cylinder(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<ItemEnvelope<Cylinder>>> {
    let Path(id) = id?;
    let id = row_id(id)?;

    let cylinder = state
        .store
        .find_cylinder(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Cylinder not found".to_string()))?;

    Ok(Json(ItemEnvelope::new(cylinder)))
}

pub async fn create_cylinder(
    State(state): State<AppState>,
    auth: AuthContext,
    body: Result<Json<CreateCylinderRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MessageEnvelope<Cylinder>>)> {
    let Json(mut req) = body?;
    trim_field(&mut req.code);
    trim_field(&mut req.size);
    req.validate()?;

    let status = match req.status.as_deref() {
        Some(raw) => parse_status(raw)?,
        None => CylinderStatus::Empty,
    };

    let cylinder = state
        .store
        .create_cylinder(CreateCylinder {
            code: req.code,
            size: req.size,
            gas_type_id: req.gas_type_id,
            status,
        })
        .await?;

    info!(cylinder_id = cylinder.id, user_id = auth.user_id, "Cylinder registered");
    Ok((
        StatusCode::CREATED,
        Json(MessageEnvelope::with_data("Cylinder created", cylinder)),
    ))
}

pub async fn update_cylinder_status(
    State(state): State<AppState>,
    auth: AuthContext,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> ApiResult<Json<MessageEnvelope<()>>> {
    let Path(id) = id?;
    let id = row_id(id)?;
    let Json(req) = body?;
    let status = parse_status(&req.status)?;

    if !state.store.update_cylinder_status(id, status).await? {
        return Err(ApiError::NotFound("Cylinder not found".to_string()));
    }

    info!(cylinder_id = id, status = %status, user_id = auth.user_id, "Cylinder status updated");
    Ok(Json(MessageEnvelope::message(format!(
        "Cylinder marked as {}",
        status
    ))))
}

pub async fn assign_cylinder(
    State(state): State<AppState>,
    auth: AuthContext,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<AssignRequest>, JsonRejection>,
) -> ApiResult<Json<MessageEnvelope<()>>> {
    let Path(id) = id?;
    let id = row_id(id)?;
    let Json(req) = body?;
    req.validate()?;

    if !state.store.assign_cylinder(id, req.supply_id).await? {
        return Err(ApiError::NotFound("Cylinder not found".to_string()));
    }

    info!(cylinder_id = id, supply_id = req.supply_id, user_id = auth.user_id, "Cylinder assigned");
    Ok(Json(MessageEnvelope::message("Cylinder assigned")))
}
