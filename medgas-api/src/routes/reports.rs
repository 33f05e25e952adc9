/// Report endpoints (admin only)
///
/// - `GET /api/reports/delivered-cylinders`
/// - `GET /api/reports/filled-cylinders`
/// - `GET /api/reports/returned-cylinders`
/// - `GET /api/reports/hospitals-served`
///
/// A failed report query answers `{ "success": true, "data": [], "count": 0 }`
/// rather than an error, so an outage reads as "no data". The failure is
/// logged at warn level. Setting `REPORTS_SURFACE_ERRORS=true` makes these
/// endpoints fail with 500 like every other handler.

use crate::{app::AppState, envelope::ListEnvelope, error::ApiResult};
use axum::{extract::State, Json};
use medgas_shared::{
    models::{
        cylinder::CylinderStatus,
        report::{CylinderReportRow, HospitalServed},
    },
    store::StoreResult,
};
use std::future::Future;
use tracing::warn;

async fn run_report<T, Fut>(
    state: &AppState,
    report: &'static str,
    query: Fut,
) -> ApiResult<Json<ListEnvelope<T>>>
where
    Fut: Future<Output = StoreResult<Vec<T>>>,
{
    match query.await {
        Ok(rows) => Ok(Json(ListEnvelope::new(rows))),
        Err(e) if state.config.features.reports_surface_errors => Err(e.into()),
        Err(e) => {
            warn!(report, error = %e, "Report query failed, answering with an empty list");
            Ok(Json(ListEnvelope::empty()))
        }
    }
}

async fn cylinders_report(
    state: &AppState,
    report: &'static str,
    status: CylinderStatus,
) -> ApiResult<Json<ListEnvelope<CylinderReportRow>>> {
    run_report(state, report, state.store.cylinders_with_status(status)).await
}

pub async fn delivered_cylinders(
    State(state): State<AppState>,
) -> ApiResult<Json<ListEnvelope<CylinderReportRow>>> {
    cylinders_report(&state, "delivered-cylinders", CylinderStatus::Delivered).await
}

pub async fn filled_cylinders(
    State(state): State<AppState>,
) -> ApiResult<Json<ListEnvelope<CylinderReportRow>>> {
    cylinders_report(&state, "filled-cylinders", CylinderStatus::Filled).await
}

pub async fn returned_cylinders(
    State(state): State<AppState>,
) -> ApiResult<Json<ListEnvelope<CylinderReportRow>>> {
    cylinders_report(&state, "returned-cylinders", CylinderStatus::Returned).await
}

pub async fn hospitals_served(
    State(state): State<AppState>,
) -> ApiResult<Json<ListEnvelope<HospitalServed>>> {
    run_report(&state, "hospitals-served", state.store.hospitals_served()).await
}
