/// Read-only report queries
///
/// Reports never write. Each one is a single SELECT over cylinders or
/// supplies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

use super::cylinder::CylinderStatus;

/// One cylinder as shown in a status report
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CylinderReportRow {
    pub id: i32,
    pub code: String,
    pub size: String,
    pub gas_name: Option<String>,
    pub hospital_name: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Deliveries and billing per hospital
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct HospitalServed {
    pub hospital_name: String,
    pub deliveries: i64,
    pub total_billed: f64,
}

/// Cylinders currently in `status`, most recently changed first
pub async fn cylinders_with_status(
    pool: &MySqlPool,
    status: CylinderStatus,
) -> Result<Vec<CylinderReportRow>, sqlx::Error> {
    sqlx::query_as::<_, CylinderReportRow>(
        r#"
        SELECT c.id, c.code, c.size, g.name AS gas_name, s.hospital_name, c.updated_at
        FROM cylinders c
        LEFT JOIN gas_types g ON g.id = c.gas_type_id
        LEFT JOIN supplies s ON s.id = c.supply_id
        WHERE c.status = ?
        ORDER BY c.updated_at DESC, c.id DESC
        "#,
    )
    .bind(status.as_str())
    .fetch_all(pool)
    .await
}

pub async fn hospitals_served(pool: &MySqlPool) -> Result<Vec<HospitalServed>, sqlx::Error> {
    sqlx::query_as::<_, HospitalServed>(
        r#"
        SELECT hospital_name,
               COUNT(*) AS deliveries,
               COALESCE(SUM(total_price), 0) AS total_billed
        FROM supplies
        GROUP BY hospital_name
        ORDER BY hospital_name
        "#,
    )
    .fetch_all(pool)
    .await
}
