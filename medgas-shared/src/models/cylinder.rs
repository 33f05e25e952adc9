/// Cylinder model and database operations
///
/// A cylinder moves through a simple lifecycle. The application does not
/// enforce transitions; any status may be written over any other, and
/// concurrent writers resolve as last-write-wins in MySQL.
///
/// ```text
/// empty → filled → assigned → delivered → returned → filled ...
/// ```
///
/// # Schema
///
/// ```sql
/// CREATE TABLE cylinders (
///     id INT AUTO_INCREMENT PRIMARY KEY,
///     code VARCHAR(50) NOT NULL UNIQUE,
///     size VARCHAR(20) NOT NULL,
///     gas_type_id INT NULL REFERENCES gas_types(id),
///     status VARCHAR(20) NOT NULL DEFAULT 'empty',
///     supply_id INT NULL REFERENCES supplies(id),
///     created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
///     updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use std::fmt;
use std::str::FromStr;

use super::ParseEnumError;

/// Cylinder lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CylinderStatus {
    /// Returned to the plant and awaiting a refill
    Empty,

    /// Filled and in stock
    Filled,

    /// Reserved for a supply, not yet handed over
    Assigned,

    /// Handed over to a hospital
    Delivered,

    /// Collected back from a hospital
    Returned,
}

impl CylinderStatus {
    pub const ALL: [CylinderStatus; 5] = [
        CylinderStatus::Empty,
        CylinderStatus::Filled,
        CylinderStatus::Assigned,
        CylinderStatus::Delivered,
        CylinderStatus::Returned,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CylinderStatus::Empty => "empty",
            CylinderStatus::Filled => "filled",
            CylinderStatus::Assigned => "assigned",
            CylinderStatus::Delivered => "delivered",
            CylinderStatus::Returned => "returned",
        }
    }
}

impl fmt::Display for CylinderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CylinderStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CylinderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("cylinder status", s))
    }
}

impl TryFrom<String> for CylinderStatus {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Cylinder row joined with its gas name
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Cylinder {
    pub id: i32,
    pub code: String,
    pub size: String,
    pub gas_type_id: Option<i32>,
    pub gas_name: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: CylinderStatus,
    pub supply_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for registering a cylinder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCylinder {
    pub code: String,
    pub size: String,
    pub gas_type_id: Option<i32>,
    pub status: CylinderStatus,
}

const SELECT_CYLINDER: &str = r#"
    SELECT c.id, c.code, c.size, c.gas_type_id, g.name AS gas_name,
           c.status, c.supply_id, c.created_at, c.updated_at
    FROM cylinders c
    LEFT JOIN gas_types g ON g.id = c.gas_type_id
"#;

impl Cylinder {
    /// Lists cylinders, optionally restricted to one status
    pub async fn list(
        pool: &MySqlPool,
        status: Option<CylinderStatus>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        match status {
            Some(status) => {
                let sql = format!("{SELECT_CYLINDER} WHERE c.status = ? ORDER BY c.code");
                sqlx::query_as::<_, Cylinder>(&sql)
                    .bind(status.as_str())
                    .fetch_all(pool)
                    .await
            }
            None => {
                let sql = format!("{SELECT_CYLINDER} ORDER BY c.code");
                sqlx::query_as::<_, Cylinder>(&sql).fetch_all(pool).await
            }
        }
    }

    pub async fn find_by_id(pool: &MySqlPool, id: i32) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("{SELECT_CYLINDER} WHERE c.id = ?");
        sqlx::query_as::<_, Cylinder>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Inserts a cylinder and returns its generated ID
    pub async fn create(pool: &MySqlPool, data: &CreateCylinder) -> Result<i32, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO cylinders (code, size, gas_type_id, status)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&data.code)
        .bind(&data.size)
        .bind(data.gas_type_id)
        .bind(data.status.as_str())
        .execute(pool)
        .await?;

        Ok(result.last_insert_id() as i32)
    }

    /// Overwrites the status of one cylinder
    ///
    /// Returns false when no row has the given ID.
    pub async fn update_status(
        pool: &MySqlPool,
        id: i32,
        status: CylinderStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE cylinders SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Reserves a cylinder for a supply
    ///
    /// Sets `status = 'assigned'` and links the supply in one statement.
    /// Returns false when no row has the given ID.
    pub async fn assign(pool: &MySqlPool, id: i32, supply_id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE cylinders SET status = 'assigned', supply_id = ? WHERE id = ?",
        )
        .bind(supply_id)
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
