/// Hospital supply deliveries
///
/// A supply records one delivery run to a hospital, who received it and who
/// drove it, plus the two captured signatures (stored as data URLs).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE supplies (
///     id INT AUTO_INCREMENT PRIMARY KEY,
///     hospital_name VARCHAR(255) NOT NULL,
///     total_price DOUBLE NOT NULL DEFAULT 0,
///     recipient_name VARCHAR(255) NOT NULL,
///     recipient_signature MEDIUMTEXT NULL,
///     driver_name VARCHAR(255) NOT NULL,
///     deliverer_signature MEDIUMTEXT NULL,
///     created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

/// Supply row without the signature payloads
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Supply {
    pub id: i32,
    pub hospital_name: String,
    pub total_price: f64,
    pub recipient_name: String,
    pub driver_name: String,
    pub created_at: DateTime<Utc>,
}

/// Both parties' names and signatures for a supply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SupplySignatures {
    pub recipient_name: String,
    pub recipient_signature: Option<String>,
    pub deliverer_name: String,
    pub deliverer_signature: Option<String>,
}

/// Input for recording a delivery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSupply {
    pub hospital_name: String,
    pub total_price: f64,
    pub recipient_name: String,
    pub recipient_signature: Option<String>,
    pub driver_name: String,
    pub deliverer_signature: Option<String>,
}

impl Supply {
    /// Lists supplies, newest first
    pub async fn list(pool: &MySqlPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Supply>(
            r#"
            SELECT id, hospital_name, total_price, recipient_name, driver_name, created_at
            FROM supplies
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &MySqlPool, id: i32) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Supply>(
            r#"
            SELECT id, hospital_name, total_price, recipient_name, driver_name, created_at
            FROM supplies
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Inserts a supply and returns its generated ID
    pub async fn create(pool: &MySqlPool, data: &CreateSupply) -> Result<i32, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO supplies (hospital_name, total_price, recipient_name,
                                  recipient_signature, driver_name, deliverer_signature)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&data.hospital_name)
        .bind(data.total_price)
        .bind(&data.recipient_name)
        .bind(&data.recipient_signature)
        .bind(&data.driver_name)
        .bind(&data.deliverer_signature)
        .execute(pool)
        .await?;

        Ok(result.last_insert_id() as i32)
    }

    /// Fetches the signature block of a supply
    pub async fn signatures(
        pool: &MySqlPool,
        id: i32,
    ) -> Result<Option<SupplySignatures>, sqlx::Error> {
        sqlx::query_as::<_, SupplySignatures>(
            r#"
            SELECT recipient_name, recipient_signature,
                   driver_name AS deliverer_name, deliverer_signature
            FROM supplies
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}
