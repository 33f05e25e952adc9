/// Invoice model and database operations
///
/// Invoices are only ever mutated by a single status update statement.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE invoices (
///     id INT AUTO_INCREMENT PRIMARY KEY,
///     supply_id INT NULL REFERENCES supplies(id),
///     amount DOUBLE NOT NULL DEFAULT 0,
///     status VARCHAR(10) NOT NULL DEFAULT 'unpaid',
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

/// Invoice payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Paid,
    Unpaid,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Unpaid => "unpaid",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paid" => Ok(InvoiceStatus::Paid),
            "unpaid" => Ok(InvoiceStatus::Unpaid),
            other => Err(ParseEnumError::new("invoice status", other)),
        }
    }
}

impl TryFrom<String> for InvoiceStatus {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Invoice row joined with the hospital of its supply
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Invoice {
    pub id: i32,
    pub supply_id: Option<i32>,
    pub hospital_name: Option<String>,
    pub amount: f64,
    #[sqlx(try_from = "String")]
    pub status: InvoiceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const SELECT_INVOICE: &str = r#"
    SELECT i.id, i.supply_id, s.hospital_name, i.amount, i.status,
           i.created_at, i.updated_at
    FROM invoices i
    LEFT JOIN supplies s ON s.id = i.supply_id
"#;

impl Invoice {
    /// Lists invoices, newest first
    pub async fn list(pool: &MySqlPool) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!("{SELECT_INVOICE} ORDER BY i.created_at DESC, i.id DESC");
        sqlx::query_as::<_, Invoice>(&sql).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &MySqlPool, id: i32) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("{SELECT_INVOICE} WHERE i.id = ?");
        sqlx::query_as::<_, Invoice>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Writes a new payment status
    ///
    /// Returns false when no invoice has the given ID. Concurrent updates of
    /// the same invoice are last-write-wins.
    pub async fn update_status(
        pool: &MySqlPool,
        id: i32,
        status: InvoiceStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE invoices SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
