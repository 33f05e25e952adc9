/// Schema introspection for diagnostics
///
/// Table names cannot be bound as statement parameters, so `DESCRIBE` only
/// ever receives a name from the fixed [`SchemaTable`] list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{MySqlPool, Row};
use std::str::FromStr;

use super::ParseEnumError;

/// Tables the debug endpoints may describe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaTable {
    Users,
    GasTypes,
    Cylinders,
    Inventory,
    Supplies,
    Invoices,
}

impl SchemaTable {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaTable::Users => "users",
            SchemaTable::GasTypes => "gas_types",
            SchemaTable::Cylinders => "cylinders",
            SchemaTable::Inventory => "inventory",
            SchemaTable::Supplies => "supplies",
            SchemaTable::Invoices => "invoices",
        }
    }
}

impl FromStr for SchemaTable {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "users" => Ok(SchemaTable::Users),
            "gas_types" => Ok(SchemaTable::GasTypes),
            "cylinders" => Ok(SchemaTable::Cylinders),
            "inventory" => Ok(SchemaTable::Inventory),
            "supplies" => Ok(SchemaTable::Supplies),
            "invoices" => Ok(SchemaTable::Invoices),
            other => Err(ParseEnumError::new("table", other)),
        }
    }
}

/// One line of `DESCRIBE <table>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescription {
    pub field: String,
    pub column_type: String,
    pub nullable: bool,
    pub key: String,
    pub default: Option<String>,
    pub extra: String,
}

pub async fn describe(
    pool: &MySqlPool,
    table: SchemaTable,
) -> Result<Vec<ColumnDescription>, sqlx::Error> {
    // information_schema instead of DESCRIBE so every column decodes as text
    let rows = sqlx::query(
        r#"
        SELECT COLUMN_NAME, COLUMN_TYPE, IS_NULLABLE, COLUMN_KEY, COLUMN_DEFAULT, EXTRA
        FROM information_schema.COLUMNS
        WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ?
        ORDER BY ORDINAL_POSITION
        "#,
    )
    .bind(table.as_str())
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            Ok(ColumnDescription {
                field: row.try_get(0)?,
                column_type: row.try_get(1)?,
                nullable: row.try_get::<String, _>(2)? == "YES",
                key: row.try_get(3)?,
                default: row.try_get(4)?,
                extra: row.try_get(5)?,
            })
        })
        .collect()
}

/// Current database server time
pub async fn server_time(pool: &MySqlPool) -> Result<DateTime<Utc>, sqlx::Error> {
    sqlx::query_scalar::<_, DateTime<Utc>>("SELECT CURRENT_TIMESTAMP()")
        .fetch_one(pool)
        .await
}
