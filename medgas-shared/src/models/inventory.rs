/// Aggregated stock per gas type
///
/// There is at most one inventory row per gas type; it is not individually
/// owned by any cylinder.
///
/// ```sql
/// CREATE TABLE inventory (
///     gas_type_id INT PRIMARY KEY REFERENCES gas_types(id),
///     total_cylinders INT NOT NULL DEFAULT 0,
///     total_liters DOUBLE NOT NULL DEFAULT 0
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

/// One line of the inventory summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct InventorySummary {
    pub gas_type_id: i32,
    pub gas_name: String,
    pub total_cylinders: i32,
    pub total_liters: f64,
}

/// New totals for one gas type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InventoryLevels {
    pub total_cylinders: i32,
    pub total_liters: f64,
}

pub async fn summary(pool: &MySqlPool) -> Result<Vec<InventorySummary>, sqlx::Error> {
    sqlx::query_as::<_, InventorySummary>(
        r#"
        SELECT i.gas_type_id, g.name AS gas_name, i.total_cylinders, i.total_liters
        FROM inventory i
        JOIN gas_types g ON g.id = i.gas_type_id
        ORDER BY g.name
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Sets the totals for a gas type, creating the row if needed
pub async fn upsert(
    pool: &MySqlPool,
    gas_type_id: i32,
    levels: InventoryLevels,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO inventory (gas_type_id, total_cylinders, total_liters)
        VALUES (?, ?, ?)
        ON DUPLICATE KEY UPDATE
            total_cylinders = VALUES(total_cylinders),
            total_liters = VALUES(total_liters)
        "#,
    )
    .bind(gas_type_id)
    .bind(levels.total_cylinders)
    .bind(levels.total_liters)
    .execute(pool)
    .await?;

    Ok(())
}
