/// Gas type catalogue
///
/// ```sql
/// CREATE TABLE gas_types (
///     id INT AUTO_INCREMENT PRIMARY KEY,
///     name VARCHAR(100) NOT NULL UNIQUE
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct GasType {
    pub id: i32,
    pub name: String,
}

impl GasType {
    /// Lists every gas type ordered by name
    pub async fn list(pool: &MySqlPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, GasType>("SELECT id, name FROM gas_types ORDER BY name")
            .fetch_all(pool)
            .await
    }

    /// Inserts a gas type and returns it with its generated ID
    ///
    /// # Errors
    ///
    /// Fails with a database error when the name already exists.
    pub async fn create(pool: &MySqlPool, name: &str) -> Result<Self, sqlx::Error> {
        let result = sqlx::query("INSERT INTO gas_types (name) VALUES (?)")
            .bind(name)
            .execute(pool)
            .await?;

        Ok(GasType {
            id: result.last_insert_id() as i32,
            name: name.to_string(),
        })
    }
}
