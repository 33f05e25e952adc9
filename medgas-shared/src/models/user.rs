/// User model and database operations
///
/// Users are provisioned outside this service. The API only reads them: the
/// login flow looks up credentials by email and the debug endpoint samples
/// rows (never including the password hash).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id INT AUTO_INCREMENT PRIMARY KEY,
///     username VARCHAR(100) NOT NULL,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     role VARCHAR(20) NOT NULL,
///     created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use std::fmt;
use std::str::FromStr;

use super::ParseEnumError;

/// Role carried by every user account and every issued token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access, including invoices and reports
    Admin,

    /// Manages stock, supplies and cylinder assignment
    Storekeeper,

    /// Fills and inspects cylinders
    Technician,
}

impl Role {
    /// Every role, in display order
    pub const ALL: [Role; 3] = [Role::Admin, Role::Storekeeper, Role::Technician];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Storekeeper => "storekeeper",
            Role::Technician => "technician",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "storekeeper" => Ok(Role::Storekeeper),
            "technician" => Ok(Role::Technician),
            other => Err(ParseEnumError::new("role", other)),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Public view of a user account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// User row including the stored Argon2id hash
///
/// Only used by the login flow. Not serializable so it cannot leak into a
/// response body by accident.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserCredentials {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
}

impl User {
    /// Looks up login credentials by email address
    pub async fn find_credentials_by_email(
        pool: &MySqlPool,
        email: &str,
    ) -> Result<Option<UserCredentials>, sqlx::Error> {
        sqlx::query_as::<_, UserCredentials>(
            r#"
            SELECT id, username, email, password_hash, role
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    /// Returns the first `limit` users, oldest first
    pub async fn sample(pool: &MySqlPool, limit: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, role, created_at
            FROM users
            ORDER BY id
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
