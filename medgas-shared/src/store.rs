/// Persistence gateway
///
/// Every handler reaches the database through the [`Store`] trait. Each
/// method maps to exactly one fixed, parameterized statement (creates add a
/// read-back of the inserted row). There are no transactions, retries or
/// locks; concurrent writers rely on MySQL's own concurrency control.
///
/// [`MySqlStore`] is the production implementation over a shared
/// [`MySqlPool`]. Tests substitute an in-memory implementation.
///
/// # Example
///
/// ```no_run
/// use medgas_shared::db::pool::{create_pool, DatabaseConfig};
/// use medgas_shared::store::{MySqlStore, Store};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// let store = MySqlStore::new(pool);
///
/// let summary = store.inventory_summary().await?;
/// println!("{} gas types in stock", summary.len());
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;
use tracing::debug;

use crate::models::{
    cylinder::{CreateCylinder, Cylinder, CylinderStatus},
    gas_type::GasType,
    inventory::{self, InventoryLevels, InventorySummary},
    invoice::{Invoice, InvoiceStatus},
    report::{self, CylinderReportRow, HospitalServed},
    schema::{self, ColumnDescription, SchemaTable},
    supply::{CreateSupply, Supply, SupplySignatures},
    user::{User, UserCredentials},
};

/// Error returned by every gateway call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The driver rejected or failed the statement; carries its message
    #[error("Query error: {0}")]
    Query(String),

    /// A uniqueness or foreign-key constraint was violated
    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() || db_err.is_foreign_key_violation() {
                return StoreError::Constraint(db_err.message().to_string());
            }
        }
        StoreError::Query(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The set of statements the application is allowed to run
#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap connectivity check (`SELECT 1`)
    async fn ping(&self) -> StoreResult<()>;

    // Users
    async fn find_credentials(&self, email: &str) -> StoreResult<Option<UserCredentials>>;
    async fn sample_users(&self, limit: i64) -> StoreResult<Vec<User>>;

    // Gas types
    async fn list_gas_types(&self) -> StoreResult<Vec<GasType>>;
    async fn create_gas_type(&self, name: &str) -> StoreResult<GasType>;

    // Cylinders
    async fn list_cylinders(&self, status: Option<CylinderStatus>) -> StoreResult<Vec<Cylinder>>;
    async fn find_cylinder(&self, id: i32) -> StoreResult<Option<Cylinder>>;
    async fn create_cylinder(&self, data: CreateCylinder) -> StoreResult<Cylinder>;
    async fn update_cylinder_status(&self, id: i32, status: CylinderStatus) -> StoreResult<bool>;
    async fn assign_cylinder(&self, id: i32, supply_id: i32) -> StoreResult<bool>;

    // Inventory
    async fn inventory_summary(&self) -> StoreResult<Vec<InventorySummary>>;
    async fn set_inventory(&self, gas_type_id: i32, levels: InventoryLevels) -> StoreResult<()>;

    // Supplies
    async fn list_supplies(&self) -> StoreResult<Vec<Supply>>;
    async fn find_supply(&self, id: i32) -> StoreResult<Option<Supply>>;
    async fn create_supply(&self, data: CreateSupply) -> StoreResult<Supply>;
    async fn supply_signatures(&self, id: i32) -> StoreResult<Option<SupplySignatures>>;

    // Invoices
    async fn list_invoices(&self) -> StoreResult<Vec<Invoice>>;
    async fn find_invoice(&self, id: i32) -> StoreResult<Option<Invoice>>;
    async fn update_invoice_status(&self, id: i32, status: InvoiceStatus) -> StoreResult<bool>;

    // Reports
    async fn cylinders_with_status(
        &self,
        status: CylinderStatus,
    ) -> StoreResult<Vec<CylinderReportRow>>;
    async fn hospitals_served(&self) -> StoreResult<Vec<HospitalServed>>;

    // Diagnostics
    async fn describe_table(&self, table: SchemaTable) -> StoreResult<Vec<ColumnDescription>>;
    async fn server_time(&self) -> StoreResult<DateTime<Utc>>;
}

/// [`Store`] backed by a MySQL connection pool
#[derive(Debug, Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Underlying pool, for lifecycle management
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

/// Reads back a row that was just inserted
fn inserted<T>(row: Option<T>, table: &str, id: i32) -> StoreResult<T> {
    row.ok_or_else(|| StoreError::Query(format!("{table} row {id} vanished after insert")))
}

#[async_trait]
impl Store for MySqlStore {
    async fn ping(&self) -> StoreResult<()> {
        crate::db::pool::health_check(&self.pool).await?;
        Ok(())
    }

    async fn find_credentials(&self, email: &str) -> StoreResult<Option<UserCredentials>> {
        Ok(User::find_credentials_by_email(&self.pool, email).await?)
    }

    async fn sample_users(&self, limit: i64) -> StoreResult<Vec<User>> {
        Ok(User::sample(&self.pool, limit).await?)
    }

    async fn list_gas_types(&self) -> StoreResult<Vec<GasType>> {
        Ok(GasType::list(&self.pool).await?)
    }

    async fn create_gas_type(&self, name: &str) -> StoreResult<GasType> {
        let gas_type = GasType::create(&self.pool, name).await?;
        debug!(gas_type_id = gas_type.id, "Gas type created");
        Ok(gas_type)
    }

    async fn list_cylinders(&self, status: Option<CylinderStatus>) -> StoreResult<Vec<Cylinder>> {
        Ok(Cylinder::list(&self.pool, status).await?)
    }

    async fn find_cylinder(&self, id: i32) -> StoreResult<Option<Cylinder>> {
        Ok(Cylinder::find_by_id(&self.pool, id).await?)
    }

    async fn create_cylinder(&self, data: CreateCylinder) -> StoreResult<Cylinder> {
        let id = Cylinder::create(&self.pool, &data).await?;
        debug!(cylinder_id = id, code = %data.code, "Cylinder created");
        inserted(Cylinder::find_by_id(&self.pool, id).await?, "cylinders", id)
    }

    async fn update_cylinder_status(&self, id: i32, status: CylinderStatus) -> StoreResult<bool> {
        Ok(Cylinder::update_status(&self.pool, id, status).await?)
    }

    async fn assign_cylinder(&self, id: i32, supply_id: i32) -> StoreResult<bool> {
        Ok(Cylinder::assign(&self.pool, id, supply_id).await?)
    }

    async fn inventory_summary(&self) -> StoreResult<Vec<InventorySummary>> {
        Ok(inventory::summary(&self.pool).await?)
    }

    async fn set_inventory(&self, gas_type_id: i32, levels: InventoryLevels) -> StoreResult<()> {
        Ok(inventory::upsert(&self.pool, gas_type_id, levels).await?)
    }

    async fn list_supplies(&self) -> StoreResult<Vec<Supply>> {
        Ok(Supply::list(&self.pool).await?)
    }

    async fn find_supply(&self, id: i32) -> StoreResult<Option<Supply>> {
        Ok(Supply::find_by_id(&self.pool, id).await?)
    }

    async fn create_supply(&self, data: CreateSupply) -> StoreResult<Supply> {
        let id = Supply::create(&self.pool, &data).await?;
        debug!(supply_id = id, hospital = %data.hospital_name, "Supply recorded");
        inserted(Supply::find_by_id(&self.pool, id).await?, "supplies", id)
    }

    async fn supply_signatures(&self, id: i32) -> StoreResult<Option<SupplySignatures>> {
        Ok(Supply::signatures(&self.pool, id).await?)
    }

    async fn list_invoices(&self) -> StoreResult<Vec<Invoice>> {
        Ok(Invoice::list(&self.pool).await?)
    }

    async fn find_invoice(&self, id: i32) -> StoreResult<Option<Invoice>> {
        Ok(Invoice::find_by_id(&self.pool, id).await?)
    }

    async fn update_invoice_status(&self, id: i32, status: InvoiceStatus) -> StoreResult<bool> {
        Ok(Invoice::update_status(&self.pool, id, status).await?)
    }

    async fn cylinders_with_status(
        &self,
        status: CylinderStatus,
    ) -> StoreResult<Vec<CylinderReportRow>> {
        Ok(report::cylinders_with_status(&self.pool, status).await?)
    }

    async fn hospitals_served(&self) -> StoreResult<Vec<HospitalServed>> {
        Ok(report::hospitals_served(&self.pool).await?)
    }

    async fn describe_table(&self, table: SchemaTable) -> StoreResult<Vec<ColumnDescription>> {
        Ok(schema::describe(&self.pool, table).await?)
    }

    async fn server_time(&self) -> StoreResult<DateTime<Utc>> {
        Ok(schema::server_time(&self.pool).await?)
    }
}
