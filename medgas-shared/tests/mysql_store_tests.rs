/// Integration tests for the MySQL-backed store
///
/// These tests require a running MySQL server with a scratch schema.
/// Run with: cargo test --test mysql_store_tests -- --ignored --test-threads=1
///
/// Connection settings come from the same variables the server uses:
/// export MYSQL_HOST=localhost MYSQL_USER=medgas MYSQL_PASSWORD=medgas MYSQL_DATABASE=medgas_test

use medgas_shared::db::migrations::{get_migration_status, run_migrations};
use medgas_shared::db::pool::{close_pool, create_pool, get_pool_stats, health_check, DatabaseConfig};
use medgas_shared::models::cylinder::{CreateCylinder, CylinderStatus};
use medgas_shared::models::inventory::InventoryLevels;
use medgas_shared::models::invoice::InvoiceStatus;
use medgas_shared::models::schema::SchemaTable;
use medgas_shared::models::supply::CreateSupply;
use medgas_shared::store::{MySqlStore, Store, StoreError};
use sqlx::MySqlPool;
use std::env;
use uuid::Uuid;

fn test_config() -> DatabaseConfig {
    DatabaseConfig {
        host: env::var("MYSQL_HOST").unwrap_or_else(|_| "localhost".to_string()),
        port: env::var("MYSQL_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3306),
        user: env::var("MYSQL_USER").unwrap_or_else(|_| "medgas".to_string()),
        password: env::var("MYSQL_PASSWORD").unwrap_or_else(|_| "medgas".to_string()),
        database: env::var("MYSQL_DATABASE").unwrap_or_else(|_| "medgas_test".to_string()),
        max_connections: 5,
        ..Default::default()
    }
}

async fn migrated_store() -> MySqlStore {
    let pool = create_pool(test_config()).await.expect("Failed to create pool");
    run_migrations(&pool).await.expect("Migrations failed");
    MySqlStore::new(pool)
}

fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, &Uuid::new_v4().simple().to_string()[..8])
}

async fn insert_invoice(pool: &MySqlPool, supply_id: i32, amount: f64) -> i32 {
    let result = sqlx::query("INSERT INTO invoices (supply_id, amount, status) VALUES (?, ?, 'unpaid')")
        .bind(supply_id)
        .bind(amount)
        .execute(pool)
        .await
        .expect("Failed to insert invoice");
    result.last_insert_id() as i32
}

#[tokio::test]
#[ignore]
async fn test_create_pool_and_health_check() {
    let pool = create_pool(test_config()).await.expect("Failed to create pool");

    assert!(health_check(&pool).await.is_ok());
    assert!(get_pool_stats(&pool).total_connections > 0);

    close_pool(pool).await;
}

#[tokio::test]
#[ignore]
async fn test_create_pool_with_unreachable_host() {
    let config = DatabaseConfig {
        host: "nonexistent.invalid".to_string(),
        connect_timeout_seconds: 2,
        min_connections: 0,
        ..test_config()
    };

    assert!(create_pool(config).await.is_err());
}

#[tokio::test]
#[ignore]
async fn test_migrations_are_idempotent() {
    let pool = create_pool(test_config()).await.expect("Failed to create pool");

    run_migrations(&pool).await.expect("First run failed");
    run_migrations(&pool).await.expect("Second run failed");

    let status = get_migration_status(&pool).await.expect("Failed to read status");
    assert!(status.applied_migrations > 0);
    assert!(status.latest_version.is_some());

    close_pool(pool).await;
}

#[tokio::test]
#[ignore]
async fn test_cylinder_lifecycle() {
    let store = migrated_store().await;

    let gas = store.create_gas_type(&unique("Oxygen")).await.unwrap();
    let code = unique("CYL");
    let cylinder = store
        .create_cylinder(CreateCylinder {
            code: code.clone(),
            size: "40L".to_string(),
            gas_type_id: Some(gas.id),
            status: CylinderStatus::Empty,
        })
        .await
        .unwrap();

    assert_eq!(cylinder.code, code);
    assert_eq!(cylinder.gas_name.as_deref(), Some(gas.name.as_str()));
    assert_eq!(cylinder.status, CylinderStatus::Empty);

    assert!(store
        .update_cylinder_status(cylinder.id, CylinderStatus::Filled)
        .await
        .unwrap());
    let filled = store.list_cylinders(Some(CylinderStatus::Filled)).await.unwrap();
    assert!(filled.iter().any(|c| c.id == cylinder.id));

    assert!(!store
        .update_cylinder_status(i32::MAX, CylinderStatus::Filled)
        .await
        .unwrap());

    // Duplicate codes violate the unique index
    let duplicate = store
        .create_cylinder(CreateCylinder {
            code,
            size: "40L".to_string(),
            gas_type_id: None,
            status: CylinderStatus::Empty,
        })
        .await;
    assert!(matches!(duplicate, Err(StoreError::Constraint(_))));

    close_pool(store.pool().clone()).await;
}

#[tokio::test]
#[ignore]
async fn test_supply_assignment_and_signatures() {
    let store = migrated_store().await;

    let supply = store
        .create_supply(CreateSupply {
            hospital_name: unique("St. Mary"),
            total_price: 1250.5,
            recipient_name: "R. Okafor".to_string(),
            recipient_signature: Some("data:image/png;base64,AAAA".to_string()),
            driver_name: "J. Silva".to_string(),
            deliverer_signature: None,
        })
        .await
        .unwrap();

    let signatures = store.supply_signatures(supply.id).await.unwrap().unwrap();
    assert_eq!(signatures.recipient_name, "R. Okafor");
    assert_eq!(signatures.deliverer_name, "J. Silva");
    assert!(signatures.deliverer_signature.is_none());
    assert!(store.supply_signatures(i32::MAX).await.unwrap().is_none());

    let cylinder = store
        .create_cylinder(CreateCylinder {
            code: unique("CYL"),
            size: "10L".to_string(),
            gas_type_id: None,
            status: CylinderStatus::Filled,
        })
        .await
        .unwrap();

    assert!(store.assign_cylinder(cylinder.id, supply.id).await.unwrap());
    let assigned = store.find_cylinder(cylinder.id).await.unwrap().unwrap();
    assert_eq!(assigned.status, CylinderStatus::Assigned);
    assert_eq!(assigned.supply_id, Some(supply.id));

    close_pool(store.pool().clone()).await;
}

#[tokio::test]
#[ignore]
async fn test_inventory_upsert_and_summary() {
    let store = migrated_store().await;
    let gas = store.create_gas_type(&unique("Nitrous")).await.unwrap();

    let levels = InventoryLevels { total_cylinders: 12, total_liters: 480.0 };
    store.set_inventory(gas.id, levels).await.unwrap();
    store
        .set_inventory(gas.id, InventoryLevels { total_cylinders: 3, ..levels })
        .await
        .unwrap();

    let summary = store.inventory_summary().await.unwrap();
    let row = summary.iter().find(|r| r.gas_type_id == gas.id).unwrap();
    assert_eq!(row.total_cylinders, 3);
    assert_eq!(row.gas_name, gas.name);

    close_pool(store.pool().clone()).await;
}

#[tokio::test]
#[ignore]
async fn test_invoice_paid_round_trip() {
    let store = migrated_store().await;
    let supply = store
        .create_supply(CreateSupply {
            hospital_name: unique("General"),
            total_price: 300.0,
            recipient_name: "A".to_string(),
            recipient_signature: None,
            driver_name: "B".to_string(),
            deliverer_signature: None,
        })
        .await
        .unwrap();
    let invoice_id = insert_invoice(store.pool(), supply.id, 300.0).await;

    assert!(store.update_invoice_status(invoice_id, InvoiceStatus::Paid).await.unwrap());
    // Setting the same value again still matches the row
    assert!(store.update_invoice_status(invoice_id, InvoiceStatus::Paid).await.unwrap());

    let invoice = store.find_invoice(invoice_id).await.unwrap().unwrap();
    assert_eq!(invoice.status, InvoiceStatus::Paid);
    assert_eq!(invoice.hospital_name, Some(supply.hospital_name));

    close_pool(store.pool().clone()).await;
}

#[tokio::test]
#[ignore]
async fn test_diagnostics() {
    let store = migrated_store().await;

    let columns = store.describe_table(SchemaTable::Invoices).await.unwrap();
    assert!(columns.iter().any(|c| c.field == "status"));

    assert!(store.server_time().await.is_ok());
    assert!(store.ping().await.is_ok());

    close_pool(store.pool().clone()).await;
}
