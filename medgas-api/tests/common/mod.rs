//! Common test utilities for integration tests
//!
//! - `InMemoryStore`: a `Store` over plain vectors with a failure switch and
//!   call counters, so tests can assert that a rejected request never
//!   reached persistence
//! - `TestApp`: the full router over that store
//! - Token and request helpers

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, Response, StatusCode},
    Router,
};
use chrono::{DateTime, Duration, Utc};
use medgas_api::{
    app::{build_router, AppState},
    config::{Config, FeatureFlags},
};
use medgas_shared::{
    auth::{
        jwt::{create_token, Claims},
        middleware::AUTH_COOKIE,
        password::hash_password,
    },
    models::{
        cylinder::{CreateCylinder, Cylinder, CylinderStatus},
        gas_type::GasType,
        inventory::{InventoryLevels, InventorySummary},
        invoice::{Invoice, InvoiceStatus},
        report::{CylinderReportRow, HospitalServed},
        schema::{ColumnDescription, SchemaTable},
        supply::{CreateSupply, Supply, SupplySignatures},
        user::{Role, User, UserCredentials},
    },
    store::{Store, StoreError, StoreResult},
};
use std::{
    collections::{BTreeMap, HashMap},
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex, MutexGuard,
    },
};
use tower::Service as _;

pub const JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";

#[derive(Default)]
struct Data {
    users: Vec<UserCredentials>,
    gas_types: Vec<GasType>,
    cylinders: Vec<Cylinder>,
    inventory: BTreeMap<i32, InventoryLevels>,
    supplies: Vec<(Supply, Option<String>, Option<String>)>,
    invoices: Vec<Invoice>,
}

/// `Store` held in memory
#[derive(Default)]
pub struct InMemoryStore {
    data: Mutex<Data>,
    failing: AtomicBool,
    calls: AtomicUsize,
    writes: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every later call fails with a query error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn enter(&self) -> StoreResult<MutexGuard<'_, Data>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Query("connection refused".to_string()));
        }
        Ok(self.data.lock().unwrap())
    }

    fn enter_write(&self) -> StoreResult<MutexGuard<'_, Data>> {
        let guard = self.enter()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(guard)
    }

    pub fn seed_user(&self, username: &str, email: &str, password: &str, role: Role) -> i32 {
        let mut data = self.data.lock().unwrap();
        let id = data.users.len() as i32 + 1;
        data.users.push(UserCredentials {
            id,
            username: username.to_string(),
            email: email.to_string(),
            password_hash: hash_password(password).unwrap(),
            role,
        });
        id
    }

    pub fn seed_gas_type(&self, name: &str) -> i32 {
        let mut data = self.data.lock().unwrap();
        let id = data.gas_types.len() as i32 + 1;
        data.gas_types.push(GasType {
            id,
            name: name.to_string(),
        });
        id
    }

    pub fn seed_cylinder(&self, code: &str, status: CylinderStatus, supply_id: Option<i32>) -> i32 {
        let mut data = self.data.lock().unwrap();
        let id = data.cylinders.len() as i32 + 1;
        let now = Utc::now();
        data.cylinders.push(Cylinder {
            id,
            code: code.to_string(),
            size: "40L".to_string(),
            gas_type_id: None,
            gas_name: None,
            status,
            supply_id,
            created_at: now,
            updated_at: now,
        });
        id
    }

    pub fn seed_supply(
        &self,
        hospital: &str,
        total_price: f64,
        recipient_signature: Option<&str>,
        deliverer_signature: Option<&str>,
    ) -> i32 {
        let mut data = self.data.lock().unwrap();
        let id = data.supplies.len() as i32 + 1;
        data.supplies.push((
            Supply {
                id,
                hospital_name: hospital.to_string(),
                total_price,
                recipient_name: "Ward Sister".to_string(),
                driver_name: "Sam Driver".to_string(),
                created_at: Utc::now(),
            },
            recipient_signature.map(str::to_string),
            deliverer_signature.map(str::to_string),
        ));
        id
    }

    /// Inserts an invoice with a caller-chosen id
    pub fn seed_invoice(&self, id: i32, amount: f64, status: InvoiceStatus) {
        let mut data = self.data.lock().unwrap();
        let now = Utc::now();
        data.invoices.push(Invoice {
            id,
            supply_id: None,
            hospital_name: Some("St. Mary".to_string()),
            amount,
            status,
            created_at: now,
            updated_at: now,
        });
    }

    pub fn invoice_status(&self, id: i32) -> Option<InvoiceStatus> {
        let data = self.data.lock().unwrap();
        data.invoices.iter().find(|i| i.id == id).map(|i| i.status)
    }

    pub fn cylinder_status(&self, id: i32) -> Option<CylinderStatus> {
        let data = self.data.lock().unwrap();
        data.cylinders.iter().find(|c| c.id == id).map(|c| c.status)
    }
}

fn public_user(creds: &UserCredentials) -> User {
    User {
        id: creds.id,
        username: creds.username.clone(),
        email: creds.email.clone(),
        role: creds.role,
        created_at: Utc::now(),
    }
}

fn gas_name(data: &Data, gas_type_id: Option<i32>) -> Option<String> {
    gas_type_id.and_then(|id| {
        data.gas_types
            .iter()
            .find(|g| g.id == id)
            .map(|g| g.name.clone())
    })
}

#[async_trait]
impl Store for InMemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        self.enter().map(|_| ())
    }

    async fn find_credentials(&self, email: &str) -> StoreResult<Option<UserCredentials>> {
        let data = self.enter()?;
        Ok(data.users.iter().find(|u| u.email == email).cloned())
    }

    async fn sample_users(&self, limit: i64) -> StoreResult<Vec<User>> {
        let data = self.enter()?;
        Ok(data
            .users
            .iter()
            .take(limit as usize)
            .map(public_user)
            .collect())
    }

    async fn list_gas_types(&self) -> StoreResult<Vec<GasType>> {
        let data = self.enter()?;
        let mut types = data.gas_types.clone();
        types.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(types)
    }

    async fn create_gas_type(&self, name: &str) -> StoreResult<GasType> {
        let mut data = self.enter_write()?;
        if data.gas_types.iter().any(|g| g.name == name) {
            return Err(StoreError::Constraint(format!("Duplicate entry '{}'", name)));
        }
        let gas_type = GasType {
            id: data.gas_types.len() as i32 + 1,
            name: name.to_string(),
        };
        data.gas_types.push(gas_type.clone());
        Ok(gas_type)
    }

    async fn list_cylinders(&self, status: Option<CylinderStatus>) -> StoreResult<Vec<Cylinder>> {
        let data = self.enter()?;
        Ok(data
            .cylinders
            .iter()
            .filter(|c| status.map_or(true, |s| c.status == s))
            .cloned()
            .collect())
    }

    async fn find_cylinder(&self, id: i32) -> StoreResult<Option<Cylinder>> {
        let data = self.enter()?;
        Ok(data.cylinders.iter().find(|c| c.id == id).cloned())
    }

    async fn create_cylinder(&self, input: CreateCylinder) -> StoreResult<Cylinder> {
        let mut data = self.enter_write()?;
        if data.cylinders.iter().any(|c| c.code == input.code) {
            return Err(StoreError::Constraint(format!("Duplicate entry '{}'", input.code)));
        }
        let now = Utc::now();
        let cylinder = Cylinder {
            id: data.cylinders.len() as i32 + 1,
            gas_name: gas_name(&data, input.gas_type_id),
            code: input.code,
            size: input.size,
            gas_type_id: input.gas_type_id,
            status: input.status,
            supply_id: None,
            created_at: now,
            updated_at: now,
        };
        data.cylinders.push(cylinder.clone());
        Ok(cylinder)
    }

    async fn update_cylinder_status(&self, id: i32, status: CylinderStatus) -> StoreResult<bool> {
        let mut data = self.enter_write()?;
        Ok(match data.cylinders.iter_mut().find(|c| c.id == id) {
            Some(cylinder) => {
                cylinder.status = status;
                cylinder.updated_at = Utc::now();
                true
            }
            None => false,
        })
    }

    async fn assign_cylinder(&self, id: i32, supply_id: i32) -> StoreResult<bool> {
        let mut data = self.enter_write()?;
        if !data.supplies.iter().any(|(s, _, _)| s.id == supply_id) {
            return Err(StoreError::Constraint("unknown supply".to_string()));
        }
        Ok(match data.cylinders.iter_mut().find(|c| c.id == id) {
            Some(cylinder) => {
                cylinder.status = CylinderStatus::Assigned;
                cylinder.supply_id = Some(supply_id);
                true
            }
            None => false,
        })
    }

    async fn inventory_summary(&self) -> StoreResult<Vec<InventorySummary>> {
        let data = self.enter()?;
        let mut lines: Vec<InventorySummary> = data
            .inventory
            .iter()
            .filter_map(|(gas_type_id, levels)| {
                Some(InventorySummary {
                    gas_type_id: *gas_type_id,
                    gas_name: gas_name(&data, Some(*gas_type_id))?,
                    total_cylinders: levels.total_cylinders,
                    total_liters: levels.total_liters,
                })
            })
            .collect();
        lines.sort_by(|a, b| a.gas_name.cmp(&b.gas_name));
        Ok(lines)
    }

    async fn set_inventory(&self, gas_type_id: i32, levels: InventoryLevels) -> StoreResult<()> {
        let mut data = self.enter_write()?;
        if !data.gas_types.iter().any(|g| g.id == gas_type_id) {
            return Err(StoreError::Constraint("unknown gas type".to_string()));
        }
        data.inventory.insert(gas_type_id, levels);
        Ok(())
    }

    async fn list_supplies(&self) -> StoreResult<Vec<Supply>> {
        let data = self.enter()?;
        Ok(data.supplies.iter().rev().map(|(s, _, _)| s.clone()).collect())
    }

    async fn find_supply(&self, id: i32) -> StoreResult<Option<Supply>> {
        let data = self.enter()?;
        Ok(data
            .supplies
            .iter()
            .find(|(s, _, _)| s.id == id)
            .map(|(s, _, _)| s.clone()))
    }

    async fn create_supply(&self, input: CreateSupply) -> StoreResult<Supply> {
        let mut data = self.enter_write()?;
        let supply = Supply {
            id: data.supplies.len() as i32 + 1,
            hospital_name: input.hospital_name,
            total_price: input.total_price,
            recipient_name: input.recipient_name,
            driver_name: input.driver_name,
            created_at: Utc::now(),
        };
        data.supplies.push((
            supply.clone(),
            input.recipient_signature,
            input.deliverer_signature,
        ));
        Ok(supply)
    }

    async fn supply_signatures(&self, id: i32) -> StoreResult<Option<SupplySignatures>> {
        let data = self.enter()?;
        Ok(data
            .supplies
            .iter()
            .find(|(s, _, _)| s.id == id)
            .map(|(s, recipient, deliverer)| SupplySignatures {
                recipient_name: s.recipient_name.clone(),
                recipient_signature: recipient.clone(),
                deliverer_name: s.driver_name.clone(),
                deliverer_signature: deliverer.clone(),
            }))
    }

    async fn list_invoices(&self) -> StoreResult<Vec<Invoice>> {
        let data = self.enter()?;
        Ok(data.invoices.clone())
    }

    async fn find_invoice(&self, id: i32) -> StoreResult<Option<Invoice>> {
        let data = self.enter()?;
        Ok(data.invoices.iter().find(|i| i.id == id).cloned())
    }

    async fn update_invoice_status(&self, id: i32, status: InvoiceStatus) -> StoreResult<bool> {
        let mut data = self.enter_write()?;
        Ok(match data.invoices.iter_mut().find(|i| i.id == id) {
            Some(invoice) => {
                invoice.status = status;
                invoice.updated_at = Utc::now();
                true
            }
            None => false,
        })
    }

    async fn cylinders_with_status(
        &self,
        status: CylinderStatus,
    ) -> StoreResult<Vec<CylinderReportRow>> {
        let data = self.enter()?;
        Ok(data
            .cylinders
            .iter()
            .filter(|c| c.status == status)
            .map(|c| CylinderReportRow {
                id: c.id,
                code: c.code.clone(),
                size: c.size.clone(),
                gas_name: c.gas_name.clone(),
                hospital_name: c.supply_id.and_then(|sid| {
                    data.supplies
                        .iter()
                        .find(|(s, _, _)| s.id == sid)
                        .map(|(s, _, _)| s.hospital_name.clone())
                }),
                updated_at: c.updated_at,
            })
            .collect())
    }

    async fn hospitals_served(&self) -> StoreResult<Vec<HospitalServed>> {
        let data = self.enter()?;
        let mut by_hospital: BTreeMap<String, (i64, f64)> = BTreeMap::new();
        for (supply, _, _) in &data.supplies {
            let entry = by_hospital.entry(supply.hospital_name.clone()).or_default();
            entry.0 += 1;
            entry.1 += supply.total_price;
        }
        Ok(by_hospital
            .into_iter()
            .map(|(hospital_name, (deliveries, total_billed))| HospitalServed {
                hospital_name,
                deliveries,
                total_billed,
            })
            .collect())
    }

    async fn describe_table(&self, table: SchemaTable) -> StoreResult<Vec<ColumnDescription>> {
        let _data = self.enter()?;
        Ok(vec![ColumnDescription {
            field: "id".to_string(),
            column_type: "int".to_string(),
            nullable: false,
            key: "PRI".to_string(),
            default: None,
            extra: format!("auto_increment ({})", table.as_str()),
        }])
    }

    async fn server_time(&self) -> StoreResult<DateTime<Utc>> {
        let _data = self.enter()?;
        Ok(Utc::now())
    }
}

/// Configuration with every feature flag off
pub fn test_config(features: FeatureFlags) -> Config {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("MYSQL_HOST", "localhost"),
        ("MYSQL_USER", "medgas"),
        ("MYSQL_DATABASE", "medgas_test"),
        ("JWT_SECRET", JWT_SECRET),
        ("CORS_ORIGINS", "http://localhost:3000"),
    ]);
    let mut config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();
    config.features = features;
    config
}

pub struct TestApp {
    pub app: Router,
    pub store: Arc<InMemoryStore>,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_features(FeatureFlags::default())
    }

    pub fn with_features(features: FeatureFlags) -> Self {
        let store = InMemoryStore::new();
        let state = AppState::new(store.clone(), test_config(features));
        let app = build_router(state.clone());
        Self { app, store, state }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().call(request).await.unwrap()
    }

    /// Sends a request and decodes the JSON answer
    pub async fn json(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.send(request).await;
        let status = response.status();
        (status, body_json(response).await)
    }
}

pub fn token_for(role: Role) -> String {
    token_with(role, Duration::hours(1))
}

pub fn token_with(role: Role, expires_in: Duration) -> String {
    let claims = Claims::new(
        42,
        format!("{}-user", role),
        format!("{}@example.org", role),
        role,
        expires_in,
    );
    create_token(&claims, JWT_SECRET).unwrap()
}

/// Builds a request carrying the token in the session cookie
pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<serde_json::Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("{}={}", AUTH_COOKIE, token));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub fn get(uri: &str, role: Role) -> Request<Body> {
    request(Method::GET, uri, Some(&token_for(role)), None)
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    if bytes.is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8_lossy(&bytes).into_owned()
}
