/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use medgas_api::{app::{build_router, AppState}, config::Config};
/// use medgas_shared::{db::pool::create_pool, store::MySqlStore};
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(config.database.clone()).await?;
/// let state = AppState::new(Arc::new(MySqlStore::new(pool)), config);
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{
        auth::{require_api_auth, require_page_auth},
        role_gate::{page_gate, role_gate},
        security::SecurityHeadersLayer,
    },
    pages,
    revalidate::Revalidator,
    routes,
};
use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, patch, post, put},
    Router,
};
use medgas_shared::{auth::authorization::AllowList, store::Store};
use std::{sync::Arc, time::Duration};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Persistence gateway
    pub store: Arc<dyn Store>,

    /// Application configuration
    pub config: Arc<Config>,

    /// Stale-page announcements
    pub revalidator: Revalidator,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
            revalidator: Revalidator::new(),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                          # public
/// ├── /api/auth/{login,logout}         # public
/// ├── /api/                            # session required (401 JSON)
/// │   ├── any role                     # auth/me, cylinder and gas-type reads,
/// │   │                                # inventory summary, supply signatures
/// │   ├── admin, storekeeper           # stock writes, supplies
/// │   ├── admin, storekeeper, technician  # cylinder status
/// │   ├── admin                        # invoices, reports
/// │   └── admin, ENABLE_DEBUG_ROUTES   # /api/debug/*
/// ├── /login, /logout                  # public pages
/// └── pages                            # session required (redirect to /login)
/// ```
///
/// # Middleware Stack
///
/// Applied in order (outermost first):
/// 1. Security headers
/// 2. CORS
/// 3. Compression
/// 4. Logging (tower-http TraceLayer)
/// 5. Authentication, then role gate (per route group)
pub fn build_router(state: AppState) -> Router {
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let public_api = Router::new()
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/auth/logout", post(routes::auth::logout));

    let protected_api = api_routes(&state).route_layer(from_fn_with_state(
        state.clone(),
        require_api_auth,
    ));

    let public_pages = Router::new()
        .route("/login", get(pages::login_form).post(pages::login_submit))
        .route("/logout", post(pages::logout));

    let protected_pages = page_routes().route_layer(from_fn_with_state(
        state.clone(),
        require_page_auth,
    ));

    Router::new()
        .merge(health_routes)
        .merge(public_api)
        .merge(protected_api)
        .merge(public_pages)
        .merge(protected_pages)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CompressionLayer::new())
        .layer(cors_layer(&state.config))
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

fn api_routes(state: &AppState) -> Router<AppState> {
    use crate::routes::{cylinders, gas_types, inventory, invoices, reports, supplies};

    let any_role = Router::new()
        .route("/api/auth/me", get(routes::auth::me))
        .route("/api/cylinders", get(cylinders::list_cylinders))
        .route("/api/cylinders/:id", get(cylinders::get_cylinder))
        .route("/api/gas-types", get(gas_types::list_gas_types))
        .route("/api/inventory/summary", get(inventory::inventory_summary))
        .route("/api/supplies/:id/signatures", get(supplies::supply_signatures))
        .route_layer(from_fn_with_state(AllowList::AnyRole, role_gate));

    let stock = Router::new()
        .route("/api/cylinders", post(cylinders::create_cylinder))
        .route("/api/cylinders/:id/assign", post(cylinders::assign_cylinder))
        .route("/api/gas-types", post(gas_types::create_gas_type))
        .route("/api/inventory/:gas_type_id", put(inventory::upsert_inventory))
        .route(
            "/api/supplies",
            get(supplies::list_supplies).post(supplies::create_supply),
        )
        .route("/api/supplies/:id", get(supplies::get_supply))
        .route_layer(from_fn_with_state(AllowList::STOCK, role_gate));

    let cylinder_status = Router::new()
        .route(
            "/api/cylinders/:id/status",
            patch(cylinders::update_cylinder_status),
        )
        .route_layer(from_fn_with_state(AllowList::CYLINDER_STATUS, role_gate));

    let admin = Router::new()
        .route("/api/invoices", get(invoices::list_invoices))
        .route("/api/invoices/update", post(invoices::update_invoice))
        .route("/api/invoices/:id", get(invoices::get_invoice))
        .route("/api/invoices/:id/status", post(invoices::set_invoice_status))
        .route("/api/reports/delivered-cylinders", get(reports::delivered_cylinders))
        .route("/api/reports/filled-cylinders", get(reports::filled_cylinders))
        .route("/api/reports/returned-cylinders", get(reports::returned_cylinders))
        .route("/api/reports/hospitals-served", get(reports::hospitals_served))
        .route_layer(from_fn_with_state(AllowList::ADMIN, role_gate));

    let mut router = Router::new()
        .merge(any_role)
        .merge(stock)
        .merge(cylinder_status)
        .merge(admin);

    if state.config.features.debug_routes {
        tracing::warn!("Debug routes enabled under /api/debug");
        router = router.merge(debug_routes());
    }

    router
}

fn debug_routes() -> Router<AppState> {
    use crate::routes::debug;

    Router::new()
        .route("/api/debug/schema/:table", get(debug::describe_table))
        .route("/api/debug/users", get(debug::sample_users))
        .route("/api/debug/time", get(debug::server_time))
        .route_layer(from_fn_with_state(AllowList::ADMIN, role_gate))
}

fn page_routes() -> Router<AppState> {
    let any_role = Router::new()
        .route("/", get(pages::root))
        .route("/dashboard", get(pages::dashboard))
        .route("/cylinders", get(pages::cylinders))
        .route_layer(from_fn_with_state(AllowList::AnyRole, page_gate));

    let stock = Router::new()
        .route("/inventory", get(pages::inventory))
        .route("/supplies", get(pages::supplies))
        .route_layer(from_fn_with_state(AllowList::STOCK, page_gate));

    let admin = Router::new()
        .route("/invoices", get(pages::invoices))
        .route("/invoices/:id", get(pages::invoice_detail))
        .route("/reports", get(pages::reports))
        .route_layer(from_fn_with_state(AllowList::ADMIN, page_gate));

    Router::new().merge(any_role).merge(stock).merge(admin)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.api.cors_origins.iter().any(|origin| origin == "*") {
        // Development mode: permissive CORS
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
