//! # MedGas API Server
//!
//! Serves the cylinder, inventory, supply, invoice and report API together
//! with the HTML pages, backed by MySQL.
//!
//! ## Usage
//!
//! ```bash
//! MYSQL_HOST=localhost MYSQL_USER=medgas MYSQL_PASSWORD=secret MYSQL_DATABASE=medgas \
//!     JWT_SECRET=... cargo run -p medgas-api
//! ```
//!
//! Set `LOG_FORMAT=json` for one JSON object per log line.

use medgas_api::{
    app::{build_router, AppState},
    config::Config,
    revalidate::log_revalidations,
};
use medgas_shared::{
    db::{
        migrations::run_migrations,
        pool::{close_pool, create_pool},
    },
    store::MySqlStore,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    tracing::info!("MedGas API Server v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    let address = config.bind_address();

    let pool = create_pool(config.database.clone()).await?;
    if config.features.run_migrations {
        run_migrations(&pool).await?;
    }

    let state = AppState::new(Arc::new(MySqlStore::new(pool.clone())), config);
    tokio::spawn(log_revalidations(state.revalidator.subscribe()));

    let app = build_router(state);

    let listener = TcpListener::bind(&address).await?;
    tracing::info!("Server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    close_pool(pool).await;
    tracing::info!("Server stopped");

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "medgas_api=debug,medgas_shared=info,tower_http=debug".into());

    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json");
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections...");
}
