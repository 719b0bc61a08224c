//! # Pizzeria Billing API
//!
//! HTTP server entry point.
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  .env (optional) → AppConfig::load → Database::new (+ migrations)      │
//! │       → seed_catalog (empty catalog only) → axum::serve                │
//! │       → Ctrl+C / SIGTERM → graceful shutdown → pool closed             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use billing_api::{router, AppConfig, AppState};
use pizzeria_core::PricingEngine;
use pizzeria_db::{seed_catalog, Database, DbConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is normal outside local development
    let dotenv_loaded = dotenv::dotenv().is_ok();

    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!(dotenv_loaded, "Starting Pizzeria Billing API...");

    let config = AppConfig::load().context("invalid configuration")?;
    info!(
        addr = %config.bind_address(),
        db_url = %config.database_url,
        tax_bps = config.tax_rate.bps(),
        "Configuration loaded"
    );

    for var in &config.ignored_db_vars {
        warn!(%var, "Ignoring database variable; storage is SQLite, use DATABASE_URL or DB_NAME");
    }

    let db = Database::new(
        DbConfig::new(config.database_url.clone()).max_connections(config.db_max_connections),
    )
    .await
    .context("failed to open database")?;

    if config.seed_catalog {
        let seeded = seed_catalog(&db).await.context("failed to seed catalog")?;
        info!(seeded, "Catalog seeding checked");
    }

    let state = AppState::new(db.clone(), PricingEngine::new(config.tax_rate));
    let app = router(state, &config.allowed_origins);

    let listener = TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_address()))?;
    info!(addr = %config.bind_address(), "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(?e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(?e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
