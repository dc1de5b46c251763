//! AquaCert API Service
//!
//! REST API for creating, editing and listing water analysis certificates.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use aquacert_server::{
    create_router, db, CertificateService, CertificateStore, Config, MemoryCertificateStore,
    PgCertificateStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    info!("Starting AquaCert API Service");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        "Configuration loaded - listening on {}",
        config.api_address()
    );

    // The store is created once here and shared by every request.
    let store: Arc<dyn CertificateStore> = match config.database_url.as_deref() {
        Some(url) => {
            let pool = db::create_pool(url, config.database_max_connections)
                .await
                .context("Failed to connect to database")?;
            if config.run_migrations {
                db::run_migrations(&pool)
                    .await
                    .context("Failed to run migrations")?;
                info!("Database migrations applied");
            }
            Arc::new(PgCertificateStore::new(pool))
        }
        None => {
            warn!("DATABASE_URL not set - using in-memory store, certificates will not persist");
            Arc::new(MemoryCertificateStore::new())
        }
    };

    let app = create_router(CertificateService::new(store));

    // Start server
    let listener = TcpListener::bind(&config.api_address())
        .await
        .with_context(|| format!("Failed to bind to {}", config.api_address()))?;

    info!("AquaCert API listening on {}", config.api_address());
    info!("Health check: http://{}/health", config.api_address());
    info!("API endpoints:");
    info!("  GET   /api/v1/certificates - List certificates with summary");
    info!("  POST  /api/v1/certificates - Create a draft certificate");
    info!("  GET   /api/v1/certificates/summary - Per-status counts");
    info!("  GET   /api/v1/certificates/{{id}} - Get a certificate");
    info!("  PATCH /api/v1/certificates/{{id}} - Edit a certificate");
    info!("  POST  /api/v1/certificates/{{id}}/status - Change status");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
