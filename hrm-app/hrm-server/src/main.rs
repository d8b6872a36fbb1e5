use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, warn};

use hrm_api::{build_router, AppState};
use hrm_core::repositories::{RoleRepository, UserRepository};
use hrm_core::services::PermissionService;
use hrm_infrastructure::{
    create_pool, load_catalog, run_migrations, InMemoryRoleRepository, InMemoryUserRepository,
    PgRoleRepository, PgUserRepository,
};
use hrm_shared::config::{AppConfig, StorageBackend};
use hrm_shared::telemetry::init_telemetry;

type Repositories = (Arc<dyn RoleRepository>, Arc<dyn UserRepository>);

async fn repositories(config: &AppConfig) -> anyhow::Result<Repositories> {
    match config.storage.backend {
        StorageBackend::Memory => {
            if config.is_production() {
                warn!("In-memory storage selected in production, data is lost on restart");
            } else {
                info!("Using in-memory storage");
            }
            let roles: Arc<dyn RoleRepository> = Arc::new(InMemoryRoleRepository::new());
            let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
            Ok((roles, users))
        }
        StorageBackend::Postgres => {
            info!("Connecting to database...");
            let pool = create_pool(&config.database)
                .await
                .context("failed to connect to database")?;
            run_migrations(&pool).await.context("failed to run migrations")?;
            info!("Database connection established.");
            let roles: Arc<dyn RoleRepository> = Arc::new(PgRoleRepository::new(pool.clone()));
            let users: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(pool));
            Ok((roles, users))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;

    // Held until shutdown so buffered file logs are flushed.
    let _log_guard = init_telemetry(&config.log)?;

    info!(env = %config.app.env, "HRM server starting...");

    let catalog = match load_catalog(config.catalog.path.as_deref()).await {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("Failed to load permission catalog: {}", e);
            return Err(e.into());
        }
    };

    let (roles, users) = repositories(&config).await?;
    let service = PermissionService::new(Arc::new(catalog), roles, users);

    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    let app = build_router(AppState::new(service, config));

    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HRM server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}
