//! Review Workflow Service 入口

use std::net::SocketAddr;
use std::sync::Arc;

use docreview_adapter_postgres::{PostgresConfig, create_pool};
use docreview_auth_core::TokenService;
use docreview_config::AppConfig;
use docreview_telemetry::init_metrics;
use review_workflow::application::{AccountService, WorkflowPolicy};
use review_workflow::infrastructure::persistence::Repositories;
use review_workflow::infrastructure::storage::SupabaseStorage;
use review_workflow::runtime::{config_dir, init_runtime, shutdown_signal};
use review_workflow::{AppState, router};
use secrecy::ExposeSecret;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load(&config_dir())?;
    init_runtime(&config);

    let metrics = match init_metrics() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!(error = %e, "Metrics recorder not installed");
            None
        }
    };

    // 数据库
    let pool = create_pool(&PostgresConfig::from(&config.database)).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied");

    let repos = Repositories::postgres(pool.clone());
    let storage = Arc::new(SupabaseStorage::new(&config.storage)?);
    let tokens = Arc::new(TokenService::from_config(&config.jwt));

    if let Some(admin) = &config.bootstrap_admin {
        AccountService::new(repos.users.clone(), tokens.clone())
            .ensure_bootstrap_admin(&admin.email, admin.password.expose_secret())
            .await?;
    }

    let mut state = AppState::new(
        repos,
        storage,
        tokens,
        WorkflowPolicy::from(&config.workflow),
    )
    .with_database(pool);
    if let Some(handle) = metrics {
        state = state.with_metrics(handle);
    }

    let app = router(state, &config.cors);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!(%addr, "Starting review workflow service");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
