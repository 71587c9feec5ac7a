use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use domain::services::{Clock, InMemoryStore, LogNotifier, SystemClock};
use golf_signup_api::app::{self, AppParts, AppState, StoreBackend};
use golf_signup_api::config::Config;
use golf_signup_api::jobs::{JobScheduler, MaterializeSessionsJob, StoreHealthJob};
use golf_signup_api::middleware;
use persistence::PgStore;

/// How long background jobs get to finish after the server stops.
const JOB_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    middleware::logging::init_logging(&config.logging)?;
    middleware::init_metrics()?;

    info!("Starting Golf Signup API v{}", env!("CARGO_PKG_VERSION"));

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let mut scheduler = JobScheduler::new();

    let parts = if config.database.is_memory() {
        warn!("No database configured, sign-ups are kept in memory only");
        let store = Arc::new(InMemoryStore::new());
        scheduler.register(StoreHealthJob::new(store.clone()));
        AppParts {
            sessions: store.clone(),
            members: store,
            notifier: Arc::new(LogNotifier),
            clock: clock.clone(),
            backend: StoreBackend::Memory,
        }
    } else {
        let db_config = persistence::db::DatabaseConfig::from(&config.database);
        let pool = persistence::db::connect(&db_config).await?;

        let store = Arc::new(PgStore::new(pool.clone()));
        scheduler.register(StoreHealthJob::new(store.clone()).with_pool(pool));
        AppParts {
            sessions: store.clone(),
            members: store,
            notifier: Arc::new(LogNotifier),
            clock: clock.clone(),
            backend: StoreBackend::Postgres,
        }
    };

    // Build application
    let addr = config.socket_addr()?;
    let state = AppState::new(config, parts);
    scheduler.register(MaterializeSessionsJob::new(state.engine.clone(), clock));
    scheduler.start();

    let app = app::create_app(state);

    // Start server
    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.shutdown();
    scheduler.wait_for_shutdown(JOB_SHUTDOWN_TIMEOUT).await;
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
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
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("Shutdown signal received");
}
