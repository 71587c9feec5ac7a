//! PostgreSQL pool setup.

use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tracing::info;

/// Pool settings, filled from the server's `[database]` section.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

/// Errors from connecting to and preparing the database.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("Failed to connect to database: {0}")]
    Connect(#[from] sqlx::Error),

    #[error("Failed to apply migrations: {0}")]
    Migrate(#[from] MigrateError),
}

/// Opens a connection pool. `connect_timeout_secs` bounds every acquire.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections.min(config.max_connections))
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect(&config.url)
        .await
}

/// Applies the embedded schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("src/migrations").run(pool).await
}

/// Opens a pool and brings the schema up to date.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, SetupError> {
    let pool = create_pool(config).await?;
    info!("Running database migrations...");
    run_migrations(&pool).await?;
    info!("Migrations completed");
    Ok(pool)
}
