//! Background job that watches the session store.

use domain::services::SessionStore;
use metrics::gauge;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::warn;

use super::scheduler::{Job, JobFrequency};

/// Pings the store and publishes `store_up`, plus pool gauges when the store
/// is PostgreSQL.
pub struct StoreHealthJob {
    sessions: Arc<dyn SessionStore>,
    pool: Option<PgPool>,
}

impl StoreHealthJob {
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            sessions,
            pool: None,
        }
    }

    pub fn with_pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }
}

#[async_trait::async_trait]
impl Job for StoreHealthJob {
    fn name(&self) -> &'static str {
        "store_health"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Seconds(10)
    }

    async fn execute(&self) -> anyhow::Result<()> {
        if let Some(pool) = &self.pool {
            persistence::metrics::record_pool_metrics(pool);
        }

        match self.sessions.ping().await {
            Ok(()) => {
                gauge!("store_up").set(1.0);
                Ok(())
            }
            Err(e) => {
                gauge!("store_up").set(0.0);
                warn!(error = %e, "Session store did not answer ping");
                Err(e.into())
            }
        }
    }
}
