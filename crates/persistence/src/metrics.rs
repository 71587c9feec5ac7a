//! Store query and pool metrics.

use metrics::{gauge, histogram};
use sqlx::PgPool;
use std::time::{Duration, Instant};

/// Records how long a named store query took.
pub fn record_query_duration(query: &'static str, duration: Duration) {
    histogram!("store_query_duration_seconds", "query" => query).record(duration.as_secs_f64());
}

/// Publishes connection pool gauges; called periodically by the pool job.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();

    gauge!("store_pool_connections", "state" => "active").set(size.saturating_sub(idle) as f64);
    gauge!("store_pool_connections", "state" => "idle").set(idle as f64);
}

/// Times one repository query.
///
/// ```ignore
/// let timer = QueryTimer::new("find_session_by_id");
/// let row = sqlx::query_as::<_, SessionEntity>(...).fetch_optional(&pool).await;
/// timer.record();
/// ```
pub struct QueryTimer {
    query: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query: &'static str) -> Self {
        Self {
            query,
            start: Instant::now(),
        }
    }

    /// Records the elapsed time and returns it.
    pub fn record(self) -> Duration {
        let elapsed = self.start.elapsed();
        record_query_duration(self.query, elapsed);
        elapsed
    }
}
