//! Background job that keeps the rolling calendar's sessions in the store.

use domain::services::{Clock, SignupEngine};
use std::sync::Arc;
use tracing::debug;

use super::scheduler::{Job, JobFrequency};
use crate::middleware::metrics::record_sessions_created;

/// Creates any missing sessions of the rolling two-week window.
///
/// Reads also materialize sessions; this job makes sure they exist when
/// nobody has looked at the calendar after the Friday rollover.
pub struct MaterializeSessionsJob {
    engine: Arc<SignupEngine>,
    clock: Arc<dyn Clock>,
}

impl MaterializeSessionsJob {
    pub fn new(engine: Arc<SignupEngine>, clock: Arc<dyn Clock>) -> Self {
        Self { engine, clock }
    }
}

#[async_trait::async_trait]
impl Job for MaterializeSessionsJob {
    fn name(&self) -> &'static str {
        "materialize_sessions"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Minutes(15)
    }

    fn run_at_start(&self) -> bool {
        true
    }

    async fn execute(&self) -> anyhow::Result<()> {
        let schedule = self.engine.rolling_schedule(self.clock.now()).await?;
        record_sessions_created(schedule.created);
        debug!(
            sessions = schedule.sessions.len(),
            created = schedule.created,
            "Rolling calendar materialized"
        );
        Ok(())
    }
}
