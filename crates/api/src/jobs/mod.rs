//! Background job scheduler and job implementations.

mod materialize_sessions;
mod scheduler;
mod store_health;

pub use materialize_sessions::MaterializeSessionsJob;
pub use scheduler::{Job, JobFrequency, JobScheduler};
pub use store_health::StoreHealthJob;
