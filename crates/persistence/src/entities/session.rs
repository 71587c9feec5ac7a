//! Golf session entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the golf_sessions table.
#[derive(Debug, Clone, FromRow)]
pub struct SessionEntity {
    pub id: Uuid,
    pub session_date: NaiveDate,
    pub capacity: i32,
    pub signup_open_at: DateTime<Utc>,
    pub signup_cutoff_at: DateTime<Utc>,
    pub cancel_deadline_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<SessionEntity> for domain::models::Session {
    fn from(entity: SessionEntity) -> Self {
        Self {
            id: entity.id,
            date: entity.session_date,
            capacity: entity.capacity,
            signup_open_at: entity.signup_open_at,
            signup_cutoff_at: entity.signup_cutoff_at,
            cancel_deadline_at: entity.cancel_deadline_at,
            created_at: entity.created_at,
        }
    }
}
