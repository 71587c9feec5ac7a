//! Member entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the members table.
#[derive(Debug, Clone, FromRow)]
pub struct MemberEntity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<MemberEntity> for domain::models::Member {
    fn from(entity: MemberEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            email: entity.email,
            created_at: entity.created_at,
        }
    }
}
