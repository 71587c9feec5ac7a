//! Sign-up repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{SignupEntity, SignupStatusDb};
use crate::metrics::QueryTimer;

/// Repository for sign-up database operations.
#[derive(Clone)]
pub struct SignupRepository {
    pool: PgPool,
}

/// Column values written for a new or changed sign-up.
#[derive(Debug, Clone)]
pub struct SignupWrite {
    pub id: Uuid,
    pub session_id: Uuid,
    pub member_id: Uuid,
    pub guest_name: Option<String>,
    pub status: SignupStatusDb,
    pub created_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

/// Result of [`SignupRepository::save_changes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// The writes were rolled back because they would confirm too many players.
    OverCapacity { confirmed: i64, capacity: i32 },
    /// The session row no longer exists.
    MissingSession,
}

impl SignupRepository {
    /// Creates a new SignupRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a sign-up by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<SignupEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_signup_by_id");
        let result = sqlx::query_as::<_, SignupEntity>(
            r#"
            SELECT s.id, s.session_id, s.member_id, m.name AS member_name, m.email AS member_email,
                   s.guest_name, s.status, s.created_at, s.cancelled_at
            FROM signups s
            JOIN members m ON m.id = s.member_id
            WHERE s.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// All sign-ups of a session, in registration order.
    ///
    /// Equal `created_at` values keep insertion order through the `seq` identity column.
    pub async fn find_by_session(&self, session_id: Uuid) -> Result<Vec<SignupEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_signups_by_session");
        let result = sqlx::query_as::<_, SignupEntity>(
            r#"
            SELECT s.id, s.session_id, s.member_id, m.name AS member_name, m.email AS member_email,
                   s.guest_name, s.status, s.created_at, s.cancelled_at
            FROM signups s
            JOIN members m ON m.id = s.member_id
            WHERE s.session_id = $1
            ORDER BY s.created_at, s.seq
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Active sign-ups registered by the member with `email`, oldest first.
    pub async fn find_active_by_member_email(
        &self,
        email: &str,
    ) -> Result<Vec<SignupEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_active_signups_by_member_email");
        let result = sqlx::query_as::<_, SignupEntity>(
            r#"
            SELECT s.id, s.session_id, s.member_id, m.name AS member_name, m.email AS member_email,
                   s.guest_name, s.status, s.created_at, s.cancelled_at
            FROM signups s
            JOIN members m ON m.id = s.member_id
            WHERE m.email = $1 AND s.status <> 'cancelled'
            ORDER BY s.created_at, s.seq
            "#,
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Writes changed sign-ups of one session in a single transaction.
    ///
    /// The session row is locked for the duration, and the confirmed count is
    /// re-checked against its capacity before committing.
    pub async fn save_changes(
        &self,
        session_id: Uuid,
        writes: &[SignupWrite],
    ) -> Result<SaveOutcome, sqlx::Error> {
        let timer = QueryTimer::new("save_signup_changes");
        let mut tx = self.pool.begin().await?;

        let capacity: Option<i32> = sqlx::query_scalar(
            r#"
            SELECT capacity FROM golf_sessions WHERE id = $1 FOR UPDATE
            "#,
        )
        .bind(session_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(capacity) = capacity else {
            timer.record();
            return Ok(SaveOutcome::MissingSession);
        };

        for write in writes {
            sqlx::query(
                r#"
                INSERT INTO signups (id, session_id, member_id, guest_name, status, created_at, cancelled_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ON CONFLICT (id) DO UPDATE
                SET status = EXCLUDED.status, cancelled_at = EXCLUDED.cancelled_at
                "#,
            )
            .bind(write.id)
            .bind(write.session_id)
            .bind(write.member_id)
            .bind(write.guest_name.as_deref())
            .bind(write.status)
            .bind(write.created_at)
            .bind(write.cancelled_at)
            .execute(&mut *tx)
            .await?;
        }

        let confirmed: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM signups WHERE session_id = $1 AND status = 'confirmed'
            "#,
        )
        .bind(session_id)
        .fetch_one(&mut *tx)
        .await?;

        if confirmed > i64::from(capacity) {
            tx.rollback().await?;
            timer.record();
            return Ok(SaveOutcome::OverCapacity {
                confirmed,
                capacity,
            });
        }

        tx.commit().await?;
        timer.record();
        Ok(SaveOutcome::Saved)
    }
}
