//! Golf session repository for database operations.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::SessionEntity;
use crate::metrics::QueryTimer;

/// Repository for golf session database operations.
#[derive(Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

/// Column values for a session that may not exist yet.
#[derive(Debug, Clone, Copy)]
pub struct SessionInput {
    pub session_date: NaiveDate,
    pub capacity: i32,
    pub signup_open_at: DateTime<Utc>,
    pub signup_cutoff_at: DateTime<Utc>,
    pub cancel_deadline_at: DateTime<Utc>,
}

impl SessionRepository {
    /// Creates a new SessionRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Inserts the given sessions, skipping dates that already have one.
    ///
    /// Returns the number of rows created.
    pub async fn insert_missing(&self, inputs: &[SessionInput]) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("insert_missing_sessions");
        let mut tx = self.pool.begin().await?;
        let mut created = 0;

        for input in inputs {
            let result = sqlx::query(
                r#"
                INSERT INTO golf_sessions (session_date, capacity, signup_open_at, signup_cutoff_at, cancel_deadline_at)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (session_date) DO NOTHING
                "#,
            )
            .bind(input.session_date)
            .bind(input.capacity)
            .bind(input.signup_open_at)
            .bind(input.signup_cutoff_at)
            .bind(input.cancel_deadline_at)
            .execute(&mut *tx)
            .await?;
            created += result.rows_affected();
        }

        tx.commit().await?;
        timer.record();
        Ok(created)
    }

    /// Find sessions on any of the given dates, ordered by date.
    pub async fn find_by_dates(&self, dates: &[NaiveDate]) -> Result<Vec<SessionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_sessions_by_dates");
        let result = sqlx::query_as::<_, SessionEntity>(
            r#"
            SELECT id, session_date, capacity, signup_open_at, signup_cutoff_at, cancel_deadline_at, created_at
            FROM golf_sessions
            WHERE session_date = ANY($1)
            ORDER BY session_date
            "#,
        )
        .bind(dates)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a session by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<SessionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_session_by_id");
        let result = sqlx::query_as::<_, SessionEntity>(
            r#"
            SELECT id, session_date, capacity, signup_open_at, signup_cutoff_at, cancel_deadline_at, created_at
            FROM golf_sessions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find sessions dated between `from` and `to`, inclusive.
    pub async fn find_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<SessionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_sessions_between");
        let result = sqlx::query_as::<_, SessionEntity>(
            r#"
            SELECT id, session_date, capacity, signup_open_at, signup_cutoff_at, cancel_deadline_at, created_at
            FROM golf_sessions
            WHERE session_date BETWEEN $1 AND $2
            ORDER BY session_date
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find sessions by ID.
    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<SessionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_sessions_by_ids");
        let result = sqlx::query_as::<_, SessionEntity>(
            r#"
            SELECT id, session_date, capacity, signup_open_at, signup_cutoff_at, cancel_deadline_at, created_at
            FROM golf_sessions
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
