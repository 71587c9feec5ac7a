//! Member repository for database operations.

use sqlx::PgPool;

use crate::entities::MemberEntity;
use crate::metrics::QueryTimer;

/// Repository for member database operations.
#[derive(Clone)]
pub struct MemberRepository {
    pool: PgPool,
}

impl MemberRepository {
    /// Creates a new MemberRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a member by (lower-cased) email.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<MemberEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_member_by_email");
        let result = sqlx::query_as::<_, MemberEntity>(
            r#"
            SELECT id, name, email, created_at
            FROM members
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Insert a member unless the email is already registered.
    ///
    /// Returns the stored member and whether it was created by this call.
    pub async fn find_or_create(
        &self,
        name: &str,
        email: &str,
    ) -> Result<(MemberEntity, bool), sqlx::Error> {
        let timer = QueryTimer::new("find_or_create_member");
        let inserted = sqlx::query_as::<_, MemberEntity>(
            r#"
            INSERT INTO members (name, email)
            VALUES ($1, $2)
            ON CONFLICT (email) DO NOTHING
            RETURNING id, name, email, created_at
            "#,
        )
        .bind(name)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        let result = match inserted {
            Some(member) => Ok((member, true)),
            None => sqlx::query_as::<_, MemberEntity>(
                r#"
                SELECT id, name, email, created_at
                FROM members
                WHERE email = $1
                "#,
            )
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map(|member| (member, false)),
        };
        timer.record();
        result
    }

    /// List all members, oldest first.
    pub async fn list(&self) -> Result<Vec<MemberEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_members");
        let result = sqlx::query_as::<_, MemberEntity>(
            r#"
            SELECT id, name, email, created_at
            FROM members
            ORDER BY created_at, email
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
