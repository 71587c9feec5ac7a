//! PostgreSQL-backed implementations of the domain store traits.

use async_trait::async_trait;
use chrono::NaiveDate;
use domain::errors::StoreError;
use domain::models::{Member, NewSession, Session, Signup};
use domain::services::{EnsuredSessions, MemberStore, Roster, SessionStore};
use shared::validation::normalize_email;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::repositories::{
    MemberRepository, SaveOutcome, SessionInput, SessionRepository, SignupRepository, SignupWrite,
};

/// Store backed by the golf_sessions, signups and members tables.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    sessions: SessionRepository,
    signups: SignupRepository,
    members: MemberRepository,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            sessions: SessionRepository::new(pool.clone()),
            signups: SignupRepository::new(pool.clone()),
            members: MemberRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Maps unique violations to [`StoreError::Conflict`].
fn map_write_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            return StoreError::Conflict(db_err.message().to_string());
        }
    }
    StoreError::Database(err)
}

fn signup_write(signup: &Signup) -> SignupWrite {
    SignupWrite {
        id: signup.id,
        session_id: signup.session_id,
        member_id: signup.participant.registrant().id,
        guest_name: signup.participant.guest_name().map(String::from),
        status: signup.status.into(),
        created_at: signup.created_at,
        cancelled_at: signup.cancelled_at,
    }
}

#[async_trait]
impl SessionStore for PgStore {
    async fn ensure_sessions(&self, planned: &[NewSession]) -> Result<EnsuredSessions, StoreError> {
        let inputs: Vec<SessionInput> = planned
            .iter()
            .map(|new| SessionInput {
                session_date: new.date,
                capacity: new.capacity,
                signup_open_at: new.windows.open,
                signup_cutoff_at: new.windows.cutoff,
                cancel_deadline_at: new.windows.cancel_deadline,
            })
            .collect();
        let created = self.sessions.insert_missing(&inputs).await?;

        let dates: Vec<NaiveDate> = planned.iter().map(|new| new.date).collect();
        let sessions = self
            .sessions
            .find_by_dates(&dates)
            .await?
            .into_iter()
            .map(Session::from)
            .collect();

        Ok(EnsuredSessions {
            sessions,
            created: usize::try_from(created).unwrap_or(usize::MAX),
        })
    }

    async fn find_session(&self, id: Uuid) -> Result<Option<Session>, StoreError> {
        Ok(self.sessions.find_by_id(id).await?.map(Session::from))
    }

    async fn sessions_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Session>, StoreError> {
        Ok(self
            .sessions
            .find_between(from, to)
            .await?
            .into_iter()
            .map(Session::from)
            .collect())
    }

    async fn find_signup(&self, id: Uuid) -> Result<Option<Signup>, StoreError> {
        Ok(self.signups.find_by_id(id).await?.map(Signup::from))
    }

    async fn load_roster(&self, session: &Session) -> Result<Roster, StoreError> {
        let signups = self
            .signups
            .find_by_session(session.id)
            .await?
            .into_iter()
            .map(Signup::from)
            .collect();
        Ok(Roster::new(session, signups))
    }

    async fn save_roster(&self, roster: &Roster) -> Result<(), StoreError> {
        let writes: Vec<SignupWrite> = roster
            .changed_signups()
            .into_iter()
            .map(signup_write)
            .collect();
        if writes.is_empty() {
            return Ok(());
        }

        match self
            .signups
            .save_changes(roster.session_id(), &writes)
            .await
            .map_err(map_write_error)?
        {
            SaveOutcome::Saved => Ok(()),
            SaveOutcome::OverCapacity {
                confirmed,
                capacity,
            } => {
                warn!(
                    session_id = %roster.session_id(),
                    confirmed,
                    capacity,
                    "Rolled back roster save over capacity"
                );
                Err(StoreError::CapacityExceeded {
                    session_id: roster.session_id(),
                    confirmed: usize::try_from(confirmed).unwrap_or(usize::MAX),
                    capacity: usize::try_from(capacity).unwrap_or(0),
                })
            }
            SaveOutcome::MissingSession => Err(StoreError::Corrupt(format!(
                "unknown session {}",
                roster.session_id()
            ))),
        }
    }

    async fn active_signups_for_member(&self, email: &str) -> Result<Vec<Signup>, StoreError> {
        Ok(self
            .signups
            .find_active_by_member_email(&normalize_email(email))
            .await?
            .into_iter()
            .map(Signup::from)
            .collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl MemberStore for PgStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Member>, StoreError> {
        Ok(self
            .members
            .find_by_email(&normalize_email(email))
            .await?
            .map(Member::from))
    }

    async fn find_or_create(&self, name: &str, email: &str) -> Result<(Member, bool), StoreError> {
        let (member, created) = self
            .members
            .find_or_create(name, &normalize_email(email))
            .await
            .map_err(map_write_error)?;
        Ok((member.into(), created))
    }

    async fn list(&self) -> Result<Vec<Member>, StoreError> {
        Ok(self
            .members
            .list()
            .await?
            .into_iter()
            .map(Member::from)
            .collect())
    }
}
