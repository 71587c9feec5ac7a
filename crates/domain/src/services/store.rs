//! Storage seams for sessions, rosters and members.
//!
//! The engine only talks to storage through these traits. The PostgreSQL
//! implementation lives in the `persistence` crate; [`super::memory`] holds an
//! in-process implementation.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use super::roster::Roster;
use crate::errors::StoreError;
use crate::models::{Member, NewSession, Session, Signup};

/// Outcome of materializing planned sessions.
#[derive(Debug, Clone, Default)]
pub struct EnsuredSessions {
    /// The sessions for every planned date, ordered by date.
    pub sessions: Vec<Session>,
    /// How many of them did not exist before.
    pub created: usize,
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Creates sessions for planned dates that have none yet. Existing
    /// sessions are returned unchanged.
    async fn ensure_sessions(&self, planned: &[NewSession]) -> Result<EnsuredSessions, StoreError>;

    async fn find_session(&self, id: Uuid) -> Result<Option<Session>, StoreError>;

    /// Sessions dated within `from..=to`, ordered by date.
    async fn sessions_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Session>, StoreError>;

    async fn find_signup(&self, id: Uuid) -> Result<Option<Signup>, StoreError>;

    /// Loads every sign-up of a session, including cancelled ones.
    async fn load_roster(&self, session: &Session) -> Result<Roster, StoreError>;

    /// Persists the roster's changed sign-ups atomically.
    ///
    /// Implementations must reject the write with
    /// [`StoreError::CapacityExceeded`] if it would leave more confirmed
    /// sign-ups than the session's capacity, and with [`StoreError::Conflict`]
    /// if a participant would hold two active sign-ups.
    async fn save_roster(&self, roster: &Roster) -> Result<(), StoreError>;

    /// Active sign-ups registered by the member with `email`, across sessions.
    async fn active_signups_for_member(&self, email: &str) -> Result<Vec<Signup>, StoreError>;

    /// Checks that the store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}

#[async_trait]
pub trait MemberStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Member>, StoreError>;

    /// Returns the member with `email`, creating it with `name` if missing.
    /// The flag is true when the member was created.
    async fn find_or_create(&self, name: &str, email: &str) -> Result<(Member, bool), StoreError>;

    async fn list(&self) -> Result<Vec<Member>, StoreError>;
}
