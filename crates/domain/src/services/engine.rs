//! Sign-up engine: time-gated roster mutation.
//!
//! Every mutation runs under the session's lock and follows the same cycle:
//! load the session, check its windows against `now`, load the roster, apply
//! the change, verify capacity, save. A failed step leaves the store as it was.

use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::calendar::{plan_sessions, RollingWeeks};
use super::locks::SessionLocks;
use super::notification::{SignupEvent, SignupEventKind, SignupNotifier};
use super::roster::Roster;
use super::store::{EnsuredSessions, SessionStore};
use super::time_window::WindowPolicy;
use crate::errors::SignupError;
use crate::models::{Participant, Session, Signup};

/// Settings applied when materializing sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub session_capacity: i32,
    pub window_policy: WindowPolicy,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            session_capacity: crate::models::session::DEFAULT_SESSION_CAPACITY,
            window_policy: WindowPolicy::default(),
        }
    }
}

/// Outcome of a successful cancellation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelOutcome {
    pub cancelled: Signup,
    /// The waitlisted sign-up that took the freed place, if any.
    pub promoted: Option<Signup>,
}

/// The rolling calendar with its materialized sessions.
#[derive(Debug, Clone)]
pub struct RollingSchedule {
    pub weeks: RollingWeeks,
    pub sessions: Vec<Session>,
    pub created: usize,
}

pub struct SignupEngine {
    store: Arc<dyn SessionStore>,
    notifier: Arc<dyn SignupNotifier>,
    locks: SessionLocks,
    settings: EngineSettings,
}

impl SignupEngine {
    pub fn new(
        store: Arc<dyn SessionStore>,
        notifier: Arc<dyn SignupNotifier>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            store,
            notifier,
            locks: SessionLocks::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Returns the session if it exists and accepts sign-ups at `now`.
    ///
    /// Callers use this to reject a request before creating anything on its behalf.
    pub async fn open_session(
        &self,
        session_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Session, SignupError> {
        let session = self
            .store
            .find_session(session_id)
            .await?
            .ok_or(SignupError::NotFound("Event"))?;

        if !session.is_signup_open(now) {
            return Err(SignupError::SignupClosed {
                session_id,
                open: session.signup_open_at,
                cutoff: session.signup_cutoff_at,
            });
        }
        Ok(session)
    }

    /// Registers `participant` for a session.
    ///
    /// The returned sign-up is `Confirmed` if a place was free and
    /// `Waitlisted` otherwise.
    pub async fn sign_up(
        &self,
        session_id: Uuid,
        participant: Participant,
        now: DateTime<Utc>,
    ) -> Result<Signup, SignupError> {
        let _guard = self.locks.lock(session_id).await;

        let session = self.open_session(session_id, now).await?;
        let mut roster = self.store.load_roster(&session).await?;
        let signup = roster.add_signup(participant, now)?;
        self.commit(&roster).await?;

        info!(
            session_id = %session_id,
            signup_id = %signup.id,
            status = %signup.status,
            confirmed = roster.confirmed_count(),
            waitlisted = roster.waitlist_count(),
            "Signup registered"
        );
        self.notifier
            .notify(&SignupEvent::new(
                SignupEventKind::Registered,
                session.date,
                signup.clone(),
            ))
            .await;

        Ok(signup)
    }

    /// Cancels a sign-up, promoting the earliest waitlisted sign-up if a
    /// confirmed place was freed.
    pub async fn cancel(
        &self,
        signup_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<CancelOutcome, SignupError> {
        let located = self
            .store
            .find_signup(signup_id)
            .await?
            .ok_or(SignupError::NotFound("Signup"))?;

        let _guard = self.locks.lock(located.session_id).await;

        let session = self
            .store
            .find_session(located.session_id)
            .await?
            .ok_or(SignupError::NotFound("Event"))?;
        let mut roster = self.store.load_roster(&session).await?;

        // Re-read under the lock; a concurrent request may have cancelled it.
        if !roster.signup(signup_id).is_some_and(Signup::is_active) {
            return Err(SignupError::NotFound("Signup"));
        }

        if !session.can_cancel(now) {
            return Err(SignupError::CancellationClosed {
                deadline: session.cancel_deadline_at,
            });
        }

        let removal = roster.remove_signup(signup_id, now)?;
        self.commit(&roster).await?;

        info!(
            session_id = %session.id,
            signup_id = %signup_id,
            promoted = ?removal.promoted.as_ref().map(|s| s.id),
            confirmed = roster.confirmed_count(),
            waitlisted = roster.waitlist_count(),
            "Signup cancelled"
        );

        self.notifier
            .notify(&SignupEvent::new(
                SignupEventKind::Cancelled,
                session.date,
                removal.cancelled.clone(),
            ))
            .await;
        if let Some(promoted) = &removal.promoted {
            self.notifier
                .notify(&SignupEvent::new(
                    SignupEventKind::Promoted,
                    session.date,
                    promoted.clone(),
                ))
                .await;
        }

        Ok(CancelOutcome {
            cancelled: removal.cancelled,
            promoted: removal.promoted,
        })
    }

    /// Session and its roster, read under the session lock.
    pub async fn roster(&self, session_id: Uuid) -> Result<(Session, Roster), SignupError> {
        let _guard = self.locks.lock(session_id).await;
        let session = self
            .store
            .find_session(session_id)
            .await?
            .ok_or(SignupError::NotFound("Event"))?;
        let roster = self.store.load_roster(&session).await?;
        Ok((session, roster))
    }

    /// Materializes sessions for `dates` that do not exist yet.
    pub async fn ensure_sessions(&self, dates: &[NaiveDate]) -> Result<EnsuredSessions, SignupError> {
        let planned = plan_sessions(
            dates,
            self.settings.session_capacity,
            &self.settings.window_policy,
        );
        let ensured = self.store.ensure_sessions(&planned).await?;
        if ensured.created > 0 {
            info!(created = ensured.created, "Materialized sessions");
        }
        Ok(ensured)
    }

    /// The rolling calendar at `now`, with the remaining sessions materialized.
    pub async fn rolling_schedule(&self, now: DateTime<Utc>) -> Result<RollingSchedule, SignupError> {
        let policy = &self.settings.window_policy;
        let weeks = RollingWeeks::at(policy.local(now));
        let dates = weeks.session_dates(policy.local_date(now));
        let ensured = self.ensure_sessions(&dates).await?;
        Ok(RollingSchedule {
            weeks,
            sessions: ensured.sessions,
            created: ensured.created,
        })
    }

    async fn commit(&self, roster: &Roster) -> Result<(), SignupError> {
        if let Err(err) = roster.check_capacity() {
            warn!(session_id = %roster.session_id(), error = %err, "Refusing to save roster");
            return Err(err);
        }
        self.store.save_roster(roster).await.map_err(SignupError::from)
    }
}

impl std::fmt::Debug for SignupEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupEngine")
            .field("settings", &self.settings)
            .field("locks", &self.locks)
            .finish()
    }
}
