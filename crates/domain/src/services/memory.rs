//! In-process store used by tests and by servers started without a database.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::roster::Roster;
use super::store::{EnsuredSessions, MemberStore, SessionStore};
use crate::errors::StoreError;
use crate::models::{Member, NewSession, Session, Signup, SignupStatus};

#[derive(Debug, Default)]
struct State {
    sessions: HashMap<Uuid, Session>,
    by_date: BTreeMap<NaiveDate, Uuid>,
    /// Sign-ups in insertion order.
    signups: Vec<Signup>,
    members: HashMap<String, Member>,
}

/// Store that keeps everything in memory behind one lock.
///
/// Enforces the same capacity and uniqueness rules as the database schema.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemoryStore {
    async fn ensure_sessions(&self, planned: &[NewSession]) -> Result<EnsuredSessions, StoreError> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let mut result = EnsuredSessions::default();

        for new in planned {
            let existing = state.by_date.get(&new.date).copied();
            let id = match existing {
                Some(id) => id,
                None => {
                    let session = Session::from_new(new, now);
                    let id = session.id;
                    state.by_date.insert(new.date, id);
                    state.sessions.insert(id, session);
                    result.created += 1;
                    id
                }
            };
            if let Some(session) = state.sessions.get(&id) {
                result.sessions.push(session.clone());
            }
        }

        result.sessions.sort_by_key(|s| s.date);
        result.sessions.dedup_by_key(|s| s.id);
        Ok(result)
    }

    async fn find_session(&self, id: Uuid) -> Result<Option<Session>, StoreError> {
        Ok(self.state.read().await.sessions.get(&id).cloned())
    }

    async fn sessions_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Session>, StoreError> {
        if from > to {
            return Ok(Vec::new());
        }
        let state = self.state.read().await;
        Ok(state
            .by_date
            .range(from..=to)
            .filter_map(|(_, id)| state.sessions.get(id).cloned())
            .collect())
    }

    async fn find_signup(&self, id: Uuid) -> Result<Option<Signup>, StoreError> {
        Ok(self
            .state
            .read()
            .await
            .signups
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn load_roster(&self, session: &Session) -> Result<Roster, StoreError> {
        let state = self.state.read().await;
        let signups = state
            .signups
            .iter()
            .filter(|s| s.session_id == session.id)
            .cloned()
            .collect();
        Ok(Roster::new(session, signups))
    }

    async fn save_roster(&self, roster: &Roster) -> Result<(), StoreError> {
        let mut state = self.state.write().await;

        let capacity = state
            .sessions
            .get(&roster.session_id())
            .map(Session::capacity_count)
            .ok_or_else(|| StoreError::Corrupt(format!("unknown session {}", roster.session_id())))?;

        // Apply to a copy of the session's rows so a rejected save changes nothing.
        let mut rows: Vec<Signup> = state
            .signups
            .iter()
            .filter(|s| s.session_id == roster.session_id())
            .cloned()
            .collect();
        for changed in roster.changed_signups() {
            match rows.iter_mut().find(|s| s.id == changed.id) {
                Some(existing) => *existing = changed.clone(),
                None => rows.push(changed.clone()),
            }
        }

        let confirmed = rows
            .iter()
            .filter(|s| s.status == SignupStatus::Confirmed)
            .count();
        if confirmed > capacity {
            return Err(StoreError::CapacityExceeded {
                session_id: roster.session_id(),
                confirmed,
                capacity,
            });
        }

        let mut seen = HashSet::new();
        if !rows
            .iter()
            .filter(|s| s.is_active())
            .all(|s| seen.insert(s.participant.key()))
        {
            return Err(StoreError::Conflict(
                "participant already has an active signup".to_string(),
            ));
        }

        for changed in roster.changed_signups() {
            match state.signups.iter_mut().find(|s| s.id == changed.id) {
                Some(existing) => *existing = changed.clone(),
                None => state.signups.push(changed.clone()),
            }
        }
        Ok(())
    }

    async fn active_signups_for_member(&self, email: &str) -> Result<Vec<Signup>, StoreError> {
        let state = self.state.read().await;
        let mut signups: Vec<Signup> = state
            .signups
            .iter()
            .filter(|s| s.is_active() && s.participant.registrant().email == email)
            .cloned()
            .collect();
        signups.sort_by_key(|s| s.created_at);
        Ok(signups)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl MemberStore for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Member>, StoreError> {
        Ok(self.state.read().await.members.get(email).cloned())
    }

    async fn find_or_create(&self, name: &str, email: &str) -> Result<(Member, bool), StoreError> {
        let mut state = self.state.write().await;
        if let Some(member) = state.members.get(email) {
            return Ok((member.clone(), false));
        }
        let member = Member {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            created_at: Utc::now(),
        };
        state.members.insert(email.to_string(), member.clone());
        Ok((member, true))
    }

    async fn list(&self) -> Result<Vec<Member>, StoreError> {
        let mut members: Vec<Member> = self.state.read().await.members.values().cloned().collect();
        members.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.email.cmp(&b.email)));
        Ok(members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MemberRef, Participant};
    use crate::services::calendar::plan_sessions;
    use crate::services::time_window::WindowPolicy;
    use chrono::{Duration, TimeZone};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn participant(n: usize) -> Participant {
        Participant::member(MemberRef {
            id: Uuid::new_v4(),
            name: format!("P{}", n),
            email: format!("p{}@example.com", n),
        })
    }

    async fn one_session(store: &InMemoryStore, capacity: i32) -> Session {
        let planned = plan_sessions(&[date(2026, 10, 26)], capacity, &WindowPolicy::default());
        store.ensure_sessions(&planned).await.unwrap().sessions.remove(0)
    }

    #[tokio::test]
    async fn test_ensure_sessions_is_idempotent() {
        let store = InMemoryStore::new();
        let planned = plan_sessions(
            &[date(2026, 10, 28), date(2026, 10, 26)],
            16,
            &WindowPolicy::default(),
        );

        let first = store.ensure_sessions(&planned).await.unwrap();
        assert_eq!(first.created, 2);
        assert_eq!(first.sessions[0].date, date(2026, 10, 26));

        let second = store.ensure_sessions(&planned).await.unwrap();
        assert_eq!(second.created, 0);
        assert_eq!(
            first.sessions.iter().map(|s| s.id).collect::<Vec<_>>(),
            second.sessions.iter().map(|s| s.id).collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn test_sessions_between_inclusive() {
        let store = InMemoryStore::new();
        let planned = plan_sessions(
            &[date(2026, 10, 26), date(2026, 10, 28), date(2026, 10, 30)],
            16,
            &WindowPolicy::default(),
        );
        store.ensure_sessions(&planned).await.unwrap();

        let found = store
            .sessions_between(date(2026, 10, 26), date(2026, 10, 28))
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
        assert!(store
            .sessions_between(date(2026, 10, 30), date(2026, 10, 26))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_save_and_reload_roster() {
        let store = InMemoryStore::new();
        let session = one_session(&store, 16).await;
        let now = Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0).unwrap();

        let mut roster = store.load_roster(&session).await.unwrap();
        let signup = roster.add_signup(participant(1), now).unwrap();
        store.save_roster(&roster).await.unwrap();

        let reloaded = store.load_roster(&session).await.unwrap();
        assert_eq!(reloaded.confirmed_count(), 1);
        assert_eq!(store.find_signup(signup.id).await.unwrap(), Some(signup));
    }

    #[tokio::test]
    async fn test_save_rejects_capacity_overflow_without_changes() {
        let store = InMemoryStore::new();
        let session = one_session(&store, 1).await;
        let now = Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0).unwrap();

        // Two rosters loaded from the same empty state both see a free place.
        let mut a = store.load_roster(&session).await.unwrap();
        let mut b = store.load_roster(&session).await.unwrap();
        a.add_signup(participant(1), now).unwrap();
        b.add_signup(participant(2), now + Duration::seconds(1)).unwrap();

        store.save_roster(&a).await.unwrap();
        let err = store.save_roster(&b).await.unwrap_err();
        assert!(matches!(err, StoreError::CapacityExceeded { confirmed: 2, capacity: 1, .. }));
        assert_eq!(store.load_roster(&session).await.unwrap().signups().len(), 1);
    }

    #[tokio::test]
    async fn test_save_rejects_duplicate_active_participant() {
        let store = InMemoryStore::new();
        let session = one_session(&store, 16).await;
        let now = Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0).unwrap();
        let person = participant(1);

        let mut a = store.load_roster(&session).await.unwrap();
        let mut b = store.load_roster(&session).await.unwrap();
        a.add_signup(person.clone(), now).unwrap();
        b.add_signup(person, now).unwrap();

        store.save_roster(&a).await.unwrap();
        assert!(matches!(
            store.save_roster(&b).await,
            Err(StoreError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_member_find_or_create() {
        let store = InMemoryStore::new();
        let (created, is_new) = store
            .find_or_create("Nancy", "nancy@example.com")
            .await
            .unwrap();
        assert!(is_new);

        let (found, is_new) = store
            .find_or_create("Someone Else", "nancy@example.com")
            .await
            .unwrap();
        assert!(!is_new);
        assert_eq!(found, created);
        assert_eq!(store.list().await.unwrap().len(), 1);
        assert!(store.find_by_email("nobody@example.com").await.unwrap().is_none());
    }
}
