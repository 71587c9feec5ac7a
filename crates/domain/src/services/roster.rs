//! Per-session roster of sign-ups.
//!
//! A roster owns every sign-up of one session, including cancelled ones, and
//! applies the capacity and waitlist rules. It keeps track of which sign-ups
//! changed since it was loaded so a store can persist only those.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::SignupError;
use crate::models::{Participant, RosterCounts, Session, Signup, SignupStatus};

/// Confirmed and waitlisted sign-ups, each ordered by `created_at`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterView {
    pub confirmed: Vec<Signup>,
    pub waitlisted: Vec<Signup>,
}

/// Result of removing a sign-up from a roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    pub cancelled: Signup,
    pub promoted: Option<Signup>,
}

#[derive(Debug, Clone)]
pub struct Roster {
    session_id: Uuid,
    capacity: usize,
    signups: Vec<Signup>,
    changed: Vec<Uuid>,
}

impl Roster {
    /// Builds a roster from a session's stored sign-ups.
    ///
    /// Sign-ups are ordered by `created_at`; ties keep the given order.
    pub fn new(session: &Session, mut signups: Vec<Signup>) -> Self {
        signups.sort_by_key(|s| s.created_at);
        Self {
            session_id: session.id,
            capacity: session.capacity_count(),
            signups,
            changed: Vec::new(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn signup(&self, id: Uuid) -> Option<&Signup> {
        self.signups.iter().find(|s| s.id == id)
    }

    /// All sign-ups, including cancelled ones.
    pub fn signups(&self) -> &[Signup] {
        &self.signups
    }

    pub fn confirmed_count(&self) -> usize {
        self.count(SignupStatus::Confirmed)
    }

    pub fn waitlist_count(&self) -> usize {
        self.count(SignupStatus::Waitlisted)
    }

    pub fn available_spots(&self) -> usize {
        self.capacity.saturating_sub(self.confirmed_count())
    }

    pub fn is_full(&self) -> bool {
        self.confirmed_count() >= self.capacity
    }

    pub fn counts(&self) -> RosterCounts {
        RosterCounts {
            confirmed: self.confirmed_count(),
            waitlisted: self.waitlist_count(),
            cancelled: self.count(SignupStatus::Cancelled),
        }
    }

    /// Registers `participant`, confirmed if a place is free, otherwise at the
    /// end of the waitlist.
    pub fn add_signup(
        &mut self,
        participant: Participant,
        now: DateTime<Utc>,
    ) -> Result<Signup, SignupError> {
        let key = participant.key();
        if self
            .signups
            .iter()
            .any(|s| s.is_active() && s.participant.key() == key)
        {
            return Err(SignupError::DuplicateSignup);
        }

        let status = if self.is_full() {
            SignupStatus::Waitlisted
        } else {
            SignupStatus::Confirmed
        };

        let signup = Signup::new(self.session_id, participant, status, now);
        self.signups.push(signup.clone());
        self.changed.push(signup.id);
        Ok(signup)
    }

    /// Cancels a sign-up and, if it held a confirmed place, promotes the
    /// earliest waitlisted sign-up into it.
    pub fn remove_signup(&mut self, id: Uuid, now: DateTime<Utc>) -> Result<Removal, SignupError> {
        let index = self
            .signups
            .iter()
            .position(|s| s.id == id && s.is_active())
            .ok_or(SignupError::NotFound("Signup"))?;

        let previous = self.signups[index].status;
        self.signups[index].status = SignupStatus::Cancelled;
        self.signups[index].cancelled_at = Some(now);
        self.mark_changed(id);
        let cancelled = self.signups[index].clone();

        let promoted = if previous == SignupStatus::Confirmed && !self.is_full() {
            self.promote_next()
        } else {
            None
        };

        Ok(Removal {
            cancelled,
            promoted,
        })
    }

    /// Confirmed and waitlisted sign-ups, recomputed on every call.
    pub fn roster_view(&self) -> RosterView {
        RosterView {
            confirmed: self.ordered(SignupStatus::Confirmed),
            waitlisted: self.ordered(SignupStatus::Waitlisted),
        }
    }

    /// Cancelled sign-ups ordered by `created_at`.
    pub fn cancelled(&self) -> Vec<Signup> {
        self.ordered(SignupStatus::Cancelled)
    }

    /// Fails if more sign-ups are confirmed than the session allows.
    pub fn check_capacity(&self) -> Result<(), SignupError> {
        let confirmed = self.confirmed_count();
        if confirmed > self.capacity {
            return Err(SignupError::CapacityInvariantViolation {
                session_id: self.session_id,
                confirmed,
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    /// Sign-ups created or modified since the roster was loaded.
    pub fn changed_signups(&self) -> Vec<&Signup> {
        self.changed
            .iter()
            .filter_map(|id| self.signups.iter().find(|s| s.id == *id))
            .collect()
    }

    fn promote_next(&mut self) -> Option<Signup> {
        let next = self
            .signups
            .iter()
            .enumerate()
            .filter(|(_, s)| s.status == SignupStatus::Waitlisted)
            .min_by_key(|(_, s)| s.created_at)
            .map(|(i, _)| i)?;

        self.signups[next].status = SignupStatus::Confirmed;
        let id = self.signups[next].id;
        self.mark_changed(id);
        Some(self.signups[next].clone())
    }

    fn mark_changed(&mut self, id: Uuid) {
        if !self.changed.contains(&id) {
            self.changed.push(id);
        }
    }

    fn count(&self, status: SignupStatus) -> usize {
        self.signups.iter().filter(|s| s.status == status).count()
    }

    fn ordered(&self, status: SignupStatus) -> Vec<Signup> {
        let mut matching: Vec<Signup> = self
            .signups
            .iter()
            .filter(|s| s.status == status)
            .cloned()
            .collect();
        matching.sort_by_key(|s| s.created_at);
        matching
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MemberRef;
    use chrono::{Duration, NaiveDate, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 20, 12, 0, 0).unwrap()
    }

    fn session(capacity: i32) -> Session {
        Session {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
            capacity,
            signup_open_at: t0() - Duration::days(5),
            signup_cutoff_at: t0() + Duration::days(7),
            cancel_deadline_at: t0() + Duration::days(12),
            created_at: t0() - Duration::days(5),
        }
    }

    fn member(n: usize) -> Participant {
        Participant::member(MemberRef {
            id: Uuid::new_v4(),
            name: format!("Player {}", n),
            email: format!("player{}@example.com", n),
        })
    }

    fn filled(capacity: i32, count: usize) -> (Roster, Vec<Signup>) {
        let mut roster = Roster::new(&session(capacity), Vec::new());
        let signups = (0..count)
            .map(|i| {
                roster
                    .add_signup(member(i), t0() + Duration::minutes(i as i64))
                    .unwrap()
            })
            .collect();
        (roster, signups)
    }

    #[test]
    fn test_add_signup_confirmed_until_full() {
        let (roster, signups) = filled(16, 16);
        assert!(signups.iter().all(|s| s.status == SignupStatus::Confirmed));
        assert_eq!(roster.confirmed_count(), 16);
        assert!(roster.is_full());
        assert_eq!(roster.available_spots(), 0);
    }

    #[test]
    fn test_seventeenth_signup_is_waitlisted() {
        let (mut roster, _) = filled(16, 16);
        let extra = roster
            .add_signup(member(16), t0() + Duration::hours(1))
            .unwrap();
        assert_eq!(extra.status, SignupStatus::Waitlisted);
        assert_eq!(roster.confirmed_count(), 16);
        assert_eq!(roster.waitlist_count(), 1);
    }

    #[test]
    fn test_cancel_confirmed_promotes_earliest_waitlisted() {
        let (mut roster, signups) = filled(16, 16);
        let first_waiting = roster
            .add_signup(member(100), t0() + Duration::hours(1))
            .unwrap();
        let second_waiting = roster
            .add_signup(member(101), t0() + Duration::hours(2))
            .unwrap();

        let removal = roster
            .remove_signup(signups[0].id, t0() + Duration::hours(3))
            .unwrap();

        assert_eq!(removal.cancelled.status, SignupStatus::Cancelled);
        assert_eq!(removal.cancelled.cancelled_at, Some(t0() + Duration::hours(3)));
        let promoted = removal.promoted.expect("expected a promotion");
        assert_eq!(promoted.id, first_waiting.id);
        assert_eq!(promoted.status, SignupStatus::Confirmed);
        assert_eq!(roster.confirmed_count(), 16);
        assert_eq!(
            roster.signup(second_waiting.id).unwrap().status,
            SignupStatus::Waitlisted
        );
    }

    #[test]
    fn test_promotion_selects_minimum_created_at() {
        let (mut roster, signups) = filled(1, 1);
        // Registered later in wall-clock order but with an earlier timestamp.
        let late = roster.add_signup(member(1), t0() + Duration::hours(5)).unwrap();
        let early = roster.add_signup(member(2), t0() + Duration::hours(2)).unwrap();

        let view = roster.roster_view();
        assert_eq!(view.waitlisted[0].id, early.id);
        assert_eq!(view.waitlisted[1].id, late.id);

        let removal = roster.remove_signup(signups[0].id, t0() + Duration::hours(6)).unwrap();
        assert_eq!(removal.promoted.map(|s| s.id), Some(early.id));
    }

    #[test]
    fn test_cancel_waitlisted_does_not_promote() {
        let (mut roster, _) = filled(2, 2);
        let waiting = roster.add_signup(member(10), t0() + Duration::hours(1)).unwrap();
        let other = roster.add_signup(member(11), t0() + Duration::hours(2)).unwrap();

        let removal = roster.remove_signup(waiting.id, t0() + Duration::hours(3)).unwrap();
        assert!(removal.promoted.is_none());
        assert_eq!(roster.signup(other.id).unwrap().status, SignupStatus::Waitlisted);
        assert_eq!(roster.confirmed_count(), 2);
    }

    #[test]
    fn test_cancel_confirmed_without_waitlist_frees_a_spot() {
        let (mut roster, signups) = filled(16, 3);
        let removal = roster.remove_signup(signups[1].id, t0() + Duration::hours(1)).unwrap();
        assert!(removal.promoted.is_none());
        assert_eq!(roster.confirmed_count(), 2);
        assert_eq!(roster.available_spots(), 14);
    }

    #[test]
    fn test_duplicate_active_signup_rejected() {
        let mut roster = Roster::new(&session(16), Vec::new());
        let person = member(1);
        roster.add_signup(person.clone(), t0()).unwrap();
        let err = roster
            .add_signup(person, t0() + Duration::minutes(1))
            .unwrap_err();
        assert!(matches!(err, SignupError::DuplicateSignup));
        assert_eq!(roster.signups().len(), 1);
    }

    #[test]
    fn test_signup_again_after_cancellation() {
        let mut roster = Roster::new(&session(16), Vec::new());
        let person = member(1);
        let first = roster.add_signup(person.clone(), t0()).unwrap();
        roster.remove_signup(first.id, t0() + Duration::minutes(1)).unwrap();
        let second = roster.add_signup(person, t0() + Duration::minutes(2)).unwrap();
        assert_eq!(second.status, SignupStatus::Confirmed);
        assert_eq!(roster.counts().cancelled, 1);
    }

    #[test]
    fn test_guest_and_sponsor_both_allowed() {
        let mut roster = Roster::new(&session(16), Vec::new());
        let sponsor = MemberRef {
            id: Uuid::new_v4(),
            name: "Walter".into(),
            email: "walter@example.com".into(),
        };
        roster.add_signup(Participant::member(sponsor.clone()), t0()).unwrap();
        roster
            .add_signup(Participant::guest("Bobby", sponsor.clone()), t0())
            .unwrap();
        let err = roster
            .add_signup(Participant::guest("bobby", sponsor), t0())
            .unwrap_err();
        assert!(matches!(err, SignupError::DuplicateSignup));
        assert_eq!(roster.confirmed_count(), 2);
    }

    #[test]
    fn test_remove_already_cancelled_is_not_found_and_unchanged() {
        let (mut roster, signups) = filled(16, 2);
        roster.remove_signup(signups[0].id, t0() + Duration::hours(1)).unwrap();
        let before = roster.signups().to_vec();

        let err = roster
            .remove_signup(signups[0].id, t0() + Duration::hours(2))
            .unwrap_err();
        assert!(matches!(err, SignupError::NotFound(_)));
        assert_eq!(roster.signups(), before.as_slice());
    }

    #[test]
    fn test_remove_unknown_signup_not_found() {
        let (mut roster, _) = filled(16, 1);
        assert!(matches!(
            roster.remove_signup(Uuid::new_v4(), t0()),
            Err(SignupError::NotFound(_))
        ));
    }

    #[test]
    fn test_roster_view_partitions_and_excludes_cancelled() {
        let (mut roster, signups) = filled(2, 3);
        roster.remove_signup(signups[2].id, t0() + Duration::hours(1)).unwrap();
        let view = roster.roster_view();
        assert_eq!(view.confirmed.len(), 2);
        assert!(view.waitlisted.is_empty());
        assert_eq!(roster.cancelled().len(), 1);
        assert!(view
            .confirmed
            .windows(2)
            .all(|w| w[0].created_at <= w[1].created_at));
    }

    #[test]
    fn test_changed_signups_tracks_mutations() {
        let (mut roster, signups) = filled(1, 2);
        let loaded = Roster::new(&session(1), roster.signups().to_vec());
        assert!(loaded.changed_signups().is_empty());

        roster.remove_signup(signups[0].id, t0() + Duration::hours(1)).unwrap();
        let changed: Vec<Uuid> = roster.changed_signups().iter().map(|s| s.id).collect();
        assert_eq!(changed.len(), 2);
        assert!(changed.contains(&signups[0].id));
        assert!(changed.contains(&signups[1].id));
    }

    #[test]
    fn test_check_capacity_detects_overflow() {
        let s = session(1);
        let rows = (0..2)
            .map(|i| Signup::new(s.id, member(i), SignupStatus::Confirmed, t0()))
            .collect();
        let roster = Roster::new(&s, rows);
        assert!(matches!(
            roster.check_capacity(),
            Err(SignupError::CapacityInvariantViolation { confirmed: 2, capacity: 1, .. })
        ));
    }

    #[test]
    fn test_capacity_invariant_holds_across_operations() {
        let (mut roster, mut active) = filled(4, 8);
        for step in 0..6 {
            let id = active.remove(0).id;
            roster
                .remove_signup(id, t0() + Duration::hours(step + 1))
                .unwrap();
            assert!(roster.confirmed_count() <= roster.capacity());
            assert!(roster.check_capacity().is_ok());
        }
        assert_eq!(roster.confirmed_count(), 2);
        assert_eq!(roster.waitlist_count(), 0);
    }
}
