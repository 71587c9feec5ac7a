//! Golf session domain models.

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::signup::PlayerEntry;
use crate::services::time_window::SessionWindows;

/// Number of players a session accepts before new sign-ups are waitlisted.
pub const DEFAULT_SESSION_CAPACITY: i32 = 16;

/// A single scheduled golf date.
///
/// Sessions are materialized from the rolling calendar and never change once
/// created; the sign-up windows are derived from the date at that moment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Session {
    pub id: Uuid,
    pub date: NaiveDate,
    pub capacity: i32,
    pub signup_open_at: DateTime<Utc>,
    pub signup_cutoff_at: DateTime<Utc>,
    pub cancel_deadline_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Builds a session from a materialization plan.
    pub fn from_new(new: &NewSession, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: new.date,
            capacity: new.capacity,
            signup_open_at: new.windows.open,
            signup_cutoff_at: new.windows.cutoff,
            cancel_deadline_at: new.windows.cancel_deadline,
            created_at,
        }
    }

    /// English weekday name of the session date.
    pub fn day_of_week(&self) -> &'static str {
        weekday_name(self.date.weekday())
    }

    pub fn windows(&self) -> SessionWindows {
        SessionWindows {
            open: self.signup_open_at,
            cutoff: self.signup_cutoff_at,
            cancel_deadline: self.cancel_deadline_at,
        }
    }

    /// Capacity as a count; negative capacities are treated as zero.
    pub fn capacity_count(&self) -> usize {
        usize::try_from(self.capacity).unwrap_or(0)
    }

    /// Returns true if sign-ups are accepted at `now` (both bounds inclusive).
    pub fn is_signup_open(&self, now: DateTime<Utc>) -> bool {
        self.windows().accepts_signup(now)
    }

    pub fn is_cutoff_passed(&self, now: DateTime<Utc>) -> bool {
        now > self.signup_cutoff_at
    }

    /// Returns true if cancellations are accepted at `now` (deadline inclusive).
    pub fn can_cancel(&self, now: DateTime<Utc>) -> bool {
        self.windows().accepts_cancellation(now)
    }
}

/// A session that should exist for a given date, before it has an identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSession {
    pub date: NaiveDate,
    pub capacity: i32,
    pub windows: SessionWindows,
}

/// Confirmed, waitlisted and cancelled counts for a session's roster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RosterCounts {
    pub confirmed: usize,
    pub waitlisted: usize,
    pub cancelled: usize,
}

/// Session as presented to clients, with roster counts and window flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SessionSummary {
    pub id: Uuid,
    pub date: NaiveDate,
    pub day_of_week: String,
    pub max_players: i32,
    pub current_signups: usize,
    pub waitlist_count: usize,
    pub available_spots: usize,
    pub is_full: bool,
    pub signup_open_at: DateTime<Utc>,
    pub cutoff_datetime: DateTime<Utc>,
    pub cancellation_deadline: DateTime<Utc>,
    pub is_cutoff_passed: bool,
    pub can_cancel: bool,
    pub created_at: DateTime<Utc>,
}

impl SessionSummary {
    pub fn new(session: &Session, counts: RosterCounts, now: DateTime<Utc>) -> Self {
        let capacity = session.capacity_count();
        Self {
            id: session.id,
            date: session.date,
            day_of_week: session.day_of_week().to_string(),
            max_players: session.capacity,
            current_signups: counts.confirmed,
            waitlist_count: counts.waitlisted,
            available_spots: capacity.saturating_sub(counts.confirmed),
            is_full: counts.confirmed >= capacity,
            signup_open_at: session.signup_open_at,
            cutoff_datetime: session.signup_cutoff_at,
            cancellation_deadline: session.cancel_deadline_at,
            is_cutoff_passed: session.is_cutoff_passed(now),
            can_cancel: session.can_cancel(now),
            created_at: session.created_at,
        }
    }
}

/// Session summary together with who is playing and who is waiting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SessionWithRoster {
    #[serde(flatten)]
    pub summary: SessionSummary,
    pub confirmed_players: Vec<PlayerEntry>,
    pub waitlist_players: Vec<PlayerEntry>,
}

/// Response for the rolling two-week calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RollingEventsResponse {
    pub events: Vec<SessionWithRoster>,
    pub week1_start: NaiveDate,
    pub week1_end: NaiveDate,
    pub week2_start: NaiveDate,
    pub week2_end: NaiveDate,
}

/// Response for a single week of the rolling calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WeekEventsResponse {
    pub events: Vec<SessionWithRoster>,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
}

/// Response after materializing the rolling window's sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GenerateEventsResponse {
    pub message: String,
    pub events: usize,
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
