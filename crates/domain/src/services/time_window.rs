//! Sign-up window evaluation for golf sessions.
//!
//! Every session has three instants derived from its date, all expressed in
//! club-local wall-clock time and converted to UTC:
//! - sign-up cutoff: 18:00 on the Wednesday of the week before the session's ISO week
//! - cancellation deadline: 08:00 on the day before the session
//! - sign-up open: a configured lead time before the cutoff

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Local hour at which sign-ups close.
pub const CUTOFF_HOUR: i64 = 18;

/// Local hour on the day before the session after which cancellation is refused.
pub const CANCEL_DEADLINE_HOUR: i64 = 8;

/// Days from the Monday of a session's week back to the preceding Wednesday.
const CUTOFF_DAYS_BEFORE_WEEK_START: i64 = 5;

/// Default UTC offset of the club (US Pacific standard time).
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = -8 * 60;

/// Default lead between sign-up opening and the cutoff: five days, from the
/// Friday 18:00 calendar rollover that first shows a week's sessions to the
/// following Wednesday 18:00 cutoff.
pub const DEFAULT_SIGNUP_OPEN_LEAD_HOURS: i64 = 5 * 24;

/// Club time zone and sign-up opening lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPolicy {
    utc_offset: FixedOffset,
    signup_open_lead: Duration,
}

impl WindowPolicy {
    pub fn new(utc_offset: FixedOffset, signup_open_lead: Duration) -> Self {
        Self {
            utc_offset,
            signup_open_lead,
        }
    }

    /// Builds a policy from configuration values.
    ///
    /// Returns `None` if the offset is outside ±24 hours or the lead is negative.
    pub fn from_config(utc_offset_minutes: i32, signup_open_lead_hours: i64) -> Option<Self> {
        if signup_open_lead_hours < 0 {
            return None;
        }
        let offset = FixedOffset::east_opt(utc_offset_minutes.checked_mul(60)?)?;
        Some(Self::new(offset, Duration::hours(signup_open_lead_hours)))
    }

    pub fn utc_offset(&self) -> FixedOffset {
        self.utc_offset
    }

    pub fn signup_open_lead(&self) -> Duration {
        self.signup_open_lead
    }

    /// Club-local wall-clock time of an instant.
    pub fn local(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&self.utc_offset).naive_local()
    }

    /// Club-local calendar date of an instant.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        self.local(instant).date()
    }

    /// UTC instant of `hour`:00 club-local on `date`.
    pub fn at_local_hour(&self, date: NaiveDate, hour: i64) -> DateTime<Utc> {
        let local = date.and_time(NaiveTime::MIN) + Duration::hours(hour);
        let utc = local - Duration::seconds(i64::from(self.utc_offset.local_minus_utc()));
        Utc.from_utc_datetime(&utc)
    }
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self::from_config(DEFAULT_UTC_OFFSET_MINUTES, DEFAULT_SIGNUP_OPEN_LEAD_HOURS)
            .expect("default window policy is valid")
    }
}

/// The sign-up open time, cutoff and cancellation deadline of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionWindows {
    pub open: DateTime<Utc>,
    pub cutoff: DateTime<Utc>,
    pub cancel_deadline: DateTime<Utc>,
}

impl SessionWindows {
    /// Sign-ups are accepted from `open` through `cutoff`, both inclusive.
    pub fn accepts_signup(&self, now: DateTime<Utc>) -> bool {
        self.open <= now && now <= self.cutoff
    }

    /// Cancellations are accepted up to and including the deadline.
    pub fn accepts_cancellation(&self, now: DateTime<Utc>) -> bool {
        now <= self.cancel_deadline
    }
}

/// Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Wednesday of the ISO week preceding the one containing `session_date`.
pub fn cutoff_date(session_date: NaiveDate) -> NaiveDate {
    week_start(session_date) - Duration::days(CUTOFF_DAYS_BEFORE_WEEK_START)
}

/// Computes the sign-up windows for a session held on `session_date`.
pub fn windows_for(session_date: NaiveDate, policy: &WindowPolicy) -> SessionWindows {
    let cutoff = policy.at_local_hour(cutoff_date(session_date), CUTOFF_HOUR);
    let cancel_deadline =
        policy.at_local_hour(session_date - Duration::days(1), CANCEL_DEADLINE_HOUR);

    SessionWindows {
        open: cutoff - policy.signup_open_lead(),
        cutoff,
        cancel_deadline,
    }
}
