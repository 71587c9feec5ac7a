//! Rolling two-week session calendar.
//!
//! Sessions are held on Mondays, Wednesdays and Fridays. The calendar always
//! shows two ISO weeks; it rolls forward to the following week once club-local
//! time reaches Friday 18:00.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::Serialize;

use super::time_window::{week_start, windows_for, WindowPolicy};
use crate::models::NewSession;

/// Weekdays on which sessions are held.
pub const SESSION_WEEKDAYS: [Weekday; 3] = [Weekday::Mon, Weekday::Wed, Weekday::Fri];

/// Local hour on Friday at which the calendar advances by a week.
pub const ROLLOVER_HOUR: i64 = 18;

/// First and last day (Monday to Sunday) of a calendar week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekBounds {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekBounds {
    fn starting(start: NaiveDate) -> Self {
        Self {
            start,
            end: start + Duration::days(6),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Session dates of this week, in order.
    pub fn session_dates(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        SESSION_WEEKDAYS
            .into_iter()
            .map(move |day| start + Duration::days(i64::from(day.num_days_from_monday())))
    }
}

/// The two weeks currently offered for sign-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollingWeeks {
    first_week_start: NaiveDate,
}

impl RollingWeeks {
    /// Calendar whose first week contains `date`.
    pub fn starting(date: NaiveDate) -> Self {
        Self {
            first_week_start: week_start(date),
        }
    }

    /// Calendar shown at club-local time `local_now`, after applying the
    /// Friday 18:00 rollover.
    pub fn at(local_now: NaiveDateTime) -> Self {
        let current = week_start(local_now.date());
        let rollover = (current + Duration::days(i64::from(Weekday::Fri.num_days_from_monday())))
            .and_time(NaiveTime::MIN)
            + Duration::hours(ROLLOVER_HOUR);

        if local_now >= rollover {
            Self {
                first_week_start: current + Duration::days(7),
            }
        } else {
            Self {
                first_week_start: current,
            }
        }
    }

    pub fn week1(&self) -> WeekBounds {
        WeekBounds::starting(self.first_week_start)
    }

    pub fn week2(&self) -> WeekBounds {
        WeekBounds::starting(self.first_week_start + Duration::days(7))
    }

    /// Bounds of week `offset`; only 0 and 1 exist.
    pub fn week(&self, offset: u32) -> Option<WeekBounds> {
        match offset {
            0 => Some(self.week1()),
            1 => Some(self.week2()),
            _ => None,
        }
    }

    /// Every session date in both weeks.
    pub fn all_session_dates(&self) -> Vec<NaiveDate> {
        self.week1()
            .session_dates()
            .chain(self.week2().session_dates())
            .collect()
    }

    /// Session dates in both weeks that are not before `today`.
    pub fn session_dates(&self, today: NaiveDate) -> Vec<NaiveDate> {
        self.all_session_dates()
            .into_iter()
            .filter(|date| *date >= today)
            .collect()
    }
}

/// The current week's remaining session dates followed by next week's.
pub fn rolling_session_dates(today: NaiveDate) -> Vec<NaiveDate> {
    RollingWeeks::starting(today).session_dates(today)
}

/// Sessions to materialize for `dates`, with windows derived from `policy`.
pub fn plan_sessions(dates: &[NaiveDate], capacity: i32, policy: &WindowPolicy) -> Vec<NewSession> {
    dates
        .iter()
        .filter(|date| SESSION_WEEKDAYS.contains(&date.weekday()))
        .map(|date| NewSession {
            date: *date,
            capacity,
            windows: windows_for(*date, policy),
        })
        .collect()
}
