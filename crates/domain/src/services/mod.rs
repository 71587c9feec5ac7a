//! Domain services for golf session sign-ups.
//!
//! Services contain business logic that operates on domain models.

pub mod calendar;
pub mod clock;
pub mod engine;
pub mod locks;
pub mod memory;
pub mod notification;
pub mod roster;
pub mod store;
pub mod time_window;

pub use calendar::{plan_sessions, rolling_session_dates, RollingWeeks, WeekBounds};
pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::{CancelOutcome, EngineSettings, RollingSchedule, SignupEngine};
pub use locks::SessionLocks;
pub use memory::InMemoryStore;
pub use notification::{LogNotifier, RecordingNotifier, SignupEvent, SignupEventKind, SignupNotifier};
pub use roster::{Removal, Roster, RosterView};
pub use store::{EnsuredSessions, MemberStore, SessionStore};
pub use time_window::{windows_for, SessionWindows, WindowPolicy};
