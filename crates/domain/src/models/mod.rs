//! Domain models for golf session sign-ups.

pub mod member;
pub mod session;
pub mod signup;

pub use member::Member;
pub use session::{NewSession, RosterCounts, Session, SessionSummary, SessionWithRoster};
pub use signup::{MemberRef, Participant, ParticipantKey, Signup, SignupStatus};
