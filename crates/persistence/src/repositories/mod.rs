//! Repository implementations for database operations.

pub mod member;
pub mod session;
pub mod signup;

pub use member::MemberRepository;
pub use session::{SessionInput, SessionRepository};
pub use signup::{SaveOutcome, SignupRepository, SignupWrite};
