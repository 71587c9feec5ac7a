//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod member;
pub mod session;
pub mod signup;

pub use member::MemberEntity;
pub use session::SessionEntity;
pub use signup::{SignupEntity, SignupStatusDb};
