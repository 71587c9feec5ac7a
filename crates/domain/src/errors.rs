//! Domain error types.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// Errors returned by the sign-up engine and roster.
///
/// All variants except `CapacityInvariantViolation` and `Store` are business
/// rule rejections that the caller reports back to the member.
#[derive(Debug, Error)]
pub enum SignupError {
    #[error("Sign-up for session {session_id} is closed (open {open}, cutoff {cutoff})")]
    SignupClosed {
        session_id: Uuid,
        open: DateTime<Utc>,
        cutoff: DateTime<Utc>,
    },

    #[error("Cancellation deadline {deadline} has passed")]
    CancellationClosed { deadline: DateTime<Utc> },

    #[error("Already signed up for this session")]
    DuplicateSignup,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Session {session_id} has {confirmed} confirmed players, capacity is {capacity}")]
    CapacityInvariantViolation {
        session_id: Uuid,
        confirmed: usize,
        capacity: usize,
    },

    #[error(transparent)]
    Store(StoreError),
}

impl SignupError {
    /// Stable reason code reported to callers.
    pub fn code(&self) -> &'static str {
        match self {
            SignupError::SignupClosed { .. } => "signup_closed",
            SignupError::CancellationClosed { .. } => "cancellation_closed",
            SignupError::DuplicateSignup => "duplicate_signup",
            SignupError::NotFound(_) => "not_found",
            SignupError::CapacityInvariantViolation { .. } => "capacity_invariant_violation",
            SignupError::Store(_) => "store_error",
        }
    }
}

/// Errors raised by session and member stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Saving would leave more confirmed sign-ups than the session allows.
    #[error("Session {session_id} would exceed capacity ({confirmed} > {capacity})")]
    CapacityExceeded {
        session_id: Uuid,
        confirmed: usize,
        capacity: usize,
    },

    /// Stored data could not be mapped to a domain value.
    #[error("Corrupt record: {0}")]
    Corrupt(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<StoreError> for SignupError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => SignupError::DuplicateSignup,
            StoreError::CapacityExceeded {
                session_id,
                confirmed,
                capacity,
            } => SignupError::CapacityInvariantViolation {
                session_id,
                confirmed,
                capacity,
            },
            other => SignupError::Store(other),
        }
    }
}
