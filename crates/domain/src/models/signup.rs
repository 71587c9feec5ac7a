//! Sign-up domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use super::session::SessionSummary;

/// Status of a sign-up within a session's roster.
///
/// `Confirmed` and `Waitlisted` are active; `Cancelled` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignupStatus {
    Confirmed,
    Waitlisted,
    Cancelled,
}

impl SignupStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignupStatus::Confirmed => "confirmed",
            SignupStatus::Waitlisted => "waitlisted",
            SignupStatus::Cancelled => "cancelled",
        }
    }

    /// Returns true for statuses that hold a place on the roster.
    pub fn is_active(&self) -> bool {
        !matches!(self, SignupStatus::Cancelled)
    }
}

impl FromStr for SignupStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "confirmed" => Ok(SignupStatus::Confirmed),
            "waitlisted" | "waitlist" => Ok(SignupStatus::Waitlisted),
            "cancelled" => Ok(SignupStatus::Cancelled),
            _ => Err(format!("Invalid signup status: {}", s)),
        }
    }
}

impl fmt::Display for SignupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A club member as referenced from a sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MemberRef {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// The person holding a sign-up: a member, or a guest sponsored by one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Participant {
    Member { member: MemberRef },
    Guest { name: String, sponsor: MemberRef },
}

/// Identity used to reject duplicate active sign-ups within a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParticipantKey {
    pub member_id: Uuid,
    pub guest_name: Option<String>,
}

impl Participant {
    pub fn member(member: MemberRef) -> Self {
        Participant::Member { member }
    }

    pub fn guest(name: impl Into<String>, sponsor: MemberRef) -> Self {
        Participant::Guest {
            name: name.into(),
            sponsor,
        }
    }

    /// The member who registered: the member themself, or a guest's sponsor.
    pub fn registrant(&self) -> &MemberRef {
        match self {
            Participant::Member { member } => member,
            Participant::Guest { sponsor, .. } => sponsor,
        }
    }

    pub fn guest_name(&self) -> Option<&str> {
        match self {
            Participant::Member { .. } => None,
            Participant::Guest { name, .. } => Some(name),
        }
    }

    /// Guest names compare case-insensitively under the same sponsor.
    pub fn key(&self) -> ParticipantKey {
        ParticipantKey {
            member_id: self.registrant().id,
            guest_name: self.guest_name().map(|n| n.to_lowercase()),
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            Participant::Member { member } => member.name.clone(),
            Participant::Guest { name, sponsor } => format!("{} (guest of {})", name, sponsor.name),
        }
    }
}

/// One person's registration for a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Signup {
    pub id: Uuid,
    pub session_id: Uuid,
    pub participant: Participant,
    pub status: SignupStatus,
    pub created_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Signup {
    pub fn new(
        session_id: Uuid,
        participant: Participant,
        status: SignupStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id,
            participant,
            status,
            created_at,
            cancelled_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// Request to sign up for a session.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct SignupRequest {
    pub event_id: Uuid,

    #[validate(custom(function = "shared::validation::validate_person_name"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    #[validate(length(max = 120, message = "Email cannot exceed 120 characters"))]
    pub email: String,

    /// When present, the sign-up is for this guest, sponsored by the member.
    #[validate(custom(function = "shared::validation::validate_guest_name"))]
    pub guest_name: Option<String>,
}

/// Response after a successful sign-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SignupResponse {
    pub message: String,
    pub status: SignupStatus,
    pub signup_id: Uuid,
}

/// Response after a cancellation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CancelResponse {
    pub message: String,
    pub status: SignupStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promoted_signup_id: Option<Uuid>,
}

/// One row of a session roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PlayerEntry {
    pub signup_id: Uuid,
    pub name: String,
    pub email: String,
    pub guest_name: Option<String>,
    pub signup_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl From<&Signup> for PlayerEntry {
    fn from(signup: &Signup) -> Self {
        let registrant = signup.participant.registrant();
        Self {
            signup_id: signup.id,
            name: registrant.name.clone(),
            email: registrant.email.clone(),
            guest_name: signup.participant.guest_name().map(str::to_string),
            signup_date: signup.created_at,
            cancelled_at: signup.cancelled_at,
        }
    }
}

/// Full roster of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RosterResponse {
    pub event: SessionSummary,
    pub confirmed_players: Vec<PlayerEntry>,
    pub waitlist_players: Vec<PlayerEntry>,
    pub cancelled_players: Vec<PlayerEntry>,
    pub total_signups: usize,
    pub total_waitlist: usize,
    pub total_cancelled: usize,
}

/// A member's active sign-up together with its session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MemberSignup {
    pub id: Uuid,
    pub event_id: Uuid,
    pub status: SignupStatus,
    pub guest_name: Option<String>,
    pub signup_date: DateTime<Utc>,
    pub event: SessionSummary,
}

/// Response listing a member's active sign-ups.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MemberSignupsResponse {
    pub signups: Vec<MemberSignup>,
}
