//! Sign-up entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{MemberRef, Participant, Signup, SignupStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for signup_status that maps to PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "signup_status", rename_all = "lowercase")]
pub enum SignupStatusDb {
    Confirmed,
    Waitlisted,
    Cancelled,
}

impl From<SignupStatusDb> for SignupStatus {
    fn from(db_status: SignupStatusDb) -> Self {
        match db_status {
            SignupStatusDb::Confirmed => SignupStatus::Confirmed,
            SignupStatusDb::Waitlisted => SignupStatus::Waitlisted,
            SignupStatusDb::Cancelled => SignupStatus::Cancelled,
        }
    }
}

impl From<SignupStatus> for SignupStatusDb {
    fn from(status: SignupStatus) -> Self {
        match status {
            SignupStatus::Confirmed => SignupStatusDb::Confirmed,
            SignupStatus::Waitlisted => SignupStatusDb::Waitlisted,
            SignupStatus::Cancelled => SignupStatusDb::Cancelled,
        }
    }
}

/// Sign-up row joined with the registering member.
#[derive(Debug, Clone, FromRow)]
pub struct SignupEntity {
    pub id: Uuid,
    pub session_id: Uuid,
    pub member_id: Uuid,
    pub member_name: String,
    pub member_email: String,
    pub guest_name: Option<String>,
    pub status: SignupStatusDb,
    pub created_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl From<SignupEntity> for Signup {
    fn from(entity: SignupEntity) -> Self {
        let member = MemberRef {
            id: entity.member_id,
            name: entity.member_name,
            email: entity.member_email,
        };
        let participant = match entity.guest_name {
            Some(name) => Participant::guest(name, member),
            None => Participant::member(member),
        };
        Self {
            id: entity.id,
            session_id: entity.session_id,
            participant,
            status: entity.status.into(),
            created_at: entity.created_at,
            cancelled_at: entity.cancelled_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(guest_name: Option<&str>) -> SignupEntity {
        SignupEntity {
            id: Uuid::new_v4(),
            session_id: Uuid::new_v4(),
            member_id: Uuid::new_v4(),
            member_name: "Walter Hagen".to_string(),
            member_email: "walter@example.com".to_string(),
            guest_name: guest_name.map(String::from),
            status: SignupStatusDb::Waitlisted,
            created_at: Utc::now(),
            cancelled_at: None,
        }
    }

    #[test]
    fn test_status_conversions() {
        for status in [
            SignupStatus::Confirmed,
            SignupStatus::Waitlisted,
            SignupStatus::Cancelled,
        ] {
            assert_eq!(SignupStatus::from(SignupStatusDb::from(status)), status);
        }
    }

    #[test]
    fn test_member_signup_to_domain() {
        let row = entity(None);
        let member_id = row.member_id;
        let signup: Signup = row.into();
        assert_eq!(signup.status, SignupStatus::Waitlisted);
        assert_eq!(signup.participant.registrant().id, member_id);
        assert!(signup.participant.guest_name().is_none());
    }

    #[test]
    fn test_guest_signup_to_domain() {
        let signup: Signup = entity(Some("Bobby Jones")).into();
        assert_eq!(signup.participant.guest_name(), Some("Bobby Jones"));
        assert_eq!(signup.participant.registrant().email, "walter@example.com");
    }
}
