//! Club member domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::signup::MemberRef;

/// A club member, identified by a unique lower-cased email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Member {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl Member {
    pub fn to_ref(&self) -> MemberRef {
        MemberRef {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Request to register a member.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateMemberRequest {
    #[validate(custom(function = "shared::validation::validate_person_name"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    #[validate(length(max = 120, message = "Email cannot exceed 120 characters"))]
    pub email: String,
}

/// Response listing members.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ListMembersResponse {
    pub data: Vec<Member>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_to_ref() {
        let member = Member {
            id: Uuid::new_v4(),
            name: "Babe Zaharias".to_string(),
            email: "babe@example.com".to_string(),
            created_at: Utc::now(),
        };
        let r = member.to_ref();
        assert_eq!(r.id, member.id);
        assert_eq!(r.name, member.name);
        assert_eq!(r.email, member.email);
    }

    #[test]
    fn test_create_member_request_validation() {
        let valid = CreateMemberRequest {
            name: "Gene Sarazen".to_string(),
            email: "gene@example.com".to_string(),
        };
        assert!(valid.validate().is_ok());

        let invalid = CreateMemberRequest {
            name: String::new(),
            email: "gene".to_string(),
        };
        let errors = invalid.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_generated_members_validate() {
        use fake::faker::internet::en::SafeEmail;
        use fake::faker::name::en::Name;
        use fake::Fake;

        for _ in 0..20 {
            let request = CreateMemberRequest {
                name: Name().fake(),
                email: SafeEmail().fake(),
            };
            assert!(request.validate().is_ok(), "{:?}", request);
        }
    }
}
