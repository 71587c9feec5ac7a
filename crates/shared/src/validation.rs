//! Common validation and normalization utilities.

use validator::ValidationError;

/// Maximum length of a member or guest name, in characters.
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum length of an email address, in characters.
pub const MAX_EMAIL_LENGTH: usize = 120;

/// Normalizes an email address for lookups and storage.
///
/// Emails are compared case-insensitively, so they are trimmed and lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Normalizes a display name by trimming and collapsing inner whitespace.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Validates that a string is not empty after trimming.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value cannot be empty".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Validates a member or guest name.
///
/// The name must contain at least one non-whitespace character and be at most
/// [`MAX_NAME_LENGTH`] characters once normalized.
pub fn validate_person_name(name: &str) -> Result<(), ValidationError> {
    let normalized = normalize_name(name);
    if normalized.is_empty() {
        let mut err = ValidationError::new("name_blank");
        err.message = Some("Name cannot be empty".into());
        return Err(err);
    }
    if normalized.chars().count() > MAX_NAME_LENGTH {
        let mut err = ValidationError::new("name_length");
        err.message = Some(format!("Name cannot exceed {} characters", MAX_NAME_LENGTH).into());
        return Err(err);
    }
    Ok(())
}

/// Validates an optional guest name; `None` and blank strings are accepted
/// and treated as "no guest" by callers.
pub fn validate_guest_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Ok(());
    }
    validate_person_name(name)
}

/// Returns `Some(normalized)` for a non-blank optional name.
pub fn non_blank_name(name: Option<&str>) -> Option<String> {
    name.map(normalize_name).filter(|n| !n.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
        assert_eq!(normalize_email("bob@example.com"), "bob@example.com");
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Tiger   Woods "), "Tiger Woods");
        assert_eq!(normalize_name("Annika"), "Annika");
        assert_eq!(normalize_name("   "), "");
    }

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("x").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank(" \t ").is_err());
    }

    #[test]
    fn test_validate_person_name() {
        assert!(validate_person_name("Jack Nicklaus").is_ok());
        assert!(validate_person_name("  ").is_err());
        assert!(validate_person_name(&"a".repeat(MAX_NAME_LENGTH)).is_ok());
        assert!(validate_person_name(&"a".repeat(MAX_NAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_validate_person_name_error_message() {
        let err = validate_person_name("").unwrap_err();
        assert_eq!(err.message.unwrap().to_string(), "Name cannot be empty");
    }

    #[test]
    fn test_validate_guest_name_allows_blank() {
        assert!(validate_guest_name("").is_ok());
        assert!(validate_guest_name("   ").is_ok());
        assert!(validate_guest_name("Guest Player").is_ok());
        assert!(validate_guest_name(&"g".repeat(MAX_NAME_LENGTH + 5)).is_err());
    }

    #[test]
    fn test_non_blank_name() {
        assert_eq!(non_blank_name(None), None);
        assert_eq!(non_blank_name(Some("  ")), None);
        assert_eq!(non_blank_name(Some(" Sam  Snead ")), Some("Sam Snead".to_string()));
    }
}
