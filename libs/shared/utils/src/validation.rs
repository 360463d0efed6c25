//! Input checks shared by the record handlers.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email pattern")
});

static PHONE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?[0-9][0-9\s\-\.\(\)]{5,19}$").expect("valid phone pattern")
});

pub fn validate_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email) && email.len() <= 254
}

pub fn validate_phone(phone: &str) -> bool {
    PHONE_REGEX.is_match(phone)
}

/// Reject blank required text fields.
pub fn require_text(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required", field));
    }
    Ok(())
}

/// Name, phone and email checks used by every person record.
pub fn validate_contact(name: &str, phone: &str, email: &str) -> Result<(), String> {
    require_text("name", name)?;
    if !validate_phone(phone) {
        return Err(format!("Invalid phone number: {}", phone));
    }
    if !validate_email(email) {
        return Err(format!("Invalid email address: {}", email));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn accepts_common_formats() {
        assert!(validate_email("grey@clinic.test"));
        assert!(validate_phone("555-0100"));
        assert!(validate_phone("+1 (312) 555-0100"));
    }

    #[test]
    fn rejects_malformed_contact_details() {
        assert!(!validate_email("not-an-email"));
        assert!(!validate_phone("call me"));
        assert_matches!(validate_contact("", "555-0100", "a@b.io"), Err(msg) if msg.contains("name"));
        assert_matches!(validate_contact("Ann", "555-0100", "a@b"), Err(msg) if msg.contains("email"));
        assert_matches!(validate_contact("Ann", "555-0100", "a@b.io"), Ok(()));
    }
}
