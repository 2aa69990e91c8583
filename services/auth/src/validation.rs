//! Input validation for registration

use regex::Regex;
use std::sync::OnceLock;

use crate::models::CreateUser;

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username is required".to_string());
    }

    if username.len() < 3 {
        return Err("Username must be at least 3 characters long".to_string());
    }

    if username.len() > 32 {
        return Err("Username must be at most 32 characters long".to_string());
    }

    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9_.-]+$").expect("Failed to compile username regex"));

    if !regex.is_match(username) {
        return Err(
            "Username can only contain letters, numbers, dots, dashes and underscores".to_string(),
        );
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate password length
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.chars().count() < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }

    if password.chars().count() > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    Ok(())
}

fn validate_name(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required", field));
    }

    if value.chars().count() > 100 {
        return Err(format!("{} must be at most 100 characters long", field));
    }

    Ok(())
}

/// Validate a whole registration payload, reporting the first problem found
pub fn validate_registration(request: &CreateUser) -> Result<(), String> {
    validate_username(&request.username)?;
    if let Some(email) = request.email.as_deref() {
        validate_email(email)?;
    }
    validate_name("First name", &request.first_name)?;
    validate_name("Last name", &request.last_name)?;
    validate_password(&request.password)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usernames() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("a.b-c_d").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("ab").is_err());
        assert!(validate_username(&"x".repeat(33)).is_err());
        assert!(validate_username("alice smith").is_err());
        assert!(validate_username("alice@home").is_err());
    }

    #[test]
    fn test_emails() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email("alice@example").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email(&format!("{}@example.com", "a".repeat(250))).is_err());
    }

    #[test]
    fn test_passwords() {
        assert!(validate_password("hunter2!").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password("").is_err());
        assert!(validate_password(&"p".repeat(129)).is_err());
    }

    #[test]
    fn test_registration_reports_first_error() {
        let request = CreateUser {
            username: "alice".into(),
            email: None,
            first_name: " ".into(),
            last_name: "".into(),
            password: "short".into(),
        };

        assert_eq!(
            validate_registration(&request).unwrap_err(),
            "First name is required"
        );
    }
}
