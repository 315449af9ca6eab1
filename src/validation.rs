//! Credential checks run before anything is sent to the backend.

use regex::Regex;
use std::sync::OnceLock;

const SPECIAL_CHARS: &str = r#"!@#$%^&*()_+-=[]{};':"\|,.<>/?"#;

/// Something shaped like `name@domain.tld`, no whitespace.
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Please enter your email".to_string());
    }

    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

    if !re.is_match(email) {
        return Err("Please enter a valid email address".to_string());
    }
    Ok(())
}

/// Password rules:
/// 1. At least 8 characters
/// 2. An uppercase and a lowercase letter
/// 3. A digit
/// 4. One of the special characters in `SPECIAL_CHARS`
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Please enter your password".to_string());
    }
    if password.chars().count() < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err("Password must contain an uppercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err("Password must contain a lowercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain a digit".to_string());
    }
    if !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        return Err("Password must contain a special character".to_string());
    }
    Ok(())
}

/// Both fields are required; the new password is confirmed at the prompt.
pub fn validate_password_change(current: &str, new: &str) -> Result<(), String> {
    if current.is_empty() || new.is_empty() {
        return Err("Enter both your current and your new password".to_string());
    }
    Ok(())
}
