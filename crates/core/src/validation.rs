//! Boundary format rules for request payloads.
//!
//! These run before any collaborator is consulted. Identifier formats are
//! enforced by typing ids as UUIDs; the helpers here cover the free-text
//! fields.

use validator::{ValidateEmail, ValidationError};

use crate::error::CoreError;

/// Minimum length of a session secret.
pub const MIN_SECRET_LENGTH: usize = 6;
/// Maximum length of a session secret.
pub const MAX_SECRET_LENGTH: usize = 64;
/// Maximum length of a ticket question (characters, after trimming).
pub const MAX_QUESTION_LENGTH: usize = 2000;

/// Normalize an email for storage and lookup: trimmed and lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Whether `email` is a syntactically valid address.
pub fn is_valid_email(email: &str) -> bool {
    let trimmed = email.trim();
    !trimmed.is_empty() && trimmed.validate_email()
}

/// Whether `secret` has the shared-secret format (ASCII alphanumeric).
pub fn is_valid_secret(secret: &str) -> bool {
    (MIN_SECRET_LENGTH..=MAX_SECRET_LENGTH).contains(&secret.len())
        && secret.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Whether `number` is a plausible phone number: 7-15 digits with an
/// optional leading `+`.
pub fn is_valid_phone_number(number: &str) -> bool {
    let digits = number.strip_prefix('+').unwrap_or(number);
    (7..=15).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Trim a question, mapping blank input to `None`.
pub fn normalize_question(question: Option<&str>) -> Option<String> {
    question
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_string)
}

/// Validate a list of student emails: non-empty and each well-formed.
pub fn validate_student_emails(emails: &[String]) -> Result<(), CoreError> {
    if emails.is_empty() {
        return Err(CoreError::Validation(
            "studentEmails must contain at least one address".into(),
        ));
    }
    if let Some(bad) = emails.iter().find(|e| !is_valid_email(e)) {
        return Err(CoreError::Validation(format!(
            "'{bad}' is not a valid email address"
        )));
    }
    Ok(())
}

/// Build a `validator` error carrying a code and message.
pub(crate) fn field_error(code: &'static str, message: String) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}
