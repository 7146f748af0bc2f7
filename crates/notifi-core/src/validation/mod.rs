//! Input validation and display helpers.
//!
//! Validate user-supplied target values before they reach the API.

use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use validator::ValidateEmail;

/// Validation error types.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Input exceeds maximum allowed length.
    #[error("Input exceeds maximum length ({max} bytes, got {actual})")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
        /// Actual input length.
        actual: usize,
    },

    /// Not a syntactically valid email address.
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    /// Not an E.164 phone number.
    #[error("Invalid phone number: {0}")]
    InvalidPhoneNumber(String),

    /// Input is empty after trimming.
    #[error("{0} cannot be empty")]
    Empty(&'static str),
}

/// Size limits per input type.
pub mod limits {
    /// Maximum direct message length (64KB).
    pub const MAX_MESSAGE_LENGTH: usize = 64 * 1024;

    /// Maximum broadcast subject length.
    pub const MAX_SUBJECT_LENGTH: usize = 512;
}

/// Validate and sanitize message content before it is sent.
///
/// Performs:
/// 1. Length check
/// 2. Strip null bytes and control chars (except newlines/tabs)
/// 3. Unicode normalization (NFKC)
///
/// # Errors
///
/// Returns `ValidationError::TooLong` if input exceeds `max_len`.
pub fn validate_message_content(input: &str, max_len: usize) -> Result<String, ValidationError> {
    if input.len() > max_len {
        return Err(ValidationError::TooLong {
            max: max_len,
            actual: input.len(),
        });
    }

    let sanitized: String = input
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t' || *c == '\r')
        .collect();

    Ok(sanitized.nfkc().collect())
}

/// Validate an email address, returning it trimmed.
///
/// # Errors
///
/// Returns `ValidationError::InvalidEmail` for malformed addresses.
pub fn validate_email(input: &str) -> Result<String, ValidationError> {
    let email = input.trim();
    if email.validate_email() {
        Ok(email.to_string())
    } else {
        Err(ValidationError::InvalidEmail(input.to_string()))
    }
}

/// Validate an E.164 phone number (`+` followed by 8 to 15 digits).
///
/// Spaces, dashes and parentheses are dropped first.
///
/// # Errors
///
/// Returns `ValidationError::InvalidPhoneNumber` otherwise.
pub fn validate_phone_number(input: &str) -> Result<String, ValidationError> {
    let compact: String = input
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    let valid = compact
        .strip_prefix('+')
        .is_some_and(|digits| (8..=15).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit()));
    if valid {
        Ok(compact)
    } else {
        Err(ValidationError::InvalidPhoneNumber(input.to_string()))
    }
}

/// Whether an optional string has content.
#[must_use]
pub fn not_null_or_empty(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

/// Shorten a long address to `first...last`.
///
/// Strings shorter than 11 characters are returned unchanged. An `index`
/// of 0 means the default of 6.
#[must_use]
pub fn address_ellipsis(value: &str, index: usize) -> String {
    let index = if index == 0 { 6 } else { index };
    let chars: Vec<char> = value.chars().collect();
    if chars.len() < 11 || chars.len() <= index.saturating_mul(2) {
        return value.to_string();
    }
    let head: String = chars[..index].iter().collect();
    let tail: String = chars[chars.len() - index..].iter().collect();
    format!("{head}...{tail}")
}

/// Telegram handle as the API expects it, without a leading `@`.
#[must_use]
pub fn format_telegram_for_subscription(telegram_id: &str) -> String {
    telegram_id.strip_prefix('@').unwrap_or(telegram_id).to_string()
}

/// Telegram handle for display, with a leading `@`.
#[must_use]
pub fn prefix_telegram_with_symbol(telegram_id: &str) -> String {
    if telegram_id.starts_with('@') {
        telegram_id.to_string()
    } else {
        format!("@{telegram_id}")
    }
}

/// Lowercase hex with a `0x` prefix.
#[must_use]
pub fn normalize_hex_string(input: &str) -> String {
    let lower = input.trim().to_ascii_lowercase();
    if lower.starts_with("0x") {
        lower
    } else {
        format!("0x{lower}")
    }
}

/// Human-readable message for any error.
#[must_use]
pub fn error_message_key(err: Option<&dyn std::error::Error>) -> String {
    err.map_or_else(|| "unknown error".to_string(), ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_length_check() {
        let long_input = "a".repeat(1000);
        let result = validate_message_content(&long_input, 100);
        assert!(matches!(result, Err(ValidationError::TooLong { .. })));
    }

    #[test]
    fn test_message_strips_control_chars() {
        let input = "hello\x00world\x07!\nnext";
        let result = validate_message_content(input, 1000).unwrap();
        assert_eq!(result, "helloworld!\nnext");
    }

    #[test]
    fn test_message_unicode_normalization() {
        let result = validate_message_content("ﬁ", 1000).unwrap();
        assert_eq!(result, "fi");
    }

    #[test]
    fn test_validate_email() {
        assert_eq!(validate_email(" user@example.com ").unwrap(), "user@example.com");
        assert!(validate_email("not-an-email").is_err());
    }

    #[test]
    fn test_validate_phone_number() {
        assert_eq!(validate_phone_number("+1 (555) 123-4567").unwrap(), "+15551234567");
        assert!(validate_phone_number("5551234567").is_err());
        assert!(validate_phone_number("+1abc").is_err());
    }

    #[test]
    fn test_address_ellipsis() {
        assert_eq!(address_ellipsis("0x12345", 6), "0x12345");
        assert_eq!(
            address_ellipsis("0x1234567890abcdef", 6),
            "0x1234...abcdef"
        );
    }

    #[test]
    fn test_address_ellipsis_zero_and_huge_index() {
        assert_eq!(address_ellipsis("0x1234567890abcdef", 0), "0x1234...abcdef");
        assert_eq!(
            address_ellipsis("0x1234567890abcdef", usize::MAX),
            "0x1234567890abcdef"
        );
    }

    #[test]
    fn test_telegram_helpers() {
        assert_eq!(format_telegram_for_subscription("@notifi"), "notifi");
        assert_eq!(format_telegram_for_subscription("notifi"), "notifi");
        assert_eq!(prefix_telegram_with_symbol("notifi"), "@notifi");
        assert_eq!(prefix_telegram_with_symbol("@notifi"), "@notifi");
    }

    #[test]
    fn test_normalize_hex_string() {
        assert_eq!(normalize_hex_string("ABCDEF"), "0xabcdef");
        assert_eq!(normalize_hex_string("0xAB"), "0xab");
    }

    #[test]
    fn test_not_null_or_empty() {
        assert!(not_null_or_empty(Some("admin")));
        assert!(!not_null_or_empty(Some("")));
        assert!(!not_null_or_empty(None));
    }

    #[test]
    fn test_error_message_key() {
        let err = ValidationError::Empty("name");
        assert_eq!(error_message_key(Some(&err)), "name cannot be empty");
        assert_eq!(error_message_key(None), "unknown error");
    }
}
