//! Common validation utilities

/// Field-level validation functions used by the account flows
pub mod validators {
    use once_cell::sync::Lazy;
    use regex::Regex;

    /// Permissive email shape check: something@something.something
    static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap()
    });

    /// Check if a string is not empty after trimming
    pub fn not_empty(value: &str) -> bool {
        !value.trim().is_empty()
    }

    /// Check if a string length is within bounds
    pub fn length_between(value: &str, min: usize, max: usize) -> bool {
        let len = value.len();
        len >= min && len <= max
    }

    /// Check if an email address looks valid
    ///
    /// This is a shape check only; the identity provider is the authority on
    /// whether an address is deliverable.
    pub fn is_valid_email(email: &str) -> bool {
        EMAIL_REGEX.is_match(email.trim())
    }

    /// Check if a string is exactly `len` ASCII digits
    pub fn is_digit_string(value: &str, len: usize) -> bool {
        value.len() == len && value.chars().all(|c| c.is_ascii_digit())
    }
}

#[cfg(test)]
mod tests {
    use super::validators::*;

    #[test]
    fn test_not_empty() {
        assert!(not_empty("doctor"));
        assert!(!not_empty(""));
        assert!(!not_empty("   "));
    }

    #[test]
    fn test_length_between() {
        assert!(length_between("123456", 6, 6));
        assert!(!length_between("12345", 6, 6));
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("amina@example.com"));
        assert!(is_valid_email("dr.otieno@clinic.co.ke"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email("two words@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_is_digit_string() {
        assert!(is_digit_string("123456", 6));
        assert!(!is_digit_string("12345", 6));
        assert!(!is_digit_string("1234567", 6));
        assert!(!is_digit_string("12a456", 6));
        assert!(!is_digit_string("", 6));
    }
}
