//! Phone number utilities
//!
//! Helpers for the dialling codes CareLink ships with (Kenya first, then the
//! US, UK and India): composing a country code and subscriber digits into
//! E.164, format validation, and masking for log output.

use once_cell::sync::Lazy;
use regex::Regex;

/// Regular expression for valid E.164 format
/// E.164 format: + followed by a country code (no leading 0) and up to 15 digits total
static E164_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+[1-9]\d{6,14}$").unwrap()
});

/// Regular expression for Kenyan mobile numbers (without country code)
static KENYA_MOBILE_REGEX: Lazy<Regex> = Lazy::new(|| {
    // Kenyan mobile numbers are 9 digits starting with 7 or 1
    Regex::new(r"^[17]\d{8}$").unwrap()
});

/// Dialling codes selectable in the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountryCode {
    Kenya, // +254
    US,    // +1
    UK,    // +44
    India, // +91
}

impl CountryCode {
    /// All dialling codes offered by the phone entry screens, default first
    pub const ALL: [CountryCode; 4] = [
        CountryCode::Kenya,
        CountryCode::US,
        CountryCode::UK,
        CountryCode::India,
    ];

    /// Get the dialling code string
    pub fn as_str(&self) -> &'static str {
        match self {
            CountryCode::Kenya => "+254",
            CountryCode::US => "+1",
            CountryCode::UK => "+44",
            CountryCode::India => "+91",
        }
    }

    /// Parse a dialling code from the beginning of an E.164 number
    pub fn from_phone(phone: &str) -> Option<(Self, &str)> {
        if phone.starts_with("+254") {
            Some((CountryCode::Kenya, &phone[4..]))
        } else if phone.starts_with("+44") {
            Some((CountryCode::UK, &phone[3..]))
        } else if phone.starts_with("+91") {
            Some((CountryCode::India, &phone[3..]))
        } else if phone.starts_with("+1") {
            Some((CountryCode::US, &phone[2..]))
        } else {
            None
        }
    }
}

impl Default for CountryCode {
    fn default() -> Self {
        CountryCode::Kenya
    }
}

impl std::fmt::Display for CountryCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Remove common formatting characters from a phone number
pub fn normalize_phone_number(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Check if a phone number is in valid E.164 format
pub fn is_valid_phone_format(phone: &str) -> bool {
    E164_REGEX.is_match(phone)
}

/// Validate a Kenyan mobile number
///
/// Accepts the full E.164 form (+2547XXXXXXXX), the local form with a
/// leading 0 (07XXXXXXXX) and the bare subscriber digits (7XXXXXXXX).
pub fn is_valid_kenyan_mobile(phone: &str) -> bool {
    let normalized = normalize_phone_number(phone);
    if let Some(rest) = normalized.strip_prefix("+254") {
        KENYA_MOBILE_REGEX.is_match(rest)
    } else if normalized.starts_with('+') {
        false
    } else {
        let local = normalized.strip_prefix('0').unwrap_or(&normalized);
        KENYA_MOBILE_REGEX.is_match(local)
    }
}

/// Compose a dialling code and subscriber digits into an E.164 number
///
/// Strips formatting characters and a leading trunk 0 from the subscriber
/// part, then validates the combined number. Returns `None` when the result
/// is not plausible E.164.
pub fn compose_e164(country: CountryCode, subscriber: &str) -> Option<String> {
    let digits: String = subscriber.chars().filter(|c| c.is_ascii_digit()).collect();
    let digits = digits.strip_prefix('0').unwrap_or(&digits);
    if digits.is_empty() {
        return None;
    }
    let composed = format!("{}{}", country.as_str(), digits);
    if !is_valid_phone_format(&composed) {
        return None;
    }
    if country == CountryCode::Kenya && !KENYA_MOBILE_REGEX.is_match(digits) {
        return None;
    }
    Some(composed)
}

/// Mask a phone number for logging (show only the last 4 digits)
pub fn mask_phone(phone: &str) -> String {
    if phone.len() <= 4 {
        return "*".repeat(phone.len());
    }
    format!("***{}", &phone[phone.len() - 4..])
}
