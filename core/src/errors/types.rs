//! Error type definitions for the authentication and account flows
//!
//! Provider and store errors are what the external-service traits return;
//! the flow services map them into `AuthError`/`ValidationError` and attach
//! the user-facing messages the screens display.

use thiserror::Error;

use crate::domain::entities::UserRole;

/// Failures reported by the hosted identity provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The credential (code or email/password pair) was rejected
    #[error("invalid credential")]
    InvalidCredential,

    /// An account already exists for the address being registered
    #[error("account already exists")]
    AccountExists,

    /// The provider answered with an error we do not special-case
    #[error("provider error: {message}")]
    Service { message: String },

    /// The provider could not be reached
    #[error("network error: {message}")]
    Network { message: String },
}

/// Failures reported by the hosted document store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("document store unavailable: {message}")]
    Unavailable { message: String },

    /// The stored document could not be decoded into a user record
    #[error("malformed user record: {message}")]
    Malformed { message: String },
}

/// Authentication flow errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// A provider request failed for reasons other than a bad credential
    #[error("verification request failed: {message}")]
    ProviderRequest { message: String },

    /// The submitted one-time code was rejected
    #[error("invalid verification code")]
    InvalidCode,

    /// The email/password pair was rejected
    #[error("invalid email or password")]
    InvalidCredentials,

    /// No live verification id to exchange a code against
    #[error("no active verification session")]
    MissingSession,

    /// Email verification polling gave up
    #[error("email verification timed out after {attempts} attempts")]
    VerificationTimeout { attempts: u32 },

    /// Registration hit an existing account
    #[error("account already exists")]
    AccountExists,

    /// The signed-in user does not hold the role this screen requires
    #[error("role mismatch: expected {expected}")]
    RoleMismatch { expected: UserRole },

    /// Resend requested while the countdown is still running
    #[error("resend unavailable for another {remaining} seconds")]
    ResendUnavailable { remaining: u32 },
}

impl AuthError {
    /// The transient message a screen should display for this error
    pub fn user_message(&self) -> String {
        match self {
            AuthError::ProviderRequest { .. } => {
                String::from("Verification request failed. Please try again.")
            }
            AuthError::InvalidCode => String::from("Invalid OTP. Please try again."),
            AuthError::InvalidCredentials => String::from("Invalid email or password."),
            AuthError::MissingSession => {
                String::from("Verification ID is missing. Please request a new OTP.")
            }
            AuthError::VerificationTimeout { .. } => {
                String::from("Verification timed out. Please try again later.")
            }
            AuthError::AccountExists => {
                String::from("This email is already registered. Please log in instead.")
            }
            AuthError::RoleMismatch { expected } => {
                format!("You do not have access as a {}", expected)
            }
            AuthError::ResendUnavailable { remaining } => {
                format!("Please wait {} seconds before requesting a new code.", remaining)
            }
        }
    }
}

/// Input validation errors raised before any provider call
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("phone number must not be blank")]
    BlankPhoneNumber,

    #[error("verification code must be exactly {expected} digits")]
    MalformedCode { expected: usize },

    #[error("email and password are required")]
    MissingFields,

    #[error("email address is not valid")]
    InvalidEmail,

    #[error("password and confirmation differ")]
    PasswordMismatch,
}

impl ValidationError {
    /// The transient message a screen should display for this error
    pub fn user_message(&self) -> &'static str {
        match self {
            ValidationError::BlankPhoneNumber => "Please enter a valid phone number",
            ValidationError::MalformedCode { .. } => "Please enter a valid OTP",
            ValidationError::MissingFields => "Please fill in all fields",
            ValidationError::InvalidEmail => "Please enter a valid email",
            ValidationError::PasswordMismatch => "Passwords do not match",
        }
    }
}
