//! Phone verification flow
//!
//! Drives the OTP screen end to end: requesting a code, running the
//! resend countdown in a background task, exchanging a submitted code for
//! a credential and routing the verified user by their stored role.

mod config;
mod service;
mod types;

#[cfg(test)]
mod tests;

pub use config::VerificationConfig;
pub use service::PhoneVerificationController;
pub use types::VerificationOutcome;
