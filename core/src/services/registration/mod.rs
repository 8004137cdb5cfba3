//! Account creation and email verification flow

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::EmailVerificationConfig;
pub use service::{EmailRegistrationFlow, RegistrationOutcome};
