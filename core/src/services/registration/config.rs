//! Registration flow configuration

use std::time::Duration;

/// Tunables for the email verification polling loop
///
/// Defaults check ten times at thirty second intervals. The first check
/// fires immediately, so the user gets four and a half minutes to click
/// the link before the flow gives up.
#[derive(Debug, Clone)]
pub struct EmailVerificationConfig {
    /// How many times the identity is reloaded before giving up
    pub max_poll_attempts: u32,
    /// Seconds between reloads
    pub poll_interval_seconds: u64,
}

impl EmailVerificationConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }
}

impl Default for EmailVerificationConfig {
    fn default() -> Self {
        Self {
            max_poll_attempts: 10,
            poll_interval_seconds: 30,
        }
    }
}
