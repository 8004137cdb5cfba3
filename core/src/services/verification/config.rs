//! Phone verification flow configuration

use std::time::Duration;

use crate::domain::entities::CODE_LENGTH;

/// Tunables for the phone verification flow
#[derive(Debug, Clone)]
pub struct VerificationConfig {
    /// Digits expected in a submitted code
    pub code_length: usize,
    /// Ceiling on how long the provider may take to accept a send request
    pub send_timeout_seconds: u64,
}

impl VerificationConfig {
    pub fn send_timeout(&self) -> Duration {
        Duration::from_secs(self.send_timeout_seconds)
    }
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_length: CODE_LENGTH,
            send_timeout_seconds: 60,
        }
    }
}
