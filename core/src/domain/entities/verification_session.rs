//! Phone verification session entity
//!
//! One `VerificationSession` backs one phone verification screen. It owns
//! everything the screen needs to track between provider calls: the opaque
//! verification id, the resend token, the countdown and the attempt state.
//! All of this is instance state; nothing about a verification attempt is
//! kept in process-wide variables.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Seconds a delivered code stays usable before the user must resend
pub const COUNTDOWN_SECONDS: u32 = 60;

/// Exact number of digits in a delivered verification code
pub const CODE_LENGTH: usize = 6;

/// Lifecycle of a verification attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// No code has been requested yet
    Idle,
    /// A code is on its way to the phone and the countdown is running
    Sent,
    /// A submitted code is being exchanged with the provider
    Verifying,
    /// The provider accepted a code; the session is complete
    Verified,
    /// The send request itself failed; a fresh request is needed
    Failed,
    /// The countdown ran out; only resend can revive the session
    Expired,
}

/// State for one phone verification screen instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationSession {
    /// Number the code was requested for
    pub phone_number: String,

    /// Opaque provider handle required to exchange a code for a credential
    pub verification_id: Option<String>,

    /// Opaque provider token enabling resend without a fresh challenge
    pub resend_token: Option<String>,

    /// Seconds left before the delivered code is considered stale
    pub remaining_seconds: u32,

    /// When the most recent code was sent
    pub requested_at: Option<DateTime<Utc>>,

    /// Where the attempt currently stands
    pub state: SessionState,
}

impl VerificationSession {
    /// Create an idle session for a phone number
    pub fn new(phone_number: impl Into<String>) -> Self {
        Self {
            phone_number: phone_number.into(),
            verification_id: None,
            resend_token: None,
            remaining_seconds: 0,
            requested_at: None,
            state: SessionState::Idle,
        }
    }

    /// Record a successful send: store the provider handles and restart the
    /// countdown from the full window
    pub fn mark_sent(&mut self, verification_id: String, resend_token: Option<String>) {
        self.verification_id = Some(verification_id);
        self.resend_token = resend_token;
        self.remaining_seconds = COUNTDOWN_SECONDS;
        self.requested_at = Some(Utc::now());
        self.state = SessionState::Sent;
    }

    /// Record that the send request itself failed
    pub fn mark_send_failed(&mut self) {
        self.remaining_seconds = 0;
        self.state = SessionState::Failed;
    }

    /// A submit is in flight with the provider
    pub fn begin_verify(&mut self) {
        self.state = SessionState::Verifying;
    }

    /// The provider accepted the code
    pub fn mark_verified(&mut self) {
        self.state = SessionState::Verified;
    }

    /// The provider rejected the code; the user may retry while the
    /// countdown is still running, otherwise the session expires
    pub fn reject_code(&mut self) {
        self.state = if self.remaining_seconds > 0 {
            SessionState::Sent
        } else {
            SessionState::Expired
        };
    }

    /// Decrement the countdown by one unit
    ///
    /// Only ticks while a code is live (`Sent` or `Verifying`). Reaching
    /// zero in `Sent` expires the session; an in-flight submit is left to
    /// finish and expiry is applied when its rejection lands.
    pub fn tick(&mut self) -> u32 {
        if matches!(self.state, SessionState::Sent | SessionState::Verifying)
            && self.remaining_seconds > 0
        {
            self.remaining_seconds -= 1;
            if self.remaining_seconds == 0 && self.state == SessionState::Sent {
                self.state = SessionState::Expired;
            }
        }
        self.remaining_seconds
    }

    /// Whether the countdown still has seconds left to burn
    pub fn is_counting(&self) -> bool {
        matches!(self.state, SessionState::Sent | SessionState::Verifying)
            && self.remaining_seconds > 0
    }

    /// A code can be exchanged only while a non-expired verification id exists
    pub fn has_live_code(&self) -> bool {
        self.verification_id.is_some()
            && matches!(self.state, SessionState::Sent | SessionState::Verifying)
    }

    /// Resend is possible only once the countdown has run out
    pub fn can_resend(&self) -> bool {
        self.state == SessionState::Expired
    }
}
