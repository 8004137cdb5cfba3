//! Domain entities representing core business objects.

pub mod identity;
pub mod user_record;
pub mod verification_session;

// Re-export commonly used types
pub use identity::AuthIdentity;
pub use user_record::{UserRecord, UserRole};
pub use verification_session::{
    SessionState, VerificationSession, CODE_LENGTH, COUNTDOWN_SECONDS,
};
