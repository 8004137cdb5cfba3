//! Application flows behind the authentication screens
//!
//! Each submodule backs one screen family:
//! - `verification` - phone OTP challenge, countdown and resend
//! - `login` - email/password sign-in with an optional role gate
//! - `registration` - account creation and email verification polling
//! - `routing` - resolving a signed-in user's role to a destination

pub mod login;
pub mod registration;
pub mod routing;
pub mod verification;

pub use login::{EmailLoginFlow, LoginOutcome};
pub use registration::{EmailRegistrationFlow, EmailVerificationConfig, RegistrationOutcome};
pub use routing::RoleRouter;
pub use verification::{PhoneVerificationController, VerificationConfig, VerificationOutcome};
