//! Result types for the phone verification flow

use crate::domain::entities::AuthIdentity;
use crate::domain::value_objects::RouteDestination;

/// What a successful code exchange hands back to the screen
#[derive(Debug, Clone)]
pub struct VerificationOutcome {
    /// Provider credential for the now signed-in user
    pub identity: AuthIdentity,
    /// Where to navigate, resolved from the user's stored role
    pub destination: RouteDestination,
}
