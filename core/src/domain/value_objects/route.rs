//! Route destination value object

use serde::{Deserialize, Serialize};

use crate::domain::entities::UserRole;

/// Where a screen should navigate after authentication
///
/// The mapping from roles is total: accounts without a recognized role get
/// `Stay`, which means "remain on the current screen, take no action".
/// Navigation itself is the shell's job; flows only hand back this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteDestination {
    DoctorHome,
    PatientHome,
    Stay,
}

impl RouteDestination {
    /// Map an optional role to its home destination
    pub fn for_role(role: Option<UserRole>) -> Self {
        match role {
            Some(UserRole::Doctor) => RouteDestination::DoctorHome,
            Some(UserRole::Patient) => RouteDestination::PatientHome,
            None => RouteDestination::Stay,
        }
    }

    /// Whether this destination actually moves the user somewhere
    pub fn navigates(&self) -> bool {
        !matches!(self, RouteDestination::Stay)
    }
}
