//! User record entity
//!
//! The document kept for each user in the external store, keyed by the
//! provider-issued user id. Two shapes exist in the wild: phone sign-ins
//! write only their contact number, while completed email registrations
//! carry an email, a role and a verified flag. Wire field names are
//! camelCase to match the stored documents.

use serde::{Deserialize, Serialize};

/// Role a CareLink account can hold
///
/// This is a closed set: anything else found in a stored document is
/// treated as no role at all, and callers must handle that case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Doctor,
    Patient,
}

impl UserRole {
    /// Get the role as stored in user documents
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Doctor => "doctor",
            UserRole::Patient => "patient",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "doctor" => Ok(UserRole::Doctor),
            "patient" => Ok(UserRole::Patient),
            _ => Err(format!("unknown role: {}", s)),
        }
    }
}

/// A user document in the external store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Provider-issued user identifier
    pub user_id: String,

    /// Account role; absent for users created through the phone path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,

    /// Whether email verification completed for this account
    #[serde(default)]
    pub is_verified: bool,

    /// Email address, when the account was registered by email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Phone number, when the account signed in by OTP
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl UserRecord {
    /// Record written after a successful phone verification
    ///
    /// Carries the contact number only; no role is assigned on this path.
    pub fn phone_contact(user_id: impl Into<String>, phone_number: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role: None,
            is_verified: false,
            email: None,
            phone_number: Some(phone_number.into()),
        }
    }

    /// Record written once email verification completed
    pub fn verified_email(
        user_id: impl Into<String>,
        email: impl Into<String>,
        role: UserRole,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            role: Some(role),
            is_verified: true,
            email: Some(email.into()),
            phone_number: None,
        }
    }

    /// Check whether this record holds the given role
    pub fn has_role(&self, role: UserRole) -> bool {
        self.role == Some(role)
    }
}
