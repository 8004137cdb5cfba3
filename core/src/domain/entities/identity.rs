//! Authenticated identity entity

use serde::{Deserialize, Serialize};

/// The identity provider's view of a signed-in user
///
/// Returned by every successful credential exchange. The `id_token` is the
/// bearer credential for follow-up provider calls (email verification,
/// identity reload) and is never logged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthIdentity {
    /// Provider-issued user identifier
    pub user_id: String,

    /// Bearer token for follow-up provider calls
    pub id_token: String,

    /// Email address attached to the account, if any
    pub email: Option<String>,

    /// Phone number attached to the account, if any
    pub phone_number: Option<String>,

    /// Whether the provider has confirmed the email address
    pub email_verified: bool,
}

impl AuthIdentity {
    /// Create an identity with just the required provider handles
    pub fn new(user_id: impl Into<String>, id_token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            id_token: id_token.into(),
            email: None,
            phone_number: None,
            email_verified: false,
        }
    }
}
