//! Identity provider trait defining the interface to the hosted auth service.
//!
//! CareLink never manages credentials itself; phone challenges, password
//! accounts and email verification all live behind this trait. The REST
//! client in `cl_infra` is the production implementation and
//! [`MockAuthProvider`](super::MockAuthProvider) stands in for tests and
//! demos.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::entities::AuthIdentity;
use crate::errors::ProviderError;

/// Handles returned when a verification code has been sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeDelivery {
    /// Opaque id required to exchange the delivered code for a credential
    pub verification_id: String,

    /// Opaque token enabling a later resend without a fresh challenge
    ///
    /// Not every provider surface issues one; resend falls back to a plain
    /// new request when it is absent.
    pub resend_token: Option<String>,
}

/// Interface to the hosted identity provider
///
/// All methods perform exactly one request; retry policy belongs to the
/// user-triggered flows, never to implementations of this trait.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Ask the provider to deliver a verification code by SMS
    ///
    /// # Arguments
    /// * `phone_number` - Destination in E.164 format
    /// * `timeout` - Provider-side delivery window for the challenge
    /// * `resend_token` - Token from an earlier delivery when resending
    ///
    /// # Returns
    /// * `Ok(CodeDelivery)` - Code is on its way; handles for the exchange
    /// * `Err(ProviderError)` - Challenge could not be created
    async fn send_verification_code(
        &self,
        phone_number: &str,
        timeout: Duration,
        resend_token: Option<&str>,
    ) -> Result<CodeDelivery, ProviderError>;

    /// Exchange a delivered code for a signed-in identity
    ///
    /// # Returns
    /// * `Ok(AuthIdentity)` - The code matched
    /// * `Err(ProviderError::InvalidCredential)` - Wrong or stale code
    /// * `Err(ProviderError)` - Request failed for another reason
    async fn exchange_credential(
        &self,
        verification_id: &str,
        code: &str,
    ) -> Result<AuthIdentity, ProviderError>;

    /// Sign in with an email/password pair
    async fn sign_in_with_email(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthIdentity, ProviderError>;

    /// Create a new email/password account
    ///
    /// Fails with [`ProviderError::AccountExists`] when the address is
    /// already registered.
    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthIdentity, ProviderError>;

    /// Ask the provider to mail a verification link to the account
    async fn send_email_verification(&self, identity: &AuthIdentity) -> Result<(), ProviderError>;

    /// Re-fetch the identity to pick up a changed `email_verified` flag
    async fn reload_identity(&self, identity: &AuthIdentity) -> Result<AuthIdentity, ProviderError>;
}
