//! Account creation with email verification polling

use std::sync::Arc;

use cl_shared::utils::validation::validators;

use crate::domain::entities::{AuthIdentity, UserRecord, UserRole};
use crate::domain::value_objects::RouteDestination;
use crate::errors::{AuthError, FlowError, FlowResult, ProviderError, ValidationError};
use crate::providers::{AuthProvider, UserStore};

use super::config::EmailVerificationConfig;

/// What a completed registration hands back to the screen
#[derive(Debug, Clone)]
pub struct RegistrationOutcome {
    /// Provider credential, reloaded after the address verified
    pub identity: AuthIdentity,
    /// Home destination for the role the user registered under
    pub destination: RouteDestination,
}

/// Creates an account under a chosen role and waits for the verification
/// mail to be actioned before persisting the record
pub struct EmailRegistrationFlow<A: AuthProvider, S: UserStore> {
    provider: Arc<A>,
    store: Arc<S>,
    config: EmailVerificationConfig,
}

impl<A: AuthProvider, S: UserStore> EmailRegistrationFlow<A, S> {
    pub fn new(provider: Arc<A>, store: Arc<S>, config: EmailVerificationConfig) -> Self {
        Self {
            provider,
            store,
            config,
        }
    }

    /// Register `email` under `role` and wait for the address to verify
    ///
    /// Stays pending (asynchronously) until the user clicks the link in
    /// the verification mail or the polling budget runs out. The user
    /// record is only written once the address verified, so an abandoned
    /// registration leaves nothing behind in the store.
    ///
    /// # Arguments
    ///
    /// * `email` - Address to register
    /// * `password` - Chosen password
    /// * `confirm_password` - Must match `password` exactly
    /// * `role` - Role the account signs up as
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        confirm_password: &str,
        role: UserRole,
    ) -> FlowResult<RegistrationOutcome> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() || confirm_password.is_empty() {
            return Err(ValidationError::MissingFields.into());
        }
        if !validators::is_valid_email(email) {
            return Err(ValidationError::InvalidEmail.into());
        }
        if password != confirm_password {
            return Err(ValidationError::PasswordMismatch.into());
        }

        let identity = self
            .provider
            .create_account(email, password)
            .await
            .map_err(|err| match err {
                ProviderError::AccountExists => AuthError::AccountExists,
                other => AuthError::ProviderRequest {
                    message: other.to_string(),
                },
            })?;
        tracing::info!(
            user_id = %identity.user_id,
            event = "account_created",
            "account created, verification mail pending"
        );

        if let Err(err) = self.provider.send_email_verification(&identity).await {
            // The provider may have queued the mail anyway; let polling decide
            tracing::warn!(
                user_id = %identity.user_id,
                error = %err,
                "verification mail request failed"
            );
        }

        let identity = self.await_email_verification(identity).await?;

        let record = UserRecord::verified_email(identity.user_id.as_str(), email, role);
        self.store.save(&record).await.map_err(|err| {
            tracing::error!(
                user_id = %identity.user_id,
                error = %err,
                "user record write failed"
            );
            FlowError::lookup(err)
        })?;

        tracing::info!(
            user_id = %identity.user_id,
            role = %role,
            event = "registration_completed",
            "registration complete"
        );
        Ok(RegistrationOutcome {
            destination: RouteDestination::for_role(Some(role)),
            identity,
        })
    }

    /// Reload the identity until the provider reports the address verified
    ///
    /// The first check fires immediately; transient reload failures burn
    /// an attempt rather than aborting the wait.
    async fn await_email_verification(&self, identity: AuthIdentity) -> FlowResult<AuthIdentity> {
        let attempts = self.config.max_poll_attempts;
        for attempt in 1..=attempts {
            match self.provider.reload_identity(&identity).await {
                Ok(reloaded) if reloaded.email_verified => {
                    tracing::info!(
                        user_id = %identity.user_id,
                        attempt,
                        "email address verified"
                    );
                    return Ok(reloaded);
                }
                Ok(_) => {
                    tracing::debug!(
                        user_id = %identity.user_id,
                        attempt,
                        "email address not verified yet"
                    );
                }
                Err(err) => {
                    tracing::warn!(
                        user_id = %identity.user_id,
                        attempt,
                        error = %err,
                        "identity reload failed"
                    );
                }
            }
            if attempt < attempts {
                tokio::time::sleep(self.config.poll_interval()).await;
            }
        }

        tracing::warn!(
            user_id = %identity.user_id,
            attempts,
            event = "verification_timeout",
            "email verification polling gave up"
        );
        Err(AuthError::VerificationTimeout { attempts }.into())
    }
}
