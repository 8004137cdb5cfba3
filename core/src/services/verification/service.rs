//! Phone verification controller implementation

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use cl_shared::utils::phone::mask_phone;
use cl_shared::utils::validation::validators;

use crate::domain::entities::{AuthIdentity, SessionState, UserRecord, VerificationSession};
use crate::domain::value_objects::RouteDestination;
use crate::errors::{AuthError, FlowError, FlowResult, ProviderError, ValidationError};
use crate::providers::{AuthProvider, UserStore};

use super::config::VerificationConfig;
use super::types::VerificationOutcome;

/// Drives one phone verification screen
///
/// The controller owns the session state for exactly one screen instance;
/// nothing about an attempt outlives it. Methods take `&mut self`, so a
/// screen has at most one provider call in flight at a time, while the
/// countdown runs in a background task sharing the session. Dropping the
/// controller aborts that task.
pub struct PhoneVerificationController<A: AuthProvider, S: UserStore> {
    provider: Arc<A>,
    store: Arc<S>,
    config: VerificationConfig,
    session: Arc<Mutex<VerificationSession>>,
    countdown: Option<JoinHandle<()>>,
}

impl<A: AuthProvider, S: UserStore> PhoneVerificationController<A, S> {
    pub fn new(provider: Arc<A>, store: Arc<S>, config: VerificationConfig) -> Self {
        Self {
            provider,
            store,
            config,
            session: Arc::new(Mutex::new(VerificationSession::new(""))),
            countdown: None,
        }
    }

    /// Request a verification code for `phone_number`
    ///
    /// Replaces whatever session the screen had, so a failed or expired
    /// attempt is recovered by simply requesting again. On success the
    /// resend countdown starts from the full window.
    ///
    /// # Arguments
    ///
    /// * `phone_number` - Destination number in E.164 format
    pub async fn request_code(&mut self, phone_number: &str) -> FlowResult<()> {
        let phone = phone_number.trim().to_string();
        if phone.is_empty() {
            return Err(ValidationError::BlankPhoneNumber.into());
        }

        self.stop_countdown();
        *self.session.lock().await = VerificationSession::new(phone.clone());

        match self
            .provider
            .send_verification_code(&phone, self.config.send_timeout(), None)
            .await
        {
            Ok(delivery) => {
                tracing::info!(
                    phone = %mask_phone(&phone),
                    event = "code_sent",
                    "verification code requested"
                );
                self.session
                    .lock()
                    .await
                    .mark_sent(delivery.verification_id, delivery.resend_token);
                self.start_countdown();
                Ok(())
            }
            Err(err) => {
                tracing::warn!(
                    phone = %mask_phone(&phone),
                    error = %err,
                    event = "code_send_failed",
                    "verification code request failed"
                );
                self.session.lock().await.mark_send_failed();
                Err(AuthError::ProviderRequest {
                    message: err.to_string(),
                }
                .into())
            }
        }
    }

    /// Send a fresh code for the session's number once the countdown ran out
    ///
    /// Passes the provider's resend token along when the previous delivery
    /// included one, so the provider can skip its abuse checks.
    pub async fn resend(&mut self) -> FlowResult<()> {
        let (phone, token) = {
            let session = self.session.lock().await;
            if !session.can_resend() {
                return Err(AuthError::ResendUnavailable {
                    remaining: session.remaining_seconds,
                }
                .into());
            }
            (session.phone_number.clone(), session.resend_token.clone())
        };

        self.stop_countdown();
        match self
            .provider
            .send_verification_code(&phone, self.config.send_timeout(), token.as_deref())
            .await
        {
            Ok(delivery) => {
                tracing::info!(
                    phone = %mask_phone(&phone),
                    event = "code_resent",
                    "verification code resent"
                );
                self.session
                    .lock()
                    .await
                    .mark_sent(delivery.verification_id, delivery.resend_token);
                self.start_countdown();
                Ok(())
            }
            Err(err) => {
                tracing::warn!(
                    phone = %mask_phone(&phone),
                    error = %err,
                    event = "code_resend_failed",
                    "verification code resend failed"
                );
                self.session.lock().await.mark_send_failed();
                Err(AuthError::ProviderRequest {
                    message: err.to_string(),
                }
                .into())
            }
        }
    }

    /// Exchange a submitted code for a credential and route by stored role
    ///
    /// # Returns
    ///
    /// * `Ok(VerificationOutcome)` - Code accepted; carries the credential
    ///   and the destination the screen should navigate to
    /// * `Err(FlowError)` - Validation failed, no challenge is live, the
    ///   provider rejected the code, or the role lookup failed
    pub async fn submit_code(&mut self, code: &str) -> FlowResult<VerificationOutcome> {
        let code = code.trim();
        if !validators::is_digit_string(code, self.config.code_length) {
            return Err(ValidationError::MalformedCode {
                expected: self.config.code_length,
            }
            .into());
        }

        let verification_id = {
            let mut session = self.session.lock().await;
            let id = match session.verification_id.as_ref() {
                Some(id) if session.has_live_code() => id.clone(),
                _ => return Err(AuthError::MissingSession.into()),
            };
            session.begin_verify();
            id
        };

        // The session lock is released here so the countdown keeps ticking
        // while the exchange is in flight.
        match self
            .provider
            .exchange_credential(&verification_id, code)
            .await
        {
            Ok(identity) => {
                self.stop_countdown();
                self.session.lock().await.mark_verified();
                tracing::info!(
                    user_id = %identity.user_id,
                    event = "phone_verified",
                    "verification code accepted"
                );
                let destination = self.route_verified_user(&identity).await?;
                Ok(VerificationOutcome {
                    identity,
                    destination,
                })
            }
            Err(ProviderError::InvalidCredential) => {
                self.session.lock().await.reject_code();
                Err(AuthError::InvalidCode.into())
            }
            Err(err) => {
                self.session.lock().await.reject_code();
                Err(AuthError::ProviderRequest {
                    message: err.to_string(),
                }
                .into())
            }
        }
    }

    /// Seconds left on the resend countdown
    pub async fn remaining_seconds(&self) -> u32 {
        self.session.lock().await.remaining_seconds
    }

    /// Where the attempt currently stands
    pub async fn state(&self) -> SessionState {
        self.session.lock().await.state
    }

    /// Snapshot of the session for the screen to render
    pub async fn session(&self) -> VerificationSession {
        self.session.lock().await.clone()
    }

    /// Route a freshly verified user by their stored role
    ///
    /// First-time identities get a contact record written for them; they
    /// have no role yet, so the screen stays put either way.
    async fn route_verified_user(&self, identity: &AuthIdentity) -> FlowResult<RouteDestination> {
        let phone = self.session.lock().await.phone_number.clone();

        let existing = self.store.fetch(&identity.user_id).await.map_err(|err| {
            tracing::error!(
                user_id = %identity.user_id,
                error = %err,
                event = "role_lookup_failed",
                "user record fetch failed"
            );
            FlowError::lookup(err)
        })?;

        match existing {
            Some(record) => {
                if record.role.is_none() {
                    tracing::warn!(
                        user_id = %identity.user_id,
                        "user record carries no role, staying on screen"
                    );
                }
                Ok(RouteDestination::for_role(record.role))
            }
            None => {
                let record = UserRecord::phone_contact(identity.user_id.as_str(), phone);
                if let Err(err) = self.store.save(&record).await {
                    tracing::warn!(
                        user_id = %identity.user_id,
                        error = %err,
                        "contact record write failed"
                    );
                }
                Ok(RouteDestination::Stay)
            }
        }
    }

    fn start_countdown(&mut self) {
        let session = Arc::clone(&self.session);
        self.countdown = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(1));
            // The first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let mut session = session.lock().await;
                session.tick();
                if !session.is_counting() {
                    break;
                }
            }
        }));
    }

    fn stop_countdown(&mut self) {
        if let Some(handle) = self.countdown.take() {
            handle.abort();
        }
    }
}

impl<A: AuthProvider, S: UserStore> Drop for PhoneVerificationController<A, S> {
    fn drop(&mut self) {
        self.stop_countdown();
    }
}
