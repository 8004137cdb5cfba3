//! Email/password sign-in with an optional role gate

use std::sync::Arc;

use crate::domain::entities::{AuthIdentity, UserRole};
use crate::domain::value_objects::RouteDestination;
use crate::errors::{AuthError, FlowResult, ProviderError, ValidationError};
use crate::providers::{AuthProvider, UserStore};
use crate::services::routing::RoleRouter;

/// What a successful sign-in hands back to the screen
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Provider credential for the signed-in user
    pub identity: AuthIdentity,
    /// Where to navigate, resolved from the stored role
    pub destination: RouteDestination,
}

/// Email/password sign-in for one screen
///
/// A screen built for a single role passes `expected_role`; an account
/// stored under any other role is rejected and its credential discarded,
/// which is all the sign-out a client-held credential needs.
pub struct EmailLoginFlow<A: AuthProvider, S: UserStore> {
    provider: Arc<A>,
    router: RoleRouter<S>,
    expected_role: Option<UserRole>,
}

impl<A: AuthProvider, S: UserStore> EmailLoginFlow<A, S> {
    pub fn new(provider: Arc<A>, store: Arc<S>, expected_role: Option<UserRole>) -> Self {
        Self {
            provider,
            router: RoleRouter::new(store),
            expected_role,
        }
    }

    /// Sign in and resolve where the screen should navigate
    ///
    /// # Returns
    ///
    /// * `Ok(LoginOutcome)` - Credentials accepted and the role gate (if
    ///   any) passed
    /// * `Err(FlowError)` - Fields were blank, the credentials were
    ///   rejected, the role lookup failed, or the role gate refused
    pub async fn login(&self, email: &str, password: &str) -> FlowResult<LoginOutcome> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ValidationError::MissingFields.into());
        }

        let identity = self
            .provider
            .sign_in_with_email(email, password)
            .await
            .map_err(|err| match err {
                ProviderError::InvalidCredential => AuthError::InvalidCredentials,
                other => AuthError::ProviderRequest {
                    message: other.to_string(),
                },
            })?;

        let role = self.router.resolve_role(&identity.user_id).await?;

        if let Some(expected) = self.expected_role {
            if role != Some(expected) {
                tracing::warn!(
                    user_id = %identity.user_id,
                    expected = %expected,
                    event = "role_mismatch",
                    "account role does not match this screen"
                );
                return Err(AuthError::RoleMismatch { expected }.into());
            }
        }

        tracing::info!(
            user_id = %identity.user_id,
            role = ?role,
            event = "login_succeeded",
            "signed in"
        );
        Ok(LoginOutcome {
            identity,
            destination: RouteDestination::for_role(role),
        })
    }
}
