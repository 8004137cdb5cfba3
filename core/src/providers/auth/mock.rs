//! Mock identity provider for development and testing.
//!
//! Behaves like the hosted provider from the flows' point of view: codes
//! are remembered per verification id, email accounts live in an in-memory
//! map, and failure modes are switchable so tests can drive every branch.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tokio::sync::Mutex;
use uuid::Uuid;

use cl_shared::utils::phone::mask_phone;

use crate::domain::entities::AuthIdentity;
use crate::errors::ProviderError;

use super::r#trait::{AuthProvider, CodeDelivery};

/// One recorded call to `send_verification_code`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeRequest {
    /// Destination phone number
    pub phone_number: String,
    /// Whether the call carried a resend token
    pub resend: bool,
}

#[derive(Debug, Clone)]
struct DeliveredCode {
    phone_number: String,
    code: String,
}

#[derive(Debug, Clone)]
struct MockAccount {
    email: String,
    password: String,
    user_id: String,
    id_token: String,
    email_verified: bool,
    /// Reloads left before `email_verified` flips; `None` never verifies
    reloads_until_verified: Option<u32>,
}

#[derive(Debug, Default)]
struct MockAuthState {
    requests: Vec<CodeRequest>,
    codes: HashMap<String, DeliveredCode>,
    accounts: Vec<MockAccount>,
    /// Fixed user ids handed out for known phone numbers
    phone_identities: HashMap<String, String>,
    last_code: Option<String>,
    counter: u64,
    exchanges: u64,
    reloads: u64,
    fail_requests: bool,
    fail_mail: bool,
    reject_all_codes: bool,
    fixed_code: Option<String>,
    verify_after_reloads: Option<u32>,
}

/// In-memory implementation of [`AuthProvider`]
pub struct MockAuthProvider {
    state: Mutex<MockAuthState>,
}

impl MockAuthProvider {
    /// Create a mock provider that accepts the codes it generates
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockAuthState::default()),
        }
    }

    /// Deliver the same code for every challenge instead of a random one
    pub fn with_fixed_code(code: impl Into<String>) -> Self {
        let state = MockAuthState {
            fixed_code: Some(code.into()),
            ..MockAuthState::default()
        };
        Self {
            state: Mutex::new(state),
        }
    }

    /// Make every provider call fail with a service error
    pub async fn set_fail_requests(&self, fail: bool) {
        self.state.lock().await.fail_requests = fail;
    }

    /// Reject every submitted code regardless of its value
    pub async fn set_reject_codes(&self, reject: bool) {
        self.state.lock().await.reject_all_codes = reject;
    }

    /// Fail only the verification mail call, leaving everything else up
    pub async fn set_fail_mail(&self, fail: bool) {
        self.state.lock().await.fail_mail = fail;
    }

    /// Hand out a fixed user id when this phone number verifies
    pub async fn seed_phone_identity(
        &self,
        phone_number: impl Into<String>,
        user_id: impl Into<String>,
    ) {
        self.state
            .lock()
            .await
            .phone_identities
            .insert(phone_number.into(), user_id.into());
    }

    /// Accounts created after this call report `email_verified` once they
    /// have been reloaded `reloads` times; without it they never verify
    pub async fn set_verify_after_reloads(&self, reloads: u32) {
        self.state.lock().await.verify_after_reloads = Some(reloads);
    }

    /// Seed an existing email account for login scenarios
    pub async fn seed_account(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
        user_id: impl Into<String>,
    ) {
        let mut state = self.state.lock().await;
        state.accounts.push(MockAccount {
            email: email.into(),
            password: password.into(),
            user_id: user_id.into(),
            id_token: format!("mock-token-{}", Uuid::new_v4()),
            email_verified: true,
            reloads_until_verified: None,
        });
    }

    /// Number of send calls made so far
    pub async fn send_count(&self) -> usize {
        self.state.lock().await.requests.len()
    }

    /// All recorded send calls
    pub async fn code_requests(&self) -> Vec<CodeRequest> {
        self.state.lock().await.requests.clone()
    }

    /// The code attached to the most recent delivery
    pub async fn last_delivered_code(&self) -> Option<String> {
        self.state.lock().await.last_code.clone()
    }

    /// Number of credential exchanges attempted
    pub async fn exchange_count(&self) -> u64 {
        self.state.lock().await.exchanges
    }

    /// Number of identity reloads served
    pub async fn reload_count(&self) -> u64 {
        self.state.lock().await.reloads
    }

    fn generate_code(state: &MockAuthState) -> String {
        match &state.fixed_code {
            Some(code) => code.clone(),
            None => rand::thread_rng().gen_range(100_000..=999_999).to_string(),
        }
    }

    fn identity_for(account: &MockAccount) -> AuthIdentity {
        AuthIdentity {
            user_id: account.user_id.clone(),
            id_token: account.id_token.clone(),
            email: Some(account.email.clone()),
            phone_number: None,
            email_verified: account.email_verified,
        }
    }
}

impl Default for MockAuthProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthProvider for MockAuthProvider {
    async fn send_verification_code(
        &self,
        phone_number: &str,
        _timeout: Duration,
        resend_token: Option<&str>,
    ) -> Result<CodeDelivery, ProviderError> {
        let mut state = self.state.lock().await;
        state.requests.push(CodeRequest {
            phone_number: phone_number.to_string(),
            resend: resend_token.is_some(),
        });

        if state.fail_requests {
            return Err(ProviderError::Service {
                message: String::from("simulated send failure"),
            });
        }

        state.counter += 1;
        let verification_id = format!("mock-verification-{}", state.counter);
        let resend_token = format!("mock-resend-{}", state.counter);
        let code = Self::generate_code(&state);

        tracing::info!(
            phone = %mask_phone(phone_number),
            verification_id = %verification_id,
            "mock verification code generated"
        );

        state.codes.insert(
            verification_id.clone(),
            DeliveredCode {
                phone_number: phone_number.to_string(),
                code: code.clone(),
            },
        );
        state.last_code = Some(code);

        Ok(CodeDelivery {
            verification_id,
            resend_token: Some(resend_token),
        })
    }

    async fn exchange_credential(
        &self,
        verification_id: &str,
        code: &str,
    ) -> Result<AuthIdentity, ProviderError> {
        let mut state = self.state.lock().await;
        state.exchanges += 1;

        if state.fail_requests {
            return Err(ProviderError::Service {
                message: String::from("simulated exchange failure"),
            });
        }
        if state.reject_all_codes {
            return Err(ProviderError::InvalidCredential);
        }

        let delivered = state
            .codes
            .get(verification_id)
            .ok_or(ProviderError::InvalidCredential)?;
        if delivered.code != code {
            return Err(ProviderError::InvalidCredential);
        }

        let user_id = state
            .phone_identities
            .get(&delivered.phone_number)
            .cloned()
            .unwrap_or_else(|| format!("mock-user-{}", Uuid::new_v4()));

        Ok(AuthIdentity {
            user_id,
            id_token: format!("mock-token-{}", Uuid::new_v4()),
            email: None,
            phone_number: Some(delivered.phone_number.clone()),
            email_verified: false,
        })
    }

    async fn sign_in_with_email(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthIdentity, ProviderError> {
        let state = self.state.lock().await;
        if state.fail_requests {
            return Err(ProviderError::Service {
                message: String::from("simulated sign-in failure"),
            });
        }
        state
            .accounts
            .iter()
            .find(|account| account.email == email && account.password == password)
            .map(Self::identity_for)
            .ok_or(ProviderError::InvalidCredential)
    }

    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthIdentity, ProviderError> {
        let mut state = self.state.lock().await;
        if state.fail_requests {
            return Err(ProviderError::Service {
                message: String::from("simulated sign-up failure"),
            });
        }
        if state.accounts.iter().any(|account| account.email == email) {
            return Err(ProviderError::AccountExists);
        }

        let account = MockAccount {
            email: email.to_string(),
            password: password.to_string(),
            user_id: format!("mock-user-{}", Uuid::new_v4()),
            id_token: format!("mock-token-{}", Uuid::new_v4()),
            email_verified: false,
            reloads_until_verified: state.verify_after_reloads,
        };
        let identity = Self::identity_for(&account);
        state.accounts.push(account);
        Ok(identity)
    }

    async fn send_email_verification(&self, identity: &AuthIdentity) -> Result<(), ProviderError> {
        let state = self.state.lock().await;
        if state.fail_requests || state.fail_mail {
            return Err(ProviderError::Service {
                message: String::from("simulated mail failure"),
            });
        }
        state
            .accounts
            .iter()
            .find(|account| account.id_token == identity.id_token)
            .map(|_| ())
            .ok_or_else(|| ProviderError::Service {
                message: String::from("unknown identity"),
            })
    }

    async fn reload_identity(&self, identity: &AuthIdentity) -> Result<AuthIdentity, ProviderError> {
        let mut state = self.state.lock().await;
        state.reloads += 1;

        if state.fail_requests {
            return Err(ProviderError::Service {
                message: String::from("simulated reload failure"),
            });
        }

        let account = state
            .accounts
            .iter_mut()
            .find(|account| account.id_token == identity.id_token)
            .ok_or_else(|| ProviderError::Service {
                message: String::from("unknown identity"),
            })?;

        if let Some(remaining) = account.reloads_until_verified.as_mut() {
            if *remaining > 0 {
                *remaining -= 1;
            }
            if *remaining == 0 {
                account.email_verified = true;
            }
        }

        Ok(Self::identity_for(account))
    }
}
