//! REST client for the hosted identity platform
//!
//! Every authentication concern goes through one HTTP API: phone
//! challenges, code exchange, email sign-in and sign-up, the
//! verification mail and identity lookup. Each method performs exactly
//! one request; retries and polling belong to the flows in `cl_core`.
//!
//! The API reports failures as a JSON body with a SCREAMING_CASE reason
//! string, which is mapped onto the provider error variants here so the
//! flows can react uniformly across transports.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use cl_core::domain::entities::AuthIdentity;
use cl_core::errors::ProviderError;
use cl_core::providers::{AuthProvider, CodeDelivery};
use cl_shared::utils::phone::mask_phone;

use crate::InfraError;

const DEFAULT_BASE_URL: &str = "https://identitytoolkit.googleapis.com";

/// Identity platform client configuration
#[derive(Debug, Clone)]
pub struct IdentityPlatformConfig {
    /// Web API key issued for the project
    pub api_key: String,
    /// API origin, overridable for emulators
    pub base_url: String,
    /// Timeout applied to every request in seconds
    pub timeout_seconds: u64,
}

impl IdentityPlatformConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, InfraError> {
        dotenvy::dotenv().ok();
        let api_key = std::env::var("IDENTITY_API_KEY")
            .map_err(|_| InfraError::Config("IDENTITY_API_KEY not set".to_string()))?;
        Ok(Self {
            api_key,
            base_url: std::env::var("IDENTITY_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            timeout_seconds: std::env::var("IDENTITY_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        })
    }
}

/// REST implementation of [`AuthProvider`]
pub struct IdentityPlatformClient {
    http: reqwest::Client,
    config: IdentityPlatformConfig,
}

impl IdentityPlatformClient {
    /// Create a new client for the configured project
    pub fn new(config: IdentityPlatformConfig) -> Result<Self, InfraError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self { http, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self, InfraError> {
        Self::new(IdentityPlatformConfig::from_env()?)
    }

    fn endpoint(&self, method: &str) -> String {
        format!(
            "{}/v1/accounts:{}?key={}",
            self.config.base_url, method, self.config.api_key
        )
    }

    /// Issue one POST against an `accounts:` method
    ///
    /// `timeout` overrides the client-wide request timeout when given.
    async fn post<Req, Resp>(
        &self,
        method: &str,
        body: &Req,
        timeout: Option<Duration>,
    ) -> Result<Resp, ProviderError>
    where
        Req: Serialize + Sync,
        Resp: for<'de> Deserialize<'de>,
    {
        let mut request = self.http.post(self.endpoint(method)).json(body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|err| ProviderError::Network {
            message: err.to_string(),
        })?;

        let status = response.status();
        if status.is_success() {
            response.json().await.map_err(|err| ProviderError::Service {
                message: format!("malformed response: {}", err),
            })
        } else {
            let body: ApiErrorBody = response.json().await.unwrap_or_default();
            debug!(method, status = status.as_u16(), reason = %body.error.message, "identity API error");
            Err(map_api_error(status.as_u16(), body.error.message))
        }
    }
}

/// Map the API's SCREAMING_CASE error reasons onto provider errors
///
/// Messages sometimes carry a human-readable suffix
/// (`"WEAK_PASSWORD : Password should be at least 6 characters"`), so
/// only the leading token is matched.
fn map_api_error(status: u16, message: String) -> ProviderError {
    let reason = message.split([' ', ':']).next().unwrap_or("");
    match reason {
        "INVALID_CODE" | "INVALID_SESSION_INFO" | "SESSION_EXPIRED" | "INVALID_PASSWORD"
        | "EMAIL_NOT_FOUND" | "INVALID_LOGIN_CREDENTIALS" => ProviderError::InvalidCredential,
        "EMAIL_EXISTS" => ProviderError::AccountExists,
        _ => ProviderError::Service {
            message: if message.is_empty() {
                format!("HTTP {}", status)
            } else {
                message
            },
        },
    }
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    error: ApiError,
}

#[derive(Debug, Default, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendCodeRequest<'a> {
    phone_number: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendCodeResponse {
    session_info: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PhoneSignInRequest<'a> {
    session_info: &'a str,
    code: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PhoneSignInResponse {
    local_id: String,
    id_token: String,
    #[serde(default)]
    phone_number: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PasswordResponse {
    local_id: String,
    id_token: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OobCodeRequest<'a> {
    request_type: &'a str,
    id_token: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    id_token: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    email_verified: bool,
    #[serde(default)]
    phone_number: Option<String>,
}

#[async_trait]
impl AuthProvider for IdentityPlatformClient {
    async fn send_verification_code(
        &self,
        phone_number: &str,
        timeout: Duration,
        resend_token: Option<&str>,
    ) -> Result<CodeDelivery, ProviderError> {
        if resend_token.is_some() {
            // The REST surface has no resend channel; a resend is just a
            // fresh challenge for the same number
            debug!(
                phone = %mask_phone(phone_number),
                "resend token not supported by this transport"
            );
        }

        let response: SendCodeResponse = self
            .post(
                "sendVerificationCode",
                &SendCodeRequest { phone_number },
                Some(timeout),
            )
            .await?;
        info!(phone = %mask_phone(phone_number), "verification code send accepted");
        Ok(CodeDelivery {
            verification_id: response.session_info,
            resend_token: None,
        })
    }

    async fn exchange_credential(
        &self,
        verification_id: &str,
        code: &str,
    ) -> Result<AuthIdentity, ProviderError> {
        let response: PhoneSignInResponse = self
            .post(
                "signInWithPhoneNumber",
                &PhoneSignInRequest {
                    session_info: verification_id,
                    code,
                },
                None,
            )
            .await?;
        Ok(AuthIdentity {
            user_id: response.local_id,
            id_token: response.id_token,
            email: None,
            phone_number: response.phone_number,
            email_verified: false,
        })
    }

    async fn sign_in_with_email(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthIdentity, ProviderError> {
        let response: PasswordResponse = self
            .post(
                "signInWithPassword",
                &PasswordRequest {
                    email,
                    password,
                    return_secure_token: true,
                },
                None,
            )
            .await?;
        Ok(AuthIdentity {
            user_id: response.local_id,
            id_token: response.id_token,
            email: response.email.or_else(|| Some(email.to_string())),
            phone_number: None,
            email_verified: false,
        })
    }

    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthIdentity, ProviderError> {
        let response: PasswordResponse = self
            .post(
                "signUp",
                &PasswordRequest {
                    email,
                    password,
                    return_secure_token: true,
                },
                None,
            )
            .await?;
        info!(user_id = %response.local_id, "account created");
        Ok(AuthIdentity {
            user_id: response.local_id,
            id_token: response.id_token,
            email: response.email.or_else(|| Some(email.to_string())),
            phone_number: None,
            email_verified: false,
        })
    }

    async fn send_email_verification(&self, identity: &AuthIdentity) -> Result<(), ProviderError> {
        let _: serde_json::Value = self
            .post(
                "sendOobCode",
                &OobCodeRequest {
                    request_type: "VERIFY_EMAIL",
                    id_token: &identity.id_token,
                },
                None,
            )
            .await?;
        info!(user_id = %identity.user_id, "verification mail requested");
        Ok(())
    }

    async fn reload_identity(&self, identity: &AuthIdentity) -> Result<AuthIdentity, ProviderError> {
        let response: LookupResponse = self
            .post(
                "lookup",
                &LookupRequest {
                    id_token: &identity.id_token,
                },
                None,
            )
            .await?;
        let user = response
            .users
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::Service {
                message: "lookup returned no users".to_string(),
            })?;
        Ok(AuthIdentity {
            user_id: user.local_id,
            id_token: identity.id_token.clone(),
            email: user.email,
            phone_number: user.phone_number,
            email_verified: user.email_verified,
        })
    }
}
