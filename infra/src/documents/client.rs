//! REST client for the hosted document store
//!
//! User records live as one document per user under `users/{user_id}`.
//! The store's wire format wraps every field in a typed value object
//! (`{"stringValue": "doctor"}`), so records are translated to and from
//! that shape here; nothing above this module sees it.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use cl_core::domain::entities::{UserRecord, UserRole};
use cl_core::errors::StoreError;
use cl_core::providers::UserStore;

use crate::InfraError;

const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com";
const REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Document store client configuration
#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    /// Project the documents live under
    pub project_id: String,
    /// Web API key
    pub api_key: String,
    /// API origin, overridable for emulators
    pub base_url: String,
}

impl FirestoreConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, InfraError> {
        dotenvy::dotenv().ok();
        let project_id = std::env::var("FIRESTORE_PROJECT_ID")
            .map_err(|_| InfraError::Config("FIRESTORE_PROJECT_ID not set".to_string()))?;
        let api_key = std::env::var("FIRESTORE_API_KEY")
            .map_err(|_| InfraError::Config("FIRESTORE_API_KEY not set".to_string()))?;
        Ok(Self {
            project_id,
            api_key,
            base_url: std::env::var("FIRESTORE_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        })
    }
}

/// One typed value in a stored document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    #[serde(rename = "stringValue")]
    String(String),
    #[serde(rename = "booleanValue")]
    Boolean(bool),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    fields: HashMap<String, FieldValue>,
}

fn encode_record(record: &UserRecord) -> Document {
    let mut fields = HashMap::new();
    if let Some(role) = record.role {
        fields.insert(
            "role".to_string(),
            FieldValue::String(role.as_str().to_string()),
        );
    }
    fields.insert(
        "isVerified".to_string(),
        FieldValue::Boolean(record.is_verified),
    );
    if let Some(email) = &record.email {
        fields.insert("email".to_string(), FieldValue::String(email.clone()));
    }
    if let Some(phone) = &record.phone_number {
        fields.insert(
            "phoneNumber".to_string(),
            FieldValue::String(phone.clone()),
        );
    }
    Document { fields }
}

/// Rebuild a record from stored fields
///
/// Unknown role strings and unexpected field shapes are dropped with a
/// warning rather than failing the whole read; the router treats a
/// missing role as "stay put" anyway.
fn decode_record(user_id: &str, document: Document) -> UserRecord {
    let mut record = UserRecord {
        user_id: user_id.to_string(),
        role: None,
        is_verified: false,
        email: None,
        phone_number: None,
    };
    for (name, value) in document.fields {
        match (name.as_str(), value) {
            ("role", FieldValue::String(role)) => match role.parse::<UserRole>() {
                Ok(parsed) => record.role = Some(parsed),
                Err(_) => warn!(user_id, role = %role, "ignoring unknown role value"),
            },
            ("isVerified", FieldValue::Boolean(flag)) => record.is_verified = flag,
            ("email", FieldValue::String(email)) => record.email = Some(email),
            ("phoneNumber", FieldValue::String(phone)) => record.phone_number = Some(phone),
            (other, _) => debug!(user_id, field = other, "ignoring unexpected field"),
        }
    }
    record
}

/// REST implementation of [`UserStore`] backed by the hosted document store
pub struct FirestoreClient {
    http: reqwest::Client,
    config: FirestoreConfig,
}

impl FirestoreClient {
    /// Create a new client for the configured project
    pub fn new(config: FirestoreConfig) -> Result<Self, InfraError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .build()?;
        Ok(Self { http, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self, InfraError> {
        Self::new(FirestoreConfig::from_env()?)
    }

    fn document_url(&self, user_id: &str) -> String {
        format!(
            "{}/v1/projects/{}/databases/(default)/documents/users/{}?key={}",
            self.config.base_url, self.config.project_id, user_id, self.config.api_key
        )
    }
}

#[async_trait]
impl UserStore for FirestoreClient {
    async fn fetch(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError> {
        let response = self
            .http
            .get(self.document_url(user_id))
            .send()
            .await
            .map_err(|err| StoreError::Unavailable {
                message: err.to_string(),
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            debug!(user_id, "no user document");
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Unavailable {
                message: format!("HTTP {}: {}", status.as_u16(), body),
            });
        }

        let document: Document =
            response.json().await.map_err(|err| StoreError::Malformed {
                message: err.to_string(),
            })?;
        Ok(Some(decode_record(user_id, document)))
    }

    async fn save(&self, record: &UserRecord) -> Result<(), StoreError> {
        let document = encode_record(record);
        let response = self
            .http
            .patch(self.document_url(&record.user_id))
            .json(&document)
            .send()
            .await
            .map_err(|err| StoreError::Unavailable {
                message: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Unavailable {
                message: format!("HTTP {}: {}", status.as_u16(), body),
            });
        }
        debug!(user_id = %record.user_id, "user record written");
        Ok(())
    }
}
