//! Flow-level error types and error handling.

mod types;

// Re-export all error types
pub use types::{AuthError, ProviderError, StoreError, ValidationError};

use thiserror::Error;

/// Umbrella error for everything a flow can surface to a screen
#[derive(Error, Debug)]
pub enum FlowError {
    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// User record lookup or persistence against the document store failed
    #[error("user record lookup failed: {message}")]
    Lookup { message: String },
}

impl FlowError {
    /// Build a lookup error from a store failure
    pub fn lookup(err: StoreError) -> Self {
        FlowError::Lookup {
            message: err.to_string(),
        }
    }

    /// The transient message a screen should display for this error
    ///
    /// Screens show these verbatim in a toast or snackbar; the `Display`
    /// implementations stay terse for logs.
    pub fn user_message(&self) -> String {
        match self {
            FlowError::Auth(err) => err.user_message(),
            FlowError::Validation(err) => err.user_message().to_string(),
            FlowError::Lookup { .. } => String::from("Failed to verify user role"),
        }
    }
}

pub type FlowResult<T> = Result<T, FlowError>;
