//! # CareLink Infrastructure
//!
//! Concrete clients for the hosted services the core flows depend on:
//! the identity platform (phone and email authentication) and the
//! document store holding user records. Both speak plain REST through
//! `reqwest` and implement the provider traits from `cl_core`, so the
//! flows never see an HTTP type.
//!
//! ## Features
//!
//! - `identity`: Hosted identity platform client (default)
//! - `documents`: Hosted document store client (default)

/// Document store client module
#[cfg(feature = "documents")]
pub mod documents;

/// Identity platform client module
#[cfg(feature = "identity")]
pub mod identity;

/// Infrastructure-specific error types
///
/// These cover configuration and client construction only; once a client
/// is built, its calls report through the provider error types in
/// `cl_core`.
#[derive(Debug, thiserror::Error)]
pub enum InfraError {
    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
