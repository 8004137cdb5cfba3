//! # CareLink Core
//!
//! Core domain and flow logic for the CareLink patient/doctor linking app.
//! This crate contains the domain entities, the provider interfaces for the
//! hosted identity and document services, the screen-facing flows (phone
//! verification, role routing, email login and registration) and the error
//! types shared by all of them.

pub mod domain;
pub mod errors;
pub mod providers;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use providers::*;
pub use services::*;
