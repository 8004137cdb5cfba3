//! Interfaces to the hosted backend services.
//!
//! The identity provider and the user-record store are external systems
//! consumed through traits, so every flow can run against the in-memory
//! doubles in tests and demos exactly as it runs against the REST clients.

pub mod auth;
pub mod store;

pub use auth::{AuthProvider, CodeDelivery, MockAuthProvider};
pub use store::{InMemoryUserStore, UserStore};
