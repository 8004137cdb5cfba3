//! Hosted identity platform client

mod client;

pub use client::{IdentityPlatformClient, IdentityPlatformConfig};
