//! # CareLink Shared
//!
//! Configuration and cross-crate utilities shared by the CareLink client
//! service crates: environment detection, logging presets, phone number
//! handling for the markets the app ships in, and input validation helpers.

pub mod config;
pub mod utils;

// Re-export commonly used types
pub use config::{AppConfig, Environment, LogFormat, LoggingConfig};
pub use utils::phone::{mask_phone, CountryCode};
