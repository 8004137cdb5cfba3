//! Example walking registration with email verification polling
//!
//! The mock provider flips the address to verified on its second reload,
//! so the polling loop succeeds one interval in. The interval is dropped
//! to one second here; production uses thirty.
//!
//! Run with: cargo run -p cl_infra --example email_registration_demo

use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use cl_core::domain::entities::UserRole;
use cl_core::providers::{InMemoryUserStore, MockAuthProvider, UserStore};
use cl_core::services::registration::{EmailRegistrationFlow, EmailVerificationConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let provider = Arc::new(MockAuthProvider::new());
    provider.set_verify_after_reloads(2).await;
    let store = Arc::new(InMemoryUserStore::new());

    let config = EmailVerificationConfig {
        max_poll_attempts: 10,
        poll_interval_seconds: 1,
    };
    let flow = EmailRegistrationFlow::new(Arc::clone(&provider), Arc::clone(&store), config);

    let outcome = flow
        .register(
            "amina@example.com",
            "correct-horse",
            "correct-horse",
            UserRole::Doctor,
        )
        .await?;
    println!(
        "registered {} -> {:?} after {} reloads",
        outcome.identity.user_id,
        outcome.destination,
        provider.reload_count().await
    );

    let record = store
        .fetch(&outcome.identity.user_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("user record missing"))?;
    println!(
        "stored record: email={:?} role={:?} verified={}",
        record.email, record.role, record.is_verified
    );

    Ok(())
}
