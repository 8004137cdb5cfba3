//! Example walking the phone verification flow end to end
//!
//! Runs the whole OTP journey against the in-memory mock provider, so no
//! credentials are needed. The mock remembers the code it "delivered",
//! which a real run would read off the handset.
//!
//! Run with: cargo run -p cl_infra --example phone_verification_demo

use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use cl_core::providers::{InMemoryUserStore, MockAuthProvider, UserStore};
use cl_core::services::verification::{PhoneVerificationController, VerificationConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let provider = Arc::new(MockAuthProvider::new());
    let store = Arc::new(InMemoryUserStore::new());
    let mut controller = PhoneVerificationController::new(
        Arc::clone(&provider),
        Arc::clone(&store),
        VerificationConfig::default(),
    );

    let phone = "+254712345678";
    controller.request_code(phone).await?;
    println!(
        "code requested for {phone}; resend unlocks in {}s",
        controller.remaining_seconds().await
    );

    let code = provider
        .last_delivered_code()
        .await
        .ok_or_else(|| anyhow::anyhow!("mock delivered no code"))?;
    println!("delivered code: {code}");

    let outcome = controller.submit_code(&code).await?;
    println!(
        "verified user {} -> {:?}",
        outcome.identity.user_id, outcome.destination
    );

    let record = store
        .fetch(&outcome.identity.user_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("contact record missing"))?;
    println!(
        "stored contact record: phone={:?} role={:?}",
        record.phone_number, record.role
    );

    Ok(())
}
