//! Controller tests driving the OTP screen lifecycle
//!
//! Time-sensitive cases run on a paused runtime so the sixty second
//! countdown and the resend window elapse instantly and deterministically.

use std::sync::Arc;

use tokio::time::{self, Duration};

use crate::domain::entities::{SessionState, UserRecord, UserRole};
use crate::domain::value_objects::RouteDestination;
use crate::errors::{AuthError, FlowError, ValidationError};
use crate::providers::{InMemoryUserStore, MockAuthProvider, UserStore};
use crate::services::verification::{PhoneVerificationController, VerificationConfig};

const PHONE: &str = "+254712345678";
const CODE: &str = "123456";

fn controller(
    provider: &Arc<MockAuthProvider>,
    store: &Arc<InMemoryUserStore>,
) -> PhoneVerificationController<MockAuthProvider, InMemoryUserStore> {
    PhoneVerificationController::new(
        Arc::clone(provider),
        Arc::clone(store),
        VerificationConfig::default(),
    )
}

#[tokio::test]
async fn test_request_code_arms_the_session() {
    let provider = Arc::new(MockAuthProvider::new());
    let store = Arc::new(InMemoryUserStore::new());
    let mut controller = controller(&provider, &store);

    controller.request_code(PHONE).await.unwrap();

    assert_eq!(controller.state().await, SessionState::Sent);
    assert_eq!(controller.remaining_seconds().await, 60);
    assert_eq!(provider.send_count().await, 1);

    let session = controller.session().await;
    assert!(session.verification_id.is_some());
    assert!(session.resend_token.is_some());
}

#[tokio::test]
async fn test_blank_phone_never_reaches_the_provider() {
    let provider = Arc::new(MockAuthProvider::new());
    let store = Arc::new(InMemoryUserStore::new());
    let mut controller = controller(&provider, &store);

    let err = controller.request_code("   ").await.unwrap_err();
    assert!(matches!(
        err,
        FlowError::Validation(ValidationError::BlankPhoneNumber)
    ));
    assert_eq!(err.user_message(), "Please enter a valid phone number");
    assert_eq!(provider.send_count().await, 0);
    assert_eq!(controller.state().await, SessionState::Idle);
}

#[tokio::test]
async fn test_malformed_code_is_rejected_before_the_provider() {
    let provider = Arc::new(MockAuthProvider::with_fixed_code(CODE));
    let store = Arc::new(InMemoryUserStore::new());
    let mut controller = controller(&provider, &store);
    controller.request_code(PHONE).await.unwrap();

    for bad in ["12345", "1234567", "12a456", ""] {
        let err = controller.submit_code(bad).await.unwrap_err();
        assert!(matches!(
            err,
            FlowError::Validation(ValidationError::MalformedCode { expected: 6 })
        ));
    }
    assert_eq!(provider.exchange_count().await, 0);
    assert_eq!(controller.state().await, SessionState::Sent);
}

#[tokio::test]
async fn test_submit_without_a_challenge_is_missing_session() {
    let provider = Arc::new(MockAuthProvider::new());
    let store = Arc::new(InMemoryUserStore::new());
    let mut controller = controller(&provider, &store);

    let err = controller.submit_code(CODE).await.unwrap_err();
    assert!(matches!(err, FlowError::Auth(AuthError::MissingSession)));
    assert_eq!(
        err.user_message(),
        "Verification ID is missing. Please request a new OTP."
    );
}

#[tokio::test]
async fn test_wrong_code_returns_the_session_to_sent() {
    let provider = Arc::new(MockAuthProvider::with_fixed_code(CODE));
    let store = Arc::new(InMemoryUserStore::new());
    let mut controller = controller(&provider, &store);
    controller.request_code(PHONE).await.unwrap();

    let err = controller.submit_code("999999").await.unwrap_err();
    assert!(matches!(err, FlowError::Auth(AuthError::InvalidCode)));
    assert_eq!(err.user_message(), "Invalid OTP. Please try again.");
    assert_eq!(controller.state().await, SessionState::Sent);

    // The same challenge still accepts the right code
    let outcome = controller.submit_code(CODE).await.unwrap();
    assert_eq!(controller.state().await, SessionState::Verified);
    assert_eq!(outcome.destination, RouteDestination::Stay);
}

#[tokio::test]
async fn test_first_verification_writes_a_contact_record() {
    let provider = Arc::new(MockAuthProvider::with_fixed_code(CODE));
    let store = Arc::new(InMemoryUserStore::new());
    let mut controller = controller(&provider, &store);

    controller.request_code(PHONE).await.unwrap();
    let outcome = controller.submit_code(CODE).await.unwrap();

    // Unknown identities have no role, so the screen stays put
    assert_eq!(outcome.destination, RouteDestination::Stay);
    assert_eq!(outcome.identity.phone_number.as_deref(), Some(PHONE));
    assert_eq!(store.save_count(), 1);

    let record = store
        .fetch(&outcome.identity.user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.role, None);
    assert!(!record.is_verified);
    assert_eq!(record.phone_number.as_deref(), Some(PHONE));
}

#[tokio::test]
async fn test_known_doctor_routes_to_doctor_home() {
    let provider = Arc::new(MockAuthProvider::with_fixed_code(CODE));
    provider.seed_phone_identity(PHONE, "user-7").await;
    let store = Arc::new(InMemoryUserStore::with_record(UserRecord::verified_email(
        "user-7",
        "amina@example.com",
        UserRole::Doctor,
    )));
    let mut controller = controller(&provider, &store);

    controller.request_code(PHONE).await.unwrap();
    let outcome = controller.submit_code(CODE).await.unwrap();

    assert_eq!(outcome.destination, RouteDestination::DoctorHome);
    assert_eq!(outcome.identity.user_id, "user-7");
    // The existing record is left untouched
    assert_eq!(store.save_count(), 0);
}

#[tokio::test]
async fn test_store_outage_surfaces_as_lookup_failure() {
    let provider = Arc::new(MockAuthProvider::with_fixed_code(CODE));
    let store = Arc::new(InMemoryUserStore::new());
    let mut controller = controller(&provider, &store);

    controller.request_code(PHONE).await.unwrap();
    store.set_fail_requests(true);

    let err = controller.submit_code(CODE).await.unwrap_err();
    assert!(matches!(err, FlowError::Lookup { .. }));
    assert_eq!(err.user_message(), "Failed to verify user role");
}

#[tokio::test]
async fn test_send_failure_is_recovered_by_a_fresh_request() {
    let provider = Arc::new(MockAuthProvider::new());
    let store = Arc::new(InMemoryUserStore::new());
    let mut controller = controller(&provider, &store);

    provider.set_fail_requests(true).await;
    let err = controller.request_code(PHONE).await.unwrap_err();
    assert!(matches!(
        err,
        FlowError::Auth(AuthError::ProviderRequest { .. })
    ));
    assert_eq!(
        err.user_message(),
        "Verification request failed. Please try again."
    );
    assert_eq!(controller.state().await, SessionState::Failed);

    // Resend is not the recovery path for a failed send
    let err = controller.resend().await.unwrap_err();
    assert!(matches!(
        err,
        FlowError::Auth(AuthError::ResendUnavailable { .. })
    ));

    provider.set_fail_requests(false).await;
    controller.request_code(PHONE).await.unwrap();
    assert_eq!(controller.state().await, SessionState::Sent);
    assert_eq!(controller.remaining_seconds().await, 60);
}

#[tokio::test]
async fn test_resend_before_expiry_is_rejected() {
    let provider = Arc::new(MockAuthProvider::new());
    let store = Arc::new(InMemoryUserStore::new());
    let mut controller = controller(&provider, &store);
    controller.request_code(PHONE).await.unwrap();

    let err = controller.resend().await.unwrap_err();
    match err {
        FlowError::Auth(AuthError::ResendUnavailable { remaining }) => {
            assert_eq!(remaining, 60);
        }
        other => panic!("expected resend rejection, got {other:?}"),
    }
    assert_eq!(provider.send_count().await, 1);
}

#[tokio::test(start_paused = true)]
async fn test_countdown_ticks_down_in_real_seconds() {
    let provider = Arc::new(MockAuthProvider::new());
    let store = Arc::new(InMemoryUserStore::new());
    let mut controller = controller(&provider, &store);
    controller.request_code(PHONE).await.unwrap();

    time::sleep(Duration::from_secs(1)).await;
    assert_eq!(controller.remaining_seconds().await, 59);

    time::sleep(Duration::from_secs(29)).await;
    assert_eq!(controller.remaining_seconds().await, 30);
    assert_eq!(controller.state().await, SessionState::Sent);
}

#[tokio::test(start_paused = true)]
async fn test_countdown_expiry_enables_resend() {
    let provider = Arc::new(MockAuthProvider::with_fixed_code(CODE));
    let store = Arc::new(InMemoryUserStore::new());
    let mut controller = controller(&provider, &store);
    controller.request_code(PHONE).await.unwrap();

    time::sleep(Duration::from_secs(61)).await;
    assert_eq!(controller.state().await, SessionState::Expired);
    assert_eq!(controller.remaining_seconds().await, 0);

    // The stale challenge can no longer be exchanged
    let err = controller.submit_code(CODE).await.unwrap_err();
    assert!(matches!(err, FlowError::Auth(AuthError::MissingSession)));

    controller.resend().await.unwrap();
    assert_eq!(controller.state().await, SessionState::Sent);
    assert_eq!(controller.remaining_seconds().await, 60);

    let requests = provider.code_requests().await;
    assert_eq!(requests.len(), 2);
    assert!(!requests[0].resend);
    assert!(requests[1].resend);
}

#[tokio::test(start_paused = true)]
async fn test_new_request_restarts_the_countdown() {
    let provider = Arc::new(MockAuthProvider::new());
    let store = Arc::new(InMemoryUserStore::new());
    let mut controller = controller(&provider, &store);

    controller.request_code(PHONE).await.unwrap();
    time::sleep(Duration::from_secs(40)).await;
    assert_eq!(controller.remaining_seconds().await, 20);

    controller.request_code(PHONE).await.unwrap();
    assert_eq!(controller.remaining_seconds().await, 60);
    time::sleep(Duration::from_secs(10)).await;
    assert_eq!(controller.remaining_seconds().await, 50);
}

#[tokio::test(start_paused = true)]
async fn test_verification_stops_the_countdown() {
    let provider = Arc::new(MockAuthProvider::with_fixed_code(CODE));
    let store = Arc::new(InMemoryUserStore::new());
    let mut controller = controller(&provider, &store);

    controller.request_code(PHONE).await.unwrap();
    time::sleep(Duration::from_secs(10)).await;
    controller.submit_code(CODE).await.unwrap();

    let frozen = controller.remaining_seconds().await;
    time::sleep(Duration::from_secs(30)).await;
    assert_eq!(controller.state().await, SessionState::Verified);
    assert_eq!(controller.remaining_seconds().await, frozen);
}
