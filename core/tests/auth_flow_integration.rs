//! End to end tests across flows sharing one provider and one store
//!
//! These exercise the public API the way the app's screens do: several
//! flow instances, a single identity provider, a single document store.

use std::sync::Arc;

use cl_core::domain::entities::UserRole;
use cl_core::domain::value_objects::RouteDestination;
use cl_core::errors::{AuthError, FlowError};
use cl_core::providers::{InMemoryUserStore, MockAuthProvider, UserStore};
use cl_core::services::login::EmailLoginFlow;
use cl_core::services::registration::{EmailRegistrationFlow, EmailVerificationConfig};
use cl_core::services::verification::{PhoneVerificationController, VerificationConfig};

const PHONE: &str = "+254712345678";

#[tokio::test(start_paused = true)]
async fn test_registration_then_login_share_one_record() {
    let provider = Arc::new(MockAuthProvider::new());
    provider.set_verify_after_reloads(2).await;
    let store = Arc::new(InMemoryUserStore::new());

    let registration = EmailRegistrationFlow::new(
        Arc::clone(&provider),
        Arc::clone(&store),
        EmailVerificationConfig::default(),
    );
    let registered = registration
        .register(
            "amina@example.com",
            "correct-horse",
            "correct-horse",
            UserRole::Doctor,
        )
        .await
        .unwrap();
    assert_eq!(registered.destination, RouteDestination::DoctorHome);

    // The login screen routes off the record registration wrote
    let login = EmailLoginFlow::new(Arc::clone(&provider), Arc::clone(&store), None);
    let signed_in = login
        .login("amina@example.com", "correct-horse")
        .await
        .unwrap();
    assert_eq!(signed_in.identity.user_id, registered.identity.user_id);
    assert_eq!(signed_in.destination, RouteDestination::DoctorHome);
}

#[tokio::test(start_paused = true)]
async fn test_patient_cannot_enter_through_the_doctor_screen() {
    let provider = Arc::new(MockAuthProvider::new());
    provider.set_verify_after_reloads(1).await;
    let store = Arc::new(InMemoryUserStore::new());

    let registration = EmailRegistrationFlow::new(
        Arc::clone(&provider),
        Arc::clone(&store),
        EmailVerificationConfig::default(),
    );
    registration
        .register(
            "joseph@example.com",
            "correct-horse",
            "correct-horse",
            UserRole::Patient,
        )
        .await
        .unwrap();

    let doctor_login = EmailLoginFlow::new(
        Arc::clone(&provider),
        Arc::clone(&store),
        Some(UserRole::Doctor),
    );
    let err = doctor_login
        .login("joseph@example.com", "correct-horse")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        FlowError::Auth(AuthError::RoleMismatch {
            expected: UserRole::Doctor
        })
    ));

    // The patient screen still works
    let patient_login = EmailLoginFlow::new(provider, store, Some(UserRole::Patient));
    let outcome = patient_login
        .login("joseph@example.com", "correct-horse")
        .await
        .unwrap();
    assert_eq!(outcome.destination, RouteDestination::PatientHome);
}

#[tokio::test]
async fn test_repeat_phone_sign_in_reuses_the_contact_record() {
    let provider = Arc::new(MockAuthProvider::with_fixed_code("123456"));
    let store = Arc::new(InMemoryUserStore::new());

    let mut first = PhoneVerificationController::new(
        Arc::clone(&provider),
        Arc::clone(&store),
        VerificationConfig::default(),
    );
    first.request_code(PHONE).await.unwrap();
    let outcome = first.submit_code("123456").await.unwrap();
    assert_eq!(outcome.destination, RouteDestination::Stay);
    assert_eq!(store.save_count(), 1);

    // Same person, new screen: the provider hands out the same user id
    // and the flow finds the record it wrote last time
    provider
        .seed_phone_identity(PHONE, outcome.identity.user_id.clone())
        .await;
    let mut second = PhoneVerificationController::new(
        Arc::clone(&provider),
        Arc::clone(&store),
        VerificationConfig::default(),
    );
    second.request_code(PHONE).await.unwrap();
    let repeat = second.submit_code("123456").await.unwrap();

    assert_eq!(repeat.identity.user_id, outcome.identity.user_id);
    assert_eq!(repeat.destination, RouteDestination::Stay);
    assert_eq!(store.save_count(), 1);

    let record = store
        .fetch(&outcome.identity.user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.phone_number.as_deref(), Some(PHONE));
    assert_eq!(record.role, None);
}
