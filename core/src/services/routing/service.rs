//! Resolves a signed-in user's stored role to a screen destination

use std::sync::Arc;

use crate::domain::entities::UserRole;
use crate::domain::value_objects::RouteDestination;
use crate::errors::{FlowError, FlowResult};
use crate::providers::UserStore;

/// Looks up a user's stored role and maps it to a destination
///
/// Unknown users and records without a role resolve to
/// [`RouteDestination::Stay`]. Only a store failure surfaces as an error;
/// a missing document never does.
pub struct RoleRouter<S: UserStore> {
    store: Arc<S>,
}

impl<S: UserStore> RoleRouter<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Fetch the stored role for `user_id`
    pub async fn resolve_role(&self, user_id: &str) -> FlowResult<Option<UserRole>> {
        let record = self.store.fetch(user_id).await.map_err(|err| {
            tracing::error!(
                user_id,
                error = %err,
                event = "role_lookup_failed",
                "user record fetch failed"
            );
            FlowError::lookup(err)
        })?;

        match record {
            Some(record) => {
                if record.role.is_none() {
                    tracing::warn!(user_id, "user record exists but carries no role");
                }
                Ok(record.role)
            }
            None => {
                tracing::warn!(user_id, "no user record found");
                Ok(None)
            }
        }
    }

    /// Resolve the destination for `user_id`
    pub async fn resolve_route(&self, user_id: &str) -> FlowResult<RouteDestination> {
        Ok(RouteDestination::for_role(self.resolve_role(user_id).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::UserRecord;
    use crate::providers::InMemoryUserStore;

    #[tokio::test]
    async fn test_doctor_routes_to_doctor_home() {
        let store = Arc::new(InMemoryUserStore::with_record(UserRecord::verified_email(
            "user-1",
            "amina@example.com",
            UserRole::Doctor,
        )));
        let router = RoleRouter::new(store);

        assert_eq!(router.resolve_role("user-1").await.unwrap(), Some(UserRole::Doctor));
        assert_eq!(
            router.resolve_route("user-1").await.unwrap(),
            RouteDestination::DoctorHome
        );
    }

    #[tokio::test]
    async fn test_patient_routes_to_patient_home() {
        let store = Arc::new(InMemoryUserStore::with_record(UserRecord::verified_email(
            "user-2",
            "joseph@example.com",
            UserRole::Patient,
        )));
        let router = RoleRouter::new(store);

        assert_eq!(
            router.resolve_route("user-2").await.unwrap(),
            RouteDestination::PatientHome
        );
    }

    #[tokio::test]
    async fn test_unknown_user_stays_put() {
        let router = RoleRouter::new(Arc::new(InMemoryUserStore::new()));

        assert_eq!(router.resolve_role("ghost").await.unwrap(), None);
        assert_eq!(
            router.resolve_route("ghost").await.unwrap(),
            RouteDestination::Stay
        );
    }

    #[tokio::test]
    async fn test_roleless_record_stays_put() {
        let store = Arc::new(InMemoryUserStore::with_record(UserRecord::phone_contact(
            "user-3",
            "+254712345678",
        )));
        let router = RoleRouter::new(store);

        assert_eq!(router.resolve_role("user-3").await.unwrap(), None);
        assert_eq!(
            router.resolve_route("user-3").await.unwrap(),
            RouteDestination::Stay
        );
    }

    #[tokio::test]
    async fn test_store_failure_is_an_error_not_a_stay() {
        let store = Arc::new(InMemoryUserStore::new());
        store.set_fail_requests(true);
        let router = RoleRouter::new(store);

        let err = router.resolve_route("user-1").await.unwrap_err();
        assert!(matches!(err, FlowError::Lookup { .. }));
    }
}
