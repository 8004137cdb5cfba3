use async_trait::async_trait;

use crate::domain::entities::UserRecord;
use crate::errors::StoreError;

/// Document store holding one [`UserRecord`] per authenticated user.
///
/// The store is keyed by the provider-issued user id. Implementations talk
/// to the hosted document database; [`InMemoryUserStore`](super::InMemoryUserStore)
/// backs tests and demos.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch the record for `user_id`.
    ///
    /// # Returns
    /// * `Ok(Some(record))` - The record exists
    /// * `Ok(None)` - No record has been written for this user yet
    /// * `Err(StoreError)` - The store could not be reached or returned
    ///   a document that does not parse
    async fn fetch(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Write `record` under its own `user_id`, replacing any prior fields.
    async fn save(&self, record: &UserRecord) -> Result<(), StoreError>;
}
