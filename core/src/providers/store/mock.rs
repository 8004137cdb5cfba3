use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::entities::UserRecord;
use crate::errors::StoreError;

use super::r#trait::UserStore;

/// In-memory implementation of [`UserStore`] for development and testing
pub struct InMemoryUserStore {
    records: RwLock<HashMap<String, UserRecord>>,
    fail_requests: AtomicBool,
    saves: AtomicU64,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            fail_requests: AtomicBool::new(false),
            saves: AtomicU64::new(0),
        }
    }

    /// Seed a record before the flow under test runs
    pub fn with_record(record: UserRecord) -> Self {
        let mut records = HashMap::new();
        records.insert(record.user_id.clone(), record);
        Self {
            records: RwLock::new(records),
            fail_requests: AtomicBool::new(false),
            saves: AtomicU64::new(0),
        }
    }

    /// Make every store call fail with an outage error
    pub fn set_fail_requests(&self, fail: bool) {
        self.fail_requests.store(fail, Ordering::SeqCst);
    }

    /// Number of successful save calls
    pub fn save_count(&self) -> u64 {
        self.saves.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.fail_requests.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable {
                message: String::from("simulated store outage"),
            });
        }
        Ok(())
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn fetch(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError> {
        self.check_available()?;
        Ok(self.records.read().await.get(user_id).cloned())
    }

    async fn save(&self, record: &UserRecord) -> Result<(), StoreError> {
        self.check_available()?;
        self.records
            .write()
            .await
            .insert(record.user_id.clone(), record.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
