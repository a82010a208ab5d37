use std::sync::Arc;

use dashmap::DashMap;

use credentials_core::{AccountId, ThrottleRecord, ThrottleStore, ThrottleStoreError};

/// Throttle records keyed by account. `modify` holds the shard lock for the
/// entry, making counter increments atomic.
#[derive(Default, Clone)]
pub struct DashMapThrottleStore {
    records: Arc<DashMap<AccountId, ThrottleRecord>>,
}

impl DashMapThrottleStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(DashMap::new()),
        }
    }
}

#[async_trait::async_trait]
impl ThrottleStore for DashMapThrottleStore {
    async fn get(&self, account_id: AccountId) -> Result<ThrottleRecord, ThrottleStoreError> {
        let record = self
            .records
            .entry(account_id)
            .or_insert_with(|| ThrottleRecord::new(account_id));
        Ok(record.value().clone())
    }

    async fn modify<F, T>(&self, account_id: AccountId, mutate: F) -> Result<T, ThrottleStoreError>
    where
        F: FnOnce(&mut ThrottleRecord) -> T + Send,
        T: Send,
    {
        let mut record = self
            .records
            .entry(account_id)
            .or_insert_with(|| ThrottleRecord::new(account_id));
        Ok(mutate(record.value_mut()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use credentials_core::ThrottlePolicy;

    #[tokio::test]
    async fn records_are_created_lazily() {
        let store = DashMapThrottleStore::new();
        let id = AccountId::new();

        let record = store.get(id).await.unwrap();
        assert_eq!(record.account_id(), id);
        assert_eq!(record.attempts(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_failures_are_all_counted() {
        let store = DashMapThrottleStore::new();
        let id = AccountId::new();
        let policy = ThrottlePolicy {
            attempt_limit: 1_000,
            ..ThrottlePolicy::default()
        };

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .modify(id, |record| record.record_failure(&policy, Utc::now()))
                        .await
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.get(id).await.unwrap().attempts(), 50);
    }
}
