use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::{ApiKeyRecord, Authorized, KeyStore, StoreError, StoreFuture};

/// In-memory credential store.
///
/// The default store when no database path is configured, and the test
/// double for the server. The check-and-increment runs under a single mutex
/// guard, so concurrent charges against the same key serialize and the quota
/// invariant holds.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyStore {
    records: Arc<Mutex<HashMap<String, ApiKeyRecord>>>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with records, for tests.
    pub fn with_records(records: impl IntoIterator<Item = ApiKeyRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (record.key.clone(), record))
            .collect();
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }

    fn charge_sync(&self, key: &str) -> Result<Authorized, StoreError> {
        let mut records = self
            .records
            .lock()
            .expect("key store mutex should not be poisoned");

        let record = records.get_mut(key).ok_or(StoreError::InvalidCredential)?;
        if record.exhausted() {
            return Err(StoreError::QuotaExceeded);
        }

        record.request_count += 1;
        Ok(Authorized {
            remaining: record.remaining(),
        })
    }
}

impl KeyStore for MemoryKeyStore {
    fn authorize_and_charge<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Authorized> {
        Box::pin(async move { self.charge_sync(key) })
    }

    fn insert<'a>(&'a self, record: ApiKeyRecord) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let mut records = self
                .records
                .lock()
                .expect("key store mutex should not be poisoned");

            if records.contains_key(&record.key) {
                return Err(StoreError::DuplicateKey {
                    key: record.key,
                });
            }

            records.insert(record.key.clone(), record);
            Ok(())
        })
    }

    fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, ApiKeyRecord> {
        Box::pin(async move {
            self.records
                .lock()
                .expect("key store mutex should not be poisoned")
                .get(key)
                .cloned()
                .ok_or(StoreError::InvalidCredential)
        })
    }

    fn list<'a>(&'a self) -> StoreFuture<'a, Vec<ApiKeyRecord>> {
        Box::pin(async move {
            let mut records = self
                .records
                .lock()
                .expect("key store mutex should not be poisoned")
                .values()
                .cloned()
                .collect::<Vec<_>>();
            records.sort_by(|a, b| a.key.cmp(&b.key));
            Ok(records)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(key: &str, count: u32, limit: u32) -> MemoryKeyStore {
        MemoryKeyStore::with_records([ApiKeyRecord {
            key: key.to_owned(),
            request_count: count,
            request_limit: limit,
        }])
    }

    #[tokio::test]
    async fn charges_valid_key_once() {
        let store = seeded("k1", 0, 3);

        let authorized = store
            .authorize_and_charge("k1")
            .await
            .expect("charge should succeed");
        assert_eq!(authorized.remaining, 2);

        let record = store.get("k1").await.expect("record exists");
        assert_eq!(record.request_count, 1);
    }

    #[tokio::test]
    async fn unknown_key_is_rejected_without_mutation() {
        let store = seeded("k1", 0, 3);

        let err = store
            .authorize_and_charge("absent")
            .await
            .expect_err("must fail");
        assert_eq!(err, StoreError::InvalidCredential);

        let record = store.get("k1").await.expect("record exists");
        assert_eq!(record.request_count, 0);
    }

    #[tokio::test]
    async fn exhausted_key_is_denied_without_mutation() {
        let store = seeded("k1", 2, 2);

        let err = store
            .authorize_and_charge("k1")
            .await
            .expect_err("must fail");
        assert_eq!(err, StoreError::QuotaExceeded);

        let record = store.get("k1").await.expect("record exists");
        assert_eq!(record.request_count, 2);
    }

    #[tokio::test]
    async fn insert_rejects_duplicates() {
        let store = seeded("k1", 0, 3);

        let err = store
            .insert(ApiKeyRecord::new("k1", 10).expect("valid record"))
            .await
            .expect_err("must fail");
        assert!(matches!(err, StoreError::DuplicateKey { .. }));
    }
}
