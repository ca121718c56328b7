use std::path::Path;
use std::sync::{Arc, Mutex};

use duckdb::{params, Connection};

use crate::{ApiKeyRecord, Authorized, KeyStore, StoreError, StoreFuture};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS api_keys (
    api_key TEXT PRIMARY KEY,
    request_count UINTEGER NOT NULL DEFAULT 0,
    request_limit UINTEGER NOT NULL,
    CHECK (request_count <= request_limit)
);
"#;

/// DuckDB-backed credential store.
///
/// The charge is one conditional UPDATE guarded by the current count; the
/// changed-row count tells success from denial, so two concurrent requests
/// can never both consume the last unit of quota.
#[derive(Clone)]
pub struct DuckDbKeyStore {
    connection: Arc<Mutex<Connection>>,
}

impl DuckDbKeyStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let connection = Connection::open(path.as_ref()).map_err(backend)?;
        Self::with_connection(connection)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let connection = Connection::open_in_memory().map_err(backend)?;
        Self::with_connection(connection)
    }

    fn with_connection(connection: Connection) -> Result<Self, StoreError> {
        connection.execute_batch(SCHEMA).map_err(backend)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    fn charge_sync(&self, key: &str) -> Result<Authorized, StoreError> {
        let connection = self
            .connection
            .lock()
            .expect("key store connection mutex should not be poisoned");

        // The read-check-increment as a single statement; this is the
        // linearization point for the quota invariant.
        let changed = connection
            .execute(
                "UPDATE api_keys
                 SET request_count = request_count + 1
                 WHERE api_key = ? AND request_count < request_limit",
                params![key],
            )
            .map_err(backend)?;

        if changed == 1 {
            let remaining: u32 = connection
                .query_row(
                    "SELECT request_limit - request_count FROM api_keys WHERE api_key = ?",
                    params![key],
                    |row| row.get(0),
                )
                .map_err(backend)?;
            return Ok(Authorized { remaining });
        }

        // No row changed: the key is either absent or exhausted.
        match read_record(&connection, key) {
            Ok(record) if record.exhausted() => Err(StoreError::QuotaExceeded),
            Ok(_) => Err(StoreError::Backend(String::from(
                "conditional charge changed no rows for a chargeable key",
            ))),
            Err(error) => Err(error),
        }
    }
}

fn read_record(connection: &Connection, key: &str) -> Result<ApiKeyRecord, StoreError> {
    let result = connection.query_row(
        "SELECT api_key, request_count, request_limit FROM api_keys WHERE api_key = ?",
        params![key],
        |row| {
            Ok(ApiKeyRecord {
                key: row.get(0)?,
                request_count: row.get(1)?,
                request_limit: row.get(2)?,
            })
        },
    );

    match result {
        Ok(record) => Ok(record),
        Err(duckdb::Error::QueryReturnedNoRows) => Err(StoreError::InvalidCredential),
        Err(error) => Err(backend(error)),
    }
}

fn backend(error: duckdb::Error) -> StoreError {
    StoreError::Backend(error.to_string())
}

impl KeyStore for DuckDbKeyStore {
    fn authorize_and_charge<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Authorized> {
        Box::pin(async move { self.charge_sync(key) })
    }

    fn insert<'a>(&'a self, record: ApiKeyRecord) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let connection = self
                .connection
                .lock()
                .expect("key store connection mutex should not be poisoned");

            if read_record(&connection, &record.key).is_ok() {
                return Err(StoreError::DuplicateKey { key: record.key });
            }

            connection
                .execute(
                    "INSERT INTO api_keys (api_key, request_count, request_limit) VALUES (?, ?, ?)",
                    params![record.key, record.request_count, record.request_limit],
                )
                .map_err(backend)?;
            Ok(())
        })
    }

    fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, ApiKeyRecord> {
        Box::pin(async move {
            let connection = self
                .connection
                .lock()
                .expect("key store connection mutex should not be poisoned");
            read_record(&connection, key)
        })
    }

    fn list<'a>(&'a self) -> StoreFuture<'a, Vec<ApiKeyRecord>> {
        Box::pin(async move {
            let connection = self
                .connection
                .lock()
                .expect("key store connection mutex should not be poisoned");

            let mut statement = connection
                .prepare(
                    "SELECT api_key, request_count, request_limit FROM api_keys ORDER BY api_key",
                )
                .map_err(backend)?;
            let rows = statement
                .query_map([], |row| {
                    Ok(ApiKeyRecord {
                        key: row.get(0)?,
                        request_count: row.get(1)?,
                        request_limit: row.get(2)?,
                    })
                })
                .map_err(backend)?;

            rows.collect::<Result<Vec<_>, _>>().map_err(backend)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded(key: &str, limit: u32) -> DuckDbKeyStore {
        let store = DuckDbKeyStore::open_in_memory().expect("store opens");
        store
            .insert(ApiKeyRecord::new(key, limit).expect("valid record"))
            .await
            .expect("insert succeeds");
        store
    }

    #[tokio::test]
    async fn charge_increments_exactly_once() {
        let store = seeded("k1", 3).await;

        let authorized = store
            .authorize_and_charge("k1")
            .await
            .expect("charge succeeds");
        assert_eq!(authorized.remaining, 2);

        let record = store.get("k1").await.expect("record exists");
        assert_eq!(record.request_count, 1);
        assert_eq!(record.request_limit, 3);
    }

    #[tokio::test]
    async fn denies_after_limit_with_no_further_mutation() {
        let store = seeded("k1", 2).await;

        store.authorize_and_charge("k1").await.expect("first charge");
        store.authorize_and_charge("k1").await.expect("second charge");

        let err = store
            .authorize_and_charge("k1")
            .await
            .expect_err("third charge must fail");
        assert_eq!(err, StoreError::QuotaExceeded);

        let record = store.get("k1").await.expect("record exists");
        assert_eq!(record.request_count, 2);
    }

    #[tokio::test]
    async fn unknown_key_is_invalid_credential() {
        let store = seeded("k1", 2).await;

        let err = store
            .authorize_and_charge("absent")
            .await
            .expect_err("must fail");
        assert_eq!(err, StoreError::InvalidCredential);
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_keys() {
        let store = seeded("k1", 2).await;

        let err = store
            .insert(ApiKeyRecord::new("k1", 9).expect("valid record"))
            .await
            .expect_err("must fail");
        assert!(matches!(err, StoreError::DuplicateKey { .. }));
    }

    #[tokio::test]
    async fn reopening_a_file_store_preserves_counts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("keys.duckdb");

        {
            let store = DuckDbKeyStore::open(&path).expect("store opens");
            store
                .insert(ApiKeyRecord::new("k1", 5).expect("valid record"))
                .await
                .expect("insert succeeds");
            store.authorize_and_charge("k1").await.expect("charge");
        }

        let reopened = DuckDbKeyStore::open(&path).expect("store reopens");
        let record = reopened.get("k1").await.expect("record survives");
        assert_eq!(record.request_count, 1);
        assert_eq!(record.request_limit, 5);
    }

    #[tokio::test]
    async fn list_is_sorted_by_key() {
        let store = seeded("kb", 2).await;
        store
            .insert(ApiKeyRecord::new("ka", 1).expect("valid record"))
            .await
            .expect("insert succeeds");

        let records = store.list().await.expect("list succeeds");
        let keys = records.iter().map(|r| r.key.as_str()).collect::<Vec<_>>();
        assert_eq!(keys, ["ka", "kb"]);
    }
}
