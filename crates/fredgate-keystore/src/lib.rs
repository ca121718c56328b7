//! Credential store contracts for fredgate.
//!
//! The store is the only durable entity in the system: a mapping from API key
//! to quota state. The one hard invariant lives here: under arbitrary
//! concurrency a key never collects more successful charges than its
//! `request_limit`, so every implementation performs the read-check-increment
//! as a single atomic operation.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod duckdb_store;
mod memory;

pub use duckdb_store::DuckDbKeyStore;
pub use memory::MemoryKeyStore;

/// Persistent quota state for one credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeyRecord {
    pub key: String,
    pub request_count: u32,
    pub request_limit: u32,
}

impl ApiKeyRecord {
    /// Fresh record with a zero count. The limit must be positive and the
    /// key non-empty; both are provisioning errors, not request errors.
    pub fn new(key: impl Into<String>, request_limit: u32) -> Result<Self, StoreError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(StoreError::EmptyKey);
        }
        if request_limit == 0 {
            return Err(StoreError::InvalidLimit);
        }
        Ok(Self {
            key,
            request_count: 0,
            request_limit,
        })
    }

    pub const fn remaining(&self) -> u32 {
        self.request_limit.saturating_sub(self.request_count)
    }

    pub const fn exhausted(&self) -> bool {
        self.request_count >= self.request_limit
    }
}

/// Successful charge: the request may proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authorized {
    /// Requests left after this charge, for logging and response headers.
    pub remaining: u32,
}

/// Credential store errors. `InvalidCredential` and `QuotaExceeded` are the
/// request-path denials; the rest are provisioning or backend faults.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("unknown API key")]
    InvalidCredential,

    #[error("request quota exhausted for this API key")]
    QuotaExceeded,

    #[error("API key already exists: '{key}'")]
    DuplicateKey { key: String },

    #[error("API key cannot be empty")]
    EmptyKey,

    #[error("request limit must be greater than zero")]
    InvalidLimit,

    #[error("credential store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidCredential => "auth.invalid_credential",
            Self::QuotaExceeded => "auth.quota_exceeded",
            Self::DuplicateKey { .. } => "store.duplicate_key",
            Self::EmptyKey => "store.empty_key",
            Self::InvalidLimit => "store.invalid_limit",
            Self::Backend(_) => "store.backend",
        }
    }
}

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Credential store contract.
///
/// `authorize_and_charge` is the quota enforcer: it validates the presented
/// key and records exactly one unit of consumption in one atomic step. A
/// denial never mutates the record. The remaining operations exist for
/// provisioning and inspection and are never on the request path.
pub trait KeyStore: Send + Sync {
    fn authorize_and_charge<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Authorized>;
    fn insert<'a>(&'a self, record: ApiKeyRecord) -> StoreFuture<'a, ()>;
    fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, ApiKeyRecord>;
    fn list<'a>(&'a self) -> StoreFuture<'a, Vec<ApiKeyRecord>>;
}
