//! Cache backend trait

use std::any::Any;
use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CacheError;

/// Counters reported by a cache backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: u64,
    pub hits: u64,
    pub misses: u64,
}

/// Key-value cache capability set
///
/// Expiry arguments are duration expressions ("10 min", "2 hours", or bare
/// seconds); a missing or unparsable expression falls back to the backend's
/// configured default expiry. An expiry of zero seconds means the entry
/// never expires.
#[async_trait]
pub trait Cache: Any + Debug + Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store a value under `key`.
    async fn set(&self, key: &str, value: &str, expire: Option<&str>) -> Result<(), CacheError>;

    /// Overwrite an existing key, falling back to a plain store when the
    /// key is missing.
    async fn replace(
        &self,
        key: &str,
        value: &str,
        expire: Option<&str>,
    ) -> Result<(), CacheError>;

    /// Remove a key; returns whether it existed.
    async fn delete(&self, key: &str) -> Result<bool, CacheError>;

    async fn exists(&self, key: &str) -> Result<bool, CacheError>;

    async fn stats(&self) -> Result<CacheStats, CacheError>;
}
