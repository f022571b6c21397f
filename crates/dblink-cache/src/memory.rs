//! In-memory cache backend

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dblink_core::parse_duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::info;

use crate::backend::{Cache, CacheStats};
use crate::error::CacheError;

/// Default expiry applied when neither the operation nor the configuration
/// carries one.
pub const DEFAULT_EXPIRY_SECS: u64 = 3600;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    deadline: Option<Instant>,
}

impl Entry {
    fn new(value: &str, ttl: u64) -> Self {
        Self {
            value: value.to_string(),
            // ttl 0 means the entry never expires
            deadline: (ttl > 0).then(|| Instant::now() + Duration::from_secs(ttl)),
        }
    }

    fn is_live(&self) -> bool {
        self.deadline.map_or(true, |deadline| deadline > Instant::now())
    }
}

/// Process-local cache store
///
/// Expired entries are swept opportunistically every thousand operations,
/// and filtered on read in between.
#[derive(Debug)]
pub struct MemoryCache {
    store: RwLock<HashMap<String, Entry>>,
    default_expiry: u64,
    hits: AtomicU64,
    misses: AtomicU64,
    operations: AtomicU64,
}

impl MemoryCache {
    pub fn new(default_expiry: u64) -> Self {
        info!("using in-memory cache store");
        Self {
            store: RwLock::new(HashMap::new()),
            default_expiry,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            operations: AtomicU64::new(0),
        }
    }

    async fn maybe_sweep(&self) {
        let count = self.operations.fetch_add(1, Ordering::Relaxed);
        if count.is_multiple_of(1000) {
            self.store.write().await.retain(|_, entry| entry.is_live());
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_EXPIRY_SECS)
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.maybe_sweep().await;
        let store = self.store.read().await;
        match store.get(key) {
            Some(entry) if entry.is_live() => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Ok(Some(entry.value.clone()))
            }
            _ => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: &str, expire: Option<&str>) -> Result<(), CacheError> {
        self.maybe_sweep().await;
        let ttl = parse_duration(expire, self.default_expiry);
        self.store
            .write()
            .await
            .insert(key.to_string(), Entry::new(value, ttl));
        Ok(())
    }

    async fn replace(
        &self,
        key: &str,
        value: &str,
        expire: Option<&str>,
    ) -> Result<(), CacheError> {
        // Same write path either way: replacing a missing key degrades to set.
        self.set(key, value, expire).await
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        let removed = self.store.write().await.remove(key);
        Ok(removed.map_or(false, |entry| entry.is_live()))
    }

    async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        let store = self.store.read().await;
        Ok(store.get(key).map_or(false, |entry| entry.is_live()))
    }

    async fn stats(&self) -> Result<CacheStats, CacheError> {
        let store = self.store.read().await;
        Ok(CacheStats {
            entries: store.values().filter(|entry| entry.is_live()).count() as u64,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        })
    }
}
