//! Redis cache backend

use async_trait::async_trait;
use dblink_core::parse_duration;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::backend::{Cache, CacheStats};
use crate::error::CacheError;
use crate::memory::DEFAULT_EXPIRY_SECS;

/// Connection settings for [`RedisCache`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default)]
    pub key_prefix: String,
    /// Default expiry as a duration expression, applied when an operation
    /// does not carry its own.
    #[serde(default = "default_expiry")]
    pub default_expiry: String,
}

fn default_expiry() -> String {
    "1 hour".to_string()
}

/// Redis-backed cache store
#[derive(Debug)]
pub struct RedisCache {
    client: redis::Client,
    key_prefix: String,
    default_expiry: u64,
}

impl RedisCache {
    pub fn new(config: &RedisConfig) -> Result<Self, CacheError> {
        info!("using Redis cache store");
        let client = redis::Client::open(config.url.as_str())?;
        Ok(Self {
            client,
            key_prefix: config.key_prefix.clone(),
            default_expiry: parse_duration(Some(&config.default_expiry), DEFAULT_EXPIRY_SECS),
        })
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, CacheError> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }

    fn prefixed(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.connection().await?;
        Ok(conn.get(self.prefixed(key)).await?)
    }

    async fn set(&self, key: &str, value: &str, expire: Option<&str>) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        let ttl = parse_duration(expire, self.default_expiry);
        if ttl == 0 {
            Ok(conn.set(self.prefixed(key), value).await?)
        } else {
            Ok(conn.set_ex(self.prefixed(key), value, ttl).await?)
        }
    }

    async fn replace(
        &self,
        key: &str,
        value: &str,
        expire: Option<&str>,
    ) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        let key = self.prefixed(key);
        let ttl = parse_duration(expire, self.default_expiry);

        // SET XX only succeeds when the key already exists.
        let mut cmd = redis::cmd("SET");
        cmd.arg(&key).arg(value).arg("XX");
        if ttl > 0 {
            cmd.arg("EX").arg(ttl);
        }
        let replaced: Option<String> = cmd.query_async(&mut conn).await?;

        if replaced.is_none() {
            // Replacing a missing key degrades to a plain store.
            if ttl == 0 {
                conn.set::<_, _, ()>(&key, value).await?;
            } else {
                conn.set_ex::<_, _, ()>(&key, value, ttl).await?;
            }
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        let mut conn = self.connection().await?;
        let removed: u64 = conn.del(self.prefixed(key)).await?;
        Ok(removed > 0)
    }

    async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        let mut conn = self.connection().await?;
        Ok(conn.exists(self.prefixed(key)).await?)
    }

    async fn stats(&self) -> Result<CacheStats, CacheError> {
        let mut conn = self.connection().await?;
        let entries: u64 = redis::cmd("DBSIZE").query_async(&mut conn).await?;
        let info: String = redis::cmd("INFO").arg("stats").query_async(&mut conn).await?;
        Ok(CacheStats {
            entries,
            hits: info_counter(&info, "keyspace_hits"),
            misses: info_counter(&info, "keyspace_misses"),
        })
    }
}

/// Pull a single numeric counter out of an INFO section.
fn info_counter(info: &str, field: &str) -> u64 {
    info.lines()
        .find_map(|line| line.strip_prefix(field)?.strip_prefix(':')?.trim().parse().ok())
        .unwrap_or(0)
}
