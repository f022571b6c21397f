//! Cache backend selection

use std::sync::Arc;

use serde::Deserialize;

use crate::backend::Cache;
use crate::error::CacheError;
use crate::memory::{DEFAULT_EXPIRY_SECS, MemoryCache};
use crate::redis::{RedisCache, RedisConfig};

/// Which cache backend to use, with its settings
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub enum CacheConfig {
    #[default]
    #[serde(rename = "memory")]
    Memory,
    #[serde(rename = "redis")]
    Redis(RedisConfig),
}

impl CacheConfig {
    pub fn to_backend(&self) -> Result<Arc<dyn Cache>, CacheError> {
        match self {
            CacheConfig::Memory => Ok(Arc::new(MemoryCache::new(DEFAULT_EXPIRY_SECS))),
            CacheConfig::Redis(config) => Ok(Arc::new(RedisCache::new(config)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::any::{Any, TypeId};

    use super::*;

    #[tokio::test]
    async fn test_memory_backend() {
        let backend = CacheConfig::Memory.to_backend().unwrap();
        assert_eq!((*backend).type_id(), TypeId::of::<MemoryCache>());
    }

    #[tokio::test]
    async fn test_redis_backend() {
        let config = CacheConfig::Redis(RedisConfig {
            url: "redis://localhost:6379/0".to_string(),
            key_prefix: "dblink:".to_string(),
            default_expiry: "1 hour".to_string(),
        });
        let backend = config.to_backend().unwrap();
        assert_eq!((*backend).type_id(), TypeId::of::<RedisCache>());
    }
}
