//! dblink Cache Layer
//!
//! This crate provides the key-value caching interface for dblink, with
//! in-memory and Redis backends. Expiry arguments are human-readable
//! duration expressions ("10 min", "2 hours") resolved by dblink-core.

pub mod backend;
pub mod config;
pub mod error;
pub mod memory;
pub mod redis;

pub use backend::{Cache, CacheStats};
pub use config::CacheConfig;
pub use error::CacheError;
pub use memory::MemoryCache;
pub use self::redis::{RedisCache, RedisConfig};
