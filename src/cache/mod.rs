// ABOUTME: Cache abstraction layer for the zone distribution and its timestamp
// ABOUTME: Pluggable backend support (in-memory, Redis) behind a single provider trait
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Cache factory selecting a backend from configuration
pub mod factory;
/// In-memory cache implementation
pub mod memory;
/// Redis cache implementation
pub mod redis;

use crate::config::cache::RedisConnectionConfig;
use crate::constants::cache::{
    DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CLEANUP_INTERVAL_SECS, ZONE_DISTRIBUTION_KEY,
    ZONE_DISTRIBUTION_UPDATED_AT_KEY,
};
use crate::errors::AppResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Cache provider trait for pluggable backend implementations
///
/// Values are serialized as JSON. A read observes either the previous value, nothing,
/// or the new value for a key; backends never expose a partially written entry.
///
/// # Examples
///
/// ```rust,no_run
/// use zone_distribution::cache::{CacheConfig, CacheKey, CacheProvider};
/// use zone_distribution::cache::memory::InMemoryCache;
/// use std::time::Duration;
/// # async fn example() -> zone_distribution::errors::AppResult<()> {
///
/// let config = CacheConfig {
///     enable_background_cleanup: false,
///     ..Default::default()
/// };
/// let cache = InMemoryCache::new(config).await?;
///
/// cache
///     .set(&CacheKey::ZoneDistributionUpdatedAt, &"2025-01-01T00:00:00Z", Duration::from_secs(60))
///     .await?;
/// let cached: Option<String> = cache.get(&CacheKey::ZoneDistributionUpdatedAt).await?;
/// assert!(cached.is_some());
/// # Ok(())
/// # }
/// ```
#[async_trait::async_trait]
pub trait CacheProvider: Send + Sync + Clone {
    /// Create new cache instance with configuration
    ///
    /// # Errors
    ///
    /// Returns an error if cache initialization fails
    async fn new(config: CacheConfig) -> AppResult<Self>
    where
        Self: Sized;

    /// Store value in cache with TTL
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or storage fails
    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: Duration,
    ) -> AppResult<()>;

    /// Retrieve value from cache, `None` if absent or expired
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or deserialization fails
    async fn get<T: for<'de> Deserialize<'de>>(&self, key: &CacheKey) -> AppResult<Option<T>>;

    /// Get remaining TTL for key
    ///
    /// # Errors
    ///
    /// Returns an error if TTL check fails
    async fn ttl(&self, key: &CacheKey) -> AppResult<Option<Duration>>;

    /// Verify cache backend is healthy
    ///
    /// # Errors
    ///
    /// Returns an error if health check fails
    async fn health_check(&self) -> AppResult<()>;

    /// Clear all cache entries (for testing/admin)
    ///
    /// # Errors
    ///
    /// Returns an error if clear operation fails
    async fn clear_all(&self) -> AppResult<()>;
}

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries (for in-memory cache)
    pub max_entries: usize,
    /// Redis connection URL; selects the Redis backend when present
    pub redis_url: Option<String>,
    /// Cleanup interval for expired entries
    pub cleanup_interval: Duration,
    /// Enable background cleanup task (should be false in tests to avoid runtime conflicts)
    pub enable_background_cleanup: bool,
    /// Redis connection and retry configuration
    pub redis_connection: RedisConnectionConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            redis_url: None,
            cleanup_interval: Duration::from_secs(DEFAULT_CLEANUP_INTERVAL_SECS),
            enable_background_cleanup: true,
            redis_connection: RedisConnectionConfig::default(),
        }
    }
}

/// Keys written by the refresh orchestrator.
///
/// The distribution and its timestamp are always written together with the same TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Last computed `DistributionResult`
    ZoneDistribution,
    /// Timestamp of the last computation
    ZoneDistributionUpdatedAt,
}

impl CacheKey {
    /// Stable key string shared by every backend
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ZoneDistribution => ZONE_DISTRIBUTION_KEY,
            Self::ZoneDistributionUpdatedAt => ZONE_DISTRIBUTION_UPDATED_AT_KEY,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
