// ABOUTME: Cache factory for environment-based backend selection
// ABOUTME: Dispatches to Redis when a URL is configured, otherwise the in-memory LRU
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::memory::InMemoryCache;
use super::redis::RedisCache;
use super::{CacheConfig, CacheKey, CacheProvider};
use crate::errors::AppResult;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Clone)]
enum Backend {
    Memory(InMemoryCache),
    Redis(RedisCache),
}

/// Unified cache interface used by the server and tooling
#[derive(Clone)]
pub struct Cache {
    backend: Backend,
}

impl Cache {
    /// Create cache from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is malformed or the backend fails to start
    pub async fn from_env() -> AppResult<Self> {
        <Self as CacheProvider>::new(CacheConfig::from_env()?).await
    }

    /// Backend name for logs and health output
    #[must_use]
    pub const fn backend_name(&self) -> &'static str {
        match self.backend {
            Backend::Memory(_) => "memory",
            Backend::Redis(_) => "redis",
        }
    }
}

#[async_trait::async_trait]
impl CacheProvider for Cache {
    async fn new(config: CacheConfig) -> AppResult<Self> {
        let backend = if config.redis_url.is_some() {
            tracing::info!("Initializing Redis cache");
            Backend::Redis(RedisCache::new(config).await?)
        } else {
            tracing::info!(
                "Initializing in-memory cache (max entries: {})",
                config.max_entries
            );
            Backend::Memory(InMemoryCache::new(config).await?)
        };
        Ok(Self { backend })
    }

    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: Duration,
    ) -> AppResult<()> {
        match &self.backend {
            Backend::Memory(cache) => cache.set(key, value, ttl).await,
            Backend::Redis(cache) => cache.set(key, value, ttl).await,
        }
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, key: &CacheKey) -> AppResult<Option<T>> {
        match &self.backend {
            Backend::Memory(cache) => cache.get(key).await,
            Backend::Redis(cache) => cache.get(key).await,
        }
    }

    async fn ttl(&self, key: &CacheKey) -> AppResult<Option<Duration>> {
        match &self.backend {
            Backend::Memory(cache) => cache.ttl(key).await,
            Backend::Redis(cache) => cache.ttl(key).await,
        }
    }

    async fn health_check(&self) -> AppResult<()> {
        match &self.backend {
            Backend::Memory(cache) => cache.health_check().await,
            Backend::Redis(cache) => cache.health_check().await,
        }
    }

    async fn clear_all(&self) -> AppResult<()> {
        match &self.backend {
            Backend::Memory(cache) => cache.clear_all().await,
            Backend::Redis(cache) => cache.clear_all().await,
        }
    }
}
