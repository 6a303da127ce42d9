// ABOUTME: Unit tests for in-memory cache implementation
// ABOUTME: Tests TTL expiration, capacity limits, key isolation and the cache factory
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::time::Duration;
use zone_distribution::cache::{
    factory::Cache, memory::InMemoryCache, CacheConfig, CacheKey, CacheProvider,
};
use zone_distribution::models::DistributionResult;

/// Helper: Create in-memory cache with custom capacity
async fn create_test_cache(max_entries: usize) -> Result<Cache> {
    let config = CacheConfig {
        max_entries,
        enable_background_cleanup: false, // Disable in tests to avoid tokio runtime conflicts
        ..CacheConfig::default()
    };
    Ok(Cache::new(config).await?)
}

#[tokio::test]
async fn test_distribution_round_trips_through_cache() -> Result<()> {
    let cache = create_test_cache(100).await?;
    let distribution = common::two_subject_distribution();

    cache
        .set(&CacheKey::ZoneDistribution, &distribution, Duration::from_secs(10))
        .await?;

    let retrieved: Option<DistributionResult> = cache.get(&CacheKey::ZoneDistribution).await?;
    assert_eq!(retrieved, Some(distribution));
    Ok(())
}

#[tokio::test]
async fn test_missing_key_reads_as_absent() -> Result<()> {
    let cache = create_test_cache(100).await?;

    let retrieved: Option<DistributionResult> = cache.get(&CacheKey::ZoneDistribution).await?;
    assert!(retrieved.is_none());
    assert!(cache.ttl(&CacheKey::ZoneDistribution).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_cache_expiration() -> Result<()> {
    let cache = create_test_cache(100).await?;
    let now = Utc::now();

    cache
        .set(&CacheKey::ZoneDistributionUpdatedAt, &now, Duration::from_millis(200))
        .await?;
    let fresh: Option<DateTime<Utc>> = cache.get(&CacheKey::ZoneDistributionUpdatedAt).await?;
    assert_eq!(fresh, Some(now));

    tokio::time::sleep(Duration::from_millis(300)).await;

    let expired: Option<DateTime<Utc>> = cache.get(&CacheKey::ZoneDistributionUpdatedAt).await?;
    assert_eq!(expired, None);
    assert!(cache.ttl(&CacheKey::ZoneDistributionUpdatedAt).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_cache_ttl() -> Result<()> {
    let cache = create_test_cache(100).await?;

    cache
        .set(&CacheKey::ZoneDistribution, &DistributionResult::empty(), Duration::from_secs(10))
        .await?;

    let ttl = cache.ttl(&CacheKey::ZoneDistribution).await?.unwrap();
    assert!(ttl.as_secs() <= 10);
    assert!(ttl.as_secs() >= 9);
    Ok(())
}

#[tokio::test]
async fn test_overwrite_replaces_value_and_ttl() -> Result<()> {
    let cache = create_test_cache(100).await?;

    cache
        .set(&CacheKey::ZoneDistribution, &DistributionResult::empty(), Duration::from_secs(5))
        .await?;
    let distribution = common::two_subject_distribution();
    cache
        .set(&CacheKey::ZoneDistribution, &distribution, Duration::from_secs(60))
        .await?;

    let retrieved: Option<DistributionResult> = cache.get(&CacheKey::ZoneDistribution).await?;
    assert_eq!(retrieved, Some(distribution));
    assert!(cache.ttl(&CacheKey::ZoneDistribution).await?.unwrap().as_secs() > 5);
    Ok(())
}

#[tokio::test]
async fn test_keys_are_independent() -> Result<()> {
    let cache = create_test_cache(100).await?;
    let now = Utc::now();

    cache
        .set(&CacheKey::ZoneDistributionUpdatedAt, &now, Duration::from_secs(60))
        .await?;

    let distribution: Option<DistributionResult> = cache.get(&CacheKey::ZoneDistribution).await?;
    assert!(distribution.is_none());
    Ok(())
}

#[tokio::test]
async fn test_capacity_evicts_least_recently_used() -> Result<()> {
    let cache = create_test_cache(1).await?;

    cache
        .set(&CacheKey::ZoneDistribution, &DistributionResult::empty(), Duration::from_secs(60))
        .await?;
    cache
        .set(&CacheKey::ZoneDistributionUpdatedAt, &Utc::now(), Duration::from_secs(60))
        .await?;

    let evicted: Option<DistributionResult> = cache.get(&CacheKey::ZoneDistribution).await?;
    assert!(evicted.is_none());
    let kept: Option<DateTime<Utc>> = cache.get(&CacheKey::ZoneDistributionUpdatedAt).await?;
    assert!(kept.is_some());
    Ok(())
}

#[tokio::test]
async fn test_clear_all() -> Result<()> {
    let cache = create_test_cache(100).await?;

    cache
        .set(&CacheKey::ZoneDistribution, &DistributionResult::empty(), Duration::from_secs(60))
        .await?;
    cache.clear_all().await?;

    let retrieved: Option<DistributionResult> = cache.get(&CacheKey::ZoneDistribution).await?;
    assert!(retrieved.is_none());
    Ok(())
}

#[tokio::test]
async fn test_background_cleanup_removes_expired_entries() -> Result<()> {
    let cache = InMemoryCache::new(CacheConfig {
        cleanup_interval: Duration::from_millis(50),
        enable_background_cleanup: true,
        ..CacheConfig::default()
    })
    .await?;

    cache
        .set(&CacheKey::ZoneDistribution, &DistributionResult::empty(), Duration::from_millis(20))
        .await?;
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert!(cache.ttl(&CacheKey::ZoneDistribution).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_factory_defaults_to_memory_backend() -> Result<()> {
    let cache = create_test_cache(10).await?;

    assert_eq!(cache.backend_name(), "memory");
    cache.health_check().await?;
    Ok(())
}

#[test]
fn test_cache_key_names() {
    assert_eq!(
        CacheKey::ZoneDistribution.to_string(),
        "heart_rate_zone_percentage_distribution"
    );
    assert_eq!(
        CacheKey::ZoneDistributionUpdatedAt.to_string(),
        "heart_rate_zone_percentage_distribution_updated_at"
    );
}
