// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: In-memory database fixtures, quiet logging and cache/aggregator test doubles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `zone_distribution`

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;
use zone_distribution::{
    aggregation::{AggregationStrategy, ZoneAggregator},
    cache::{factory::Cache, CacheConfig, CacheKey, CacheProvider},
    config::{database::DatabaseUrl, distribution::DistributionConfig},
    database::Database,
    errors::{AppError, AppResult},
    models::{DistributionResult, NewHeartRate, NewSession, NewUser, ZoneBounds},
    refresh::{RefreshWorker, ZoneDistributionService},
};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Fresh, migrated in-memory database
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    Ok(Database::new(&DatabaseUrl::Memory, 1).await?)
}

/// In-memory cache without the background cleanup task
pub async fn create_test_cache() -> Result<Cache> {
    let config = CacheConfig {
        enable_background_cleanup: false,
        ..CacheConfig::default()
    };
    Ok(Cache::new(config).await?)
}

/// Distribution settings suitable for tests
pub fn test_distribution_config() -> DistributionConfig {
    DistributionConfig {
        ttl: Duration::from_secs(3600),
        reference_batch_size: 3,
        ..DistributionConfig::default()
    }
}

/// Zones A: [50,100] [100,120] [120,140] [140,160]
pub const JOHN_ZONES: ZoneBounds =
    ZoneBounds::from_pairs([(50, 100), (100, 120), (120, 140), (140, 160)]);

/// Zones B: [55,95] [95,115] [115,135] [135,155]
pub const JANE_ZONES: ZoneBounds =
    ZoneBounds::from_pairs([(55, 95), (95, 115), (115, 135), (135, 155)]);

/// Ids created by [`seed_two_subjects`]
#[derive(Debug, Clone, Copy)]
pub struct TwoSubjects {
    pub john_id: i64,
    pub jane_id: i64,
    pub john_session: i64,
    pub jane_session: i64,
}

pub fn ts(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("valid timestamp")
}

pub async fn create_user(db: &Database, username: &str, zones: ZoneBounds) -> Result<i64> {
    Ok(db.create_user(&NewUser::new(username, zones)).await?)
}

pub async fn create_session(db: &Database, user_id: i64, created_at: DateTime<Utc>) -> Result<i64> {
    Ok(db
        .create_session(&NewSession {
            user_id,
            duration_in_secs: Some(1200),
            created_at: Some(created_at),
        })
        .await?)
}

/// Insert `(bpm, duration)` pairs into a session
pub async fn insert_samples(
    db: &Database,
    session_id: i64,
    samples: &[(Option<i64>, Option<i64>)],
) -> Result<()> {
    let rows: Vec<NewHeartRate> = samples
        .iter()
        .map(|&(bpm, duration_in_secs)| NewHeartRate {
            session_id,
            bpm,
            duration_in_secs,
            ..NewHeartRate::default()
        })
        .collect();
    db.insert_heart_rates(&rows).await?;
    Ok(())
}

/// John and Jane with four 300 s samples each; expected distribution is
/// zone1 87.5, unzoned 12.5
pub async fn seed_two_subjects(db: &Database) -> Result<TwoSubjects> {
    let john_id = create_user(db, "john", JOHN_ZONES).await?;
    let jane_id = create_user(db, "jane", JANE_ZONES).await?;

    let john_session = create_session(db, john_id, ts(2024, 3, 1, 8, 0)).await?;
    let jane_session = create_session(db, jane_id, ts(2024, 3, 2, 9, 30)).await?;

    let every_300 = |bpms: [i64; 4]| bpms.map(|bpm| (Some(bpm), Some(300)));
    insert_samples(db, john_session, &every_300([62, 75, 88, 70])).await?;
    insert_samples(db, jane_session, &every_300([50, 90, 60, 60])).await?;

    Ok(TwoSubjects {
        john_id,
        jane_id,
        john_session,
        jane_session,
    })
}

/// Aggregator returning a fixed result and counting calls
#[derive(Clone)]
pub struct CountingAggregator {
    pub calls: Arc<AtomicUsize>,
    result: DistributionResult,
    delay: Duration,
    fail: bool,
}

impl CountingAggregator {
    pub fn returning(result: DistributionResult) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            result,
            delay: Duration::ZERO,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::returning(DistributionResult::empty())
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ZoneAggregator for CountingAggregator {
    fn strategy(&self) -> AggregationStrategy {
        AggregationStrategy::Pushdown
    }

    async fn aggregate(&self) -> AppResult<DistributionResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            return Err(AppError::database("no such table: heart_rates"));
        }
        Ok(self.result.clone())
    }
}

/// Cache store whose every operation fails
#[derive(Clone, Default)]
pub struct FailingCache;

#[async_trait]
impl CacheProvider for FailingCache {
    async fn new(_config: CacheConfig) -> AppResult<Self> {
        Ok(Self)
    }

    async fn set<T: Serialize + Send + Sync>(
        &self,
        _key: &CacheKey,
        _value: &T,
        _ttl: Duration,
    ) -> AppResult<()> {
        Err(AppError::cache("cache unreachable"))
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, _key: &CacheKey) -> AppResult<Option<T>> {
        Err(AppError::cache("cache unreachable"))
    }

    async fn ttl(&self, _key: &CacheKey) -> AppResult<Option<Duration>> {
        Err(AppError::cache("cache unreachable"))
    }

    async fn health_check(&self) -> AppResult<()> {
        Err(AppError::cache("cache unreachable"))
    }

    async fn clear_all(&self) -> AppResult<()> {
        Err(AppError::cache("cache unreachable"))
    }
}

/// In-memory cache that refuses writes to one key
#[derive(Clone)]
pub struct KeyFailingCache {
    pub inner: Cache,
    pub failing_key: CacheKey,
}

impl KeyFailingCache {
    pub async fn failing_on(failing_key: CacheKey) -> Result<Self> {
        Ok(Self {
            inner: create_test_cache().await?,
            failing_key,
        })
    }
}

#[async_trait]
impl CacheProvider for KeyFailingCache {
    async fn new(config: CacheConfig) -> AppResult<Self> {
        Ok(Self {
            inner: Cache::new(config).await?,
            failing_key: CacheKey::ZoneDistributionUpdatedAt,
        })
    }

    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: Duration,
    ) -> AppResult<()> {
        if *key == self.failing_key {
            return Err(AppError::cache("write rejected"));
        }
        self.inner.set(key, value, ttl).await
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, key: &CacheKey) -> AppResult<Option<T>> {
        self.inner.get(key).await
    }

    async fn ttl(&self, key: &CacheKey) -> AppResult<Option<Duration>> {
        self.inner.ttl(key).await
    }

    async fn health_check(&self) -> AppResult<()> {
        self.inner.health_check().await
    }

    async fn clear_all(&self) -> AppResult<()> {
        self.inner.clear_all().await
    }
}

/// Service over `cache` with `aggregator`, worker not yet started
pub fn build_service<C: CacheProvider + 'static>(
    cache: C,
    aggregator: Arc<dyn ZoneAggregator>,
    config: &DistributionConfig,
) -> (ZoneDistributionService<C>, RefreshWorker<C>) {
    init_test_logging();
    ZoneDistributionService::new(cache, aggregator, config)
}

/// Poll `condition` every 10 ms for up to two seconds
pub async fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}

/// `{zone1: 87.5, ..., unzoned: 12.5}`
pub fn two_subject_distribution() -> DistributionResult {
    DistributionResult::from_durations(&[2100, 0, 0, 0, 300], 2400)
}
