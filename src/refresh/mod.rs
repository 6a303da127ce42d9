// ABOUTME: Zone distribution refresh orchestration and cached read path
// ABOUTME: Synchronous refresh, queued background refresh, and never-blocking reads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Refresh Orchestration
//!
//! [`ZoneDistributionService`] is the only writer of the cached distribution. It owns
//! the injected cache store, the aggregation strategy and the sending half of the
//! background refresh queue; [`RefreshWorker`] owns the receiving half.
//!
//! Every write stores the distribution and its computation timestamp back-to-back with
//! the same TTL. Reads never wait for an aggregation: a miss schedules a background
//! refresh and returns the empty distribution.

mod worker;

pub use worker::{RefreshStats, RefreshStatsSnapshot, RefreshTrigger, RefreshWorker, ScheduleOutcome};

use crate::aggregation::ZoneAggregator;
use crate::cache::{CacheKey, CacheProvider};
use crate::config::distribution::DistributionConfig;
use crate::errors::AppResult;
use crate::models::DistributionResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};
use uuid::Uuid;
use worker::{InFlightRefreshes, RefreshJob, RefreshQueue};

/// Cached distribution as exposed to the reporting surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSnapshot {
    /// Bucket percentages, empty when nothing is cached yet
    pub data: DistributionResult,
    /// When the cached value was computed
    pub updated_at: Option<DateTime<Utc>>,
    /// Seconds until the cached value expires
    pub expires_in_secs: Option<u64>,
}

/// Computes the distribution and writes it to the cache
pub(crate) struct RefreshExecutor<C: CacheProvider> {
    cache: C,
    aggregator: Arc<dyn ZoneAggregator>,
    ttl: Duration,
    stats: Arc<RefreshStats>,
}

impl<C: CacheProvider> RefreshExecutor<C> {
    /// Aggregate, then store value and timestamp.
    ///
    /// Cache write failures are logged and swallowed; the computed result is still
    /// returned. Only aggregation failures propagate.
    async fn compute_and_store(&self) -> AppResult<(DistributionResult, DateTime<Utc>)> {
        let started = Instant::now();
        let result = self.aggregator.aggregate().await?;
        let computed_at = Utc::now();

        if let Err(e) = self.store(&result, computed_at).await {
            warn!(error = %e, "Failed to cache zone distribution; returning computed value");
        }

        info!(
            strategy = %self.aggregator.strategy(),
            elapsed_secs = %format!("{:.2}", started.elapsed().as_secs_f64()),
            "Zone distribution refreshed: {result}"
        );

        Ok((result, computed_at))
    }

    /// Timestamp first: a half-failed pair leaves no value, so readers see a miss
    /// rather than a value without its timestamp.
    async fn store(&self, result: &DistributionResult, computed_at: DateTime<Utc>) -> AppResult<()> {
        self.cache
            .set(&CacheKey::ZoneDistributionUpdatedAt, &computed_at, self.ttl)
            .await?;
        self.cache
            .set(&CacheKey::ZoneDistribution, result, self.ttl)
            .await
    }

    pub(crate) async fn run_job(&self, job: RefreshJob) {
        info!(job_id = %job.id, trigger = %job.trigger, "Starting zone distribution cache update");

        match self.compute_and_store().await {
            Ok(_) => self.stats.record_completed(),
            Err(e) => {
                // No retry: the next miss or explicit request schedules another attempt
                self.stats.record_failed();
                error!(job_id = %job.id, error = %e, "Background zone distribution refresh failed");
            }
        }
        // `job` drops here, releasing any in-flight claim
    }
}

/// Refresh orchestrator and read path over an injected cache store
pub struct ZoneDistributionService<C: CacheProvider + 'static> {
    executor: Arc<RefreshExecutor<C>>,
    queue: RefreshQueue,
    in_flight: Option<Arc<InFlightRefreshes>>,
}

impl<C: CacheProvider + 'static> Clone for ZoneDistributionService<C> {
    fn clone(&self) -> Self {
        Self {
            executor: Arc::clone(&self.executor),
            queue: self.queue.clone(),
            in_flight: self.in_flight.clone(),
        }
    }
}

impl<C: CacheProvider + 'static> ZoneDistributionService<C> {
    /// Build the service and the worker that drains its refresh queue.
    ///
    /// The worker must be spawned (or run) for scheduled refreshes to execute.
    #[must_use]
    pub fn new(
        cache: C,
        aggregator: Arc<dyn ZoneAggregator>,
        config: &DistributionConfig,
    ) -> (Self, RefreshWorker<C>) {
        let executor = Arc::new(RefreshExecutor {
            cache,
            aggregator,
            ttl: config.ttl,
            stats: Arc::new(RefreshStats::default()),
        });
        let (queue, receiver) = RefreshQueue::channel(config.queue_capacity);

        let service = Self {
            executor: Arc::clone(&executor),
            queue,
            in_flight: config
                .coalesce_refreshes
                .then(|| Arc::new(InFlightRefreshes::default())),
        };

        (service, RefreshWorker::new(executor, receiver))
    }

    /// Aggregate inline, cache the result, and return it.
    ///
    /// The caller waits for the full aggregation. A cache write failure is logged and
    /// does not fail the call.
    ///
    /// # Errors
    ///
    /// Returns an error if the aggregation itself fails
    pub async fn refresh_now(&self) -> AppResult<DistributionResult> {
        info!("Starting synchronous zone distribution refresh");
        self.executor
            .compute_and_store()
            .await
            .map(|(result, _)| result)
    }

    /// Like [`Self::refresh_now`] but also returns the computation timestamp
    ///
    /// # Errors
    ///
    /// Returns an error if the aggregation itself fails
    pub async fn refresh_now_with_timestamp(&self) -> AppResult<(DistributionResult, DateTime<Utc>)> {
        info!("Starting synchronous zone distribution refresh");
        self.executor.compute_and_store().await
    }

    /// Fire-and-forget background refresh
    pub fn schedule_refresh(&self) -> ScheduleOutcome {
        self.enqueue(RefreshTrigger::Requested)
    }

    fn enqueue(&self, trigger: RefreshTrigger) -> ScheduleOutcome {
        let in_flight = match &self.in_flight {
            Some(in_flight) => match in_flight.try_acquire(CacheKey::ZoneDistribution) {
                Some(guard) => Some(guard),
                None => {
                    info!(trigger = %trigger, "Zone distribution refresh already in flight, coalescing");
                    self.executor.stats.record_schedule(ScheduleOutcome::Coalesced);
                    return ScheduleOutcome::Coalesced;
                }
            },
            None => None,
        };

        let outcome = self.queue.try_enqueue(RefreshJob {
            id: Uuid::new_v4(),
            trigger,
            enqueued_at: Instant::now(),
            _in_flight: in_flight,
        });
        if let ScheduleOutcome::Queued(job_id) = outcome {
            info!(job_id = %job_id, trigger = %trigger, "Scheduled background zone distribution refresh");
        }
        self.executor.stats.record_schedule(outcome);
        outcome
    }

    /// Cached distribution, or the empty result after scheduling a background refresh.
    ///
    /// Never blocks on aggregation and never fails: a cache read error is treated as
    /// a miss.
    pub async fn get_cached_distribution(&self) -> DistributionResult {
        match self
            .executor
            .cache
            .get::<DistributionResult>(&CacheKey::ZoneDistribution)
            .await
        {
            Ok(Some(result)) => return result,
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Zone distribution cache read failed, treating as miss"),
        }

        self.enqueue(RefreshTrigger::CacheMiss);
        DistributionResult::empty()
    }

    /// When the cached distribution was computed, `None` when absent or unreadable
    pub async fn get_last_updated(&self) -> Option<DateTime<Utc>> {
        match self
            .executor
            .cache
            .get::<DateTime<Utc>>(&CacheKey::ZoneDistributionUpdatedAt)
            .await
        {
            Ok(updated_at) => updated_at,
            Err(e) => {
                warn!(error = %e, "Zone distribution timestamp read failed");
                None
            }
        }
    }

    /// Distribution, timestamp and remaining TTL for the reporting surface.
    ///
    /// Goes through the read path, so a miss schedules a background refresh.
    pub async fn snapshot(&self) -> DistributionSnapshot {
        let data = self.get_cached_distribution().await;
        let updated_at = self.get_last_updated().await;
        let expires_in_secs = match self.executor.cache.ttl(&CacheKey::ZoneDistribution).await {
            Ok(ttl) => ttl.map(|remaining| remaining.as_secs()),
            Err(e) => {
                warn!(error = %e, "Zone distribution TTL lookup failed");
                None
            }
        };

        DistributionSnapshot {
            data,
            updated_at,
            expires_in_secs,
        }
    }

    /// Background refresh counters
    #[must_use]
    pub fn stats(&self) -> RefreshStatsSnapshot {
        self.executor.stats.snapshot()
    }

    /// True while a coalesced refresh is queued or running
    #[must_use]
    pub fn refresh_in_flight(&self) -> bool {
        self.in_flight
            .as_ref()
            .is_some_and(|in_flight| in_flight.contains(CacheKey::ZoneDistribution))
    }

    /// The injected cache store
    #[must_use]
    pub fn cache(&self) -> &C {
        &self.executor.cache
    }

    /// TTL applied to both cache keys
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.executor.ttl
    }
}
