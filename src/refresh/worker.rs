// ABOUTME: Background refresh queue, worker and single-flight coordination
// ABOUTME: Jobs are passed over a bounded channel and each runs in its own task
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::RefreshExecutor;
use crate::cache::{CacheKey, CacheProvider};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Why a background refresh was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshTrigger {
    /// The read path found no cached distribution
    CacheMiss,
    /// A collaborator asked for a background refresh explicitly
    Requested,
}

impl fmt::Display for RefreshTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CacheMiss => f.write_str("cache_miss"),
            Self::Requested => f.write_str("requested"),
        }
    }
}

/// What happened to a scheduling request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleOutcome {
    /// Job accepted by the queue
    Queued(Uuid),
    /// A refresh for the same key is already in flight
    Coalesced,
    /// Queue full or worker gone; the request was dropped
    Rejected,
}

/// One unit of background work
pub(crate) struct RefreshJob {
    pub(crate) id: Uuid,
    pub(crate) trigger: RefreshTrigger,
    pub(crate) enqueued_at: Instant,
    // Held until the job finishes or is dropped unprocessed
    pub(crate) _in_flight: Option<InFlightGuard>,
}

/// Sending half of the refresh queue
#[derive(Clone)]
pub(crate) struct RefreshQueue {
    sender: mpsc::Sender<RefreshJob>,
}

impl RefreshQueue {
    pub(crate) fn channel(capacity: usize) -> (Self, mpsc::Receiver<RefreshJob>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    /// Enqueue without waiting; the read path must never block on a full queue
    pub(crate) fn try_enqueue(&self, job: RefreshJob) -> ScheduleOutcome {
        let id = job.id;
        match self.sender.try_send(job) {
            Ok(()) => ScheduleOutcome::Queued(id),
            Err(TrySendError::Full(job)) => {
                warn!(job_id = %job.id, trigger = %job.trigger, "Refresh queue full, dropping request");
                ScheduleOutcome::Rejected
            }
            Err(TrySendError::Closed(job)) => {
                warn!(job_id = %job.id, trigger = %job.trigger, "Refresh worker stopped, dropping request");
                ScheduleOutcome::Rejected
            }
        }
    }
}

/// Keys with a refresh currently queued or running
#[derive(Debug, Default)]
pub(crate) struct InFlightRefreshes {
    keys: Mutex<HashSet<CacheKey>>,
}

impl InFlightRefreshes {
    /// Claim `key`, or `None` if another refresh already holds it
    pub(crate) fn try_acquire(self: &Arc<Self>, key: CacheKey) -> Option<InFlightGuard> {
        let inserted = self
            .keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key);
        inserted.then(|| InFlightGuard {
            owner: Arc::clone(self),
            key,
        })
    }

    /// True while a refresh for `key` is queued or running
    pub(crate) fn contains(&self, key: CacheKey) -> bool {
        self.keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&key)
    }
}

/// Releases the in-flight claim when the refresh completes, fails, or is dropped
pub(crate) struct InFlightGuard {
    owner: Arc<InFlightRefreshes>,
    key: CacheKey,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.owner
            .keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

/// Background refresh counters
#[derive(Debug, Default)]
pub struct RefreshStats {
    scheduled: AtomicU64,
    coalesced: AtomicU64,
    rejected: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
}

/// Point-in-time copy of [`RefreshStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RefreshStatsSnapshot {
    /// Jobs accepted by the queue
    pub scheduled: u64,
    /// Requests skipped because a refresh was already in flight
    pub coalesced: u64,
    /// Requests dropped because the queue was full or closed
    pub rejected: u64,
    /// Jobs whose aggregation succeeded
    pub completed: u64,
    /// Jobs whose aggregation failed
    pub failed: u64,
}

impl RefreshStats {
    pub(crate) fn record_schedule(&self, outcome: ScheduleOutcome) {
        let counter = match outcome {
            ScheduleOutcome::Queued(_) => &self.scheduled,
            ScheduleOutcome::Coalesced => &self.coalesced,
            ScheduleOutcome::Rejected => &self.rejected,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_completed(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Read all counters
    #[must_use]
    pub fn snapshot(&self) -> RefreshStatsSnapshot {
        RefreshStatsSnapshot {
            scheduled: self.scheduled.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Consumes the refresh queue.
///
/// Each job is spawned onto its own task so a slow aggregation never delays the next
/// job's start. The worker exits once every [`super::ZoneDistributionService`] clone
/// holding the sending half has been dropped.
pub struct RefreshWorker<C: CacheProvider + 'static> {
    executor: Arc<RefreshExecutor<C>>,
    receiver: mpsc::Receiver<RefreshJob>,
}

impl<C: CacheProvider + 'static> RefreshWorker<C> {
    pub(crate) fn new(executor: Arc<RefreshExecutor<C>>, receiver: mpsc::Receiver<RefreshJob>) -> Self {
        Self { executor, receiver }
    }

    /// Run on a dedicated task
    #[must_use]
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Process jobs until the queue closes
    pub async fn run(mut self) {
        info!("Zone distribution refresh worker started");

        while let Some(job) = self.receiver.recv().await {
            debug!(
                job_id = %job.id,
                trigger = %job.trigger,
                queued_ms = job.enqueued_at.elapsed().as_millis() as u64,
                "Dispatching background refresh"
            );
            let executor = Arc::clone(&self.executor);
            tokio::spawn(async move {
                executor.run_job(job).await;
            });
        }

        info!("Zone distribution refresh queue closed, worker exiting");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_flight_guard_releases_on_drop() {
        let in_flight = Arc::new(InFlightRefreshes::default());

        let guard = in_flight.try_acquire(CacheKey::ZoneDistribution);
        assert!(guard.is_some());
        assert!(in_flight.try_acquire(CacheKey::ZoneDistribution).is_none());
        assert!(in_flight.contains(CacheKey::ZoneDistribution));

        drop(guard);
        assert!(!in_flight.contains(CacheKey::ZoneDistribution));
        assert!(in_flight.try_acquire(CacheKey::ZoneDistribution).is_some());
    }

    #[test]
    fn test_stats_count_each_outcome() {
        let stats = RefreshStats::default();
        stats.record_schedule(ScheduleOutcome::Queued(Uuid::new_v4()));
        stats.record_schedule(ScheduleOutcome::Coalesced);
        stats.record_schedule(ScheduleOutcome::Rejected);
        stats.record_completed();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.scheduled, 1);
        assert_eq!(snapshot.coalesced, 1);
        assert_eq!(snapshot.rejected, 1);
        assert_eq!(snapshot.completed, 1);
        assert_eq!(snapshot.failed, 0);
    }

    #[tokio::test]
    async fn test_full_queue_rejects_without_blocking() {
        let (queue, _receiver) = RefreshQueue::channel(1);
        let job = || RefreshJob {
            id: Uuid::new_v4(),
            trigger: RefreshTrigger::CacheMiss,
            enqueued_at: Instant::now(),
            _in_flight: None,
        };

        assert!(matches!(queue.try_enqueue(job()), ScheduleOutcome::Queued(_)));
        assert_eq!(queue.try_enqueue(job()), ScheduleOutcome::Rejected);
    }
}
