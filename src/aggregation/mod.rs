// ABOUTME: Zone distribution aggregation strategies behind a common async trait
// ABOUTME: Reference full scan and storage pushdown share one accumulator and rounding rule
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Aggregation
//!
//! Two interchangeable ways to compute the global [`DistributionResult`]:
//!
//! - [`ReferenceAggregator`] pages through every eligible sample, classifies it in Rust
//!   and sums durations. Bounded memory, slow, used as the test oracle.
//! - [`PushdownAggregator`] asks the database for the per-bucket sums in one query.
//!   Used by every production refresh path.
//!
//! Both feed integer second totals into [`ZoneDurations`], so the percentage maps they
//! produce are bit-identical for the same corpus.

mod pushdown;
mod reference;

pub use pushdown::PushdownAggregator;
pub use reference::ReferenceAggregator;

use crate::errors::AppResult;
use crate::models::{Bucket, DistributionResult, ZoneBounds};
use serde::{Deserialize, Serialize};
use std::fmt;
use zone_core::zones::classify;

/// Which aggregation strategy produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationStrategy {
    /// Batched full scan with in-process classification
    Reference,
    /// Conditional sums evaluated by the storage engine
    Pushdown,
}

impl fmt::Display for AggregationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reference => f.write_str("reference"),
            Self::Pushdown => f.write_str("pushdown"),
        }
    }
}

/// Computes the global zone distribution
#[async_trait::async_trait]
pub trait ZoneAggregator: Send + Sync {
    /// Strategy identifier for logs
    fn strategy(&self) -> AggregationStrategy;

    /// Aggregate the full corpus. Empty result when no sample is eligible.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage layer fails
    async fn aggregate(&self) -> AppResult<DistributionResult>;
}

/// Per-bucket duration sums and the running total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ZoneDurations {
    buckets: [i64; 5],
    total: i64,
}

impl ZoneDurations {
    /// Start from zero
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buckets: [0; 5],
            total: 0,
        }
    }

    /// Build from totals already summed elsewhere
    #[must_use]
    pub const fn from_totals(buckets: [i64; 5], total: i64) -> Self {
        Self { buckets, total }
    }

    /// Add a duration to a bucket and to the total
    pub fn add(&mut self, bucket: Bucket, duration_secs: i64) {
        self.buckets[bucket.index()] += duration_secs;
        self.total += duration_secs;
    }

    /// Classify a sample and record its duration
    pub fn record(&mut self, bpm: i64, duration_secs: i64, zones: &ZoneBounds) {
        self.add(classify(bpm, zones), duration_secs);
    }

    /// Seconds recorded for one bucket
    #[must_use]
    pub const fn seconds(&self, bucket: Bucket) -> i64 {
        self.buckets[bucket.index()]
    }

    /// Seconds across all buckets
    #[must_use]
    pub const fn total(&self) -> i64 {
        self.total
    }

    /// Apply the shared rounding rule
    #[must_use]
    pub fn to_distribution(&self) -> DistributionResult {
        DistributionResult::from_durations(&self.buckets, self.total)
    }
}
