// ABOUTME: Reference zone aggregation by batched full scan
// ABOUTME: Keyset pagination keeps memory bounded regardless of corpus size
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{AggregationStrategy, ZoneAggregator, ZoneDurations};
use crate::constants::distribution::DEFAULT_REFERENCE_BATCH_SIZE;
use crate::database::Database;
use crate::errors::AppResult;
use crate::models::DistributionResult;
use tracing::debug;

/// Classifies every eligible sample in-process, one page at a time
#[derive(Clone)]
pub struct ReferenceAggregator {
    database: Database,
    batch_size: u32,
}

impl ReferenceAggregator {
    /// Create with the given page size (zero falls back to the default)
    #[must_use]
    pub fn new(database: Database, batch_size: u32) -> Self {
        Self {
            database,
            batch_size: if batch_size == 0 {
                DEFAULT_REFERENCE_BATCH_SIZE
            } else {
                batch_size
            },
        }
    }

    /// Scan the corpus and return the raw second totals
    ///
    /// # Errors
    ///
    /// Returns an error if any page query fails
    pub async fn durations(&self) -> AppResult<ZoneDurations> {
        let mut durations = ZoneDurations::new();
        let mut cursor = 0i64;
        let mut pages = 0u64;

        loop {
            let batch = self
                .database
                .zoned_sample_batch(cursor, self.batch_size)
                .await?;

            let Some(last) = batch.last() else {
                break;
            };
            cursor = last.id;
            pages += 1;

            for sample in &batch {
                durations.record(sample.bpm, sample.duration_in_secs, &sample.zones);
            }

            if batch.len() < self.batch_size as usize {
                break;
            }
        }

        debug!(pages, total_secs = durations.total(), "Reference scan complete");
        Ok(durations)
    }
}

#[async_trait::async_trait]
impl ZoneAggregator for ReferenceAggregator {
    fn strategy(&self) -> AggregationStrategy {
        AggregationStrategy::Reference
    }

    async fn aggregate(&self) -> AppResult<DistributionResult> {
        Ok(self.durations().await?.to_distribution())
    }
}
