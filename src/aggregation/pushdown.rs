// ABOUTME: Pushdown zone aggregation evaluated by the storage engine
// ABOUTME: One conditional sum per bucket plus the total, no rows materialized in-process
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{AggregationStrategy, ZoneAggregator, ZoneDurations};
use crate::database::Database;
use crate::errors::AppResult;
use crate::models::DistributionResult;

/// Production strategy: a single set-oriented query
#[derive(Clone)]
pub struct PushdownAggregator {
    database: Database,
}

impl PushdownAggregator {
    /// Create over a database handle
    #[must_use]
    pub const fn new(database: Database) -> Self {
        Self { database }
    }

    /// Raw second totals as summed by the database
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn durations(&self) -> AppResult<ZoneDurations> {
        let totals = self.database.zone_duration_totals().await?;
        Ok(ZoneDurations::from_totals(totals.buckets, totals.total))
    }
}

#[async_trait::async_trait]
impl ZoneAggregator for PushdownAggregator {
    fn strategy(&self) -> AggregationStrategy {
        AggregationStrategy::Pushdown
    }

    async fn aggregate(&self) -> AppResult<DistributionResult> {
        Ok(self.durations().await?.to_distribution())
    }
}
