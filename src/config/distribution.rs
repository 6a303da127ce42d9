// ABOUTME: Zone distribution refresh configuration loaded from the environment
// ABOUTME: TTL, reference batch size, refresh coalescing and warm-up toggles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{env_flag_or, env_parse_or};
use crate::constants::{cache, distribution};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for computing, caching and refreshing the zone distribution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionConfig {
    /// Lifetime shared by the distribution and its timestamp in the cache
    pub ttl: Duration,
    /// Keyset page size for the reference aggregator
    pub reference_batch_size: u32,
    /// Allow at most one in-flight background refresh
    pub coalesce_refreshes: bool,
    /// Pending background refresh jobs before scheduling drops requests
    pub queue_capacity: usize,
    /// Run the synchronous warm-up at server startup
    pub warmup_enabled: bool,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(cache::TTL_ZONE_DISTRIBUTION_SECS),
            reference_batch_size: distribution::DEFAULT_REFERENCE_BATCH_SIZE,
            coalesce_refreshes: false,
            queue_capacity: distribution::DEFAULT_REFRESH_QUEUE_CAPACITY,
            warmup_enabled: true,
        }
    }
}

impl DistributionConfig {
    /// Load distribution configuration from environment
    ///
    /// # Errors
    ///
    /// Returns an error when a variable is malformed or a size is zero
    pub fn from_env() -> AppResult<Self> {
        let ttl_secs = env_parse_or("ZONE_DISTRIBUTION_TTL_SECS", cache::TTL_ZONE_DISTRIBUTION_SECS)?;
        let config = Self {
            ttl: Duration::from_secs(ttl_secs),
            reference_batch_size: env_parse_or(
                "ZONE_DISTRIBUTION_BATCH_SIZE",
                distribution::DEFAULT_REFERENCE_BATCH_SIZE,
            )?,
            coalesce_refreshes: env_flag_or("ZONE_DISTRIBUTION_COALESCE", false)?,
            queue_capacity: env_parse_or(
                "ZONE_DISTRIBUTION_QUEUE_CAPACITY",
                distribution::DEFAULT_REFRESH_QUEUE_CAPACITY,
            )?,
            warmup_enabled: env_flag_or("ZONE_DISTRIBUTION_WARMUP", true)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the cache or the worker unusable
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a zero TTL, batch size or queue capacity
    pub fn validate(&self) -> AppResult<()> {
        if self.ttl.is_zero() {
            return Err(AppError::config("ZONE_DISTRIBUTION_TTL_SECS must be positive"));
        }
        if self.reference_batch_size == 0 {
            return Err(AppError::config("ZONE_DISTRIBUTION_BATCH_SIZE must be positive"));
        }
        if self.queue_capacity == 0 {
            return Err(AppError::config(
                "ZONE_DISTRIBUTION_QUEUE_CAPACITY must be positive",
            ));
        }
        Ok(())
    }
}
