// ABOUTME: Cache-related constants for keys, TTL, capacity, and cleanup intervals
// ABOUTME: Supports both in-memory and Redis cache backends with optimal defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Cache key holding the last computed zone percentage distribution
pub const ZONE_DISTRIBUTION_KEY: &str = "heart_rate_zone_percentage_distribution";

/// Sibling cache key holding the distribution's computation timestamp
pub const ZONE_DISTRIBUTION_UPDATED_AT_KEY: &str =
    "heart_rate_zone_percentage_distribution_updated_at";

/// Zone distribution TTL (12 hours) - recomputation scans the whole sample corpus
pub const TTL_ZONE_DISTRIBUTION_SECS: u64 = 43_200;

/// Default maximum cache entries for in-memory cache
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 1_000;

/// Default cleanup interval in seconds for expired entries
pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 300; // 5 minutes

/// Redis connection timeout in seconds
pub const REDIS_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Redis operation timeout in seconds
pub const REDIS_OPERATION_TIMEOUT_SECS: u64 = 3;

/// Redis reconnection attempts after a dropped connection
pub const REDIS_RECONNECTION_RETRIES: usize = 3;

/// Initial connection attempts at startup before giving up
pub const REDIS_INITIAL_CONNECTION_RETRIES: u32 = 3;

/// Initial retry delay in milliseconds (doubles on each attempt)
pub const REDIS_INITIAL_RETRY_DELAY_MS: u64 = 250;

/// Upper bound for retry delay in milliseconds
pub const REDIS_MAX_RETRY_DELAY_MS: u64 = 5_000;

/// Cache key prefix for namespacing shared Redis instances
pub const CACHE_KEY_PREFIX: &str = "zone_distribution:cache:";
