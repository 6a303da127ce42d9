// ABOUTME: Cache backend configuration loaded from the environment
// ABOUTME: Handles Redis connection/retry settings and in-memory cache sizing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{env_flag_or, env_parse_or};
use crate::cache::CacheConfig;
use crate::constants::cache;
use crate::errors::AppResult;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Redis connection and retry configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedisConnectionConfig {
    /// Connection timeout in seconds
    pub connection_timeout_secs: u64,
    /// Response/command timeout in seconds
    pub response_timeout_secs: u64,
    /// Number of reconnection retries after connection drop
    pub reconnection_retries: usize,
    /// Maximum retry delay in milliseconds
    pub max_retry_delay_ms: u64,
    /// Number of retries for initial connection at startup
    pub initial_connection_retries: u32,
    /// Initial retry delay in milliseconds (doubles with exponential backoff)
    pub initial_retry_delay_ms: u64,
}

impl Default for RedisConnectionConfig {
    fn default() -> Self {
        Self {
            connection_timeout_secs: cache::REDIS_CONNECT_TIMEOUT_SECS,
            response_timeout_secs: cache::REDIS_OPERATION_TIMEOUT_SECS,
            reconnection_retries: cache::REDIS_RECONNECTION_RETRIES,
            max_retry_delay_ms: cache::REDIS_MAX_RETRY_DELAY_MS,
            initial_connection_retries: cache::REDIS_INITIAL_CONNECTION_RETRIES,
            initial_retry_delay_ms: cache::REDIS_INITIAL_RETRY_DELAY_MS,
        }
    }
}

impl RedisConnectionConfig {
    /// Load Redis connection configuration from environment
    ///
    /// # Errors
    ///
    /// Returns an error if any numeric variable is malformed
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();
        Ok(Self {
            connection_timeout_secs: env_parse_or(
                "REDIS_CONNECTION_TIMEOUT_SECS",
                defaults.connection_timeout_secs,
            )?,
            response_timeout_secs: env_parse_or(
                "REDIS_RESPONSE_TIMEOUT_SECS",
                defaults.response_timeout_secs,
            )?,
            reconnection_retries: env_parse_or(
                "REDIS_RECONNECTION_RETRIES",
                defaults.reconnection_retries,
            )?,
            max_retry_delay_ms: env_parse_or(
                "REDIS_MAX_RETRY_DELAY_MS",
                defaults.max_retry_delay_ms,
            )?,
            initial_connection_retries: env_parse_or(
                "REDIS_INITIAL_CONNECTION_RETRIES",
                defaults.initial_connection_retries,
            )?,
            initial_retry_delay_ms: env_parse_or(
                "REDIS_INITIAL_RETRY_DELAY_MS",
                defaults.initial_retry_delay_ms,
            )?,
        })
    }
}

impl CacheConfig {
    /// Load cache configuration from environment
    ///
    /// # Errors
    ///
    /// Returns an error if any variable is malformed
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            max_entries: env_parse_or("CACHE_MAX_ENTRIES", cache::DEFAULT_CACHE_MAX_ENTRIES)?,
            redis_url: env::var("REDIS_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            cleanup_interval: Duration::from_secs(env_parse_or(
                "CACHE_CLEANUP_INTERVAL_SECS",
                cache::DEFAULT_CLEANUP_INTERVAL_SECS,
            )?),
            enable_background_cleanup: env_flag_or("CACHE_BACKGROUND_CLEANUP", true)?,
            redis_connection: RedisConnectionConfig::from_env()?,
        })
    }
}
