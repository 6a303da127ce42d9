// ABOUTME: Redis cache implementation with connection management and TTL support
// ABOUTME: Shares the zone distribution across server instances and seeding jobs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{CacheConfig, CacheKey, CacheProvider};
use crate::config::cache::RedisConnectionConfig;
use crate::constants::cache::CACHE_KEY_PREFIX;
use crate::errors::{AppError, AppResult};
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info, warn};

/// Keys scanned per SCAN iteration during `clear_all`
const SCAN_BATCH: usize = 100;

/// Redis cache backed by a `ConnectionManager`
///
/// All keys are prefixed with `CACHE_KEY_PREFIX`. Writes use `SETEX` so the value and
/// its expiry land in one command.
#[derive(Clone)]
pub struct RedisCache {
    manager: ConnectionManager,
}

impl RedisCache {
    async fn new_with_config(config: &CacheConfig) -> AppResult<Self> {
        let redis_url = config
            .redis_url
            .as_ref()
            .ok_or_else(|| AppError::config("Redis URL is required for Redis cache backend"))?;

        let conn_config = &config.redis_connection;

        info!(
            timeout_secs = conn_config.connection_timeout_secs,
            response_timeout_secs = conn_config.response_timeout_secs,
            retries = conn_config.initial_connection_retries,
            "Connecting to Redis cache"
        );

        let client = redis::Client::open(redis_url.as_str())
            .map_err(|e| AppError::config(format!("Invalid Redis URL: {e}")))?;

        let manager = Self::connect_with_retry(&client, conn_config).await?;

        info!("Successfully connected to Redis");

        Ok(Self { manager })
    }

    /// Connect to Redis with exponential backoff retry on failure
    async fn connect_with_retry(
        client: &redis::Client,
        conn_config: &RedisConnectionConfig,
    ) -> AppResult<ConnectionManager> {
        let manager_config = ConnectionManagerConfig::new()
            .set_connection_timeout(Duration::from_secs(conn_config.connection_timeout_secs))
            .set_response_timeout(Duration::from_secs(conn_config.response_timeout_secs))
            .set_number_of_retries(conn_config.reconnection_retries)
            .set_max_delay(conn_config.max_retry_delay_ms);

        let max_retries = conn_config.initial_connection_retries;
        let mut delay_ms = conn_config.initial_retry_delay_ms;
        let mut last_error: Option<redis::RedisError> = None;

        for attempt in 0..=max_retries {
            match ConnectionManager::new_with_config(client.clone(), manager_config.clone()).await {
                Ok(manager) => {
                    if attempt > 0 {
                        info!("Redis connection established after {} retries", attempt);
                    }
                    return Ok(manager);
                }
                Err(e) => {
                    if attempt < max_retries {
                        warn!(
                            "Redis connection attempt {}/{} failed, retrying in {}ms: {}",
                            attempt + 1,
                            max_retries + 1,
                            delay_ms,
                            e
                        );
                        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                        delay_ms = (delay_ms * 2).min(conn_config.max_retry_delay_ms);
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(AppError::unavailable(format!(
            "Failed to connect to Redis after {} attempts: {}",
            max_retries + 1,
            last_error.map_or_else(|| "unknown error".to_owned(), |e| e.to_string())
        )))
    }

    fn build_key(key: &CacheKey) -> String {
        format!("{CACHE_KEY_PREFIX}{key}")
    }

    fn command_error(op: &str, e: &redis::RedisError) -> AppError {
        error!("Redis {} operation failed: {}", op, e);
        AppError::cache(format!("Redis {op} failed: {e}"))
    }
}

#[async_trait::async_trait]
impl CacheProvider for RedisCache {
    async fn new(config: CacheConfig) -> AppResult<Self>
    where
        Self: Sized,
    {
        Self::new_with_config(&config).await
    }

    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: Duration,
    ) -> AppResult<()> {
        let serialized = serde_json::to_vec(value)?;
        let mut conn = self.manager.clone();

        conn.set_ex::<_, _, ()>(Self::build_key(key), serialized, ttl.as_secs().max(1))
            .await
            .map_err(|e| Self::command_error("SETEX", &e))
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, key: &CacheKey) -> AppResult<Option<T>> {
        let mut conn = self.manager.clone();

        let data: Option<Vec<u8>> = conn
            .get(Self::build_key(key))
            .await
            .map_err(|e| Self::command_error("GET", &e))?;

        data.map(|bytes| serde_json::from_slice(&bytes))
            .transpose()
            .map_err(Into::into)
    }

    async fn ttl(&self, key: &CacheKey) -> AppResult<Option<Duration>> {
        let mut conn = self.manager.clone();

        let ttl_secs: i64 = conn
            .ttl(Self::build_key(key))
            .await
            .map_err(|e| Self::command_error("TTL", &e))?;

        // Redis returns -2 if key doesn't exist, -1 if key has no expiration
        Ok(u64::try_from(ttl_secs)
            .ok()
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs))
    }

    async fn health_check(&self) -> AppResult<()> {
        let mut conn = self.manager.clone();

        let response: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::command_error("PING", &e))?;

        if response == "PONG" {
            Ok(())
        } else {
            Err(AppError::cache(format!(
                "Unexpected PING response '{response}'"
            )))
        }
    }

    async fn clear_all(&self) -> AppResult<()> {
        // Only our namespace; the Redis instance may be shared
        let pattern = format!("{CACHE_KEY_PREFIX}*");

        let mut conn = self.manager.clone();
        let mut cursor = 0u64;

        loop {
            let (new_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(|e| Self::command_error("SCAN", &e))?;

            if !keys.is_empty() {
                let _: u64 = conn
                    .del(&keys)
                    .await
                    .map_err(|e| Self::command_error("DEL", &e))?;
            }

            cursor = new_cursor;
            if cursor == 0 {
                break;
            }
        }

        Ok(())
    }
}
