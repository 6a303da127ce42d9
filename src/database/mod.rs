// ABOUTME: SQLite persistence for users, monitoring sessions and heart-rate samples
// ABOUTME: Owns the connection pool and idempotent schema creation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Database Management
//!
//! Thin `sqlx` wrapper over the three tables the zone distribution reads from.
//! Aggregation queries live in [`distribution`], everything else is plain CRUD.

mod distribution;
mod heart_rates;
mod sessions;
mod users;

pub use distribution::ZoneDurationTotals;

use crate::config::database::DatabaseUrl;
use crate::errors::{AppError, AppResult};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use tracing::info;

/// Database manager for users, sessions and heart-rate samples
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Connect and run migrations
    ///
    /// An in-memory database is pinned to a single long-lived connection, since every
    /// new `SQLite` memory connection would otherwise see its own empty database.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or schema creation fails
    pub async fn new(url: &DatabaseUrl, max_connections: u32) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(&url.to_connection_string())
            .map_err(|e| AppError::config(format!("Invalid database URL '{url}': {e}")))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool_options = if url.is_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        let pool = pool_options.connect_with(options).await.map_err(|e| {
            AppError::unavailable(format!("Failed to connect to database '{url}': {e}"))
        })?;

        let db = Self { pool };
        db.migrate().await?;

        info!(database = %url, "Database ready");
        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Create tables and indexes if they do not exist
    ///
    /// # Errors
    ///
    /// Returns an error if any DDL statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_users().await?;
        self.migrate_sessions().await?;
        self.migrate_heart_rates().await?;
        Ok(())
    }

    /// Cheap connectivity probe for health checks
    ///
    /// # Errors
    ///
    /// Returns an error if the database does not answer
    pub async fn health_check(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::unavailable(format!("Database health check failed: {e}")))?;
        Ok(())
    }
}
