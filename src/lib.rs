// ABOUTME: Main library entry point for the heart-rate zone distribution service
// ABOUTME: Aggregation strategies, cache store, refresh orchestration and HTTP reporting routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Zone Distribution
//!
//! Reports the percentage of all recorded heart-rate time spent in each of a subject's
//! four personally calibrated zones, across the entire sample corpus.
//!
//! Computing the distribution directly over tens of millions of samples takes seconds,
//! so the answer is served from a TTL cache and recomputed in the background:
//!
//! - **Aggregation**: a full-scan reference strategy and a single-query pushdown
//!   strategy that must agree exactly
//! - **Cache**: pluggable expiring key/value store (in-memory or Redis)
//! - **Refresh**: synchronous refresh, queued background refresh and startup warm-up
//! - **Read path**: cache hit returns immediately, cache miss schedules a refresh and
//!   returns an empty distribution without blocking
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use zone_distribution::config::environment::ServerConfig;
//! use zone_distribution::errors::AppResult;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("{}", config.summary());
//!     Ok(())
//! }
//! ```

/// Zone distribution aggregation strategies
pub mod aggregation;

/// Cache abstraction layer with pluggable backends
pub mod cache;

/// Configuration loaded from the environment
pub mod config;

/// Application constants and configuration values
pub mod constants;

/// `SQLite` persistence for users, sessions and heart-rate samples
pub mod database;

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// CSV import of users, sessions and heart-rate data points
pub mod import;

/// Production logging and structured output
pub mod logging;

/// Persistence records and re-exported domain models
pub mod models;

/// Refresh orchestration, background worker and read path
pub mod refresh;

/// Shared server state handed to HTTP handlers
pub mod resources;

/// `HTTP` routes for the reporting surface
pub mod routes;

/// Process startup: warm-up policy and execution
pub mod lifecycle;
