// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Environment-only configuration for server, database, cache and refresh behavior
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module
//!
//! - **Environment**: top-level server configuration assembled from environment variables
//! - **Database**: `SQLite` connection settings
//! - **Cache**: Redis connection settings and in-memory cache sizing
//! - **Distribution**: TTL, batching and background refresh tuning

use crate::errors::{AppError, AppResult};
use std::env;
use std::str::FromStr;

/// Cache backend configuration
pub mod cache;
/// Database connection configuration
pub mod database;
/// Zone distribution refresh configuration
pub mod distribution;
/// Top-level server configuration
pub mod environment;

/// Read an environment variable and parse it, using `default` when it is unset.
///
/// # Errors
///
/// Returns a configuration error when the variable is set but cannot be parsed
pub(crate) fn env_parse_or<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::config(format!("Invalid {key} value '{raw}': {e}"))),
        Err(_) => Ok(default),
    }
}

/// Parse a boolean flag accepting `true/false`, `1/0`, `yes/no`
///
/// # Errors
///
/// Returns a configuration error for any other value
pub(crate) fn env_flag_or(key: &str, default: bool) -> AppResult<bool> {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            other => Err(AppError::config(format!(
                "Invalid {key} value '{other}': expected true or false"
            ))),
        },
        Err(_) => Ok(default),
    }
}
