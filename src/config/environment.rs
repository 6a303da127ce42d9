// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Assembles server, database, cache and distribution settings from environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration management for production deployment

use super::database::DatabaseConfig;
use super::distribution::DistributionConfig;
use super::env_parse_or;
use crate::cache::CacheConfig;
use crate::constants::defaults;
use crate::errors::AppResult;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated test run
    Test,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "test" | "testing" => Self::Test,
            _ => Self::Development,
        }
    }

    /// Check if running in a test harness
    #[must_use]
    pub const fn is_test(self) -> bool {
        matches!(self, Self::Test)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Test => write!(f, "test"),
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP port for the reporting surface
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Cache backend configuration
    pub cache: CacheConfig,
    /// Zone distribution refresh configuration
    pub distribution: DistributionConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if any environment variable is malformed
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            http_port: env_parse_or("HTTP_PORT", defaults::HTTP_PORT)?,
            environment: env::var("ENVIRONMENT")
                .map(|value| Environment::from_str_or_default(&value))
                .unwrap_or_default(),
            database: DatabaseConfig::from_env()?,
            cache: CacheConfig::from_env()?,
            distribution: DistributionConfig::from_env()?,
        })
    }

    /// Human-readable configuration summary for startup logging
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Zone Distribution Server Configuration:\n\
             - HTTP Port: {}\n\
             - Environment: {}\n\
             - Database: {}\n\
             - Cache: {}\n\
             - Distribution TTL: {}s\n\
             - Reference Batch Size: {}\n\
             - Coalesce Refreshes: {}\n\
             - Startup Warm-up: {}",
            self.http_port,
            self.environment,
            self.database
                .url
                .as_ref()
                .map_or_else(|| "not configured".to_owned(), ToString::to_string),
            if self.cache.redis_url.is_some() {
                "Redis"
            } else {
                "In-memory"
            },
            self.distribution.ttl.as_secs(),
            self.distribution.reference_batch_size,
            self.distribution.coalesce_refreshes,
            if self.distribution.warmup_enabled {
                "Enabled"
            } else {
                "Disabled"
            },
        )
    }
}
