// ABOUTME: Database configuration types for SQLite connections
// ABOUTME: Distinguishes a real database from none configured, which disables warm-up
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::env_parse_or;
use crate::constants::defaults;
use crate::errors::AppResult;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;

/// Type-safe database location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// `SQLite` database with file path
    SQLite {
        /// Path to `SQLite` database file
        path: PathBuf,
    },
    /// In-memory `SQLite` (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from a `sqlite:` URL or a bare file path
    #[must_use]
    pub fn parse_url(s: &str) -> Self {
        let path_str = s.strip_prefix("sqlite://").or_else(|| s.strip_prefix("sqlite:"));
        match path_str.unwrap_or(s) {
            ":memory:" => Self::Memory,
            path => Self::SQLite {
                path: PathBuf::from(path),
            },
        }
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".into(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Display for DatabaseUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// `None` when `DATABASE_URL` is unset: no real database is configured
    pub url: Option<DatabaseUrl>,
    /// Maximum pooled connections
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: defaults::DATABASE_MAX_CONNECTIONS,
        }
    }
}

impl DatabaseConfig {
    /// Load database configuration from environment
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_MAX_CONNECTIONS` is not a number
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            url: env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty())
                .map(|url| DatabaseUrl::parse_url(url.trim())),
            max_connections: env_parse_or(
                "DATABASE_MAX_CONNECTIONS",
                defaults::DATABASE_MAX_CONNECTIONS,
            )?,
        })
    }

    /// True when a persistent (non-memory) database is configured
    #[must_use]
    pub fn has_real_database(&self) -> bool {
        self.url.as_ref().is_some_and(|url| !url.is_memory())
    }
}
