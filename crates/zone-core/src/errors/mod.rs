// ABOUTME: Unified error type with stable error codes for the zone distribution service
// ABOUTME: Converts storage, serialization and anyhow errors into AppError
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! Every fallible operation in the workspace returns [`AppResult`]. Errors carry a
//! stable [`ErrorCode`] that maps onto an HTTP status for the reporting surface.

#[cfg(feature = "http-response")]
mod http_response;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Caller supplied malformed input
    InvalidInput,
    /// Requested record does not exist
    ResourceNotFound,
    /// Dependency is temporarily unavailable
    ResourceUnavailable,
    /// Configuration could not be loaded or is invalid
    ConfigError,
    /// Cache backend failed
    CacheError,
    /// Database operation failed
    DatabaseError,
    /// Data serialization/deserialization failed
    SerializationError,
    /// Unexpected internal failure
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::InvalidInput => 400,
            Self::ResourceNotFound => 404,
            Self::ResourceUnavailable | Self::CacheError => 503,
            Self::ConfigError
            | Self::DatabaseError
            | Self::SerializationError
            | Self::InternalError => 500,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::ResourceUnavailable => "The resource is temporarily unavailable",
            Self::ConfigError => "Configuration error encountered",
            Self::CacheError => "Cache operation failed",
            Self::DatabaseError => "Database operation failed",
            Self::SerializationError => "Data serialization/deserialization failed",
            Self::InternalError => "An internal server error occurred",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
#[error("{code}: {message}")]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Attach a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Dependency unavailable
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ResourceUnavailable, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Cache backend error
    pub fn cache(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::CacheError, message)
    }

    /// Database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(
            ErrorCode::SerializationError,
            format!("JSON processing failed: {error}"),
        )
        .with_source(error)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::internal(format!("{error:#}"))
    }
}

#[cfg(feature = "database-errors")]
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        let code = match &error {
            sqlx::Error::RowNotFound => ErrorCode::ResourceNotFound,
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                ErrorCode::ResourceUnavailable
            }
            _ => ErrorCode::DatabaseError,
        };
        Self::new(code, format!("Database error: {error}")).with_source(error)
    }
}
