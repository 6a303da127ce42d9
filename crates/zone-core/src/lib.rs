// ABOUTME: Core types and constants for the heart-rate zone distribution service
// ABOUTME: Foundation crate with error handling, zone classification, models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Zone Core
//!
//! Foundation crate providing shared types and constants for the zone distribution
//! service. This crate is designed to change infrequently, enabling incremental
//! compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Cache keys, TTL defaults and aggregation tuning values
//! - **models**: Zone bounds, buckets and the percentage distribution
//! - **zones**: The pure zone classifier shared by every aggregation strategy

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (zone bounds, buckets, distribution results)
pub mod models;

/// Heart-rate zone classification
pub mod zones;
