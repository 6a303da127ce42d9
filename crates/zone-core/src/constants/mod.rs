// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Pure data constants for caching, aggregation and configuration defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single large file.

/// Cache-related constants (keys, TTL, sizes)
pub mod cache;
/// Zone distribution aggregation and refresh constants
pub mod distribution;
/// Environment defaults for server and database configuration
pub mod defaults;
/// Service identifiers used in structured logging
pub mod service_names;
