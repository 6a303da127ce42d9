// ABOUTME: Tuning constants for zone distribution aggregation and background refresh
// ABOUTME: Batch sizes, queue capacity and rounding precision
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Rows fetched per keyset page by the reference (full-scan) aggregator
pub const DEFAULT_REFERENCE_BATCH_SIZE: u32 = 1_000;

/// Pending background refresh jobs before scheduling starts dropping requests
pub const DEFAULT_REFRESH_QUEUE_CAPACITY: usize = 64;

/// Percentages are rounded to this many decimal places
pub const PERCENT_DECIMAL_PLACES: i32 = 2;

/// Tolerance for the five rounded percentages summing to 100
pub const PERCENT_SUM_TOLERANCE: f64 = 0.04;
