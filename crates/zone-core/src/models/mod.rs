// ABOUTME: Core data models for heart-rate zone distribution
// ABOUTME: Re-exports zone bounds, buckets, distribution results and session statistics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! - `ZoneRange` / `ZoneBounds`: a subject's four inclusive heart-rate zones
//! - `Bucket`: classification outcome for a single sample
//! - `DistributionResult`: percentage of recorded time spent in each bucket
//! - `SessionStats`: min/max/average of one monitoring session's samples

mod distribution;
mod session;
mod zone;

pub use distribution::{round_percent, DistributionResult};
pub use session::SessionStats;
pub use zone::{Bucket, ZoneBounds, ZoneRange};
