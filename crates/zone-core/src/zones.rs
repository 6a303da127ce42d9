// ABOUTME: Pure heart-rate zone classifier shared by all aggregation strategies
// ABOUTME: First matching inclusive zone wins; a sample failing all four tests is unzoned
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::models::{Bucket, ZoneBounds};

/// Classify a bpm value against a subject's zones.
///
/// Zones are tested 1 through 4 and the first inclusive match wins, so overlapping
/// bounds resolve towards the lower zone. A value is unzoned only when it fails all
/// four range tests, which includes values falling into gaps between zones.
#[must_use]
pub fn classify(bpm: i64, bounds: &ZoneBounds) -> Bucket {
    Bucket::ZONES
        .into_iter()
        .zip(bounds.zones.iter())
        .find_map(|(bucket, range)| range.contains(bpm).then_some(bucket))
        .unwrap_or(Bucket::Unzoned)
}
