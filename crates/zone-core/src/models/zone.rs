// ABOUTME: Heart-rate zone bounds and classification buckets
// ABOUTME: Four inclusive ranges per subject, five possible buckets per sample
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Inclusive `[min, max]` heart-rate range in beats per minute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneRange {
    /// Lowest bpm counted in this zone
    pub min: i64,
    /// Highest bpm counted in this zone
    pub max: i64,
}

impl ZoneRange {
    /// Create a new range
    #[must_use]
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// Inclusive on both ends
    #[must_use]
    pub const fn contains(&self, bpm: i64) -> bool {
        bpm >= self.min && bpm <= self.max
    }
}

/// A subject's four personally calibrated zones.
///
/// Contiguity and non-overlap are not validated here; callers own that invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneBounds {
    /// Zones 1 through 4, in classification order
    pub zones: [ZoneRange; 4],
}

impl ZoneBounds {
    /// Build bounds from `(min, max)` pairs for zones 1..=4
    #[must_use]
    pub const fn from_pairs(pairs: [(i64, i64); 4]) -> Self {
        Self {
            zones: [
                ZoneRange::new(pairs[0].0, pairs[0].1),
                ZoneRange::new(pairs[1].0, pairs[1].1),
                ZoneRange::new(pairs[2].0, pairs[2].1),
                ZoneRange::new(pairs[3].0, pairs[3].1),
            ],
        }
    }
}

/// Classification outcome for a sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    /// Zone 1
    Zone1,
    /// Zone 2
    Zone2,
    /// Zone 3
    Zone3,
    /// Zone 4
    Zone4,
    /// Outside all four zones
    Unzoned,
}

impl Bucket {
    /// Every bucket, in reporting order
    pub const ALL: [Self; 5] = [
        Self::Zone1,
        Self::Zone2,
        Self::Zone3,
        Self::Zone4,
        Self::Unzoned,
    ];

    /// The four real zones, in classification order
    pub const ZONES: [Self; 4] = [Self::Zone1, Self::Zone2, Self::Zone3, Self::Zone4];

    /// Stable name used as the map key in reports and cached values
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zone1 => "zone1",
            Self::Zone2 => "zone2",
            Self::Zone3 => "zone3",
            Self::Zone4 => "zone4",
            Self::Unzoned => "unzoned",
        }
    }

    /// Position in [`Bucket::ALL`]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bucket {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|bucket| bucket.as_str() == s)
            .ok_or_else(|| AppError::invalid_input(format!("Unknown zone bucket '{s}'")))
    }
}
