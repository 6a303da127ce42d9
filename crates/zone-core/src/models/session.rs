// ABOUTME: Per-session heart-rate statistics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// Min/max/average bpm of one monitoring session, ignoring samples without a value
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionStats {
    /// Lowest recorded bpm
    pub min_bpm: Option<i64>,
    /// Highest recorded bpm
    pub max_bpm: Option<i64>,
    /// Mean bpm
    pub avg_bpm: Option<f64>,
}
