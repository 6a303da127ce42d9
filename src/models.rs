// ABOUTME: Persistence records for users, monitoring sessions and heart-rate samples
// ABOUTME: Re-exports the zone-core domain models used across the crate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub use zone_core::models::*;

/// A subject with four calibrated heart-rate zones
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Database id
    pub id: i64,
    /// Unique display name
    pub username: String,
    /// Free-form gender as imported
    pub gender: Option<String>,
    /// Age in years
    pub age: Option<i64>,
    /// Zones 1..=4
    pub zones: ZoneBounds,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Input for [`crate::database::Database::create_user`]
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Explicit id, used when importing to keep source ids stable
    pub id: Option<i64>,
    /// Unique display name
    pub username: String,
    /// Free-form gender
    pub gender: Option<String>,
    /// Age in years
    pub age: Option<i64>,
    /// Zones 1..=4
    pub zones: ZoneBounds,
    /// Defaults to now
    pub created_at: Option<DateTime<Utc>>,
}

impl NewUser {
    /// Minimal user with generated id and current timestamp
    #[must_use]
    pub fn new(username: impl Into<String>, zones: ZoneBounds) -> Self {
        Self {
            id: None,
            username: username.into(),
            gender: None,
            age: None,
            zones,
            created_at: None,
        }
    }
}

/// Input for [`crate::database::Database::create_session`]
#[derive(Debug, Clone)]
pub struct NewSession {
    /// Owning subject
    pub user_id: i64,
    /// Recorded session length
    pub duration_in_secs: Option<i64>,
    /// Defaults to now
    pub created_at: Option<DateTime<Utc>>,
}

/// A monitoring session with its owner's username, as listed in reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Session id
    pub id: i64,
    /// Owning subject id
    pub user_id: i64,
    /// Owning subject's username
    pub username: String,
    /// Recorded session length
    pub duration_in_secs: Option<i64>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// A single heart-rate reading to insert
#[derive(Debug, Clone, Default)]
pub struct NewHeartRate {
    /// Owning session
    pub session_id: i64,
    /// Beats per minute; readings without a value are stored but never aggregated
    pub bpm: Option<i64>,
    /// Reading start
    pub start_time: Option<DateTime<Utc>>,
    /// Reading end
    pub end_time: Option<DateTime<Utc>>,
    /// Seconds covered by the reading
    pub duration_in_secs: Option<i64>,
}

/// An aggregation-eligible sample joined with its subject's zones
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZonedSample {
    /// Heart-rate row id, the keyset cursor
    pub id: i64,
    /// Beats per minute
    pub bpm: i64,
    /// Seconds covered by the reading
    pub duration_in_secs: i64,
    /// Owning subject's zones
    pub zones: ZoneBounds,
}

/// Filters for session listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionQuery {
    /// Username substring
    pub search: Option<String>,
    /// UTC calendar day of `created_at`
    pub date: Option<NaiveDate>,
    /// Overrides the default row limit
    pub limit: Option<u32>,
}

impl SessionQuery {
    /// True when neither search nor date filtering was requested
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|search| !search.is_empty())
            .is_none()
            && self.date.is_none()
    }
}

/// Earliest and latest session creation dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDateRange {
    /// Earliest session day
    pub min_date: Option<NaiveDate>,
    /// Latest session day
    pub max_date: Option<NaiveDate>,
}

/// Session detail: stats and per-zone time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDetail {
    /// Listing fields
    #[serde(flatten)]
    pub session: SessionSummary,
    /// Min/max/avg bpm
    pub stats: SessionStats,
    /// Seconds in zones 1..=4; unzoned time is not reported
    pub zone_durations: [i64; 4],
}
