// ABOUTME: Data loading for users, monitoring sessions and heart-rate samples
// ABOUTME: CSV import of recorded data and reproducible synthetic corpus generation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Import
//!
//! Row-level failures are counted and logged, never fatal: a bad row must not stop the
//! rest of a multi-million-row import.

mod csv_files;
mod synthetic;

pub use csv_files::{import_all, import_heart_rates, import_users, ImportPaths};
pub use synthetic::{seed_synthetic, SyntheticConfig, ZoneLayout};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::ops::AddAssign;

/// Created/failed counts per record type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ImportSummary {
    /// Users inserted
    pub users_created: u64,
    /// User rows rejected
    pub users_failed: u64,
    /// Sessions inserted
    pub sessions_created: u64,
    /// Session rows rejected
    pub sessions_failed: u64,
    /// Heart-rate samples inserted
    pub heart_rates_created: u64,
    /// Heart-rate rows rejected
    pub heart_rates_failed: u64,
}

impl ImportSummary {
    /// Total rejected rows
    #[must_use]
    pub const fn failed(&self) -> u64 {
        self.users_failed + self.sessions_failed + self.heart_rates_failed
    }
}

impl AddAssign for ImportSummary {
    fn add_assign(&mut self, rhs: Self) {
        self.users_created += rhs.users_created;
        self.users_failed += rhs.users_failed;
        self.sessions_created += rhs.sessions_created;
        self.sessions_failed += rhs.sessions_failed;
        self.heart_rates_created += rhs.heart_rates_created;
        self.heart_rates_failed += rhs.heart_rates_failed;
    }
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "users {}/{} failed, sessions {}/{} failed, heart rates {}/{} failed",
            self.users_created,
            self.users_failed,
            self.sessions_created,
            self.sessions_failed,
            self.heart_rates_created,
            self.heart_rates_failed
        )
    }
}

/// Parse the timestamp shapes seen in exported CSVs
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f %z"))
        .map(|ts| ts.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            [
                "%Y-%m-%d %H:%M:%S%.f UTC",
                "%Y-%m-%d %H:%M:%S%.f",
                "%Y-%m-%dT%H:%M:%S%.f",
                "%m/%d/%Y %H:%M:%S",
                "%m/%d/%Y %H:%M",
            ]
            .into_iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .map(|naive| naive.and_utc())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 7, 30, 0).single();
        assert_eq!(parse_timestamp("2024-03-01T07:30:00Z"), expected);
        assert_eq!(parse_timestamp("2024-03-01 07:30:00 +0000"), expected);
        assert_eq!(parse_timestamp("2024-03-01 07:30:00"), expected);
        assert_eq!(parse_timestamp("2024-03-01 07:30:00 UTC"), expected);
        assert_eq!(parse_timestamp("03/01/2024 07:30"), expected);
        assert_eq!(parse_timestamp("  "), None);
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_summary_accumulates() {
        let mut total = ImportSummary::default();
        total += ImportSummary {
            users_created: 2,
            heart_rates_failed: 1,
            ..ImportSummary::default()
        };
        total += ImportSummary {
            users_created: 1,
            sessions_failed: 3,
            ..ImportSummary::default()
        };
        assert_eq!(total.users_created, 3);
        assert_eq!(total.failed(), 4);
    }
}
