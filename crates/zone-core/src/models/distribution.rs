// ABOUTME: Percentage-of-time distribution across the five zone buckets
// ABOUTME: Holds the shared rounding rule used by every aggregation strategy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::Bucket;
use crate::constants::distribution::PERCENT_DECIMAL_PLACES;
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Share of total recorded seconds spent in each bucket, as a percentage.
///
/// Either all five buckets are present or the map is empty (no eligible samples).
/// Serializes as a JSON object keyed by bucket name in bucket order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DistributionResult {
    percentages: BTreeMap<Bucket, f64>,
}

impl DistributionResult {
    /// The "no data" result
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            percentages: BTreeMap::new(),
        }
    }

    /// Convert per-bucket durations (indexed like [`Bucket::ALL`]) into percentages.
    ///
    /// Returns the empty result when `total_secs` is zero.
    #[must_use]
    pub fn from_durations(durations: &[i64; 5], total_secs: i64) -> Self {
        if total_secs <= 0 {
            return Self::empty();
        }

        Bucket::ALL
            .into_iter()
            .map(|bucket| {
                (
                    bucket,
                    round_percent(durations[bucket.index()], total_secs),
                )
            })
            .collect()
    }

    /// True when no eligible samples contributed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.percentages.is_empty()
    }

    /// Percentage for one bucket, `None` on the empty result
    #[must_use]
    pub fn get(&self, bucket: Bucket) -> Option<f64> {
        self.percentages.get(&bucket).copied()
    }

    /// Iterate `(bucket, percentage)` pairs in bucket order
    pub fn iter(&self) -> impl Iterator<Item = (Bucket, f64)> + '_ {
        self.percentages.iter().map(|(bucket, pct)| (*bucket, *pct))
    }

    /// Sum of all percentages (100 within rounding tolerance when non-empty)
    #[must_use]
    pub fn total(&self) -> f64 {
        self.percentages.values().sum()
    }
}

impl FromIterator<(Bucket, f64)> for DistributionResult {
    fn from_iter<I: IntoIterator<Item = (Bucket, f64)>>(iter: I) -> Self {
        Self {
            percentages: iter.into_iter().collect(),
        }
    }
}

/// `part / total * 100`, rounded half away from zero to two decimal places
#[must_use]
pub fn round_percent(part: i64, total: i64) -> f64 {
    let scale = 10f64.powi(PERCENT_DECIMAL_PLACES);
    let pct = part as f64 / total as f64 * 100.0;
    (pct * scale).round() / scale
}

impl fmt::Display for DistributionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (bucket, pct)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{bucket}: {pct}")?;
        }
        f.write_str("}")
    }
}

impl Serialize for DistributionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.percentages.len()))?;
        for (bucket, pct) in &self.percentages {
            map.serialize_entry(bucket.as_str(), pct)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DistributionResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, f64>::deserialize(deserializer)?;
        let result: Self = raw
            .into_iter()
            .map(|(name, pct)| {
                name.parse::<Bucket>()
                    .map(|bucket| (bucket, pct))
                    .map_err(|e| D::Error::custom(e.message))
            })
            .collect::<Result<_, _>>()?;

        let found = result.percentages.len();
        if found != 0 && found != Bucket::ALL.len() {
            return Err(D::Error::custom(format!(
                "expected all {} buckets or none, found {found}",
                Bucket::ALL.len()
            )));
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_total_is_empty() {
        let result = DistributionResult::from_durations(&[0; 5], 0);
        assert!(result.is_empty());
        assert_eq!(result.get(Bucket::Zone1), None);
    }

    #[test]
    fn test_repeating_fraction_rounds_to_two_places() {
        let result = DistributionResult::from_durations(&[1000, 2000, 0, 0, 0], 3000);
        assert_eq!(result.get(Bucket::Zone1), Some(33.33));
        assert_eq!(result.get(Bucket::Zone2), Some(66.67));
        assert!((result.total() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_five_buckets_present_when_non_empty() {
        let result = DistributionResult::from_durations(&[2100, 0, 0, 0, 300], 2400);
        let buckets: Vec<Bucket> = result.iter().map(|(bucket, _)| bucket).collect();
        assert_eq!(buckets, Bucket::ALL.to_vec());
        assert_eq!(result.get(Bucket::Zone1), Some(87.5));
        assert_eq!(result.get(Bucket::Unzoned), Some(12.5));
        assert_eq!(result.get(Bucket::Zone3), Some(0.0));
    }

    #[test]
    fn test_json_uses_bucket_names_in_order() {
        let result = DistributionResult::from_durations(&[1, 1, 1, 1, 0], 4);
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(
            json,
            r#"{"zone1":25.0,"zone2":25.0,"zone3":25.0,"zone4":25.0,"unzoned":0.0}"#
        );

        let back: DistributionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn test_empty_serializes_as_empty_object() {
        let json = serde_json::to_string(&DistributionResult::empty()).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn test_display_for_logs() {
        let result = DistributionResult::from_durations(&[2100, 0, 0, 0, 300], 2400);
        assert_eq!(
            result.to_string(),
            "{zone1: 87.5, zone2: 0, zone3: 0, zone4: 0, unzoned: 12.5}"
        );
        assert_eq!(DistributionResult::empty().to_string(), "{}");
    }

    #[test]
    fn test_unknown_bucket_name_is_rejected() {
        let parsed = serde_json::from_str::<DistributionResult>(r#"{"zone9": 1.0}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_partial_bucket_map_is_rejected() {
        let parsed = serde_json::from_str::<DistributionResult>(r#"{"zone1": 40.0}"#);
        assert!(parsed.is_err());

        let four = r#"{"zone1":25.0,"zone2":25.0,"zone3":25.0,"zone4":25.0}"#;
        assert!(serde_json::from_str::<DistributionResult>(four).is_err());

        let empty: DistributionResult = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }
}
