// ABOUTME: Aggregation inputs for the zone distribution
// ABOUTME: Keyset-paged eligible samples and the single conditional-sum pushdown query

use super::users::zone_bounds_from_row;
use super::Database;
use crate::errors::AppResult;
use crate::models::ZonedSample;
use sqlx::Row;

/// Per-bucket second totals computed by the storage engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ZoneDurationTotals {
    /// Seconds per bucket, in `Bucket::ALL` order
    pub buckets: [i64; 5],
    /// Seconds across all eligible samples
    pub total: i64,
}

// Each bucket's condition is "first inclusive match", spelled out so that a sample is
// unzoned only when it fails all four range tests. Zone bounds are NOT NULL and bpm is
// filtered to NOT NULL, so NOT(...) never sees a NULL operand.
const ZONE_DURATION_TOTALS_SQL: &str = r"
    SELECT
        SUM(CASE
            WHEN hr.bpm BETWEEN u.zone1_min AND u.zone1_max
            THEN hr.duration_in_secs ELSE 0 END) AS zone1,
        SUM(CASE
            WHEN NOT (hr.bpm BETWEEN u.zone1_min AND u.zone1_max)
             AND hr.bpm BETWEEN u.zone2_min AND u.zone2_max
            THEN hr.duration_in_secs ELSE 0 END) AS zone2,
        SUM(CASE
            WHEN NOT (hr.bpm BETWEEN u.zone1_min AND u.zone1_max)
             AND NOT (hr.bpm BETWEEN u.zone2_min AND u.zone2_max)
             AND hr.bpm BETWEEN u.zone3_min AND u.zone3_max
            THEN hr.duration_in_secs ELSE 0 END) AS zone3,
        SUM(CASE
            WHEN NOT (hr.bpm BETWEEN u.zone1_min AND u.zone1_max)
             AND NOT (hr.bpm BETWEEN u.zone2_min AND u.zone2_max)
             AND NOT (hr.bpm BETWEEN u.zone3_min AND u.zone3_max)
             AND hr.bpm BETWEEN u.zone4_min AND u.zone4_max
            THEN hr.duration_in_secs ELSE 0 END) AS zone4,
        SUM(CASE
            WHEN NOT (hr.bpm BETWEEN u.zone1_min AND u.zone1_max)
             AND NOT (hr.bpm BETWEEN u.zone2_min AND u.zone2_max)
             AND NOT (hr.bpm BETWEEN u.zone3_min AND u.zone3_max)
             AND NOT (hr.bpm BETWEEN u.zone4_min AND u.zone4_max)
            THEN hr.duration_in_secs ELSE 0 END) AS unzoned,
        SUM(hr.duration_in_secs) AS total
    FROM heart_rates hr
    INNER JOIN monitoring_sessions s ON s.id = hr.monitoring_session_id
    INNER JOIN users u ON u.id = s.user_id
    WHERE hr.bpm IS NOT NULL
      AND hr.duration_in_secs IS NOT NULL
";

impl Database {
    /// Next page of eligible samples with `id > after_id`, ordered by id.
    ///
    /// Eligible means both `bpm` and `duration_in_secs` are present and the sample's
    /// session and subject exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn zoned_sample_batch(&self, after_id: i64, limit: u32) -> AppResult<Vec<ZonedSample>> {
        let rows = sqlx::query(
            r"
            SELECT hr.id, hr.bpm, hr.duration_in_secs,
                   u.zone1_min, u.zone1_max, u.zone2_min, u.zone2_max,
                   u.zone3_min, u.zone3_max, u.zone4_min, u.zone4_max
            FROM heart_rates hr
            INNER JOIN monitoring_sessions s ON s.id = hr.monitoring_session_id
            INNER JOIN users u ON u.id = s.user_id
            WHERE hr.id > ?
              AND hr.bpm IS NOT NULL
              AND hr.duration_in_secs IS NOT NULL
            ORDER BY hr.id
            LIMIT ?
            ",
        )
        .bind(after_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(ZonedSample {
                    id: row.try_get("id")?,
                    bpm: row.try_get("bpm")?,
                    duration_in_secs: row.try_get("duration_in_secs")?,
                    zones: zone_bounds_from_row(row)?,
                })
            })
            .collect()
    }

    /// Per-bucket duration sums and the total, in one storage-side pass
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn zone_duration_totals(&self) -> AppResult<ZoneDurationTotals> {
        // SUM over zero rows is NULL
        let (zone1, zone2, zone3, zone4, unzoned, total): (
            Option<i64>,
            Option<i64>,
            Option<i64>,
            Option<i64>,
            Option<i64>,
            Option<i64>,
        ) = sqlx::query_as(ZONE_DURATION_TOTALS_SQL)
            .fetch_one(&self.pool)
            .await?;

        Ok(ZoneDurationTotals {
            buckets: [zone1, zone2, zone3, zone4, unzoned].map(|secs| secs.unwrap_or(0)),
            total: total.unwrap_or(0),
        })
    }
}
