// ABOUTME: Monitoring session database operations
// ABOUTME: Listing with username search and day filter, per-session stats and zone time

use super::Database;
use crate::constants::defaults::{RECENT_SESSIONS_LIMIT, SESSION_SEARCH_LIMIT};
use crate::errors::{AppError, AppResult};
use crate::models::{
    NewSession, SessionDateRange, SessionQuery, SessionStats, SessionSummary,
};
use chrono::{DateTime, Days, NaiveDate, Utc};
use sqlx::{QueryBuilder, Row, Sqlite};

impl Database {
    /// Create monitoring sessions table
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails
    pub(super) async fn migrate_sessions(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS monitoring_sessions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                duration_in_secs INTEGER,
                created_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_monitoring_sessions_user_id ON monitoring_sessions(user_id)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_monitoring_sessions_created_at ON monitoring_sessions(created_at)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a session, returning its id
    ///
    /// # Errors
    ///
    /// Returns an error if the owning user does not exist or the insert fails
    pub async fn create_session(&self, session: &NewSession) -> AppResult<i64> {
        let result = sqlx::query(
            r"
            INSERT INTO monitoring_sessions (user_id, duration_in_secs, created_at)
            VALUES (?, ?, ?)
            ",
        )
        .bind(session.user_id)
        .bind(session.duration_in_secs)
        .bind(session.created_at.unwrap_or_else(Utc::now))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::database(format!(
                "Failed to create session for user {}: {e}",
                session.user_id
            ))
        })?;

        Ok(result.last_insert_rowid())
    }

    /// Delete every session and, through the foreign key cascade, its samples
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails
    pub async fn delete_all_sessions(&self) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM monitoring_sessions")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Fetch one session with its owner's username
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_session(&self, session_id: i64) -> AppResult<Option<SessionSummary>> {
        let row = sqlx::query(
            r"
            SELECT s.id, s.user_id, u.username, s.duration_in_secs, s.created_at
            FROM monitoring_sessions s
            INNER JOIN users u ON u.id = s.user_id
            WHERE s.id = ?
            ",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_session).transpose()
    }

    /// List sessions, newest first.
    ///
    /// With no filters only the most recent sessions are returned. A username search is
    /// capped at the search limit; a day filter alone is uncapped.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_sessions(&self, query: &SessionQuery) -> AppResult<Vec<SessionSummary>> {
        let search = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let limit = query.limit.or_else(|| {
            if search.is_some() {
                Some(SESSION_SEARCH_LIMIT)
            } else if query.is_unfiltered() {
                Some(RECENT_SESSIONS_LIMIT)
            } else {
                None
            }
        });

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            r"
            SELECT s.id, s.user_id, u.username, s.duration_in_secs, s.created_at
            FROM monitoring_sessions s
            INNER JOIN users u ON u.id = s.user_id
            WHERE 1 = 1
            ",
        );

        if let Some(search) = search {
            builder
                .push(" AND u.username LIKE ")
                .push_bind(format!("%{search}%"));
        }

        if let Some(date) = query.date {
            let (start, end) = day_bounds(date)?;
            builder
                .push(" AND s.created_at >= ")
                .push_bind(start)
                .push(" AND s.created_at < ")
                .push_bind(end);
        }

        builder.push(" ORDER BY s.created_at DESC, s.id DESC");
        if let Some(limit) = limit {
            builder.push(" LIMIT ").push_bind(i64::from(limit));
        }

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter().map(Self::row_to_session).collect()
    }

    /// Earliest and latest session days, for date pickers
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn session_date_range(&self) -> AppResult<SessionDateRange> {
        let (min, max): (Option<DateTime<Utc>>, Option<DateTime<Utc>>) = sqlx::query_as(
            "SELECT MIN(created_at), MAX(created_at) FROM monitoring_sessions",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(SessionDateRange {
            min_date: min.map(|ts| ts.date_naive()),
            max_date: max.map(|ts| ts.date_naive()),
        })
    }

    /// Min/max/avg bpm for one session, ignoring samples without a value
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn session_stats(&self, session_id: i64) -> AppResult<SessionStats> {
        let (min_bpm, max_bpm, avg_bpm): (Option<i64>, Option<i64>, Option<f64>) =
            sqlx::query_as(
                r"
                SELECT MIN(bpm), MAX(bpm), AVG(bpm)
                FROM heart_rates
                WHERE monitoring_session_id = ?
                ",
            )
            .bind(session_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(SessionStats {
            min_bpm,
            max_bpm,
            avg_bpm,
        })
    }

    /// Seconds spent in zones 1..=4 during one session.
    ///
    /// Uses the same first-match classification as the global distribution; unzoned
    /// time is dropped. All zeros when the session or its owner is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn session_zone_durations(&self, session_id: i64) -> AppResult<[i64; 4]> {
        let rows = sqlx::query(
            r"
            SELECT
                CASE
                    WHEN hr.bpm BETWEEN u.zone1_min AND u.zone1_max THEN 1
                    WHEN hr.bpm BETWEEN u.zone2_min AND u.zone2_max THEN 2
                    WHEN hr.bpm BETWEEN u.zone3_min AND u.zone3_max THEN 3
                    WHEN hr.bpm BETWEEN u.zone4_min AND u.zone4_max THEN 4
                    ELSE 0
                END AS zone,
                SUM(hr.duration_in_secs) AS seconds
            FROM heart_rates hr
            INNER JOIN monitoring_sessions s ON s.id = hr.monitoring_session_id
            INNER JOIN users u ON u.id = s.user_id
            WHERE hr.monitoring_session_id = ?
              AND hr.bpm IS NOT NULL
              AND hr.duration_in_secs IS NOT NULL
            GROUP BY zone
            ",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        let mut durations = [0i64; 4];
        for row in &rows {
            let zone: i64 = row.try_get("zone")?;
            let seconds: Option<i64> = row.try_get("seconds")?;
            if let Some(slot) = usize::try_from(zone - 1)
                .ok()
                .and_then(|idx| durations.get_mut(idx))
            {
                *slot = seconds.unwrap_or(0);
            }
        }

        Ok(durations)
    }

    fn row_to_session(row: &sqlx::sqlite::SqliteRow) -> AppResult<SessionSummary> {
        Ok(SessionSummary {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            username: row.try_get("username")?,
            duration_in_secs: row.try_get("duration_in_secs")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// `[start, end)` of a UTC calendar day
fn day_bounds(date: NaiveDate) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
    let start = date.and_time(chrono::NaiveTime::MIN).and_utc();
    let end = start
        .checked_add_days(Days::new(1))
        .ok_or_else(|| AppError::invalid_input(format!("Date out of range: {date}")))?;
    Ok((start, end))
}
