// ABOUTME: Heart-rate sample database operations
// ABOUTME: Single and batched inserts plus global bpm statistics

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::NewHeartRate;

impl Database {
    /// Create heart rates table and the indexes aggregation relies on
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails
    pub(super) async fn migrate_heart_rates(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS heart_rates (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                monitoring_session_id INTEGER NOT NULL
                    REFERENCES monitoring_sessions(id) ON DELETE CASCADE,
                bpm INTEGER,
                start_time DATETIME,
                end_time DATETIME,
                duration_in_secs INTEGER CHECK (duration_in_secs IS NULL OR duration_in_secs >= 0),
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_heart_rates_session_id ON heart_rates(monitoring_session_id)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_heart_rates_bpm ON heart_rates(bpm)")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_heart_rates_bpm_duration ON heart_rates(bpm, duration_in_secs)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert one sample, returning its id
    ///
    /// # Errors
    ///
    /// Returns an error if the session does not exist or the insert fails
    pub async fn insert_heart_rate(&self, sample: &NewHeartRate) -> AppResult<i64> {
        let result = Self::insert_heart_rate_query(sample)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::database(format!(
                    "Failed to insert heart rate for session {}: {e}",
                    sample.session_id
                ))
            })?;

        Ok(result.last_insert_rowid())
    }

    /// Insert many samples in one transaction
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails; nothing is written in that case
    pub async fn insert_heart_rates(&self, samples: &[NewHeartRate]) -> AppResult<u64> {
        let mut tx = self.pool.begin().await?;

        for sample in samples {
            Self::insert_heart_rate_query(sample)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::database(format!(
                        "Failed to insert heart rate for session {}: {e}",
                        sample.session_id
                    ))
                })?;
        }

        tx.commit().await?;
        Ok(samples.len() as u64)
    }

    fn insert_heart_rate_query(
        sample: &NewHeartRate,
    ) -> sqlx::query::Query<'_, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'_>> {
        sqlx::query(
            r"
            INSERT INTO heart_rates (monitoring_session_id, bpm, start_time, end_time, duration_in_secs)
            VALUES (?, ?, ?, ?, ?)
            ",
        )
        .bind(sample.session_id)
        .bind(sample.bpm)
        .bind(sample.start_time)
        .bind(sample.end_time)
        .bind(sample.duration_in_secs)
    }

    /// Delete every sample, returning the number removed
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails
    pub async fn delete_all_heart_rates(&self) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM heart_rates")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Number of stored samples, including ones without a value
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn heart_rate_count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM heart_rates")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Lowest bpm across all samples, `None` when no sample has a value
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn min_bpm(&self) -> AppResult<Option<i64>> {
        let value: Option<i64> = sqlx::query_scalar("SELECT MIN(bpm) FROM heart_rates")
            .fetch_one(&self.pool)
            .await?;
        Ok(value)
    }

    /// Highest bpm across all samples
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn max_bpm(&self) -> AppResult<Option<i64>> {
        let value: Option<i64> = sqlx::query_scalar("SELECT MAX(bpm) FROM heart_rates")
            .fetch_one(&self.pool)
            .await?;
        Ok(value)
    }

    /// Mean bpm across all samples with a value
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn avg_bpm(&self) -> AppResult<Option<f64>> {
        let value: Option<f64> = sqlx::query_scalar("SELECT AVG(bpm) FROM heart_rates")
            .fetch_one(&self.pool)
            .await?;
        Ok(value)
    }
}
