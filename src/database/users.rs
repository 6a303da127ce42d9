// ABOUTME: User database operations
// ABOUTME: Subjects carry the four zone ranges every sample is classified against

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{NewUser, User, ZoneBounds};
use chrono::{DateTime, Utc};
use sqlx::Row;

impl Database {
    /// Create users table
    ///
    /// # Errors
    ///
    /// Returns an error if table creation fails
    pub(super) async fn migrate_users(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                gender TEXT,
                age INTEGER,
                zone1_min INTEGER NOT NULL,
                zone1_max INTEGER NOT NULL,
                zone2_min INTEGER NOT NULL,
                zone2_max INTEGER NOT NULL,
                zone3_min INTEGER NOT NULL,
                zone3_max INTEGER NOT NULL,
                zone4_min INTEGER NOT NULL,
                zone4_max INTEGER NOT NULL,
                created_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a user, returning its id
    ///
    /// # Errors
    ///
    /// Returns an error if the username or explicit id is already taken
    pub async fn create_user(&self, user: &NewUser) -> AppResult<i64> {
        let [z1, z2, z3, z4] = user.zones.zones;

        let result = sqlx::query(
            r"
            INSERT INTO users (
                id, username, gender, age,
                zone1_min, zone1_max, zone2_min, zone2_max,
                zone3_min, zone3_max, zone4_min, zone4_max,
                created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.gender)
        .bind(user.age)
        .bind(z1.min)
        .bind(z1.max)
        .bind(z2.min)
        .bind(z2.max)
        .bind(z3.min)
        .bind(z3.max)
        .bind(z4.min)
        .bind(z4.max)
        .bind(user.created_at.unwrap_or_else(Utc::now))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create user '{}': {e}", user.username)))?;

        Ok(result.last_insert_rowid())
    }

    /// Fetch a user by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_user(&self, user_id: i64) -> AppResult<Option<User>> {
        let row = sqlx::query(
            r"
            SELECT id, username, gender, age,
                   zone1_min, zone1_max, zone2_min, zone2_max,
                   zone3_min, zone3_max, zone4_min, zone4_max,
                   created_at
            FROM users
            WHERE id = ?
            ",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    /// Number of users
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_user_count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Delete every user; sessions and samples go with them through the cascade
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails
    pub async fn delete_all_users(&self) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM users").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> AppResult<User> {
        let created_at: DateTime<Utc> = row.try_get("created_at")?;
        Ok(User {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            gender: row.try_get("gender")?,
            age: row.try_get("age")?,
            zones: zone_bounds_from_row(row)?,
            created_at,
        })
    }
}

/// Read `zone1_min..zone4_max` columns from a row
pub(super) fn zone_bounds_from_row(row: &sqlx::sqlite::SqliteRow) -> AppResult<ZoneBounds> {
    Ok(ZoneBounds::from_pairs([
        (row.try_get("zone1_min")?, row.try_get("zone1_max")?),
        (row.try_get("zone2_min")?, row.try_get("zone2_max")?),
        (row.try_get("zone3_min")?, row.try_get("zone3_max")?),
        (row.try_get("zone4_min")?, row.try_get("zone4_max")?),
    ]))
}
