// ABOUTME: CSV import of users, monitoring sessions and heart-rate data points
// ABOUTME: Source session ids are remapped to database ids while loading samples

use super::{parse_timestamp, ImportSummary};
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{NewHeartRate, NewSession, NewUser, ZoneBounds};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Locations of the three exported CSV files
#[derive(Debug, Clone)]
pub struct ImportPaths {
    /// `users.csv`
    pub users: Option<PathBuf>,
    /// `hrm_sessions.csv`
    pub sessions: Option<PathBuf>,
    /// `hrm_data_points.csv`
    pub data_points: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct UserRow {
    #[serde(rename = "User ID")]
    id: Option<i64>,
    #[serde(rename = "Created At")]
    created_at: Option<String>,
    #[serde(rename = "Username")]
    username: String,
    #[serde(rename = "Gender")]
    gender: Option<String>,
    #[serde(rename = "Age")]
    age: Option<i64>,
    #[serde(rename = "HR Zone1 BPM Min")]
    zone1_min: i64,
    #[serde(rename = "HR Zone1 BPM Max")]
    zone1_max: i64,
    #[serde(rename = "HR Zone2 BPM Min")]
    zone2_min: i64,
    #[serde(rename = "HR Zone2 BPM Max")]
    zone2_max: i64,
    #[serde(rename = "HR Zone3 BPM Min")]
    zone3_min: i64,
    #[serde(rename = "HR Zone3 BPM Max")]
    zone3_max: i64,
    #[serde(rename = "HR Zone4 BPM Min")]
    zone4_min: i64,
    #[serde(rename = "HR Zone4 BPM Max")]
    zone4_max: i64,
}

impl UserRow {
    fn into_new_user(self) -> NewUser {
        NewUser {
            id: self.id,
            username: self.username,
            gender: self.gender.filter(|g| !g.is_empty()),
            age: self.age,
            zones: ZoneBounds::from_pairs([
                (self.zone1_min, self.zone1_max),
                (self.zone2_min, self.zone2_max),
                (self.zone3_min, self.zone3_max),
                (self.zone4_min, self.zone4_max),
            ]),
            created_at: self.created_at.as_deref().and_then(parse_timestamp),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SessionRow {
    #[serde(rename = "Session ID")]
    session_id: String,
    #[serde(rename = "User Id")]
    user_id: i64,
    #[serde(rename = "Created At")]
    created_at: Option<String>,
    #[serde(rename = "Duration in Secs")]
    duration_in_secs: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct DataPointRow {
    #[serde(rename = "Session ID")]
    session_id: String,
    #[serde(rename = "Beats Per Minute")]
    bpm: Option<i64>,
    #[serde(rename = "Reading Start Time")]
    start_time: Option<String>,
    #[serde(rename = "Reading End Time")]
    end_time: Option<String>,
    #[serde(rename = "Duration in Secs")]
    duration_in_secs: Option<i64>,
}

fn open_reader(path: &Path) -> AppResult<csv::Reader<std::fs::File>> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| AppError::invalid_input(format!("Failed to open {}: {e}", path.display())))
}

/// Import users, keeping their source ids
///
/// # Errors
///
/// Returns an error if the file cannot be opened; bad rows are counted instead
pub async fn import_users(database: &Database, path: &Path) -> AppResult<ImportSummary> {
    let mut reader = open_reader(path)?;
    let mut summary = ImportSummary::default();

    for (line, row) in reader.deserialize::<UserRow>().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                summary.users_failed += 1;
                warn!(line = line + 2, error = %e, "Skipping malformed user row");
                continue;
            }
        };

        match database.create_user(&row.into_new_user()).await {
            Ok(_) => summary.users_created += 1,
            Err(e) => {
                summary.users_failed += 1;
                warn!(line = line + 2, error = %e, "User import failed");
            }
        }
    }

    info!(
        created = summary.users_created,
        failed = summary.users_failed,
        "Imported users from {}",
        path.display()
    );
    Ok(summary)
}

/// Import sessions and their data points.
///
/// Data points reference the CSV's own session ids; each is attached to the database
/// id assigned when its session row was inserted. Samples of a session that failed to
/// insert are counted as failed.
///
/// # Errors
///
/// Returns an error if either file cannot be opened
pub async fn import_heart_rates(
    database: &Database,
    sessions_path: &Path,
    data_points_path: &Path,
) -> AppResult<ImportSummary> {
    let mut summary = ImportSummary::default();
    let data_points = load_data_points(data_points_path, &mut summary)?;
    let mut reader = open_reader(sessions_path)?;

    for (line, row) in reader.deserialize::<SessionRow>().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                summary.sessions_failed += 1;
                warn!(line = line + 2, error = %e, "Skipping malformed session row");
                continue;
            }
        };

        let samples = data_points.get(&row.session_id).map_or(&[][..], Vec::as_slice);

        let session = NewSession {
            user_id: row.user_id,
            duration_in_secs: row.duration_in_secs,
            created_at: row.created_at.as_deref().and_then(parse_timestamp),
        };
        let session_id = match database.create_session(&session).await {
            Ok(id) => {
                summary.sessions_created += 1;
                id
            }
            Err(e) => {
                summary.sessions_failed += 1;
                summary.heart_rates_failed += samples.len() as u64;
                warn!(source_session = %row.session_id, error = %e, "Session import failed");
                continue;
            }
        };

        let (created, failed) = insert_session_samples(database, session_id, samples).await;
        summary.heart_rates_created += created;
        summary.heart_rates_failed += failed;
    }

    info!(
        sessions = summary.sessions_created,
        heart_rates = summary.heart_rates_created,
        failed = summary.sessions_failed + summary.heart_rates_failed,
        "Imported heart-rate data"
    );
    Ok(summary)
}

/// Import whichever files are present, users first
///
/// # Errors
///
/// Returns an error if only one of the session and data point files is given, or a
/// file cannot be opened
pub async fn import_all(database: &Database, paths: &ImportPaths) -> AppResult<ImportSummary> {
    let mut summary = ImportSummary::default();

    if let Some(users) = &paths.users {
        summary += import_users(database, users).await?;
    }

    match (&paths.sessions, &paths.data_points) {
        (Some(sessions), Some(data_points)) => {
            summary += import_heart_rates(database, sessions, data_points).await?;
        }
        (None, None) => {}
        _ => {
            return Err(AppError::invalid_input(
                "Session and data point files must be imported together",
            ))
        }
    }

    Ok(summary)
}

/// Group data point rows by their CSV session id
fn load_data_points(
    path: &Path,
    summary: &mut ImportSummary,
) -> AppResult<HashMap<String, Vec<DataPointRow>>> {
    let mut reader = open_reader(path)?;
    let mut by_session: HashMap<String, Vec<DataPointRow>> = HashMap::new();

    for (line, row) in reader.deserialize::<DataPointRow>().enumerate() {
        match row {
            Ok(row) => by_session.entry(row.session_id.clone()).or_default().push(row),
            Err(e) => {
                summary.heart_rates_failed += 1;
                warn!(line = line + 2, error = %e, "Skipping malformed data point row");
            }
        }
    }

    Ok(by_session)
}

/// Insert one session's samples in a transaction, falling back to row-by-row inserts
/// so a single bad sample does not reject its neighbours
async fn insert_session_samples(
    database: &Database,
    session_id: i64,
    rows: &[DataPointRow],
) -> (u64, u64) {
    let samples: Vec<NewHeartRate> = rows
        .iter()
        .map(|row| NewHeartRate {
            session_id,
            bpm: row.bpm,
            start_time: row.start_time.as_deref().and_then(parse_timestamp),
            end_time: row.end_time.as_deref().and_then(parse_timestamp),
            duration_in_secs: row.duration_in_secs,
        })
        .collect();

    if let Ok(created) = database.insert_heart_rates(&samples).await {
        return (created, 0);
    }

    let mut created = 0;
    let mut failed = 0;
    for sample in &samples {
        match database.insert_heart_rate(sample).await {
            Ok(_) => created += 1,
            Err(e) => {
                failed += 1;
                warn!(session_id, error = %e, "Heart rate import failed");
            }
        }
    }
    (created, failed)
}
