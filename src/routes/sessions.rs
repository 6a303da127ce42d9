// ABOUTME: Monitoring session listing, session detail and global heart-rate stats routes
// ABOUTME: Thin handlers over the database collaborator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::AppError;
use crate::models::{SessionDateRange, SessionDetail, SessionQuery, SessionStats, SessionSummary};
use crate::resources::ServerResources;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Raw query string for session listing
#[derive(Debug, Default, Deserialize)]
pub struct SessionListParams {
    /// Username substring
    pub search: Option<String>,
    /// `YYYY-MM-DD`; empty is ignored
    pub date: Option<String>,
}

impl SessionListParams {
    fn into_query(self) -> Result<SessionQuery, AppError> {
        let date = self
            .date
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(|raw| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| {
                    AppError::invalid_input(format!("Invalid date '{raw}', expected YYYY-MM-DD: {e}"))
                })
            })
            .transpose()?;

        Ok(SessionQuery {
            search: self.search,
            date,
            limit: None,
        })
    }
}

/// Session listing with the overall date range for date pickers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionListResponse {
    /// Matching sessions, newest first
    pub sessions: Vec<SessionSummary>,
    /// Date range over all sessions
    #[serde(flatten)]
    pub date_range: SessionDateRange,
}

/// Global bpm statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartRateStatsResponse {
    /// Min/max/avg bpm over every sample with a value
    #[serde(flatten)]
    pub stats: SessionStats,
    /// Stored samples, including ones without a value
    pub sample_count: i64,
}

/// Session routes
pub struct SessionRoutes;

impl SessionRoutes {
    /// Create all session and statistics routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/sessions", get(Self::handle_list_sessions))
            .route("/api/sessions/:id", get(Self::handle_get_session))
            .route("/api/heart-rates/stats", get(Self::handle_heart_rate_stats))
            .with_state(resources)
    }

    async fn handle_list_sessions(
        State(resources): State<Arc<ServerResources>>,
        Query(params): Query<SessionListParams>,
    ) -> Result<Response, AppError> {
        let query = params.into_query()?;
        let sessions = resources.database.list_sessions(&query).await?;
        let date_range = resources.database.session_date_range().await?;

        Ok((
            StatusCode::OK,
            Json(SessionListResponse {
                sessions,
                date_range,
            }),
        )
            .into_response())
    }

    async fn handle_get_session(
        State(resources): State<Arc<ServerResources>>,
        Path(session_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let session = resources
            .database
            .get_session(session_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Session {session_id}")))?;

        let stats = resources.database.session_stats(session_id).await?;
        let zone_durations = resources.database.session_zone_durations(session_id).await?;

        Ok((
            StatusCode::OK,
            Json(SessionDetail {
                session,
                stats,
                zone_durations,
            }),
        )
            .into_response())
    }

    async fn handle_heart_rate_stats(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let db = &resources.database;
        let stats = SessionStats {
            min_bpm: db.min_bpm().await?,
            max_bpm: db.max_bpm().await?,
            avg_bpm: db.avg_bpm().await?,
        };
        let sample_count = db.heart_rate_count().await?;

        Ok((StatusCode::OK, Json(HeartRateStatsResponse { stats, sample_count })).into_response())
    }
}
