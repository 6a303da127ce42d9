// ABOUTME: Zone distribution route handlers
// ABOUTME: Cached read, synchronous refresh and background refresh scheduling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::AppError;
use crate::models::DistributionResult;
use crate::refresh::ScheduleOutcome;
use crate::resources::ServerResources;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Body of a synchronous refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    /// Freshly computed distribution
    pub data: DistributionResult,
    /// Computation time
    pub updated_at: DateTime<Utc>,
}

/// Body of a background refresh request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResponse {
    /// `scheduled` or `coalesced`
    pub status: String,
    /// Queue job id when a new job was scheduled
    pub job_id: Option<Uuid>,
}

/// Zone distribution routes
pub struct DistributionRoutes;

impl DistributionRoutes {
    /// Create all zone distribution routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/zone-distribution", get(Self::handle_get_distribution))
            .route(
                "/api/zone-distribution/refresh",
                post(Self::handle_refresh_now),
            )
            .route(
                "/api/zone-distribution/refresh/async",
                post(Self::handle_schedule_refresh),
            )
            .with_state(resources)
    }

    /// Cached distribution; never waits for an aggregation
    async fn handle_get_distribution(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let snapshot = resources.distribution.snapshot().await;
        Ok((StatusCode::OK, Json(snapshot)).into_response())
    }

    /// Recompute inline and return the fresh value
    async fn handle_refresh_now(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let (data, updated_at) = resources.distribution.refresh_now_with_timestamp().await?;
        Ok((StatusCode::OK, Json(RefreshResponse { data, updated_at })).into_response())
    }

    /// Queue a background refresh
    async fn handle_schedule_refresh(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let response = match resources.distribution.schedule_refresh() {
            ScheduleOutcome::Queued(job_id) => ScheduleResponse {
                status: "scheduled".to_owned(),
                job_id: Some(job_id),
            },
            ScheduleOutcome::Coalesced => ScheduleResponse {
                status: "coalesced".to_owned(),
                job_id: None,
            },
            ScheduleOutcome::Rejected => {
                return Err(AppError::unavailable(
                    "Refresh queue is full or stopped, try again later",
                ))
            }
        };

        Ok((StatusCode::ACCEPTED, Json(response)).into_response())
    }
}
