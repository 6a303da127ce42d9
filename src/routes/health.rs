// ABOUTME: Health check route handlers for service monitoring and status endpoints
// ABOUTME: Reports database and cache reachability plus background refresh counters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Health check routes for service monitoring

use crate::cache::CacheProvider;
use crate::resources::ServerResources;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use std::sync::Arc;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::handle_health))
            .with_state(resources)
    }

    async fn handle_health(State(resources): State<Arc<ServerResources>>) -> impl IntoResponse {
        let database = resources.database.health_check().await;
        let cache = resources.cache.health_check().await;
        let healthy = database.is_ok() && cache.is_ok();

        let status = if healthy {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };

        let body = serde_json::json!({
            "status": if healthy { "healthy" } else { "degraded" },
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "version": env!("CARGO_PKG_VERSION"),
            "database": database.map_or_else(|e| e.to_string(), |()| "ok".to_owned()),
            "cache": {
                "backend": resources.cache.backend_name(),
                "status": cache.map_or_else(|e| e.to_string(), |()| "ok".to_owned()),
            },
            "refresh": resources.distribution.stats(),
        });

        (status, Json(body))
    }
}
