// ABOUTME: Route module organization for the zone distribution HTTP surface
// ABOUTME: Assembles domain routers behind a shared tracing layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module
//!
//! Each domain module contains only route definitions and thin handlers that delegate
//! to the database or the distribution service.

/// Zone distribution read and refresh routes
pub mod distribution;
/// Health check routes
pub mod health;
/// Monitoring session and heart-rate statistics routes
pub mod sessions;

pub use distribution::DistributionRoutes;
pub use health::HealthRoutes;
pub use sessions::SessionRoutes;

use crate::resources::ServerResources;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Full application router
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(&resources)))
        .merge(DistributionRoutes::routes(Arc::clone(&resources)))
        .merge(SessionRoutes::routes(resources))
        .layer(TraceLayer::new_for_http())
}
