// ABOUTME: Shared server resources handed to every HTTP handler
// ABOUTME: Built once at startup; the cache store lives exactly as long as these resources
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::aggregation::PushdownAggregator;
use crate::cache::factory::Cache;
use crate::config::environment::ServerConfig;
use crate::database::Database;
use crate::refresh::{RefreshWorker, ZoneDistributionService};
use std::sync::Arc;

/// Long-lived dependencies shared across request handlers
#[derive(Clone)]
pub struct ServerResources {
    /// Persistence layer
    pub database: Database,
    /// Cache store, also injected into the distribution service
    pub cache: Cache,
    /// Refresh orchestrator and read path
    pub distribution: ZoneDistributionService<Cache>,
    /// Loaded configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Wire the production pushdown aggregator to the given database and cache.
    ///
    /// Returns the worker that must be spawned for background refreshes to run.
    #[must_use]
    pub fn new(database: Database, cache: Cache, config: ServerConfig) -> (Self, RefreshWorker<Cache>) {
        let aggregator = Arc::new(PushdownAggregator::new(database.clone()));
        let (distribution, worker) =
            ZoneDistributionService::new(cache.clone(), aggregator, &config.distribution);

        (
            Self {
                database,
                cache,
                distribution,
                config: Arc::new(config),
            },
            worker,
        )
    }
}
