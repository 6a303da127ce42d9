// ABOUTME: Startup warm-up of the zone distribution cache
// ABOUTME: Decides from the runtime context whether to precompute, and never aborts startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Startup Lifecycle
//!
//! A server process refreshes the distribution once, synchronously, before it starts
//! accepting requests so the first read is a cache hit. Every other kind of process
//! skips this step. A failed warm-up is logged and startup continues; the read path
//! will schedule a background refresh on the first miss instead.

use crate::cache::CacheProvider;
use crate::config::environment::{Environment, ServerConfig};
use crate::models::DistributionResult;
use crate::refresh::ZoneDistributionService;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tracing::{info, warn};

/// What kind of process is starting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeContext {
    /// Long-running HTTP server
    Server,
    /// Automated test harness
    Test,
    /// Interactive console session
    Console,
    /// Build, maintenance or seeding task
    TaskRunner,
}

impl RuntimeContext {
    /// Context for an entry point; a test environment always wins
    #[must_use]
    pub const fn resolve(requested: Self, environment: Environment) -> Self {
        if environment.is_test() {
            Self::Test
        } else {
            requested
        }
    }
}

impl fmt::Display for RuntimeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Server => f.write_str("server"),
            Self::Test => f.write_str("test"),
            Self::Console => f.write_str("console"),
            Self::TaskRunner => f.write_str("task_runner"),
        }
    }
}

/// Why warm-up did not run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Running under a test harness
    TestHarness,
    /// Running in an interactive console
    Console,
    /// Running a build or maintenance task
    TaskRunner,
    /// Turned off by configuration
    Disabled,
    /// No persistent database configured
    NoDatabase,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TestHarness => f.write_str("running under test harness"),
            Self::Console => f.write_str("running in interactive console"),
            Self::TaskRunner => f.write_str("running as task runner"),
            Self::Disabled => f.write_str("disabled by configuration"),
            Self::NoDatabase => f.write_str("no database configured"),
        }
    }
}

/// Result of a warm-up attempt
#[derive(Debug, Clone, PartialEq)]
pub enum WarmupOutcome {
    /// Cache populated with this distribution
    Warmed(DistributionResult),
    /// Warm-up intentionally not attempted
    Skipped(SkipReason),
    /// Aggregation failed; startup continues
    Failed(String),
}

/// Inputs that decide whether warm-up runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarmupPolicy {
    /// Process kind
    pub context: RuntimeContext,
    /// `ZONE_DISTRIBUTION_WARMUP`
    pub enabled: bool,
    /// A persistent database is configured
    pub has_real_database: bool,
}

impl WarmupPolicy {
    /// Policy for `requested` context under the loaded configuration
    #[must_use]
    pub fn from_config(requested: RuntimeContext, config: &ServerConfig) -> Self {
        Self {
            context: RuntimeContext::resolve(requested, config.environment),
            enabled: config.distribution.warmup_enabled,
            has_real_database: config.database.has_real_database(),
        }
    }

    /// `None` when warm-up should run
    #[must_use]
    pub const fn skip_reason(&self) -> Option<SkipReason> {
        match self.context {
            RuntimeContext::Test => Some(SkipReason::TestHarness),
            RuntimeContext::Console => Some(SkipReason::Console),
            RuntimeContext::TaskRunner => Some(SkipReason::TaskRunner),
            RuntimeContext::Server if !self.enabled => Some(SkipReason::Disabled),
            RuntimeContext::Server if !self.has_real_database => Some(SkipReason::NoDatabase),
            RuntimeContext::Server => None,
        }
    }
}

/// Precompute the distribution once at startup.
///
/// Never returns an error: failures are logged as warnings and reported as
/// [`WarmupOutcome::Failed`].
pub async fn warm_up<C: CacheProvider + 'static>(
    service: &ZoneDistributionService<C>,
    policy: &WarmupPolicy,
) -> WarmupOutcome {
    if let Some(reason) = policy.skip_reason() {
        info!(context = %policy.context, "Skipping zone distribution warm-up: {reason}");
        return WarmupOutcome::Skipped(reason);
    }

    info!("Warming zone distribution cache");
    let started = Instant::now();

    match service.refresh_now().await {
        Ok(result) => {
            info!(
                elapsed_secs = %format!("{:.2}", started.elapsed().as_secs_f64()),
                "Zone distribution cache warmed"
            );
            WarmupOutcome::Warmed(result)
        }
        Err(e) => {
            warn!(error = %e, "Failed to warm zone distribution cache");
            WarmupOutcome::Failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(context: RuntimeContext) -> WarmupPolicy {
        WarmupPolicy {
            context,
            enabled: true,
            has_real_database: true,
        }
    }

    #[test]
    fn test_only_server_context_warms() {
        assert_eq!(policy(RuntimeContext::Server).skip_reason(), None);
        assert_eq!(
            policy(RuntimeContext::Test).skip_reason(),
            Some(SkipReason::TestHarness)
        );
        assert_eq!(
            policy(RuntimeContext::Console).skip_reason(),
            Some(SkipReason::Console)
        );
        assert_eq!(
            policy(RuntimeContext::TaskRunner).skip_reason(),
            Some(SkipReason::TaskRunner)
        );
    }

    #[test]
    fn test_server_skips_when_disabled_or_without_database() {
        let disabled = WarmupPolicy {
            enabled: false,
            ..policy(RuntimeContext::Server)
        };
        assert_eq!(disabled.skip_reason(), Some(SkipReason::Disabled));

        let no_db = WarmupPolicy {
            has_real_database: false,
            ..policy(RuntimeContext::Server)
        };
        assert_eq!(no_db.skip_reason(), Some(SkipReason::NoDatabase));
    }

    #[test]
    fn test_test_environment_forces_test_context() {
        assert_eq!(
            RuntimeContext::resolve(RuntimeContext::Server, Environment::Test),
            RuntimeContext::Test
        );
        assert_eq!(
            RuntimeContext::resolve(RuntimeContext::Server, Environment::Production),
            RuntimeContext::Server
        );
    }
}
