// ABOUTME: Integration tests for the startup warm-up of the distribution cache
// ABOUTME: Verifies skip rules per runtime context and that failures never abort startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use anyhow::Result;
use common::{
    build_service, create_test_cache, test_distribution_config, two_subject_distribution,
    CountingAggregator,
};
use std::path::PathBuf;
use std::sync::Arc;
use zone_distribution::cache::CacheConfig;
use zone_distribution::config::database::{DatabaseConfig, DatabaseUrl};
use zone_distribution::config::environment::{Environment, ServerConfig};
use zone_distribution::lifecycle::{
    warm_up, RuntimeContext, SkipReason, WarmupOutcome, WarmupPolicy,
};

fn server_config(environment: Environment, database: Option<DatabaseUrl>) -> ServerConfig {
    ServerConfig {
        http_port: 0,
        environment,
        database: DatabaseConfig {
            url: database,
            ..DatabaseConfig::default()
        },
        cache: CacheConfig::default(),
        distribution: test_distribution_config(),
    }
}

fn file_database() -> Option<DatabaseUrl> {
    Some(DatabaseUrl::SQLite {
        path: PathBuf::from("./data/heart_rates.db"),
    })
}

const fn server_policy() -> WarmupPolicy {
    WarmupPolicy {
        context: RuntimeContext::Server,
        enabled: true,
        has_real_database: true,
    }
}

#[tokio::test]
async fn test_server_warm_up_populates_cache() -> Result<()> {
    let aggregator = CountingAggregator::returning(two_subject_distribution());
    let (service, _worker) = build_service(
        create_test_cache().await?,
        Arc::new(aggregator.clone()),
        &test_distribution_config(),
    );

    let outcome = warm_up(&service, &server_policy()).await;

    assert_eq!(outcome, WarmupOutcome::Warmed(two_subject_distribution()));
    assert_eq!(aggregator.call_count(), 1);
    // First read after startup is a hit
    assert_eq!(service.get_cached_distribution().await, two_subject_distribution());
    assert_eq!(service.stats().scheduled, 0);
    Ok(())
}

#[tokio::test]
async fn test_warm_up_failure_is_reported_not_raised() -> Result<()> {
    let (service, _worker) = build_service(
        create_test_cache().await?,
        Arc::new(CountingAggregator::failing()),
        &test_distribution_config(),
    );

    let outcome = warm_up(&service, &server_policy()).await;

    match outcome {
        WarmupOutcome::Failed(message) => assert!(message.contains("heart_rates")),
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(service.get_last_updated().await.is_none());
    Ok(())
}

#[tokio::test]
async fn test_non_server_contexts_skip_without_aggregating() -> Result<()> {
    let aggregator = CountingAggregator::returning(two_subject_distribution());
    let (service, _worker) = build_service(
        create_test_cache().await?,
        Arc::new(aggregator.clone()),
        &test_distribution_config(),
    );

    for (context, reason) in [
        (RuntimeContext::Test, SkipReason::TestHarness),
        (RuntimeContext::Console, SkipReason::Console),
        (RuntimeContext::TaskRunner, SkipReason::TaskRunner),
    ] {
        let policy = WarmupPolicy {
            context,
            ..server_policy()
        };
        assert_eq!(warm_up(&service, &policy).await, WarmupOutcome::Skipped(reason));
    }

    assert_eq!(aggregator.call_count(), 0);
    Ok(())
}

#[test]
fn test_policy_from_config() {
    let production = server_config(Environment::Production, file_database());
    assert_eq!(
        WarmupPolicy::from_config(RuntimeContext::Server, &production).skip_reason(),
        None
    );

    let test_env = server_config(Environment::Test, file_database());
    assert_eq!(
        WarmupPolicy::from_config(RuntimeContext::Server, &test_env).skip_reason(),
        Some(SkipReason::TestHarness)
    );

    let memory = server_config(Environment::Production, Some(DatabaseUrl::Memory));
    assert_eq!(
        WarmupPolicy::from_config(RuntimeContext::Server, &memory).skip_reason(),
        Some(SkipReason::NoDatabase)
    );

    let unconfigured = server_config(Environment::Development, None);
    assert_eq!(
        WarmupPolicy::from_config(RuntimeContext::Server, &unconfigured).skip_reason(),
        Some(SkipReason::NoDatabase)
    );

    let mut disabled = server_config(Environment::Production, file_database());
    disabled.distribution.warmup_enabled = false;
    assert_eq!(
        WarmupPolicy::from_config(RuntimeContext::Server, &disabled).skip_reason(),
        Some(SkipReason::Disabled)
    );

    assert_eq!(
        WarmupPolicy::from_config(RuntimeContext::TaskRunner, &production).skip_reason(),
        Some(SkipReason::TaskRunner)
    );
}
