// ABOUTME: Criterion benchmarks comparing the reference and pushdown zone aggregators
// ABOUTME: Runs both strategies over seeded synthetic corpora of increasing size
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Criterion benchmarks for zone distribution aggregation.
//!
//! The reference strategy pages every eligible sample into the process; the pushdown
//! strategy returns six numbers. The gap between the two grows with corpus size.

#![allow(
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    missing_docs
)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tokio::runtime::Runtime;
use zone_distribution::aggregation::{PushdownAggregator, ReferenceAggregator, ZoneAggregator};
use zone_distribution::config::database::DatabaseUrl;
use zone_distribution::database::Database;
use zone_distribution::import::{seed_synthetic, SyntheticConfig};

/// Corpus sizes as (users, sessions per user, samples per session)
const CORPORA: [(u32, u32, u32); 3] = [(10, 5, 100), (20, 10, 250), (40, 10, 500)];

async fn seeded_database(users: u32, sessions_per_user: u32, samples_per_session: u32) -> Database {
    let db = Database::new(&DatabaseUrl::Memory, 1).await.unwrap();
    let config = SyntheticConfig {
        users,
        sessions_per_user,
        samples_per_session,
        ..SyntheticConfig::default()
    };
    seed_synthetic(&db, &config).await.unwrap();
    db
}

/// Benchmark both strategies over the same corpora
fn bench_strategies(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("zone_aggregation");
    group.sample_size(10);

    for (users, sessions, samples) in CORPORA {
        let db = rt.block_on(seeded_database(users, sessions, samples));
        let rows = u64::from(users * sessions * samples);
        group.throughput(Throughput::Elements(rows));

        let reference = ReferenceAggregator::new(db.clone(), 1_000);
        group.bench_with_input(BenchmarkId::new("reference", rows), &reference, |b, agg| {
            b.iter(|| rt.block_on(async { black_box(agg.aggregate().await.unwrap()) }));
        });

        let pushdown = PushdownAggregator::new(db);
        group.bench_with_input(BenchmarkId::new("pushdown", rows), &pushdown, |b, agg| {
            b.iter(|| rt.block_on(async { black_box(agg.aggregate().await.unwrap()) }));
        });
    }

    group.finish();
}

/// Benchmark the reference strategy's sensitivity to page size
fn bench_reference_batch_size(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("reference_batch_size");
    group.sample_size(10);

    let db = rt.block_on(seeded_database(20, 10, 250));

    for batch_size in [100_u32, 1_000, 10_000] {
        let reference = ReferenceAggregator::new(db.clone(), batch_size);
        group.bench_with_input(
            BenchmarkId::from_parameter(batch_size),
            &reference,
            |b, agg| {
                b.iter(|| rt.block_on(async { black_box(agg.aggregate().await.unwrap()) }));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_strategies, bench_reference_batch_size);
criterion_main!(benches);
