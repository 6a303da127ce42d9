// ABOUTME: Task runner that loads users, sessions and heart-rate samples into the database
// ABOUTME: Imports exported CSV files or generates a reproducible synthetic corpus
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Heart-rate data seeder.
//!
//! Usage:
//! ```bash
//! # Import users and heart-rate data from ./data/csv
//! cargo run --bin seed-heart-rates
//!
//! # Only users, replacing existing ones
//! cargo run --bin seed-heart-rates -- --model users --reset
//!
//! # Synthetic corpus for load testing
//! cargo run --bin seed-heart-rates -- --synthetic --users 200 --samples 5000 --seed 7
//! ```
//!
//! Seeding never warms the distribution cache; the server recomputes it on its next
//! refresh.

use clap::{Parser, ValueEnum};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;
use tracing::{info, warn};
use zone_distribution::{
    config::{database::DatabaseUrl, environment::ServerConfig},
    database::Database,
    errors::AppError,
    import::{self, ImportPaths, ImportSummary, SyntheticConfig, ZoneLayout},
    lifecycle::{RuntimeContext, WarmupPolicy},
    logging,
};

/// CLI-specific error type for the seed binary
#[derive(Error, Debug)]
enum SeedError {
    #[error(transparent)]
    App(#[from] AppError),

    #[error("{0}")]
    Validation(String),
}

type SeedResult<T> = Result<T, SeedError>;

/// Which records to load
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Model {
    /// `users.csv` only
    Users,
    /// `hrm_sessions.csv` and `hrm_data_points.csv`
    HeartRates,
    /// Users, then heart-rate data
    All,
}

#[derive(Parser)]
#[command(
    name = "seed-heart-rates",
    about = "Zone Distribution Heart-Rate Seeder",
    long_about = "Load users, monitoring sessions and heart-rate samples from CSV or generate synthetic data"
)]
struct SeedArgs {
    /// Records to import from CSV
    #[arg(long, value_enum, default_value = "all")]
    model: Model,

    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// Directory holding `users.csv`, `hrm_sessions.csv` and `hrm_data_points.csv`
    #[arg(long, default_value = "./data/csv")]
    csv_dir: PathBuf,

    /// Delete existing rows of the seeded models first
    #[arg(long)]
    reset: bool,

    /// Generate synthetic data instead of importing CSV files
    #[arg(long)]
    synthetic: bool,

    /// Synthetic subjects
    #[arg(long, default_value = "10")]
    users: u32,

    /// Synthetic sessions per subject
    #[arg(long, default_value = "5")]
    sessions: u32,

    /// Synthetic samples per session
    #[arg(long, default_value = "200")]
    samples: u32,

    /// Random seed for reproducible synthetic data
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Draw zone bounds with gaps and overlaps
    #[arg(long)]
    irregular_zones: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = SeedArgs::parse();

    if let Err(e) = logging::init_from_env() {
        eprintln!("Failed to initialize logging: {e}");
    }

    match run(args).await {
        Ok(summary) if summary.failed() == 0 => ExitCode::SUCCESS,
        Ok(summary) => {
            warn!("Seeding finished with {} failed rows", summary.failed());
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!("Seeding failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: SeedArgs) -> SeedResult<ImportSummary> {
    let config = ServerConfig::from_env()?;
    let policy = WarmupPolicy::from_config(RuntimeContext::TaskRunner, &config);
    if let Some(reason) = policy.skip_reason() {
        info!("Zone distribution warm-up skipped: {reason}");
    }

    let database_url = args
        .database_url
        .or_else(|| env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| "sqlite:./data/heart_rates.db".to_owned());
    let database_url = DatabaseUrl::parse_url(&database_url);
    if database_url.is_memory() {
        return Err(SeedError::Validation(
            "Refusing to seed an in-memory database; nothing would persist".to_owned(),
        ));
    }

    info!("Heart-Rate Seeder");
    info!("   Database: {database_url}");

    let database = Database::new(&database_url, config.database.max_connections).await?;

    if args.reset {
        reset(&database, args.synthetic, args.model).await?;
    }

    let summary = if args.synthetic {
        let synthetic = SyntheticConfig {
            users: args.users,
            sessions_per_user: args.sessions,
            samples_per_session: args.samples,
            seed: args.seed,
            zone_layout: if args.irregular_zones {
                ZoneLayout::Irregular
            } else {
                ZoneLayout::Contiguous
            },
            ..SyntheticConfig::default()
        };
        import::seed_synthetic(&database, &synthetic).await?
    } else {
        let paths = csv_paths(&args.csv_dir, args.model);
        import::import_all(&database, &paths).await?
    };

    info!("Seeding complete: {summary}");
    Ok(summary)
}

fn csv_paths(dir: &std::path::Path, model: Model) -> ImportPaths {
    let users = matches!(model, Model::Users | Model::All).then(|| dir.join("users.csv"));
    let heart_rates = matches!(model, Model::HeartRates | Model::All);

    ImportPaths {
        users,
        sessions: heart_rates.then(|| dir.join("hrm_sessions.csv")),
        data_points: heart_rates.then(|| dir.join("hrm_data_points.csv")),
    }
}

async fn reset(database: &Database, synthetic: bool, model: Model) -> SeedResult<()> {
    if synthetic || matches!(model, Model::Users | Model::All) {
        let users = database.delete_all_users().await?;
        info!("Deleted {users} users and their sessions");
    }

    let sessions = database.delete_all_sessions().await?;
    let samples = database.delete_all_heart_rates().await?;
    info!("Deleted {sessions} sessions and {samples} heart-rate samples");
    Ok(())
}
