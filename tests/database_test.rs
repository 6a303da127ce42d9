// ABOUTME: Integration tests for the SQLite persistence layer
// ABOUTME: Users, session listing filters, per-session stats and aggregation inputs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::float_cmp)]
#![allow(missing_docs)]

mod common;

use anyhow::Result;
use chrono::NaiveDate;
use common::{
    create_session, create_test_database, create_user, insert_samples, seed_two_subjects, ts,
    JOHN_ZONES,
};
use zone_distribution::models::{NewUser, SessionQuery};

#[tokio::test]
async fn test_user_round_trip_keeps_zones() -> Result<()> {
    let db = create_test_database().await?;
    let mut new_user = NewUser::new("john", JOHN_ZONES);
    new_user.id = Some(42);
    new_user.gender = Some("M".to_owned());
    new_user.age = Some(34);

    let id = db.create_user(&new_user).await?;
    assert_eq!(id, 42);

    let user = db.get_user(42).await?.unwrap();
    assert_eq!(user.username, "john");
    assert_eq!(user.gender.as_deref(), Some("M"));
    assert_eq!(user.age, Some(34));
    assert_eq!(user.zones, JOHN_ZONES);

    assert!(db.get_user(43).await?.is_none());
    assert_eq!(db.get_user_count().await?, 1);
    Ok(())
}

#[tokio::test]
async fn test_duplicate_username_is_rejected() -> Result<()> {
    let db = create_test_database().await?;
    create_user(&db, "john", JOHN_ZONES).await?;

    let duplicate = db.create_user(&NewUser::new("john", JOHN_ZONES)).await;
    assert!(duplicate.is_err());
    assert_eq!(db.get_user_count().await?, 1);
    Ok(())
}

#[tokio::test]
async fn test_session_requires_existing_user() -> Result<()> {
    let db = create_test_database().await?;

    let orphan = create_session(&db, 999, ts(2024, 1, 1, 0, 0)).await;
    assert!(orphan.is_err());
    Ok(())
}

#[tokio::test]
async fn test_global_heart_rate_stats() -> Result<()> {
    let db = create_test_database().await?;
    assert_eq!(db.min_bpm().await?, None);
    assert_eq!(db.avg_bpm().await?, None);

    let subjects = seed_two_subjects(&db).await?;
    // A reading without bpm is counted but not averaged
    insert_samples(&db, subjects.john_session, &[(None, Some(30))]).await?;

    assert_eq!(db.min_bpm().await?, Some(50));
    assert_eq!(db.max_bpm().await?, Some(90));
    assert_eq!(db.avg_bpm().await?, Some(69.375));
    assert_eq!(db.heart_rate_count().await?, 9);
    Ok(())
}

#[tokio::test]
async fn test_session_listing_newest_first_with_filters() -> Result<()> {
    let db = create_test_database().await?;
    let subjects = seed_two_subjects(&db).await?;

    let all = db.list_sessions(&SessionQuery::default()).await?;
    let ids: Vec<_> = all.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![subjects.jane_session, subjects.john_session]);
    assert_eq!(all[1].username, "john");
    assert_eq!(all[1].duration_in_secs, Some(1200));

    let search = SessionQuery {
        search: Some(" jo ".to_owned()),
        ..SessionQuery::default()
    };
    let found = db.list_sessions(&search).await?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].user_id, subjects.john_id);

    let by_day = SessionQuery {
        date: NaiveDate::from_ymd_opt(2024, 3, 1),
        ..SessionQuery::default()
    };
    let on_day = db.list_sessions(&by_day).await?;
    assert_eq!(on_day.len(), 1);
    assert_eq!(on_day[0].id, subjects.john_session);

    let nothing = SessionQuery {
        search: Some("jane".to_owned()),
        date: NaiveDate::from_ymd_opt(2024, 3, 1),
        limit: None,
    };
    assert!(db.list_sessions(&nothing).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_unfiltered_listing_is_capped() -> Result<()> {
    let db = create_test_database().await?;
    let user = create_user(&db, "busy", JOHN_ZONES).await?;
    for minute in 0..12 {
        create_session(&db, user, ts(2024, 4, 1, 6, minute)).await?;
    }

    let recent = db.list_sessions(&SessionQuery::default()).await?;
    assert_eq!(recent.len(), 10);
    assert_eq!(recent[0].created_at, ts(2024, 4, 1, 6, 11));

    let searched = SessionQuery {
        search: Some("busy".to_owned()),
        ..SessionQuery::default()
    };
    assert_eq!(db.list_sessions(&searched).await?.len(), 12);

    let limited = SessionQuery {
        limit: Some(3),
        ..SessionQuery::default()
    };
    assert_eq!(db.list_sessions(&limited).await?.len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_day_filter_alone_is_uncapped() -> Result<()> {
    let db = create_test_database().await?;
    let user = create_user(&db, "steady", JOHN_ZONES).await?;
    for index in 0..510_u32 {
        create_session(&db, user, ts(2024, 5, 2, index / 60, index % 60)).await?;
    }

    let by_day = SessionQuery {
        date: NaiveDate::from_ymd_opt(2024, 5, 2),
        ..SessionQuery::default()
    };
    assert_eq!(db.list_sessions(&by_day).await?.len(), 510);

    let searched = SessionQuery {
        search: Some("steady".to_owned()),
        ..by_day
    };
    assert_eq!(db.list_sessions(&searched).await?.len(), 500);
    Ok(())
}

#[tokio::test]
async fn test_session_date_range() -> Result<()> {
    let db = create_test_database().await?;
    let empty = db.session_date_range().await?;
    assert!(empty.min_date.is_none());
    assert!(empty.max_date.is_none());

    seed_two_subjects(&db).await?;
    let range = db.session_date_range().await?;
    assert_eq!(range.min_date, NaiveDate::from_ymd_opt(2024, 3, 1));
    assert_eq!(range.max_date, NaiveDate::from_ymd_opt(2024, 3, 2));
    Ok(())
}

#[tokio::test]
async fn test_session_stats_and_zone_durations() -> Result<()> {
    let db = create_test_database().await?;
    let subjects = seed_two_subjects(&db).await?;

    let john = db.session_stats(subjects.john_session).await?;
    assert_eq!(john.min_bpm, Some(62));
    assert_eq!(john.max_bpm, Some(88));
    assert_eq!(john.avg_bpm, Some(73.75));

    let jane = db.session_stats(subjects.jane_session).await?;
    assert_eq!(jane.avg_bpm, Some(65.0));

    assert_eq!(
        db.session_zone_durations(subjects.john_session).await?,
        [1200, 0, 0, 0]
    );
    // 50 bpm is below Jane's zone 1 and is dropped
    assert_eq!(
        db.session_zone_durations(subjects.jane_session).await?,
        [900, 0, 0, 0]
    );
    assert_eq!(db.session_zone_durations(9999).await?, [0, 0, 0, 0]);
    Ok(())
}

#[tokio::test]
async fn test_zoned_sample_batches_skip_incomplete_rows() -> Result<()> {
    let db = create_test_database().await?;
    let user = create_user(&db, "john", JOHN_ZONES).await?;
    let session = create_session(&db, user, ts(2024, 3, 1, 8, 0)).await?;
    insert_samples(
        &db,
        session,
        &[
            (Some(60), Some(10)),
            (None, Some(10)),
            (Some(70), None),
            (Some(80), Some(10)),
            (Some(90), Some(10)),
        ],
    )
    .await?;

    let first = db.zoned_sample_batch(0, 2).await?;
    assert_eq!(first.iter().map(|s| s.bpm).collect::<Vec<_>>(), vec![60, 80]);
    assert_eq!(first[0].zones, JOHN_ZONES);

    let second = db.zoned_sample_batch(first[1].id, 2).await?;
    assert_eq!(second.iter().map(|s| s.bpm).collect::<Vec<_>>(), vec![90]);

    assert!(db.zoned_sample_batch(second[0].id, 2).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_zone_duration_totals() -> Result<()> {
    let db = create_test_database().await?;
    let empty = db.zone_duration_totals().await?;
    assert_eq!(empty.total, 0);
    assert_eq!(empty.buckets, [0; 5]);

    seed_two_subjects(&db).await?;
    let totals = db.zone_duration_totals().await?;
    assert_eq!(totals.buckets, [2100, 0, 0, 0, 300]);
    assert_eq!(totals.total, 2400);
    Ok(())
}

#[tokio::test]
async fn test_deleting_users_cascades_to_sessions_and_samples() -> Result<()> {
    let db = create_test_database().await?;
    seed_two_subjects(&db).await?;

    assert_eq!(db.delete_all_users().await?, 2);
    assert_eq!(db.get_user_count().await?, 0);
    assert!(db.list_sessions(&SessionQuery::default()).await?.is_empty());
    assert_eq!(db.heart_rate_count().await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_health_check() -> Result<()> {
    let db = create_test_database().await?;
    db.health_check().await?;
    // Migrations are idempotent
    db.migrate().await?;
    Ok(())
}
