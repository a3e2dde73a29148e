// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory service setup and workout session builders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]
//! Shared test utilities for `repforge`

use std::sync::Once;

use anyhow::Result;
use chrono::{DateTime, Duration, TimeZone, Utc};
use repforge::config::{AchievementConfig, DatabaseUrl};
use repforge::database::Database;
use repforge::models::{
    AchievementInstance, ExerciseEntry, SessionStatus, SetEntry, WeightUnit, WorkoutSession,
};
use repforge::services::AchievementService;
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // TEST_LOG picks the level; quiet by default
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Fresh in-memory database with every table created
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    Ok(Database::new(&DatabaseUrl::Memory).await?)
}

/// Service over a fresh in-memory database with default tunables
pub async fn create_test_service() -> Result<AchievementService> {
    let database = create_test_database().await?;
    Ok(AchievementService::new(database, AchievementConfig::default()).await?)
}

/// Fixed evaluation instant: Wednesday 2025-03-12 18:00 UTC
pub fn evaluation_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 12, 18, 0, 0).unwrap()
}

/// Exercise with sets given as (kg, reps)
pub fn exercise(name: &str, sets: &[(f64, u32)]) -> ExerciseEntry {
    ExerciseEntry {
        name: name.to_owned(),
        sets: sets
            .iter()
            .map(|&(weight, reps)| SetEntry::new(weight, reps, WeightUnit::Kg))
            .collect(),
    }
}

/// Completed 45 minute session starting `days_ago` days before `now` at 10:00 UTC
pub fn session_days_ago(
    now: DateTime<Utc>,
    days_ago: i64,
    exercises: Vec<ExerciseEntry>,
) -> WorkoutSession {
    let day = now.date_naive() - Duration::days(days_ago);
    let started_at = Utc.from_utc_datetime(&day.and_hms_opt(10, 0, 0).unwrap());
    WorkoutSession {
        id: Uuid::new_v4().to_string(),
        workout_id: None,
        status: SessionStatus::Completed,
        started_at,
        ended_at: Some(started_at + Duration::minutes(45)),
        exercises,
    }
}

/// Record sessions through the service's database
pub async fn record_all(service: &AchievementService, sessions: &[WorkoutSession]) -> Result<()> {
    let manager = service.database().sessions();
    for session in sessions {
        manager.record_session(session).await?;
    }
    Ok(())
}

/// Instance by id from the latest snapshot
pub fn instance(service: &AchievementService, id: &str) -> AchievementInstance {
    service
        .list_instances()
        .into_iter()
        .find(|instance| instance.id == id)
        .unwrap_or_else(|| panic!("instance {id} not found"))
}

/// Float comparison for progress values
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
