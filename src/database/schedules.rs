// ABOUTME: Schedule store for recurring weekly workout plans
// ABOUTME: Weekday sets are stored as JSON arrays keyed by workout id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::Weekday;
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};

use crate::errors::{AppError, AppResult};
use crate::models::WorkoutSchedule;

/// Manager for recurring workout schedules
#[derive(Clone)]
pub struct ScheduleManager {
    pool: SqlitePool,
}

impl ScheduleManager {
    /// Create a new schedule manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create or replace the schedule of a workout
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn upsert_schedule(&self, schedule: &WorkoutSchedule) -> AppResult<()> {
        let weekdays = serde_json::to_string(&schedule.weekdays)?;
        sqlx::query(
            r"
            INSERT INTO workout_schedules (workout_id, weekdays, enabled)
            VALUES ($1, $2, $3)
            ON CONFLICT(workout_id) DO UPDATE SET
                weekdays = excluded.weekdays,
                enabled = excluded.enabled
            ",
        )
        .bind(&schedule.workout_id)
        .bind(weekdays)
        .bind(schedule.enabled)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to upsert schedule: {e}")))?;
        Ok(())
    }

    /// Every schedule, enabled or not
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list_schedules(&self) -> AppResult<Vec<WorkoutSchedule>> {
        let rows = sqlx::query(
            "SELECT workout_id, weekdays, enabled FROM workout_schedules ORDER BY workout_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list schedules: {e}")))?;

        rows.iter().map(row_to_schedule).collect()
    }
}

/// Enabled schedules read on `conn`
///
/// # Errors
///
/// Returns an error if database operation fails or a row is malformed
pub async fn load_enabled_schedules(conn: &mut SqliteConnection) -> AppResult<Vec<WorkoutSchedule>> {
    let rows = sqlx::query(
        r"
        SELECT workout_id, weekdays, enabled
        FROM workout_schedules
        WHERE enabled = 1
        ORDER BY workout_id
        ",
    )
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to load schedules: {e}")))?;

    rows.iter().map(row_to_schedule).collect()
}

fn row_to_schedule(row: &SqliteRow) -> AppResult<WorkoutSchedule> {
    let weekdays_json: String = row.get("weekdays");
    let weekdays: Vec<Weekday> = serde_json::from_str(&weekdays_json)?;
    Ok(WorkoutSchedule {
        workout_id: row.get("workout_id"),
        weekdays,
        enabled: row.get("enabled"),
    })
}
