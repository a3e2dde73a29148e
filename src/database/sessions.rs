// ABOUTME: Session log store holding workout sessions with nested exercises and sets
// ABOUTME: Full-log reads for aggregation plus writes used by importers, the CLI and tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashMap;

use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};

use super::{parse_optional_timestamp, parse_timestamp, TransactionGuard};
use crate::errors::{AppError, AppResult};
use crate::models::{ExerciseEntry, SessionStatus, SetEntry, WeightUnit, WorkoutSession};

/// Manager for the workout session log
#[derive(Clone)]
pub struct SessionManager {
    pool: SqlitePool,
}

impl SessionManager {
    /// Create a new session manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a session, replacing any session with the same id
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn record_session(&self, session: &WorkoutSession) -> AppResult<()> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;
        let mut guard = TransactionGuard::new(tx);

        delete_session_rows(guard.executor()?, &session.id).await?;

        sqlx::query(
            r"
            INSERT INTO workout_sessions (id, workout_id, status, started_at, ended_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(&session.id)
        .bind(&session.workout_id)
        .bind(session.status.as_str())
        .bind(session.started_at.to_rfc3339())
        .bind(session.ended_at.map(|t| t.to_rfc3339()))
        .execute(&mut *guard.executor()?)
        .await
        .map_err(|e| AppError::database(format!("Failed to insert session: {e}")))?;

        for (position, exercise) in (0_i64..).zip(&session.exercises) {
            let exercise_id: i64 = sqlx::query_scalar(
                r"
                INSERT INTO session_exercises (session_id, position, name)
                VALUES ($1, $2, $3)
                RETURNING id
                ",
            )
            .bind(&session.id)
            .bind(position)
            .bind(&exercise.name)
            .fetch_one(&mut *guard.executor()?)
            .await
            .map_err(|e| AppError::database(format!("Failed to insert exercise: {e}")))?;

            for (set_position, set) in (0_i64..).zip(&exercise.sets) {
                sqlx::query(
                    r"
                    INSERT INTO exercise_sets (exercise_id, position, reps, weight, unit)
                    VALUES ($1, $2, $3, $4, $5)
                    ",
                )
                .bind(exercise_id)
                .bind(set_position)
                .bind(set.reps.map(i64::from))
                .bind(set.weight)
                .bind(set.unit.map(|unit| unit.as_str()))
                .execute(&mut *guard.executor()?)
                .await
                .map_err(|e| AppError::database(format!("Failed to insert set: {e}")))?;
            }
        }

        guard.commit().await
    }

    /// Delete a session with its exercises and sets
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete_session(&self, id: &str) -> AppResult<bool> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;
        let mut guard = TransactionGuard::new(tx);
        let deleted = delete_session_rows(guard.executor()?, id).await?;
        guard.commit().await?;
        Ok(deleted)
    }

    /// Every logged session, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list_sessions(&self) -> AppResult<Vec<WorkoutSession>> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| AppError::database(format!("Failed to acquire connection: {e}")))?;
        load_sessions(&mut conn).await
    }

    /// Distinct exercise names, case-insensitively deduplicated and sorted
    ///
    /// `prefix` filters case-insensitively; blank or absent returns everything.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn distinct_exercise_names(&self, prefix: Option<&str>) -> AppResult<Vec<String>> {
        let pattern = prefix
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map_or_else(|| "%".to_owned(), |p| format!("{}%", escape_like(&p.to_lowercase())));

        sqlx::query_scalar(
            r"
            SELECT MIN(trim(name)) AS name
            FROM session_exercises
            WHERE trim(name) <> '' AND lower(trim(name)) LIKE $1 ESCAPE '\'
            GROUP BY lower(trim(name))
            ORDER BY lower(trim(name))
            ",
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list exercise names: {e}")))
    }
}

/// Read the complete session log on `conn`, oldest first
///
/// # Errors
///
/// Returns an error if database operation fails or a row is malformed
pub async fn load_sessions(conn: &mut SqliteConnection) -> AppResult<Vec<WorkoutSession>> {
    let session_rows = sqlx::query(
        r"
        SELECT id, workout_id, status, started_at, ended_at
        FROM workout_sessions
        ORDER BY started_at, id
        ",
    )
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to load sessions: {e}")))?;

    let exercise_rows = sqlx::query(
        r"
        SELECT id, session_id, name
        FROM session_exercises
        ORDER BY session_id, position
        ",
    )
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to load exercises: {e}")))?;

    let set_rows = sqlx::query(
        r"
        SELECT exercise_id, reps, weight, unit
        FROM exercise_sets
        ORDER BY exercise_id, position
        ",
    )
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to load sets: {e}")))?;

    let mut sets_by_exercise: HashMap<i64, Vec<SetEntry>> = HashMap::new();
    for row in &set_rows {
        let exercise_id: i64 = row.get("exercise_id");
        sets_by_exercise
            .entry(exercise_id)
            .or_default()
            .push(row_to_set(row));
    }

    let mut exercises_by_session: HashMap<String, Vec<ExerciseEntry>> = HashMap::new();
    for row in &exercise_rows {
        let exercise_id: i64 = row.get("id");
        let session_id: String = row.get("session_id");
        exercises_by_session
            .entry(session_id)
            .or_default()
            .push(ExerciseEntry {
                name: row.get("name"),
                sets: sets_by_exercise.remove(&exercise_id).unwrap_or_default(),
            });
    }

    session_rows
        .iter()
        .map(|row| {
            let mut session = row_to_session(row)?;
            session.exercises = exercises_by_session
                .remove(&session.id)
                .unwrap_or_default();
            Ok(session)
        })
        .collect()
}

async fn delete_session_rows(conn: &mut SqliteConnection, id: &str) -> AppResult<bool> {
    sqlx::query(
        r"
        DELETE FROM exercise_sets
        WHERE exercise_id IN (SELECT id FROM session_exercises WHERE session_id = $1)
        ",
    )
    .bind(id)
    .execute(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to delete sets: {e}")))?;

    sqlx::query("DELETE FROM session_exercises WHERE session_id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to delete exercises: {e}")))?;

    let result = sqlx::query("DELETE FROM workout_sessions WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to delete session: {e}")))?;

    Ok(result.rows_affected() > 0)
}

fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn row_to_session(row: &SqliteRow) -> AppResult<WorkoutSession> {
    let status: String = row.get("status");
    let started_at: String = row.get("started_at");
    let ended_at: Option<String> = row.get("ended_at");

    Ok(WorkoutSession {
        id: row.get("id"),
        workout_id: row.get("workout_id"),
        status: SessionStatus::parse(&status),
        started_at: parse_timestamp(&started_at)?,
        ended_at: parse_optional_timestamp(ended_at.as_deref())?,
        exercises: Vec::new(),
    })
}

fn row_to_set(row: &SqliteRow) -> SetEntry {
    let reps: Option<i64> = row.get("reps");
    let unit: Option<String> = row.get("unit");
    SetEntry {
        reps: reps.and_then(|r| u32::try_from(r).ok()),
        weight: row.get("weight"),
        unit: unit.as_deref().map(WeightUnit::parse),
    }
}
