// ABOUTME: Achievement and goal store for definitions, instances, user goals and cached rollups
// ABOUTME: Connection-level functions compose into one transaction per evaluation cycle or goal write
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::pool::PoolConnection;
use sqlx::{sqlite::SqliteRow, Row, Sqlite, SqliteConnection, SqlitePool};

use super::{parse_optional_timestamp, parse_timestamp};
use crate::achievements::aggregation::{ExerciseStats, Performance, WorkoutSummary};
use crate::achievements::classification::{normalize_exercise_name, BodyRegion, MovementCategory};
use crate::achievements::goals::GoalRecordIds;
use crate::errors::{AppError, AppResult};
use crate::models::{
    AchievementDefinition, AchievementInstance, AchievementStatus, AchievementType, GoalKind,
    InstanceMetadata, Progress, ProgressUnit, UserGoal,
};

/// Pool-level read access to achievements and goals
#[derive(Clone)]
pub struct AchievementManager {
    pool: SqlitePool,
}

impl AchievementManager {
    /// Create a new achievement store
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Catalog ordered for display
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list_definitions(&self) -> AppResult<Vec<AchievementDefinition>> {
        let mut conn = self.acquire().await?;
        load_definitions(&mut conn).await
    }

    /// Every instance
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list_instances(&self) -> AppResult<Vec<AchievementInstance>> {
        let mut conn = self.acquire().await?;
        load_instances(&mut conn).await
    }

    /// Every user goal, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list_goals(&self) -> AppResult<Vec<UserGoal>> {
        let mut conn = self.acquire().await?;
        load_goals(&mut conn).await
    }

    /// Cached daily summaries from the last committed cycle
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list_daily_summaries(&self) -> AppResult<Vec<WorkoutSummary>> {
        let mut conn = self.acquire().await?;
        load_daily_summaries(&mut conn).await
    }

    /// Cached statistics of an exercise, matched case-insensitively
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn exercise_stats(&self, exercise_name: &str) -> AppResult<Option<ExerciseStats>> {
        let mut conn = self.acquire().await?;
        load_exercise_stats(&mut conn, &normalize_exercise_name(exercise_name)).await
    }

    async fn acquire(&self) -> AppResult<PoolConnection<Sqlite>> {
        self.pool
            .acquire()
            .await
            .map_err(|e| AppError::database(format!("Failed to acquire connection: {e}")))
    }
}

// ============================================================================
// Definitions
// ============================================================================

/// Insert a definition; with `ignore_existing` an existing id is left untouched
///
/// # Errors
///
/// Returns an error if database operation fails
pub async fn insert_definition(
    conn: &mut SqliteConnection,
    definition: &AchievementDefinition,
    ignore_existing: bool,
) -> AppResult<()> {
    let verb = if ignore_existing {
        "INSERT OR IGNORE"
    } else {
        "INSERT"
    };
    let query = format!(
        r"
        {verb} INTO achievement_definitions (
            id, title, description, achievement_type, metric, target,
            window_days, repeatable, tier, icon, sort_order
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "
    );
    sqlx::query(&query)
        .bind(&definition.id)
        .bind(&definition.title)
        .bind(&definition.description)
        .bind(definition.achievement_type.as_str())
        .bind(&definition.metric)
        .bind(definition.target)
        .bind(definition.window_days.map(i64::from))
        .bind(definition.repeatable)
        .bind(i64::from(definition.tier))
        .bind(&definition.icon)
        .bind(definition.sort_order)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to insert definition: {e}")))?;
    Ok(())
}

/// Every definition ordered by sort order
///
/// # Errors
///
/// Returns an error if database operation fails
pub async fn load_definitions(conn: &mut SqliteConnection) -> AppResult<Vec<AchievementDefinition>> {
    let rows = sqlx::query(
        r"
        SELECT id, title, description, achievement_type, metric, target,
               window_days, repeatable, tier, icon, sort_order
        FROM achievement_definitions
        ORDER BY sort_order, id
        ",
    )
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to load definitions: {e}")))?;

    Ok(rows.iter().map(row_to_definition).collect())
}

// ============================================================================
// Instances
// ============================================================================

/// Insert an instance; with `ignore_existing` an existing id is left untouched
///
/// # Errors
///
/// Returns an error if database operation fails
pub async fn insert_instance(
    conn: &mut SqliteConnection,
    instance: &AchievementInstance,
    ignore_existing: bool,
) -> AppResult<()> {
    let verb = if ignore_existing {
        "INSERT OR IGNORE"
    } else {
        "INSERT"
    };
    let query = format!(
        r"
        {verb} INTO achievement_instances (
            id, definition_id, created_at, status, progress_current, progress_target,
            progress_percent, progress_unit, completed_at, notes, metadata
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "
    );
    sqlx::query(&query)
        .bind(&instance.id)
        .bind(&instance.definition_id)
        .bind(instance.created_at.to_rfc3339())
        .bind(instance.status.as_str())
        .bind(instance.progress.current)
        .bind(instance.progress.target)
        .bind(instance.progress.percent)
        .bind(instance.progress.unit.as_str())
        .bind(instance.completed_at.map(|t| t.to_rfc3339()))
        .bind(&instance.notes)
        .bind(metadata_json(&instance.metadata)?)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to insert instance: {e}")))?;
    Ok(())
}

/// Persist the progress, status and completion time of an instance
///
/// # Errors
///
/// Returns an error if database operation fails
pub async fn update_instance(
    conn: &mut SqliteConnection,
    instance: &AchievementInstance,
) -> AppResult<()> {
    sqlx::query(
        r"
        UPDATE achievement_instances
        SET status = $2,
            progress_current = $3,
            progress_target = $4,
            progress_percent = $5,
            progress_unit = $6,
            completed_at = $7
        WHERE id = $1
        ",
    )
    .bind(&instance.id)
    .bind(instance.status.as_str())
    .bind(instance.progress.current)
    .bind(instance.progress.target)
    .bind(instance.progress.percent)
    .bind(instance.progress.unit.as_str())
    .bind(instance.completed_at.map(|t| t.to_rfc3339()))
    .execute(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to update instance: {e}")))?;
    Ok(())
}

/// Every instance ordered by definition then id
///
/// # Errors
///
/// Returns an error if database operation fails or a row is malformed
pub async fn load_instances(conn: &mut SqliteConnection) -> AppResult<Vec<AchievementInstance>> {
    let rows = sqlx::query(
        r"
        SELECT i.id, i.definition_id, i.created_at, i.status, i.progress_current,
               i.progress_target, i.progress_percent, i.progress_unit, i.completed_at,
               i.notes, i.metadata
        FROM achievement_instances i
        LEFT JOIN achievement_definitions d ON d.id = i.definition_id
        ORDER BY d.sort_order, i.id
        ",
    )
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to load instances: {e}")))?;

    rows.iter().map(row_to_instance).collect()
}

// ============================================================================
// User goals
// ============================================================================

/// Insert a user goal
///
/// # Errors
///
/// Returns an already-exists error for a duplicate goal id, or a database error
pub async fn insert_goal(conn: &mut SqliteConnection, goal: &UserGoal) -> AppResult<()> {
    sqlx::query(
        r"
        INSERT INTO user_goals (
            id, title, description, kind, exercise_name, target_value,
            secondary_value, window_days, deadline, created_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        ",
    )
    .bind(&goal.id)
    .bind(&goal.title)
    .bind(&goal.description)
    .bind(goal.kind.as_str())
    .bind(&goal.exercise_name)
    .bind(goal.target_value)
    .bind(goal.secondary_value)
    .bind(goal.window_days.map(i64::from))
    .bind(goal.deadline.map(|t| t.to_rfc3339()))
    .bind(goal.created_at.to_rfc3339())
    .execute(&mut *conn)
    .await
    .map_err(|e| {
        if e.as_database_error()
            .is_some_and(|db| db.is_unique_violation())
        {
            AppError::already_exists(format!("Goal {}", goal.id))
        } else {
            AppError::database(format!("Failed to insert goal: {e}"))
        }
    })?;
    Ok(())
}

/// Every user goal, newest first
///
/// # Errors
///
/// Returns an error if database operation fails or a row is malformed
pub async fn load_goals(conn: &mut SqliteConnection) -> AppResult<Vec<UserGoal>> {
    let rows = sqlx::query(
        r"
        SELECT id, title, description, kind, exercise_name, target_value,
               secondary_value, window_days, deadline, created_at
        FROM user_goals
        ORDER BY created_at DESC, id
        ",
    )
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to load goals: {e}")))?;

    rows.iter().map(row_to_goal).collect()
}

/// Delete a goal together with its synthetic instance and definition
///
/// Returns whether the goal record existed.
///
/// # Errors
///
/// Returns an error if database operation fails
pub async fn delete_goal_records(conn: &mut SqliteConnection, ids: &GoalRecordIds) -> AppResult<bool> {
    sqlx::query("DELETE FROM achievement_instances WHERE id = $1 OR definition_id = $2")
        .bind(&ids.instance_id)
        .bind(&ids.definition_id)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to delete goal instance: {e}")))?;

    sqlx::query("DELETE FROM achievement_definitions WHERE id = $1")
        .bind(&ids.definition_id)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to delete goal definition: {e}")))?;

    let result = sqlx::query("DELETE FROM user_goals WHERE id = $1")
        .bind(&ids.goal_id)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to delete goal: {e}")))?;

    Ok(result.rows_affected() > 0)
}

// ============================================================================
// Cached rollups
// ============================================================================

/// Replace the cached daily summaries
///
/// # Errors
///
/// Returns an error if database operation fails
pub async fn replace_daily_summaries(
    conn: &mut SqliteConnection,
    summaries: &[WorkoutSummary],
) -> AppResult<()> {
    sqlx::query("DELETE FROM daily_summaries")
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to clear daily summaries: {e}")))?;

    for summary in summaries {
        sqlx::query(
            r"
            INSERT INTO daily_summaries (
                date, session_count, total_sets, total_volume_kg, early_session_count,
                active_minutes, category_mask, region_mask, distinct_exercises
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(summary.date.to_string())
        .bind(i64::from(summary.session_count))
        .bind(i64::from(summary.total_sets))
        .bind(summary.total_volume_kg)
        .bind(i64::from(summary.early_session_count))
        .bind(summary.active_minutes)
        .bind(i64::from(summary.category_mask.bits()))
        .bind(i64::from(summary.region_mask.bits()))
        .bind(i64::from(summary.distinct_exercises))
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to insert daily summary: {e}")))?;
    }
    Ok(())
}

/// Cached daily summaries, oldest first
///
/// # Errors
///
/// Returns an error if database operation fails or a row is malformed
pub async fn load_daily_summaries(conn: &mut SqliteConnection) -> AppResult<Vec<WorkoutSummary>> {
    let rows = sqlx::query(
        r"
        SELECT date, session_count, total_sets, total_volume_kg, early_session_count,
               active_minutes, category_mask, region_mask, distinct_exercises
        FROM daily_summaries
        ORDER BY date
        ",
    )
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to load daily summaries: {e}")))?;

    rows.iter().map(row_to_summary).collect()
}

/// Replace the cached per-exercise statistics
///
/// # Errors
///
/// Returns an error if database operation fails
pub async fn replace_exercise_stats(
    conn: &mut SqliteConnection,
    stats: &HashMap<String, ExerciseStats>,
) -> AppResult<()> {
    sqlx::query("DELETE FROM exercise_stats")
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to clear exercise stats: {e}")))?;

    for (name, stat) in stats {
        sqlx::query(
            r"
            INSERT INTO exercise_stats (
                name, total_sets, total_volume_kg, best_weight_kg, best_reps,
                best_one_rm_kg, performances
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(name)
        .bind(i64::from(stat.total_sets))
        .bind(stat.total_volume_kg)
        .bind(stat.best_weight_kg)
        .bind(i64::from(stat.best_reps))
        .bind(stat.best_one_rm_kg)
        .bind(serde_json::to_string(&stat.performances)?)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to insert exercise stats: {e}")))?;
    }
    Ok(())
}

/// Cached statistics of one normalized exercise name
///
/// # Errors
///
/// Returns an error if database operation fails or a row is malformed
pub async fn load_exercise_stats(
    conn: &mut SqliteConnection,
    normalized_name: &str,
) -> AppResult<Option<ExerciseStats>> {
    let row = sqlx::query(
        r"
        SELECT total_sets, total_volume_kg, best_weight_kg, best_reps,
               best_one_rm_kg, performances
        FROM exercise_stats
        WHERE name = $1
        ",
    )
    .bind(normalized_name)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to load exercise stats: {e}")))?;

    row.map(|r| row_to_exercise_stats(&r)).transpose()
}

// ============================================================================
// Row mapping
// ============================================================================

fn metadata_json(metadata: &InstanceMetadata) -> AppResult<Option<String>> {
    if metadata.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::to_string(metadata)?))
}

fn to_u32(value: i64) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

fn row_to_definition(row: &SqliteRow) -> AchievementDefinition {
    let achievement_type: String = row.get("achievement_type");
    let window_days: Option<i64> = row.get("window_days");
    let tier: i64 = row.get("tier");

    AchievementDefinition {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        achievement_type: AchievementType::parse(&achievement_type),
        metric: row.get("metric"),
        target: row.get("target"),
        window_days: window_days.map(to_u32),
        repeatable: row.get("repeatable"),
        tier: to_u32(tier),
        icon: row.get("icon"),
        sort_order: row.get("sort_order"),
    }
}

fn row_to_instance(row: &SqliteRow) -> AppResult<AchievementInstance> {
    let created_at: String = row.get("created_at");
    let status: String = row.get("status");
    let unit: String = row.get("progress_unit");
    let completed_at: Option<String> = row.get("completed_at");
    let metadata_json: Option<String> = row.get("metadata");

    let metadata = metadata_json
        .map(|json| serde_json::from_str::<InstanceMetadata>(&json))
        .transpose()?
        .unwrap_or_default();

    Ok(AchievementInstance {
        id: row.get("id"),
        definition_id: row.get("definition_id"),
        created_at: parse_timestamp(&created_at)?,
        status: AchievementStatus::parse(&status),
        progress: Progress {
            current: row.get("progress_current"),
            target: row.get("progress_target"),
            percent: row.get("progress_percent"),
            unit: ProgressUnit::parse(&unit),
        },
        completed_at: parse_optional_timestamp(completed_at.as_deref())?,
        notes: row.get("notes"),
        metadata,
    })
}

fn row_to_goal(row: &SqliteRow) -> AppResult<UserGoal> {
    let kind: String = row.get("kind");
    let window_days: Option<i64> = row.get("window_days");
    let deadline: Option<String> = row.get("deadline");
    let created_at: String = row.get("created_at");

    Ok(UserGoal {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        kind: kind.parse::<GoalKind>()?,
        exercise_name: row.get("exercise_name"),
        target_value: row.get("target_value"),
        secondary_value: row.get("secondary_value"),
        window_days: window_days.map(to_u32),
        deadline: parse_optional_timestamp(deadline.as_deref())?,
        created_at: parse_timestamp(&created_at)?,
    })
}

fn row_to_summary(row: &SqliteRow) -> AppResult<WorkoutSummary> {
    let date: String = row.get("date");
    let category_mask: i64 = row.get("category_mask");
    let region_mask: i64 = row.get("region_mask");

    Ok(WorkoutSummary {
        date: NaiveDate::parse_from_str(&date, "%Y-%m-%d")?,
        session_count: to_u32(row.get("session_count")),
        total_sets: to_u32(row.get("total_sets")),
        total_volume_kg: row.get("total_volume_kg"),
        early_session_count: to_u32(row.get("early_session_count")),
        active_minutes: row.get("active_minutes"),
        category_mask: MovementCategory::from_bits_truncate(
            u8::try_from(category_mask).unwrap_or(0),
        ),
        region_mask: BodyRegion::from_bits_truncate(u8::try_from(region_mask).unwrap_or(0)),
        distinct_exercises: to_u32(row.get("distinct_exercises")),
    })
}

fn row_to_exercise_stats(row: &SqliteRow) -> AppResult<ExerciseStats> {
    let performances_json: String = row.get("performances");
    let performances: Vec<Performance> = serde_json::from_str(&performances_json)?;

    Ok(ExerciseStats {
        total_sets: to_u32(row.get("total_sets")),
        total_volume_kg: row.get("total_volume_kg"),
        best_weight_kg: row.get("best_weight_kg"),
        best_reps: to_u32(row.get("best_reps")),
        best_one_rm_kg: row.get("best_one_rm_kg"),
        performances,
    })
}
