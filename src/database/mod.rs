// ABOUTME: SQLite persistence for the workout log, schedules, settings, achievements and goals
// ABOUTME: Owns the pool, creates tables on startup and hands out per-domain managers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Database Management
//!
//! Every table lives in one `SQLite` database. Managers wrap the pool for
//! standalone reads and writes; the connection-level functions in each module
//! let the achievement service run a whole evaluation cycle inside a single
//! [`TransactionGuard`].
//!
//! An in-memory database is private to the connection that created it, so
//! `sqlite::memory:` pools are limited to one long-lived connection.

pub mod achievements;
pub mod schedules;
pub mod sessions;
pub mod settings;
mod transactions;

pub use achievements::AchievementManager;
pub use schedules::ScheduleManager;
pub use sessions::SessionManager;
pub use settings::SettingsManager;
pub use transactions::TransactionGuard;

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::config::DatabaseUrl;
use crate::errors::{AppError, AppResult};

/// Database handle shared by the service and its managers
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to `database_url` and create missing tables
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or a migration fails
    pub async fn new(database_url: &DatabaseUrl) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(&database_url.to_connection_string())
            .map_err(|e| AppError::config(format!("Invalid database URL: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool_options = if database_url.is_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        let db = Self { pool };
        db.migrate().await?;
        info!(url = %database_url, "Database ready");
        Ok(db)
    }

    /// Connection pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Begin a transaction that rolls back unless committed
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started
    pub async fn begin(&self) -> AppResult<TransactionGuard<'static>> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;
        Ok(TransactionGuard::new(tx))
    }

    /// Session log manager
    #[must_use]
    pub fn sessions(&self) -> SessionManager {
        SessionManager::new(self.pool.clone())
    }

    /// Schedule manager
    #[must_use]
    pub fn schedules(&self) -> ScheduleManager {
        ScheduleManager::new(self.pool.clone())
    }

    /// Settings manager
    #[must_use]
    pub fn settings(&self) -> SettingsManager {
        SettingsManager::new(self.pool.clone())
    }

    /// Achievement and goal store
    #[must_use]
    pub fn achievements(&self) -> AchievementManager {
        AchievementManager::new(self.pool.clone())
    }

    /// Create every table that does not exist yet
    ///
    /// # Errors
    ///
    /// Returns an error if a statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_sessions().await?;
        self.migrate_schedules().await?;
        self.migrate_settings().await?;
        self.migrate_achievements().await?;
        self.migrate_rollups().await?;
        debug!("Database migrations applied");
        Ok(())
    }

    async fn execute_all(&self, statements: &[&str]) -> AppResult<()> {
        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Migration failed: {e}")))?;
        }
        Ok(())
    }

    async fn migrate_sessions(&self) -> AppResult<()> {
        self.execute_all(&[
            r"
            CREATE TABLE IF NOT EXISTS workout_sessions (
                id TEXT PRIMARY KEY,
                workout_id TEXT,
                status TEXT NOT NULL,
                started_at TEXT NOT NULL,
                ended_at TEXT
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS session_exercises (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id TEXT NOT NULL REFERENCES workout_sessions(id) ON DELETE CASCADE,
                position INTEGER NOT NULL,
                name TEXT NOT NULL
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS exercise_sets (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                exercise_id INTEGER NOT NULL REFERENCES session_exercises(id) ON DELETE CASCADE,
                position INTEGER NOT NULL,
                reps INTEGER,
                weight REAL,
                unit TEXT
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_session_exercises_session ON session_exercises(session_id)",
            "CREATE INDEX IF NOT EXISTS idx_exercise_sets_exercise ON exercise_sets(exercise_id)",
        ])
        .await
    }

    async fn migrate_schedules(&self) -> AppResult<()> {
        self.execute_all(&[r"
            CREATE TABLE IF NOT EXISTS workout_schedules (
                workout_id TEXT PRIMARY KEY,
                weekdays TEXT NOT NULL,
                enabled BOOLEAN NOT NULL DEFAULT true
            )
            "])
        .await
    }

    async fn migrate_settings(&self) -> AppResult<()> {
        self.execute_all(&[r"
            CREATE TABLE IF NOT EXISTS user_settings (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                default_weight_unit TEXT NOT NULL DEFAULT 'kg',
                body_weight_kg REAL
            )
            "])
        .await
    }

    async fn migrate_achievements(&self) -> AppResult<()> {
        self.execute_all(&[
            r"
            CREATE TABLE IF NOT EXISTS achievement_definitions (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                achievement_type TEXT NOT NULL,
                metric TEXT NOT NULL,
                target REAL NOT NULL,
                window_days INTEGER,
                repeatable BOOLEAN NOT NULL DEFAULT false,
                tier INTEGER NOT NULL DEFAULT 1,
                icon TEXT NOT NULL,
                sort_order INTEGER NOT NULL DEFAULT 0
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS achievement_instances (
                id TEXT PRIMARY KEY,
                definition_id TEXT NOT NULL REFERENCES achievement_definitions(id) ON DELETE CASCADE,
                created_at TEXT NOT NULL,
                status TEXT NOT NULL,
                progress_current REAL NOT NULL DEFAULT 0,
                progress_target REAL NOT NULL DEFAULT 0,
                progress_percent REAL NOT NULL DEFAULT 0,
                progress_unit TEXT NOT NULL,
                completed_at TEXT,
                notes TEXT,
                metadata TEXT
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS user_goals (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT,
                kind TEXT NOT NULL,
                exercise_name TEXT,
                target_value REAL NOT NULL,
                secondary_value REAL,
                window_days INTEGER,
                deadline TEXT,
                created_at TEXT NOT NULL
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_instances_definition ON achievement_instances(definition_id)",
        ])
        .await
    }

    async fn migrate_rollups(&self) -> AppResult<()> {
        self.execute_all(&[
            r"
            CREATE TABLE IF NOT EXISTS daily_summaries (
                date TEXT PRIMARY KEY,
                session_count INTEGER NOT NULL,
                total_sets INTEGER NOT NULL,
                total_volume_kg REAL NOT NULL,
                early_session_count INTEGER NOT NULL,
                active_minutes INTEGER NOT NULL,
                category_mask INTEGER NOT NULL,
                region_mask INTEGER NOT NULL,
                distinct_exercises INTEGER NOT NULL
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS exercise_stats (
                name TEXT PRIMARY KEY,
                total_sets INTEGER NOT NULL,
                total_volume_kg REAL NOT NULL,
                best_weight_kg REAL NOT NULL,
                best_reps INTEGER NOT NULL,
                best_one_rm_kg REAL NOT NULL,
                performances TEXT NOT NULL
            )
            ",
        ])
        .await
    }
}

/// Parse an RFC 3339 timestamp column
pub(crate) fn parse_timestamp(value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| AppError::database(format!("Invalid timestamp '{value}': {e}")))
}

/// Parse a nullable RFC 3339 timestamp column
pub(crate) fn parse_optional_timestamp(value: Option<&str>) -> AppResult<Option<DateTime<Utc>>> {
    value.map(parse_timestamp).transpose()
}
