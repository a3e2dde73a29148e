// ABOUTME: Settings provider storing the default weight unit and body weight
// ABOUTME: A single-row table; missing row reads as default settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use sqlx::{Row, SqliteConnection, SqlitePool};

use crate::errors::{AppError, AppResult};
use crate::models::{UserSettings, WeightUnit};

/// Manager for user settings
#[derive(Clone)]
pub struct SettingsManager {
    pool: SqlitePool,
}

impl SettingsManager {
    /// Create a new settings manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Replace the stored settings
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn save_settings(&self, settings: &UserSettings) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO user_settings (id, default_weight_unit, body_weight_kg)
            VALUES (1, $1, $2)
            ON CONFLICT(id) DO UPDATE SET
                default_weight_unit = excluded.default_weight_unit,
                body_weight_kg = excluded.body_weight_kg
            ",
        )
        .bind(settings.default_weight_unit.as_str())
        .bind(settings.body_weight_kg)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to save settings: {e}")))?;
        Ok(())
    }

    /// Current settings
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get_settings(&self) -> AppResult<UserSettings> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| AppError::database(format!("Failed to acquire connection: {e}")))?;
        load_settings(&mut conn).await
    }
}

/// Settings read on `conn`
///
/// # Errors
///
/// Returns an error if database operation fails
pub async fn load_settings(conn: &mut SqliteConnection) -> AppResult<UserSettings> {
    let row = sqlx::query(
        "SELECT default_weight_unit, body_weight_kg FROM user_settings WHERE id = 1",
    )
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to load settings: {e}")))?;

    Ok(row.map_or_else(UserSettings::default, |row| {
        let unit: String = row.get("default_weight_unit");
        UserSettings {
            default_weight_unit: WeightUnit::parse(&unit),
            body_weight_kg: row.get("body_weight_kg"),
        }
    }))
}
