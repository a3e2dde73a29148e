// ABOUTME: Settings and schedule commands for repforge-cli
// ABOUTME: Writes the inputs the evaluation pipeline reads besides the session log
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::{anyhow, Result};
use repforge::achievements::calendar::parse_weekday;
use repforge::models::{WeightUnit, WorkoutSchedule};
use repforge::services::AchievementService;
use tracing::info;

/// Update the default unit and/or body weight, keeping unspecified values
pub async fn set_settings(
    service: &AchievementService,
    unit: Option<&str>,
    body_weight: Option<f64>,
) -> Result<()> {
    let settings_manager = service.database().settings();
    let mut settings = settings_manager.get_settings().await?;

    if let Some(unit) = unit {
        settings.default_weight_unit = match unit.trim().to_lowercase().as_str() {
            "kg" => WeightUnit::Kg,
            "lb" | "lbs" => WeightUnit::Lb,
            other => return Err(anyhow!("Unknown weight unit '{other}', expected kg or lb")),
        };
    }
    if let Some(weight) = body_weight {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(anyhow!("Body weight must be a positive number of kilograms"));
        }
        settings.body_weight_kg = Some(weight);
    }

    settings_manager.save_settings(&settings).await?;
    info!(
        unit = settings.default_weight_unit.as_str(),
        body_weight_kg = ?settings.body_weight_kg,
        "Settings saved"
    );
    println!(
        "Default unit: {}, body weight: {}",
        settings.default_weight_unit.as_str(),
        settings
            .body_weight_kg
            .map_or_else(|| "unknown".to_owned(), |kg| format!("{kg} kg"))
    );
    Ok(())
}

/// Create or replace a schedule from a comma-separated weekday list
pub async fn set_schedule(
    service: &AchievementService,
    workout_id: String,
    days: &str,
    enabled: bool,
) -> Result<()> {
    let mut weekdays = Vec::new();
    for token in days.split(',').filter(|token| !token.trim().is_empty()) {
        let day = parse_weekday(token).ok_or_else(|| anyhow!("Unknown weekday '{token}'"))?;
        if !weekdays.contains(&day) {
            weekdays.push(day);
        }
    }
    if weekdays.is_empty() {
        return Err(anyhow!("At least one weekday is required"));
    }

    let schedule = WorkoutSchedule {
        workout_id,
        weekdays,
        enabled,
    };
    service.database().schedules().upsert_schedule(&schedule).await?;
    println!(
        "Schedule {} set: {} ({})",
        schedule.workout_id,
        schedule
            .weekdays
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(","),
        if schedule.enabled { "enabled" } else { "disabled" }
    );
    Ok(())
}
