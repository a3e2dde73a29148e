// ABOUTME: Evaluation and listing commands for repforge-cli
// ABOUTME: Runs cycles and prints the catalog, instances and logged exercise names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::Result;
use chrono::{DateTime, Utc};
use repforge::services::AchievementService;
use tracing::info;

use crate::helpers::display::{display_definitions, display_events, display_instances};

/// Run one cycle, now or as of `at`
pub async fn evaluate(service: &AchievementService, at: Option<DateTime<Utc>>) -> Result<()> {
    let events = match at {
        Some(instant) => {
            info!(at = %instant, "Evaluating at fixed instant");
            service.evaluate_at(instant).await?
        }
        None => service.evaluate_now().await?,
    };
    display_events(&events);
    Ok(())
}

/// Print every definition
pub async fn catalog(service: &AchievementService) -> Result<()> {
    let definitions = service.get_catalog().await?;
    display_definitions(&definitions);
    Ok(())
}

/// Print the last committed instance progress
pub fn instances(service: &AchievementService) {
    display_instances(&service.list_instances());
}

/// Print distinct exercise names
pub async fn exercises(service: &AchievementService, prefix: Option<&str>) -> Result<()> {
    for name in service.get_distinct_exercise_names(prefix).await? {
        println!("{name}");
    }
    Ok(())
}
