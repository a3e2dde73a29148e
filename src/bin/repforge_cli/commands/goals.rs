// ABOUTME: Goal lifecycle commands for repforge-cli
// ABOUTME: Handles create, delete and list operations for user goals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::slice;

use anyhow::Result;
use chrono::{DateTime, Utc};
use repforge::models::{CreateGoalRequest, GoalKind};
use repforge::services::AchievementService;

use crate::helpers::display::display_goals;

/// Raw `goal create` arguments
pub struct GoalArgs {
    pub title: String,
    pub description: Option<String>,
    pub kind: String,
    pub exercise: Option<String>,
    pub target: f64,
    pub secondary: Option<f64>,
    pub window_days: Option<u32>,
    pub deadline: Option<DateTime<Utc>>,
}

/// Create a goal and print it
pub async fn create(service: &AchievementService, args: GoalArgs) -> Result<()> {
    let kind: GoalKind = args.kind.parse()?;
    let request = CreateGoalRequest {
        title: args.title,
        description: args.description,
        kind,
        exercise_name: args.exercise,
        target_value: args.target,
        secondary_value: args.secondary,
        window_days: args.window_days,
        deadline: args.deadline,
    };
    let goal = service.create_user_goal(request).await?;

    println!("\nGoal created");
    println!("{}", "=".repeat(50));
    display_goals(slice::from_ref(&goal));

    if let Some(instance) = service
        .list_instances()
        .into_iter()
        .find(|instance| instance.id == goal.instance_id())
    {
        println!(
            "   Progress: {:.2} / {:.2} {} ({:.0}%)",
            instance.progress.current,
            instance.progress.target,
            instance.progress.unit.as_str(),
            instance.progress.percent * 100.0
        );
    }
    Ok(())
}

/// Delete a goal
pub async fn delete(service: &AchievementService, goal_id: &str) -> Result<()> {
    service.delete_goal(goal_id).await?;
    println!("Goal {goal_id} deleted");
    Ok(())
}

/// Print every goal
pub fn list(service: &AchievementService) {
    display_goals(&service.list_user_goals());
}
