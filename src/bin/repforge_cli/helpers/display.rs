// ABOUTME: Output formatting helpers for repforge-cli
// ABOUTME: Prints events, definitions, instances and goals as aligned text tables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use repforge::models::{AchievementDefinition, AchievementEvent, AchievementInstance, UserGoal};

/// Print the events raised by one cycle
pub fn display_events(events: &[AchievementEvent]) {
    if events.is_empty() {
        println!("No events raised");
        return;
    }
    for event in events {
        match event {
            AchievementEvent::Completed {
                title,
                completed_at,
                ..
            } => println!(
                "Completed      {title} ({})",
                completed_at.format("%Y-%m-%d %H:%M UTC")
            ),
            AchievementEvent::GoalDeadlineApproaching {
                title, deadline, ..
            } => println!(
                "Deadline soon  {title} (due {})",
                deadline.format("%Y-%m-%d %H:%M UTC")
            ),
        }
    }
}

/// Print the catalog
pub fn display_definitions(definitions: &[AchievementDefinition]) {
    println!(
        "{:<32} {:<22} {:>10} {:>7} {:>5}  TITLE",
        "ID", "METRIC", "TARGET", "WINDOW", "TIER"
    );
    println!("{}", "=".repeat(100));
    for definition in definitions {
        let window = definition
            .window_days
            .map_or_else(|| "-".to_owned(), |days| format!("{days}d"));
        println!(
            "{:<32} {:<22} {:>10} {:>7} {:>5}  {}",
            definition.id,
            definition.metric,
            definition.target,
            window,
            definition.tier,
            definition.title
        );
    }
}

/// Print every instance with its progress
pub fn display_instances(instances: &[AchievementInstance]) {
    println!(
        "{:<40} {:<12} {:>12} {:>12} {:>6}  UNIT",
        "INSTANCE", "STATUS", "CURRENT", "TARGET", "%"
    );
    println!("{}", "=".repeat(100));
    for instance in instances {
        let progress = &instance.progress;
        println!(
            "{:<40} {:<12} {:>12.2} {:>12.2} {:>5.0}%  {}",
            instance.id,
            instance.status.as_str(),
            progress.current,
            progress.target,
            progress.percent * 100.0,
            progress.unit.as_str()
        );
    }
}

/// Print goals, newest first
pub fn display_goals(goals: &[UserGoal]) {
    if goals.is_empty() {
        println!("No goals");
        return;
    }
    for goal in goals {
        println!("{}  {}", goal.id, goal.title);
        println!("   Kind: {}", goal.kind);
        println!("   Target: {}", goal.target_value);
        if let Some(exercise) = &goal.exercise_name {
            println!("   Exercise: {exercise}");
        }
        if let Some(secondary) = goal.secondary_value {
            println!("   Secondary: {secondary}");
        }
        if let Some(days) = goal.window_days {
            println!("   Window: {days} days");
        }
        if let Some(deadline) = goal.deadline {
            println!("   Deadline: {}", deadline.format("%Y-%m-%d %H:%M UTC"));
        }
    }
}
