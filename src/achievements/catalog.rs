// ABOUTME: Built-in achievement catalog seeded into the store on startup
// ABOUTME: Milestone, consistency, volume, variety, schedule and habit achievements with tiered targets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::ids::CATALOG_INSTANCE_PREFIX;
use crate::models::{AchievementDefinition, AchievementType, MetricType};

struct CatalogEntry {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    achievement_type: AchievementType,
    metric: MetricType,
    target: f64,
    window_days: Option<u32>,
    tier: u32,
    icon: &'static str,
}

const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        id: "first_workout",
        title: "First Rep",
        description: "Log your first workout",
        achievement_type: AchievementType::Milestone,
        metric: MetricType::FirstWorkout,
        target: 1.0,
        window_days: None,
        tier: 1,
        icon: "flag",
    },
    CatalogEntry {
        id: "weekly_regular",
        title: "Weekly Regular",
        description: "Train 3 times in 7 days",
        achievement_type: AchievementType::Consistency,
        metric: MetricType::WorkoutsPerWindow,
        target: 3.0,
        window_days: Some(7),
        tier: 1,
        icon: "calendar",
    },
    CatalogEntry {
        id: "monthly_regular",
        title: "Monthly Regular",
        description: "Train 12 times in 30 days",
        achievement_type: AchievementType::Consistency,
        metric: MetricType::WorkoutsPerWindow,
        target: 12.0,
        window_days: Some(30),
        tier: 2,
        icon: "calendar-check",
    },
    CatalogEntry {
        id: "streak_3",
        title: "Warming Up",
        description: "Train 3 days in a row",
        achievement_type: AchievementType::Consistency,
        metric: MetricType::Streak,
        target: 3.0,
        window_days: None,
        tier: 1,
        icon: "flame",
    },
    CatalogEntry {
        id: "streak_7",
        title: "On Fire",
        description: "Train 7 days in a row",
        achievement_type: AchievementType::Consistency,
        metric: MetricType::Streak,
        target: 7.0,
        window_days: None,
        tier: 2,
        icon: "flame",
    },
    CatalogEntry {
        id: "streak_30",
        title: "Unstoppable",
        description: "Train 30 days in a row",
        achievement_type: AchievementType::Consistency,
        metric: MetricType::Streak,
        target: 30.0,
        window_days: None,
        tier: 3,
        icon: "flame",
    },
    CatalogEntry {
        id: "volume_1k",
        title: "Tonne Up",
        description: "Lift 1,000 kg in total",
        achievement_type: AchievementType::Volume,
        metric: MetricType::TotalVolume,
        target: 1_000.0,
        window_days: None,
        tier: 1,
        icon: "weight",
    },
    CatalogEntry {
        id: "volume_10k",
        title: "Heavy Lifter",
        description: "Lift 10,000 kg in total",
        achievement_type: AchievementType::Volume,
        metric: MetricType::TotalVolume,
        target: 10_000.0,
        window_days: None,
        tier: 2,
        icon: "weight",
    },
    CatalogEntry {
        id: "volume_100k",
        title: "Iron Mover",
        description: "Lift 100,000 kg in total",
        achievement_type: AchievementType::Volume,
        metric: MetricType::TotalVolume,
        target: 100_000.0,
        window_days: None,
        tier: 3,
        icon: "weight",
    },
    CatalogEntry {
        id: "balanced_week",
        title: "Balanced Week",
        description: "Train push, pull and legs within 7 days",
        achievement_type: AchievementType::Variety,
        metric: MetricType::VarietyBalance,
        target: 3.0,
        window_days: Some(7),
        tier: 2,
        icon: "scale",
    },
    CatalogEntry {
        id: "on_schedule",
        title: "On Schedule",
        description: "Complete 80% of scheduled workouts over 4 weeks",
        achievement_type: AchievementType::Schedule,
        metric: MetricType::ScheduleAdherence,
        target: 0.8,
        window_days: Some(28),
        tier: 2,
        icon: "clock",
    },
    CatalogEntry {
        id: "early_bird",
        title: "Early Bird",
        description: "Start 5 workouts before 8am within 30 days",
        achievement_type: AchievementType::Habit,
        metric: MetricType::EarlyBird,
        target: 5.0,
        window_days: Some(30),
        tier: 2,
        icon: "sunrise",
    },
    CatalogEntry {
        id: "comeback",
        title: "Comeback",
        description: "Train 3 times in the week after a two-week break",
        achievement_type: AchievementType::Habit,
        metric: MetricType::Comeback,
        target: 3.0,
        window_days: Some(7),
        tier: 2,
        icon: "rewind",
    },
];

/// Definitions shipped with the engine, in listing order
#[must_use]
pub fn builtin_definitions() -> Vec<AchievementDefinition> {
    CATALOG
        .iter()
        .zip(0_i64..)
        .map(|(entry, sort_order)| AchievementDefinition {
            id: entry.id.to_owned(),
            title: entry.title.to_owned(),
            description: entry.description.to_owned(),
            achievement_type: entry.achievement_type,
            metric: entry.metric.as_str().to_owned(),
            target: entry.target,
            window_days: entry.window_days,
            repeatable: false,
            tier: entry.tier,
            icon: entry.icon.to_owned(),
            sort_order,
        })
        .collect()
}

/// Instance id tracking a catalog definition
#[must_use]
pub fn catalog_instance_id(definition_id: &str) -> String {
    format!("{CATALOG_INSTANCE_PREFIX}{definition_id}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_ids_are_unique() {
        let definitions = builtin_definitions();
        let ids: HashSet<_> = definitions.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids.len(), definitions.len());
    }

    #[test]
    fn test_every_catalog_metric_is_registered() {
        for definition in builtin_definitions() {
            assert!(definition.metric_type().is_some(), "{}", definition.id);
            assert!(definition.target > 0.0);
            assert!(!definition.id.starts_with("goal:"));
        }
    }

    #[test]
    fn test_sort_order_follows_listing() {
        let definitions = builtin_definitions();
        assert_eq!(definitions[0].id, "first_workout");
        assert!(definitions.windows(2).all(|w| w[0].sort_order < w[1].sort_order));
        assert_eq!(catalog_instance_id("streak_7"), "instance:streak_7");
    }
}
