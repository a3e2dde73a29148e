// ABOUTME: Core data models for the Repforge achievement engine
// ABOUTME: Re-exports workout log, achievement, goal, and event types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! - Workout log: `WorkoutSession`, `ExerciseEntry`, `SetEntry`, `WorkoutSchedule`
//! - Catalog and progress: `AchievementDefinition`, `AchievementInstance`, `Progress`
//! - User goals: `UserGoal`, `CreateGoalRequest`, `GoalKind`
//! - Events: `AchievementEvent`

mod achievement;
mod event;
mod goal;
mod workout;

// Workout log domain
pub use workout::{
    ExerciseEntry, SessionStatus, SetEntry, UserSettings, WeightUnit, WorkoutSchedule,
    WorkoutSession,
};

// Achievement domain
pub use achievement::{
    AchievementDefinition, AchievementInstance, AchievementStatus, AchievementType,
    InstanceMetadata, MetricType, Progress, ProgressUnit,
};

// Goal domain
pub use goal::{
    goal_definition_id, goal_id_from_definition, goal_instance_id, CreateGoalRequest, GoalKind,
    UserGoal,
};

// Events
pub use event::AchievementEvent;
