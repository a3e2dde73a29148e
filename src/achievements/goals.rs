// ABOUTME: Goal lifecycle translation between user goals and synthetic definition/instance pairs
// ABOUTME: Ids derive deterministically from the goal id so deletion needs no lookup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::AppResult;
use crate::models::{
    goal_definition_id, goal_instance_id, AchievementDefinition, AchievementInstance,
    AchievementType, CreateGoalRequest, GoalKind, InstanceMetadata, UserGoal,
};

/// The three records persisted together for one goal
#[derive(Debug, Clone, PartialEq)]
pub struct GoalRecords {
    /// The user-authored goal
    pub goal: UserGoal,
    /// Synthetic catalog entry evaluating the goal
    pub definition: AchievementDefinition,
    /// Zero-progress instance tracking the goal
    pub instance: AchievementInstance,
}

/// Ids of every record owned by a goal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalRecordIds {
    /// Goal id
    pub goal_id: String,
    /// Synthetic definition id
    pub definition_id: String,
    /// Synthetic instance id
    pub instance_id: String,
}

impl GoalRecordIds {
    /// Reconstruct every id from the goal id alone
    #[must_use]
    pub fn for_goal(goal_id: &str) -> Self {
        Self {
            goal_id: goal_id.to_owned(),
            definition_id: goal_definition_id(goal_id),
            instance_id: goal_instance_id(goal_id),
        }
    }
}

/// Validate a request and build the goal with a fresh id
///
/// # Errors
///
/// Returns a validation error when the request is malformed
pub fn build_goal_records(request: &CreateGoalRequest, now: DateTime<Utc>) -> AppResult<GoalRecords> {
    request.validate()?;
    let goal = UserGoal {
        id: Uuid::new_v4().to_string(),
        title: request.title.trim().to_owned(),
        description: request.description.clone(),
        kind: request.kind,
        exercise_name: request
            .exercise_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_owned),
        target_value: request.target_value,
        secondary_value: request.secondary_value,
        window_days: request.window_days,
        deadline: request.deadline,
        created_at: now,
    };
    Ok(records_for_goal(goal))
}

/// Synthetic definition and zero-progress instance for an existing goal
#[must_use]
pub fn records_for_goal(goal: UserGoal) -> GoalRecords {
    let definition = goal_definition(&goal);
    let mut instance = AchievementInstance::new(goal.instance_id(), &definition, goal.created_at);
    instance.metadata = goal_metadata(&goal);
    GoalRecords {
        goal,
        definition,
        instance,
    }
}

fn goal_definition(goal: &UserGoal) -> AchievementDefinition {
    AchievementDefinition {
        id: goal.definition_id(),
        title: goal.title.clone(),
        description: goal.description.clone().unwrap_or_default(),
        achievement_type: AchievementType::UserGoal,
        metric: goal.kind.metric().as_str().to_owned(),
        target: goal.target_value,
        window_days: goal.window_days,
        repeatable: false,
        tier: 1,
        icon: goal_icon(goal.kind).to_owned(),
        sort_order: goal.created_at.timestamp(),
    }
}

fn goal_metadata(goal: &UserGoal) -> InstanceMetadata {
    InstanceMetadata {
        exercise_name: goal.exercise_name.clone(),
        secondary_target: goal.secondary_value,
        deadline: goal.deadline,
        window_days: goal.window_days,
    }
}

const fn goal_icon(kind: GoalKind) -> &'static str {
    match kind {
        GoalKind::LiftWeight | GoalKind::RepsAtWeight => "dumbbell",
        GoalKind::FrequencyInWindow => "calendar",
        GoalKind::BodyWeightRelation => "scale",
        GoalKind::Streak => "flame",
        GoalKind::TimeUnderTension => "timer",
    }
}
