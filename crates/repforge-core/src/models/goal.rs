// ABOUTME: User-authored goal types and the deterministic goal-to-achievement id mapping
// ABOUTME: Goal kinds map onto a fixed metric table; ids are derived from the goal id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::achievement::MetricType;
use crate::constants::ids::{GOAL_DEFINITION_PREFIX, GOAL_INSTANCE_SUFFIX};
use crate::constants::windows::MAX_WINDOW_DAYS;
use crate::errors::AppError;

/// Kinds of goal a user can author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalKind {
    /// Reach an estimated one-rep-max on an exercise
    LiftWeight,
    /// Perform a number of reps at or above a weight
    RepsAtWeight,
    /// Train a number of times within a window
    FrequencyInWindow,
    /// Lift at least your body weight on an exercise
    BodyWeightRelation,
    /// Train on consecutive days
    Streak,
    /// Accumulate active training time within a window
    TimeUnderTension,
}

impl GoalKind {
    /// All supported goal kinds
    pub const ALL: [Self; 6] = [
        Self::LiftWeight,
        Self::RepsAtWeight,
        Self::FrequencyInWindow,
        Self::BodyWeightRelation,
        Self::Streak,
        Self::TimeUnderTension,
    ];

    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LiftWeight => "lift_weight",
            Self::RepsAtWeight => "reps_at_weight",
            Self::FrequencyInWindow => "frequency_in_window",
            Self::BodyWeightRelation => "body_weight_relation",
            Self::Streak => "streak",
            Self::TimeUnderTension => "time_under_tension",
        }
    }

    /// Metric that evaluates goals of this kind
    #[must_use]
    pub const fn metric(&self) -> MetricType {
        match self {
            Self::LiftWeight => MetricType::OneRmTarget,
            Self::RepsAtWeight => MetricType::RepsAtWeightGoal,
            Self::FrequencyInWindow => MetricType::FrequencyGoal,
            Self::BodyWeightRelation => MetricType::BodyWeightRelation,
            Self::Streak => MetricType::StreakGoal,
            Self::TimeUnderTension => MetricType::TimeUnderTension,
        }
    }

    /// Whether the goal is meaningless without an exercise name
    #[must_use]
    pub const fn requires_exercise(&self) -> bool {
        matches!(
            self,
            Self::LiftWeight | Self::RepsAtWeight | Self::BodyWeightRelation
        )
    }
}

impl fmt::Display for GoalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| AppError::invalid_input(format!("Unsupported goal kind: {s}")))
    }
}

/// Definition id synthesized for a goal
#[must_use]
pub fn goal_definition_id(goal_id: &str) -> String {
    format!("{GOAL_DEFINITION_PREFIX}{goal_id}")
}

/// Instance id synthesized for a goal
#[must_use]
pub fn goal_instance_id(goal_id: &str) -> String {
    format!("{GOAL_DEFINITION_PREFIX}{goal_id}{GOAL_INSTANCE_SUFFIX}")
}

/// Recover the goal id from a synthesized definition id
#[must_use]
pub fn goal_id_from_definition(definition_id: &str) -> Option<&str> {
    definition_id.strip_prefix(GOAL_DEFINITION_PREFIX)
}

/// A user-authored goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserGoal {
    /// Unique goal identifier
    pub id: String,
    /// Display title
    pub title: String,
    /// Optional description
    pub description: Option<String>,
    /// Goal kind
    pub kind: GoalKind,
    /// Exercise the goal refers to
    pub exercise_name: Option<String>,
    /// Primary numeric target
    pub target_value: f64,
    /// Secondary numeric target
    pub secondary_value: Option<f64>,
    /// Window in days for windowed kinds
    pub window_days: Option<u32>,
    /// Optional deadline
    pub deadline: Option<DateTime<Utc>>,
    /// When the goal was created
    pub created_at: DateTime<Utc>,
}

impl UserGoal {
    /// Id of the synthetic definition backing this goal
    #[must_use]
    pub fn definition_id(&self) -> String {
        goal_definition_id(&self.id)
    }

    /// Id of the synthetic instance backing this goal
    #[must_use]
    pub fn instance_id(&self) -> String {
        goal_instance_id(&self.id)
    }
}

/// Parameters for creating a goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateGoalRequest {
    /// Display title
    pub title: String,
    /// Optional description
    pub description: Option<String>,
    /// Goal kind
    pub kind: GoalKind,
    /// Exercise the goal refers to
    pub exercise_name: Option<String>,
    /// Primary numeric target
    pub target_value: f64,
    /// Secondary numeric target
    pub secondary_value: Option<f64>,
    /// Window in days
    pub window_days: Option<u32>,
    /// Optional deadline
    pub deadline: Option<DateTime<Utc>>,
}

impl CreateGoalRequest {
    /// Minimal request for a goal kind and target
    #[must_use]
    pub fn new(title: impl Into<String>, kind: GoalKind, target_value: f64) -> Self {
        Self {
            title: title.into(),
            description: None,
            kind,
            exercise_name: None,
            target_value,
            secondary_value: None,
            window_days: None,
            deadline: None,
        }
    }

    /// Reject blank required fields and non-positive numbers
    ///
    /// # Errors
    ///
    /// Returns an `InvalidInput`/`MissingRequiredField`/`ValueOutOfRange` error
    pub fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::missing_field("title"));
        }
        if !self.target_value.is_finite() || self.target_value <= 0.0 {
            return Err(AppError::out_of_range("target_value must be positive"));
        }
        if let Some(secondary) = self.secondary_value {
            if !secondary.is_finite() || secondary <= 0.0 {
                return Err(AppError::out_of_range("secondary_value must be positive"));
            }
        }
        if let Some(days) = self.window_days {
            if days == 0 || days > MAX_WINDOW_DAYS {
                return Err(AppError::out_of_range(format!(
                    "window_days must be between 1 and {MAX_WINDOW_DAYS}"
                )));
            }
        }
        if self.kind.requires_exercise()
            && self
                .exercise_name
                .as_deref()
                .map_or(true, |name| name.trim().is_empty())
        {
            return Err(AppError::missing_field("exercise_name"));
        }
        Ok(())
    }
}
