// ABOUTME: Domain events raised by an evaluation cycle
// ABOUTME: Completion and goal-deadline notifications handed to external collaborators
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event emitted while evaluating achievements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AchievementEvent {
    /// An instance reached its target for the first time
    Completed {
        /// Completed instance
        instance_id: String,
        /// Its definition
        definition_id: String,
        /// Definition title
        title: String,
        /// Completion instant
        completed_at: DateTime<Utc>,
    },
    /// A user goal's deadline is close and the goal is not yet met
    GoalDeadlineApproaching {
        /// Goal instance
        instance_id: String,
        /// Goal definition
        definition_id: String,
        /// Goal title
        title: String,
        /// Deadline instant
        deadline: DateTime<Utc>,
    },
}

impl AchievementEvent {
    /// Instance the event refers to
    #[must_use]
    pub fn instance_id(&self) -> &str {
        match self {
            Self::Completed { instance_id, .. }
            | Self::GoalDeadlineApproaching { instance_id, .. } => instance_id,
        }
    }

    /// Short machine-readable event name
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Completed { .. } => "completed",
            Self::GoalDeadlineApproaching { .. } => "goal_deadline_approaching",
        }
    }
}
