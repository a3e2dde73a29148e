// ABOUTME: Achievement catalog and progress-tracking types
// ABOUTME: Definitions, instances, progress values, metric identifiers, and status
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category tag of an achievement definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AchievementType {
    /// One-off milestones such as the first workout
    #[default]
    Milestone,
    /// Training frequency and streaks
    Consistency,
    /// Cumulative lifted volume
    Volume,
    /// Balance across movement categories
    Variety,
    /// Adherence to a recurring schedule
    Schedule,
    /// Time-of-day and return-to-training habits
    Habit,
    /// Synthesized from a user-authored goal
    UserGoal,
}

impl AchievementType {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Milestone => "milestone",
            Self::Consistency => "consistency",
            Self::Volume => "volume",
            Self::Variety => "variety",
            Self::Schedule => "schedule",
            Self::Habit => "habit",
            Self::UserGoal => "user_goal",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "consistency" => Self::Consistency,
            "volume" => Self::Volume,
            "variety" => Self::Variety,
            "schedule" => Self::Schedule,
            "habit" => Self::Habit,
            "user_goal" => Self::UserGoal,
            _ => Self::Milestone,
        }
    }
}

/// Closed set of metrics the evaluator registry knows how to compute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    /// Any session logged at all
    FirstWorkout,
    /// Sessions over a trailing window baked into the definition
    WorkoutsPerWindow,
    /// Consecutive active days ending today
    Streak,
    /// Lifetime lifted volume
    TotalVolume,
    /// Distinct push/pull/legs categories trained in the window
    VarietyBalance,
    /// Completed vs expected scheduled sessions
    ScheduleAdherence,
    /// Sessions started before the early-bird hour
    EarlyBird,
    /// Sessions right after a long break
    Comeback,
    /// Best estimated one-rep-max for an exercise
    OneRmTarget,
    /// Sessions over a goal-specific window
    FrequencyGoal,
    /// Most reps at or above a goal weight
    RepsAtWeightGoal,
    /// Best lift relative to body weight
    BodyWeightRelation,
    /// Streak tracked as a user goal
    StreakGoal,
    /// Active training time over a window
    TimeUnderTension,
}

impl MetricType {
    /// Every metric, in registry order
    pub const ALL: [Self; 14] = [
        Self::FirstWorkout,
        Self::WorkoutsPerWindow,
        Self::Streak,
        Self::TotalVolume,
        Self::VarietyBalance,
        Self::ScheduleAdherence,
        Self::EarlyBird,
        Self::Comeback,
        Self::OneRmTarget,
        Self::FrequencyGoal,
        Self::RepsAtWeightGoal,
        Self::BodyWeightRelation,
        Self::StreakGoal,
        Self::TimeUnderTension,
    ];

    /// Stable metric identifier stored on definitions
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FirstWorkout => "first_workout",
            Self::WorkoutsPerWindow => "workouts_per_window",
            Self::Streak => "streak",
            Self::TotalVolume => "total_volume",
            Self::VarietyBalance => "variety_balance",
            Self::ScheduleAdherence => "schedule_adherence",
            Self::EarlyBird => "early_bird",
            Self::Comeback => "comeback",
            Self::OneRmTarget => "one_rm_target",
            Self::FrequencyGoal => "frequency_goal",
            Self::RepsAtWeightGoal => "reps_at_weight_goal",
            Self::BodyWeightRelation => "body_weight_relation",
            Self::StreakGoal => "streak_goal",
            Self::TimeUnderTension => "time_under_tension",
        }
    }

    /// Look up a metric by identifier; `None` for identifiers with no evaluator
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|metric| metric.as_str() == id)
    }

    /// Display unit of progress values produced for this metric
    #[must_use]
    pub const fn unit(&self) -> ProgressUnit {
        match self {
            Self::FirstWorkout
            | Self::WorkoutsPerWindow
            | Self::EarlyBird
            | Self::Comeback
            | Self::FrequencyGoal => ProgressUnit::Workouts,
            Self::Streak | Self::StreakGoal => ProgressUnit::Days,
            Self::TotalVolume | Self::OneRmTarget | Self::BodyWeightRelation => ProgressUnit::Kg,
            Self::VarietyBalance => ProgressUnit::Categories,
            Self::ScheduleAdherence => ProgressUnit::Percent,
            Self::RepsAtWeightGoal => ProgressUnit::Reps,
            Self::TimeUnderTension => ProgressUnit::Seconds,
        }
    }
}

/// Display tag attached to a progress value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ProgressUnit {
    /// Session counts
    #[default]
    #[serde(rename = "workouts")]
    Workouts,
    /// Kilograms
    #[serde(rename = "kg")]
    Kg,
    /// Calendar days
    #[serde(rename = "days")]
    Days,
    /// Seconds
    #[serde(rename = "seconds")]
    Seconds,
    /// Repetitions
    #[serde(rename = "reps")]
    Reps,
    /// Ratio rendered as a percentage
    #[serde(rename = "%")]
    Percent,
    /// Movement categories
    #[serde(rename = "categories")]
    Categories,
}

impl ProgressUnit {
    /// Display string of the unit
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Workouts => "workouts",
            Self::Kg => "kg",
            Self::Days => "days",
            Self::Seconds => "seconds",
            Self::Reps => "reps",
            Self::Percent => "%",
            Self::Categories => "categories",
        }
    }

    /// Parse from the display string
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "kg" => Self::Kg,
            "days" => Self::Days,
            "seconds" => Self::Seconds,
            "reps" => Self::Reps,
            "%" => Self::Percent,
            "categories" => Self::Categories,
            _ => Self::Workouts,
        }
    }
}

/// Progress toward a numeric target
///
/// `percent` is always within `[0, 1]` however far `current` overshoots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Progress {
    /// Raw accumulated value
    pub current: f64,
    /// Numeric goal
    pub target: f64,
    /// Fraction of the target reached, clamped to `[0, 1]`
    pub percent: f64,
    /// Display unit
    pub unit: ProgressUnit,
}

impl Progress {
    /// No progress toward `target`
    #[must_use]
    pub const fn zero(target: f64, unit: ProgressUnit) -> Self {
        Self {
            current: 0.0,
            target,
            percent: 0.0,
            unit,
        }
    }

    /// Progress where a non-positive target counts as already met
    #[must_use]
    pub fn toward(current: f64, target: f64, unit: ProgressUnit) -> Self {
        let percent = if target <= 0.0 {
            1.0
        } else {
            clamp_unit(current / target)
        };
        Self {
            current,
            target,
            percent,
            unit,
        }
    }

    /// Progress where a non-positive target means "undefined", never met
    #[must_use]
    pub fn guarded(current: f64, target: f64, unit: ProgressUnit) -> Self {
        let percent = if target <= 0.0 {
            0.0
        } else {
            clamp_unit(current / target)
        };
        Self {
            current,
            target,
            percent,
            unit,
        }
    }

    /// Whether the target has been reached
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.percent >= 1.0
    }
}

fn clamp_unit(ratio: f64) -> f64 {
    if ratio.is_finite() {
        ratio.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Derived status of an instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AchievementStatus {
    /// No progress yet
    #[default]
    Locked,
    /// Some progress, target not reached
    InProgress,
    /// Target reached; never leaves this state
    Completed,
}

impl AchievementStatus {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Locked => "LOCKED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "IN_PROGRESS" => Self::InProgress,
            "COMPLETED" => Self::Completed,
            _ => Self::Locked,
        }
    }

    /// Status implied by a freshly evaluated progress value
    #[must_use]
    pub fn from_progress(progress: &Progress) -> Self {
        if progress.is_complete() {
            Self::Completed
        } else if progress.current <= 0.0 {
            Self::Locked
        } else {
            Self::InProgress
        }
    }
}

/// Immutable catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementDefinition {
    /// Unique definition identifier
    pub id: String,
    /// Display title
    pub title: String,
    /// Display description
    pub description: String,
    /// Category tag
    pub achievement_type: AchievementType,
    /// Metric identifier; may name a metric this build has no evaluator for
    pub metric: String,
    /// Numeric target
    pub target: f64,
    /// Trailing window in days, for windowed metrics
    pub window_days: Option<u32>,
    /// Whether the achievement may be earned more than once
    pub repeatable: bool,
    /// Difficulty tier (1 = easiest)
    pub tier: u32,
    /// Icon key for the presentation layer
    pub icon: String,
    /// Position in catalog listings
    pub sort_order: i64,
}

impl AchievementDefinition {
    /// Resolve the metric identifier against the closed metric set
    #[must_use]
    pub fn metric_type(&self) -> Option<MetricType> {
        MetricType::from_id(&self.metric)
    }
}

/// Per-instance parameters, mostly carried by user goals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct InstanceMetadata {
    /// Exercise a strength goal refers to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exercise_name: Option<String>,
    /// Secondary numeric target (e.g. the weight of a reps-at-weight goal)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_target: Option<f64>,
    /// Deadline of a user goal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    /// Window override in days
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_days: Option<u32>,
}

impl InstanceMetadata {
    /// True when no field is set
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.exercise_name.is_none()
            && self.secondary_target.is_none()
            && self.deadline.is_none()
            && self.window_days.is_none()
    }
}

/// Live progress record for one occurrence of a definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementInstance {
    /// Unique instance identifier
    pub id: String,
    /// Owning definition
    pub definition_id: String,
    /// When the instance was created
    pub created_at: DateTime<Utc>,
    /// Current status
    pub status: AchievementStatus,
    /// Most recent evaluation result
    pub progress: Progress,
    /// Set once, when the instance first completes
    pub completed_at: Option<DateTime<Utc>>,
    /// Free-form user notes
    pub notes: Option<String>,
    /// Optional parameters
    pub metadata: InstanceMetadata,
}

impl AchievementInstance {
    /// Fresh, locked instance with zero progress
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        definition: &AchievementDefinition,
        created_at: DateTime<Utc>,
    ) -> Self {
        let unit = definition
            .metric_type()
            .map_or(ProgressUnit::default(), |metric| metric.unit());
        Self {
            id: id.into(),
            definition_id: definition.id.clone(),
            created_at,
            status: AchievementStatus::Locked,
            progress: Progress::zero(definition.target, unit),
            completed_at: None,
            notes: None,
            metadata: InstanceMetadata::default(),
        }
    }

    /// Completion latch: once set, status and completion time are frozen
    #[must_use]
    pub fn is_latched(&self) -> bool {
        self.completed_at.is_some() || self.status == AchievementStatus::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_ids_round_trip_through_registry_table() {
        for metric in MetricType::ALL {
            assert_eq!(MetricType::from_id(metric.as_str()), Some(metric));
        }
        assert_eq!(MetricType::from_id("marathon_pace"), None);
    }

    #[test]
    fn test_percent_clamped_above_target() {
        let progress = Progress::toward(180.0, 90.0, ProgressUnit::Kg);
        assert!((progress.percent - 1.0).abs() < f64::EPSILON);
        assert!((progress.current - 180.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_target_conventions_differ() {
        let met = Progress::toward(0.0, 0.0, ProgressUnit::Workouts);
        assert!((met.percent - 1.0).abs() < f64::EPSILON);

        let undefined = Progress::guarded(5.0, 0.0, ProgressUnit::Percent);
        assert!(undefined.percent.abs() < f64::EPSILON);
    }

    #[test]
    fn test_status_from_progress() {
        let locked = Progress::zero(3.0, ProgressUnit::Workouts);
        assert_eq!(AchievementStatus::from_progress(&locked), AchievementStatus::Locked);

        let partial = Progress::toward(1.0, 3.0, ProgressUnit::Workouts);
        assert_eq!(
            AchievementStatus::from_progress(&partial),
            AchievementStatus::InProgress
        );

        let done = Progress::toward(3.0, 3.0, ProgressUnit::Workouts);
        assert_eq!(AchievementStatus::from_progress(&done), AchievementStatus::Completed);
    }

    #[test]
    fn test_unit_serializes_as_display_tag() {
        let json = serde_json::to_string(&ProgressUnit::Percent).unwrap();
        assert_eq!(json, "\"%\"");
        assert_eq!(ProgressUnit::parse("categories"), ProgressUnit::Categories);
    }
}
