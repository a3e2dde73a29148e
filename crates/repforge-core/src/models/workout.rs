// ABOUTME: Workout log domain types: sessions, exercises, sets, schedules, and settings
// ABOUTME: Raw append-only records that the aggregation pipeline folds into summaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::constants::units::KG_PER_LB;

/// Unit a set's weight was logged in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeightUnit {
    /// Kilograms
    #[default]
    Kg,
    /// Pounds
    Lb,
}

impl WeightUnit {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Kg => "kg",
            Self::Lb => "lb",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "lb" | "lbs" | "pound" | "pounds" => Self::Lb,
            // Default to kilograms for unrecognized values
            _ => Self::Kg,
        }
    }

    /// Convert a weight expressed in this unit to kilograms
    #[must_use]
    pub fn to_kg(self, weight: f64) -> f64 {
        match self {
            Self::Kg => weight,
            Self::Lb => weight * KG_PER_LB,
        }
    }
}

/// Lifecycle state of a logged session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Session is still being logged
    #[default]
    Active,
    /// Session was finished
    Completed,
    /// Session was abandoned and must not count anywhere
    Cancelled,
}

impl SessionStatus {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "completed" => Self::Completed,
            "cancelled" | "canceled" => Self::Cancelled,
            _ => Self::Active,
        }
    }
}

/// A single logged set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SetEntry {
    /// Repetitions performed
    pub reps: Option<u32>,
    /// Weight lifted, in `unit`
    pub weight: Option<f64>,
    /// Unit of `weight`; falls back to the user's default unit when absent
    pub unit: Option<WeightUnit>,
}

impl SetEntry {
    /// Create a set with weight and reps in the given unit
    #[must_use]
    pub const fn new(weight: f64, reps: u32, unit: WeightUnit) -> Self {
        Self {
            reps: Some(reps),
            weight: Some(weight),
            unit: Some(unit),
        }
    }

    /// Weight in kilograms and reps, if both are strictly positive
    #[must_use]
    pub fn working_load(&self, default_unit: WeightUnit) -> Option<(f64, u32)> {
        let reps = self.reps.filter(|r| *r > 0)?;
        let weight = self.weight.filter(|w| w.is_finite() && *w > 0.0)?;
        Some((self.unit.unwrap_or(default_unit).to_kg(weight), reps))
    }
}

/// An exercise performed within a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ExerciseEntry {
    /// Free-text exercise name as typed by the user
    pub name: String,
    /// Sets in logging order
    pub sets: Vec<SetEntry>,
}

/// One logged workout session with its nested exercises
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSession {
    /// Unique session identifier
    pub id: String,
    /// Template/workout this session was started from, if any
    pub workout_id: Option<String>,
    /// Lifecycle state
    pub status: SessionStatus,
    /// When the session started
    pub started_at: DateTime<Utc>,
    /// When the session ended, if it has
    pub ended_at: Option<DateTime<Utc>>,
    /// Exercises in logging order
    pub exercises: Vec<ExerciseEntry>,
}

impl WorkoutSession {
    /// Instant used to assign the session to a calendar day
    #[must_use]
    pub fn bucket_instant(&self) -> DateTime<Utc> {
        self.ended_at.unwrap_or(self.started_at)
    }

    /// Whole minutes between start and end, never negative
    #[must_use]
    pub fn active_minutes(&self) -> i64 {
        self.ended_at
            .map_or(0, |end| (end - self.started_at).num_minutes().max(0))
    }
}

/// A recurring plan to perform a workout on fixed weekdays
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutSchedule {
    /// Workout the schedule expects
    pub workout_id: String,
    /// Weekdays on which a session is expected
    pub weekdays: Vec<Weekday>,
    /// Disabled schedules are ignored by the pipeline
    pub enabled: bool,
}

/// User preferences the engine reads
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct UserSettings {
    /// Unit assumed for sets logged without one
    pub default_weight_unit: WeightUnit,
    /// Current body weight, if the user has recorded it
    pub body_weight_kg: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_pounds_convert_to_kilograms() {
        let kg = WeightUnit::Lb.to_kg(100.0);
        assert!((kg - 45.359_237).abs() < 1e-9);
        assert!((WeightUnit::Kg.to_kg(100.0) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_working_load_requires_positive_values() {
        let zero_reps = SetEntry {
            reps: Some(0),
            weight: Some(50.0),
            unit: None,
        };
        assert!(zero_reps.working_load(WeightUnit::Kg).is_none());

        let bodyweight = SetEntry {
            reps: Some(12),
            weight: None,
            unit: None,
        };
        assert!(bodyweight.working_load(WeightUnit::Kg).is_none());

        let default_unit = SetEntry {
            reps: Some(5),
            weight: Some(100.0),
            unit: None,
        };
        let (kg, reps) = default_unit.working_load(WeightUnit::Lb).unwrap();
        assert_eq!(reps, 5);
        assert!((kg - 45.359_237).abs() < 1e-9);
    }

    #[test]
    fn test_active_minutes_never_negative() {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        let mut session = WorkoutSession {
            id: "s1".to_owned(),
            workout_id: None,
            status: SessionStatus::Completed,
            started_at: start,
            ended_at: Some(start - chrono::Duration::minutes(5)),
            exercises: Vec::new(),
        };
        assert_eq!(session.active_minutes(), 0);

        session.ended_at = Some(start + chrono::Duration::minutes(45));
        assert_eq!(session.active_minutes(), 45);
        assert_eq!(session.bucket_instant(), start + chrono::Duration::minutes(45));
    }

    #[test]
    fn test_status_parse_defaults_to_active() {
        assert_eq!(SessionStatus::parse("CANCELLED"), SessionStatus::Cancelled);
        assert_eq!(SessionStatus::parse("completed"), SessionStatus::Completed);
        assert_eq!(SessionStatus::parse("paused"), SessionStatus::Active);
    }
}
