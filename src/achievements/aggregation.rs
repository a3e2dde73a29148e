// ABOUTME: Aggregation pipeline folding the full session log into daily and per-exercise context
// ABOUTME: Pure, order-independent rebuild of summaries, exercise stats, and schedule expectations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Aggregation Pipeline
//!
//! `aggregate` is a pure function `(log, schedules, settings, now) -> context`.
//! Nothing is carried between cycles, so re-running it after an import, edit,
//! or deletion always yields the context of the current log.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};

use super::calendar::{local_date, local_hour, week_window, DayWindow};
use super::classification::{classify, normalize_exercise_name, BodyRegion, MovementCategory};
use crate::constants::thresholds::{EARLY_BIRD_HOUR, EPLEY_REP_DIVISOR};
use crate::constants::windows::SCHEDULE_ADHERENCE_DEFAULT_DAYS;
use crate::models::{SessionStatus, UserSettings, WorkoutSchedule, WorkoutSession};

/// Per-calendar-day rollup of the session log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSummary {
    /// Local calendar date
    pub date: NaiveDate,
    /// Sessions bucketed into this day
    pub session_count: u32,
    /// Working sets (positive weight and reps)
    pub total_sets: u32,
    /// Sum of weight x reps in kilograms
    pub total_volume_kg: f64,
    /// Sessions that started before the early-bird hour
    pub early_session_count: u32,
    /// Minutes between start and end, summed over sessions
    pub active_minutes: i64,
    /// OR of the movement categories trained
    pub category_mask: MovementCategory,
    /// OR of the body regions trained
    pub region_mask: BodyRegion,
    /// Distinct normalized exercise names logged
    pub distinct_exercises: u32,
}

impl WorkoutSummary {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            session_count: 0,
            total_sets: 0,
            total_volume_kg: 0.0,
            early_session_count: 0,
            active_minutes: 0,
            category_mask: MovementCategory::empty(),
            region_mask: BodyRegion::empty(),
            distinct_exercises: 0,
        }
    }
}

/// A single (weight, reps) working set of an exercise
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Performance {
    /// Weight in kilograms
    pub weight_kg: f64,
    /// Repetitions
    pub reps: u32,
}

/// Lifetime statistics of one normalized exercise name
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExerciseStats {
    /// Working sets logged
    pub total_sets: u32,
    /// Sum of weight x reps in kilograms
    pub total_volume_kg: f64,
    /// Heaviest single set
    pub best_weight_kg: f64,
    /// Most reps in a single set
    pub best_reps: u32,
    /// Best Epley one-rep-max estimate
    pub best_one_rm_kg: f64,
    /// Every working set, in log order
    pub performances: Vec<Performance>,
}

/// Expected vs completed dates of one schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleExpectation {
    /// Scheduled workout
    pub workout_id: String,
    /// Dates on which a session was expected, oldest first
    pub expected_dates: Vec<NaiveDate>,
    /// Expected dates on which the workout was completed
    pub completed_dates: Vec<NaiveDate>,
}

/// Tunables of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationOptions {
    /// User timezone used for calendar bucketing
    pub timezone: FixedOffset,
    /// Sessions starting before this local hour are early
    pub early_bird_hour: u32,
    /// Trailing window over which schedules are compared
    pub schedule_window_days: u32,
}

impl Default for AggregationOptions {
    fn default() -> Self {
        Self {
            timezone: Utc.fix(),
            early_bird_hour: EARLY_BIRD_HOUR,
            schedule_window_days: SCHEDULE_ADHERENCE_DEFAULT_DAYS,
        }
    }
}

/// Everything evaluators read, rebuilt once per cycle
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregatedContext {
    /// Daily summaries sorted by date
    pub summaries: Vec<WorkoutSummary>,
    /// Statistics keyed by normalized exercise name
    pub exercise_stats: HashMap<String, ExerciseStats>,
    /// One entry per enabled schedule
    pub schedule_expectations: Vec<ScheduleExpectation>,
    /// Sessions that contributed to the context
    pub sessions_scanned: usize,
}

impl AggregatedContext {
    /// Summaries whose date falls inside `window`
    pub fn days_in<'a>(&'a self, window: &'a DayWindow) -> impl Iterator<Item = &'a WorkoutSummary> {
        self.summaries
            .iter()
            .filter(move |summary| window.contains(summary.date))
    }

    /// Total sessions inside `window`
    #[must_use]
    pub fn sessions_in(&self, window: &DayWindow) -> u32 {
        self.days_in(window).map(|s| s.session_count).sum()
    }

    /// Summary of a specific date, if anything was logged that day
    #[must_use]
    pub fn summary_on(&self, date: NaiveDate) -> Option<&WorkoutSummary> {
        self.summaries
            .binary_search_by_key(&date, |s| s.date)
            .ok()
            .map(|index| &self.summaries[index])
    }

    /// Statistics of an exercise by free-text name
    #[must_use]
    pub fn stats_for(&self, exercise_name: &str) -> Option<&ExerciseStats> {
        self.exercise_stats
            .get(&normalize_exercise_name(exercise_name))
    }

    /// Sessions per day of the Monday-started week containing `date`
    #[must_use]
    pub fn weekly_session_counts(&self, date: NaiveDate) -> Vec<(NaiveDate, u32)> {
        let week = week_window(date);
        week.dates()
            .map(|day| (day, self.summary_on(day).map_or(0, |s| s.session_count)))
            .collect()
    }
}

/// Rebuild the evaluation context from the complete log
#[must_use]
pub fn aggregate(
    sessions: &[WorkoutSession],
    schedules: &[WorkoutSchedule],
    settings: &UserSettings,
    now: DateTime<Utc>,
    options: &AggregationOptions,
) -> AggregatedContext {
    let tz = options.timezone;
    let mut days: BTreeMap<NaiveDate, WorkoutSummary> = BTreeMap::new();
    let mut day_exercises: HashMap<NaiveDate, HashSet<String>> = HashMap::new();
    let mut exercise_stats: HashMap<String, ExerciseStats> = HashMap::new();
    let mut completed_by_workout: HashMap<&str, BTreeSet<NaiveDate>> = HashMap::new();
    let mut sessions_scanned = 0;

    for session in sessions {
        if session.status == SessionStatus::Cancelled {
            continue;
        }
        sessions_scanned += 1;

        let date = local_date(session.bucket_instant(), tz);
        let day = days
            .entry(date)
            .or_insert_with(|| WorkoutSummary::empty(date));
        day.session_count += 1;
        if local_hour(session.started_at, tz) < options.early_bird_hour {
            day.early_session_count += 1;
        }
        day.active_minutes += session.active_minutes();

        for exercise in &session.exercises {
            let key = normalize_exercise_name(&exercise.name);
            if key.is_empty() {
                continue;
            }
            let (categories, region) = classify(&key);
            day.category_mask |= categories;
            day.region_mask |= region;

            let stats = exercise_stats.entry(key.clone()).or_default();
            day_exercises.entry(date).or_default().insert(key);

            for set in &exercise.sets {
                let Some((weight_kg, reps)) = set.working_load(settings.default_weight_unit)
                else {
                    continue;
                };
                let volume = weight_kg * f64::from(reps);
                day.total_sets += 1;
                day.total_volume_kg += volume;

                stats.total_sets += 1;
                stats.total_volume_kg += volume;
                stats.best_weight_kg = stats.best_weight_kg.max(weight_kg);
                stats.best_reps = stats.best_reps.max(reps);
                stats.best_one_rm_kg = stats.best_one_rm_kg.max(estimate_one_rep_max(weight_kg, reps));
                stats.performances.push(Performance { weight_kg, reps });
            }
        }

        if session.status == SessionStatus::Completed {
            if let Some(workout_id) = session.workout_id.as_deref() {
                completed_by_workout.entry(workout_id).or_default().insert(date);
            }
        }
    }

    for (date, names) in day_exercises {
        if let Some(day) = days.get_mut(&date) {
            day.distinct_exercises = u32::try_from(names.len()).unwrap_or(u32::MAX);
        }
    }

    let window = DayWindow::trailing(local_date(now, tz), options.schedule_window_days);
    let schedule_expectations = schedules
        .iter()
        .filter(|schedule| schedule.enabled)
        .map(|schedule| {
            let completed = completed_by_workout.get(schedule.workout_id.as_str());
            expectation_for(schedule, &window, completed)
        })
        .collect();

    AggregatedContext {
        summaries: days.into_values().collect(),
        exercise_stats,
        schedule_expectations,
        sessions_scanned,
    }
}

/// Epley estimate: `weight x (1 + reps / 30)`
#[must_use]
pub fn estimate_one_rep_max(weight_kg: f64, reps: u32) -> f64 {
    weight_kg * (1.0 + f64::from(reps) / EPLEY_REP_DIVISOR)
}

fn expectation_for(
    schedule: &WorkoutSchedule,
    window: &DayWindow,
    completed: Option<&BTreeSet<NaiveDate>>,
) -> ScheduleExpectation {
    let expected_dates: Vec<NaiveDate> = window
        .dates()
        .filter(|date| schedule.weekdays.contains(&date.weekday()))
        .collect();
    let completed_dates = expected_dates
        .iter()
        .copied()
        .filter(|date| completed.is_some_and(|done| done.contains(date)))
        .collect();

    ScheduleExpectation {
        workout_id: schedule.workout_id.clone(),
        expected_dates,
        completed_dates,
    }
}
