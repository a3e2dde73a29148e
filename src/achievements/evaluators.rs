// ABOUTME: Evaluator registry mapping each metric identifier to a pure progress strategy
// ABOUTME: Fourteen evaluators turn aggregated context into Progress values with per-metric semantics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Evaluator Registry
//!
//! The metric set is closed: [`MetricType`] enumerates it and
//! [`EvaluatorRegistry::evaluator_for`] is an exhaustive match onto one
//! strategy per metric. Every strategy has the same pure signature
//! `(now, context, definition, instance) -> Progress`.
//!
//! Percent conventions differ by metric. Most metrics treat a
//! non-positive target as already met ([`Progress::toward`]); schedule
//! adherence and the body-weight relation treat it as undefined and report
//! zero ([`Progress::guarded`]).

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

use super::aggregation::AggregatedContext;
use super::calendar::{local_date, DayWindow};
use super::classification::MovementCategory;
use crate::constants::thresholds::COMEBACK_GAP_DAYS;
use crate::constants::units::SECONDS_PER_MINUTE;
use crate::constants::windows::{
    COMEBACK_DEFAULT_DAYS, EARLY_BIRD_DEFAULT_DAYS, GOAL_DEFAULT_DAYS,
    SCHEDULE_ADHERENCE_DEFAULT_DAYS, VARIETY_DEFAULT_DAYS, WORKOUTS_DEFAULT_DAYS,
};
use crate::models::{
    AchievementDefinition, AchievementInstance, MetricType, Progress, ProgressUnit,
};

/// Read-only inputs shared by every evaluator in a cycle
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    /// Rebuilt summaries, exercise stats, and schedule expectations
    pub aggregated: &'a AggregatedContext,
    /// User's body weight, if known
    pub body_weight_kg: Option<f64>,
    /// User timezone for resolving "today"
    pub timezone: FixedOffset,
    /// Minimum gap between active days that counts as a comeback
    pub comeback_gap_days: i64,
}

impl<'a> EvaluationContext<'a> {
    /// Context with default timezone (UTC) and comeback gap
    #[must_use]
    pub fn new(aggregated: &'a AggregatedContext, body_weight_kg: Option<f64>) -> Self {
        Self {
            aggregated,
            body_weight_kg,
            timezone: Utc.fix(),
            comeback_gap_days: COMEBACK_GAP_DAYS,
        }
    }

    /// Local calendar date of `now`
    #[must_use]
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        local_date(now, self.timezone)
    }
}

/// A progress strategy for one metric
pub trait MetricEvaluator: Send + Sync {
    /// Compute progress; never fails, missing inputs yield zero progress
    fn evaluate(
        &self,
        now: DateTime<Utc>,
        context: &EvaluationContext<'_>,
        definition: &AchievementDefinition,
        instance: &AchievementInstance,
    ) -> Progress;
}

/// Fixed table from metric to evaluator
pub struct EvaluatorRegistry;

impl EvaluatorRegistry {
    /// Strategy implementing `metric`
    #[must_use]
    pub fn evaluator_for(metric: MetricType) -> &'static dyn MetricEvaluator {
        match metric {
            MetricType::FirstWorkout => &FirstWorkout,
            MetricType::WorkoutsPerWindow => &WorkoutsPerWindow,
            MetricType::Streak | MetricType::StreakGoal => &Streak,
            MetricType::TotalVolume => &TotalVolume,
            MetricType::VarietyBalance => &VarietyBalance,
            MetricType::ScheduleAdherence => &ScheduleAdherence,
            MetricType::EarlyBird => &EarlyBird,
            MetricType::Comeback => &Comeback,
            MetricType::OneRmTarget => &OneRmTarget,
            MetricType::FrequencyGoal => &FrequencyGoal,
            MetricType::RepsAtWeightGoal => &RepsAtWeightGoal,
            MetricType::BodyWeightRelation => &BodyWeightRelation,
            MetricType::TimeUnderTension => &TimeUnderTension,
        }
    }

    /// Strategy for a metric identifier, `None` when nothing is registered
    #[must_use]
    pub fn lookup(metric_id: &str) -> Option<&'static dyn MetricEvaluator> {
        MetricType::from_id(metric_id).map(Self::evaluator_for)
    }

    /// Evaluate an instance against its definition's metric
    #[must_use]
    pub fn evaluate(
        now: DateTime<Utc>,
        context: &EvaluationContext<'_>,
        definition: &AchievementDefinition,
        instance: &AchievementInstance,
    ) -> Option<Progress> {
        Self::lookup(&definition.metric)
            .map(|evaluator| evaluator.evaluate(now, context, definition, instance))
    }
}

/// Window precedence: instance override, then definition, then default
fn resolve_window(
    definition: &AchievementDefinition,
    instance: &AchievementInstance,
    default_days: u32,
) -> u32 {
    instance
        .metadata
        .window_days
        .or(definition.window_days)
        .unwrap_or(default_days)
}

fn unit_of(definition: &AchievementDefinition) -> ProgressUnit {
    definition
        .metric_type()
        .map_or_else(Default::default, |metric| metric.unit())
}

/// Consecutive active days walking backward from `today`
#[must_use]
pub fn streak_length(aggregated: &AggregatedContext, today: NaiveDate) -> u32 {
    let mut length = 0;
    let mut day = today;
    while aggregated
        .summary_on(day)
        .is_some_and(|summary| summary.session_count > 0)
    {
        length += 1;
        let Some(previous) = day.pred_opt() else {
            break;
        };
        day = previous;
    }
    length
}

struct FirstWorkout;

impl MetricEvaluator for FirstWorkout {
    fn evaluate(
        &self,
        _now: DateTime<Utc>,
        context: &EvaluationContext<'_>,
        definition: &AchievementDefinition,
        _instance: &AchievementInstance,
    ) -> Progress {
        let any = context
            .aggregated
            .summaries
            .iter()
            .any(|summary| summary.session_count >= 1);
        Progress::toward(
            if any { 1.0 } else { 0.0 },
            definition.target,
            unit_of(definition),
        )
    }
}

struct WorkoutsPerWindow;

impl MetricEvaluator for WorkoutsPerWindow {
    fn evaluate(
        &self,
        now: DateTime<Utc>,
        context: &EvaluationContext<'_>,
        definition: &AchievementDefinition,
        _instance: &AchievementInstance,
    ) -> Progress {
        let days = definition.window_days.unwrap_or(WORKOUTS_DEFAULT_DAYS);
        let window = DayWindow::trailing(context.today(now), days);
        let sessions = context.aggregated.sessions_in(&window);
        Progress::toward(f64::from(sessions), definition.target, unit_of(definition))
    }
}

struct Streak;

impl MetricEvaluator for Streak {
    fn evaluate(
        &self,
        now: DateTime<Utc>,
        context: &EvaluationContext<'_>,
        definition: &AchievementDefinition,
        _instance: &AchievementInstance,
    ) -> Progress {
        let length = streak_length(context.aggregated, context.today(now));
        Progress::toward(f64::from(length), definition.target, unit_of(definition))
    }
}

struct TotalVolume;

impl MetricEvaluator for TotalVolume {
    fn evaluate(
        &self,
        _now: DateTime<Utc>,
        context: &EvaluationContext<'_>,
        definition: &AchievementDefinition,
        _instance: &AchievementInstance,
    ) -> Progress {
        let volume: f64 = context
            .aggregated
            .summaries
            .iter()
            .map(|summary| summary.total_volume_kg)
            .sum();
        Progress::toward(volume, definition.target, unit_of(definition))
    }
}

struct VarietyBalance;

impl MetricEvaluator for VarietyBalance {
    fn evaluate(
        &self,
        now: DateTime<Utc>,
        context: &EvaluationContext<'_>,
        definition: &AchievementDefinition,
        _instance: &AchievementInstance,
    ) -> Progress {
        let days = definition.window_days.unwrap_or(VARIETY_DEFAULT_DAYS);
        let window = DayWindow::trailing(context.today(now), days);
        let trained = context
            .aggregated
            .days_in(&window)
            .fold(MovementCategory::empty(), |mask, summary| {
                mask | summary.category_mask
            });
        let count = (trained & MovementCategory::BALANCED).bits().count_ones();
        Progress::toward(f64::from(count), definition.target, unit_of(definition))
    }
}

struct ScheduleAdherence;

impl MetricEvaluator for ScheduleAdherence {
    fn evaluate(
        &self,
        now: DateTime<Utc>,
        context: &EvaluationContext<'_>,
        definition: &AchievementDefinition,
        _instance: &AchievementInstance,
    ) -> Progress {
        let days = definition
            .window_days
            .unwrap_or(SCHEDULE_ADHERENCE_DEFAULT_DAYS);
        let window = DayWindow::trailing(context.today(now), days);

        let (expected, completed) = context.aggregated.schedule_expectations.iter().fold(
            (0_usize, 0_usize),
            |(expected, completed), schedule| {
                let in_window = |dates: &[NaiveDate]| {
                    dates.iter().filter(|date| window.contains(**date)).count()
                };
                (
                    expected + in_window(&schedule.expected_dates),
                    completed + in_window(&schedule.completed_dates),
                )
            },
        );

        #[allow(clippy::cast_precision_loss)]
        let ratio = if expected == 0 {
            0.0
        } else {
            completed as f64 / expected as f64
        };
        Progress::guarded(ratio, definition.target, unit_of(definition))
    }
}

struct EarlyBird;

impl MetricEvaluator for EarlyBird {
    fn evaluate(
        &self,
        now: DateTime<Utc>,
        context: &EvaluationContext<'_>,
        definition: &AchievementDefinition,
        _instance: &AchievementInstance,
    ) -> Progress {
        let days = definition.window_days.unwrap_or(EARLY_BIRD_DEFAULT_DAYS);
        let window = DayWindow::trailing(context.today(now), days);
        let early: u32 = context
            .aggregated
            .days_in(&window)
            .map(|summary| summary.early_session_count)
            .sum();
        Progress::toward(f64::from(early), definition.target, unit_of(definition))
    }
}

struct Comeback;

impl MetricEvaluator for Comeback {
    fn evaluate(
        &self,
        _now: DateTime<Utc>,
        context: &EvaluationContext<'_>,
        definition: &AchievementDefinition,
        _instance: &AchievementInstance,
    ) -> Progress {
        let days = definition.window_days.unwrap_or(COMEBACK_DEFAULT_DAYS);
        let active: Vec<NaiveDate> = context
            .aggregated
            .summaries
            .iter()
            .filter(|summary| summary.session_count > 0)
            .map(|summary| summary.date)
            .collect();

        let best = active
            .windows(2)
            .filter(|pair| (pair[1] - pair[0]).num_days() >= context.comeback_gap_days)
            .map(|pair| {
                context
                    .aggregated
                    .sessions_in(&DayWindow::starting(pair[1], days))
            })
            .max()
            .unwrap_or(0);
        Progress::toward(f64::from(best), definition.target, unit_of(definition))
    }
}

struct OneRmTarget;

impl MetricEvaluator for OneRmTarget {
    fn evaluate(
        &self,
        _now: DateTime<Utc>,
        context: &EvaluationContext<'_>,
        definition: &AchievementDefinition,
        instance: &AchievementInstance,
    ) -> Progress {
        let unit = unit_of(definition);
        let Some(stats) = instance
            .metadata
            .exercise_name
            .as_deref()
            .and_then(|name| context.aggregated.stats_for(name))
        else {
            return Progress::zero(definition.target, unit);
        };
        let best = if stats.best_one_rm_kg > 0.0 {
            stats.best_one_rm_kg
        } else {
            stats.best_weight_kg
        };
        Progress::toward(best, definition.target, unit)
    }
}

struct FrequencyGoal;

impl MetricEvaluator for FrequencyGoal {
    fn evaluate(
        &self,
        now: DateTime<Utc>,
        context: &EvaluationContext<'_>,
        definition: &AchievementDefinition,
        instance: &AchievementInstance,
    ) -> Progress {
        let days = resolve_window(definition, instance, GOAL_DEFAULT_DAYS);
        let window = DayWindow::trailing(context.today(now), days);
        let sessions = context.aggregated.sessions_in(&window);
        Progress::toward(f64::from(sessions), definition.target, unit_of(definition))
    }
}

struct RepsAtWeightGoal;

impl MetricEvaluator for RepsAtWeightGoal {
    fn evaluate(
        &self,
        _now: DateTime<Utc>,
        context: &EvaluationContext<'_>,
        definition: &AchievementDefinition,
        instance: &AchievementInstance,
    ) -> Progress {
        let unit = unit_of(definition);
        let (Some(stats), Some(min_weight)) = (
            instance
                .metadata
                .exercise_name
                .as_deref()
                .and_then(|name| context.aggregated.stats_for(name)),
            instance.metadata.secondary_target,
        ) else {
            return Progress::zero(definition.target, unit);
        };
        let reps = stats
            .performances
            .iter()
            .filter(|performance| performance.weight_kg >= min_weight)
            .map(|performance| performance.reps)
            .max()
            .unwrap_or(0);
        Progress::toward(f64::from(reps), definition.target, unit)
    }
}

struct BodyWeightRelation;

impl MetricEvaluator for BodyWeightRelation {
    fn evaluate(
        &self,
        _now: DateTime<Utc>,
        context: &EvaluationContext<'_>,
        definition: &AchievementDefinition,
        instance: &AchievementInstance,
    ) -> Progress {
        let unit = unit_of(definition);
        let Some(body_weight) = context.body_weight_kg.filter(|w| *w > 0.0) else {
            return Progress::zero(0.0, unit);
        };
        let best = instance
            .metadata
            .exercise_name
            .as_deref()
            .and_then(|name| context.aggregated.stats_for(name))
            .map_or(0.0, |stats| stats.best_weight_kg);
        Progress::guarded(best, body_weight, unit)
    }
}

struct TimeUnderTension;

impl MetricEvaluator for TimeUnderTension {
    fn evaluate(
        &self,
        now: DateTime<Utc>,
        context: &EvaluationContext<'_>,
        definition: &AchievementDefinition,
        instance: &AchievementInstance,
    ) -> Progress {
        let days = resolve_window(definition, instance, GOAL_DEFAULT_DAYS);
        let window = DayWindow::trailing(context.today(now), days);
        let minutes: i64 = context
            .aggregated
            .days_in(&window)
            .map(|summary| summary.active_minutes)
            .sum();
        #[allow(clippy::cast_precision_loss)]
        let seconds = minutes as f64 * SECONDS_PER_MINUTE;
        Progress::toward(seconds, definition.target, unit_of(definition))
    }
}
