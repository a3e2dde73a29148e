// ABOUTME: Achievement service running evaluation cycles and the goal lifecycle over the SQLite store
// ABOUTME: Serialises cycles, commits each one atomically and publishes snapshots and events afterwards
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Achievement Service
//!
//! Entry point used by every front end. One evaluation cycle:
//!
//! 1. loads the session log, enabled schedules, settings, definitions and
//!    instances inside one transaction
//! 2. rebuilds the aggregated context and rewrites the summary caches
//! 3. evaluates every instance and persists the ones that changed
//! 4. commits, then publishes the instance snapshot and broadcasts events
//!
//! A failure anywhere before the commit rolls the whole cycle back and
//! nothing is published. Cycles and goal writes share one mutex so at most
//! one of them touches the store at a time.

use std::collections::HashMap;
use std::time::Instant;

use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::{broadcast, watch, Mutex};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::{BroadcastStream, WatchStream};
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, field, info, instrument, warn, Span};

use crate::achievements::aggregation::ExerciseStats;
use crate::achievements::{
    aggregate, apply_progress, build_goal_records, builtin_definitions, catalog_instance_id,
    AggregatedContext, AggregationOptions, EvaluationContext, EvaluatorRegistry, GoalRecordIds,
};
use crate::config::AchievementConfig;
use crate::database::{achievements, schedules, sessions, settings, Database, TransactionGuard};
use crate::errors::{AppError, AppResult};
use crate::models::{
    AchievementDefinition, AchievementEvent, AchievementInstance, CreateGoalRequest, UserGoal,
};

/// Result of a cycle, held back until its transaction commits
struct CycleOutcome {
    snapshot: Vec<AchievementInstance>,
    events: Vec<AchievementEvent>,
    sessions_scanned: usize,
    days_summarized: usize,
    evaluated: usize,
    skipped: usize,
}

/// Evaluation engine and goal lifecycle over one database
pub struct AchievementService {
    database: Database,
    config: AchievementConfig,
    options: AggregationOptions,
    cycle_lock: Mutex<()>,
    instances_tx: watch::Sender<Vec<AchievementInstance>>,
    goals_tx: watch::Sender<Vec<UserGoal>>,
    events_tx: broadcast::Sender<AchievementEvent>,
}

impl AchievementService {
    /// Seed the built-in catalog and load the current snapshots
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the store fails
    pub async fn new(database: Database, config: AchievementConfig) -> AppResult<Self> {
        config.validate()?;
        let options = config.aggregation_options()?;

        seed_catalog(&database, Utc::now()).await?;

        let store = database.achievements();
        let instances = store.list_instances().await?;
        let goals = store.list_goals().await?;
        info!(
            instances = instances.len(),
            goals = goals.len(),
            "Achievement service ready"
        );

        let (instances_tx, _) = watch::channel(instances);
        let (goals_tx, _) = watch::channel(goals);
        let (events_tx, _) = broadcast::channel(config.event_channel_size);

        Ok(Self {
            database,
            config,
            options,
            cycle_lock: Mutex::new(()),
            instances_tx,
            goals_tx,
            events_tx,
        })
    }

    /// Underlying database, for the session log, schedule and settings writers
    #[must_use]
    pub const fn database(&self) -> &Database {
        &self.database
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &AchievementConfig {
        &self.config
    }

    /// Every definition, built-in and goal-backed, in display order
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get_catalog(&self) -> AppResult<Vec<AchievementDefinition>> {
        self.database.achievements().list_definitions().await
    }

    /// Instance snapshots, starting with the current one
    #[must_use]
    pub fn observe_instances(&self) -> WatchStream<Vec<AchievementInstance>> {
        WatchStream::new(self.instances_tx.subscribe())
    }

    /// Goal snapshots, starting with the current one
    #[must_use]
    pub fn observe_user_goals(&self) -> WatchStream<Vec<UserGoal>> {
        WatchStream::new(self.goals_tx.subscribe())
    }

    /// Live events raised by cycles committed after subscribing
    ///
    /// A subscriber that falls behind skips the events it missed.
    pub fn observe_events(&self) -> impl Stream<Item = AchievementEvent> + Send + 'static {
        BroadcastStream::new(self.events_tx.subscribe()).filter_map(|received| match received {
            Ok(event) => Some(event),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                warn!(skipped, "Event subscriber lagged, events dropped");
                None
            }
        })
    }

    /// Latest published instance snapshot
    #[must_use]
    pub fn list_instances(&self) -> Vec<AchievementInstance> {
        self.instances_tx.borrow().clone()
    }

    /// Latest published goal snapshot, newest first
    #[must_use]
    pub fn list_user_goals(&self) -> Vec<UserGoal> {
        self.goals_tx.borrow().clone()
    }

    /// Create a goal and evaluate it straight away
    ///
    /// The goal, its definition and its instance are written in one
    /// transaction. If the follow-up cycle fails the goal is still returned
    /// and the instance keeps zero progress until the next cycle.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is invalid or the goal cannot be stored
    pub async fn create_user_goal(&self, request: CreateGoalRequest) -> AppResult<UserGoal> {
        let now = Utc::now();
        let records = build_goal_records(&request, now)?;
        let _lock = self.cycle_lock.lock().await;

        let mut tx = self.database.begin().await?;
        achievements::insert_goal(tx.executor()?, &records.goal).await?;
        achievements::insert_definition(tx.executor()?, &records.definition, false).await?;
        achievements::insert_instance(tx.executor()?, &records.instance, false).await?;
        tx.commit().await?;

        info!(
            goal_id = %records.goal.id,
            kind = records.goal.kind.as_str(),
            target = records.goal.target_value,
            "User goal created"
        );

        if let Err(e) = self.run_cycle(now).await {
            warn!(goal_id = %records.goal.id, error = %e, "Evaluation after goal creation failed");
            self.publish_instances().await?;
        }
        self.publish_goals().await?;

        Ok(records.goal)
    }

    /// Delete a goal with its definition and instance
    ///
    /// Leftover records of a half-deleted goal are removed even when the
    /// goal row itself is gone.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if no such goal existed, or a database error
    pub async fn delete_goal(&self, goal_id: &str) -> AppResult<()> {
        let ids = GoalRecordIds::for_goal(goal_id);
        let _lock = self.cycle_lock.lock().await;

        let mut tx = self.database.begin().await?;
        let existed = achievements::delete_goal_records(tx.executor()?, &ids).await?;
        tx.commit().await?;

        self.publish_instances().await?;
        self.publish_goals().await?;

        if !existed {
            return Err(AppError::not_found(format!("Goal {goal_id}")));
        }
        info!(goal_id, "User goal deleted");
        Ok(())
    }

    /// Run one evaluation cycle now
    ///
    /// # Errors
    ///
    /// Returns an error if the cycle failed and was rolled back
    pub async fn evaluate_now(&self) -> AppResult<Vec<AchievementEvent>> {
        self.evaluate_at(Utc::now()).await
    }

    /// Run one evaluation cycle as of `now`
    ///
    /// Running it twice without touching the log leaves every instance as it
    /// was, and only deadline warnings are raised again.
    ///
    /// # Errors
    ///
    /// Returns an error if the cycle failed and was rolled back
    pub async fn evaluate_at(&self, now: DateTime<Utc>) -> AppResult<Vec<AchievementEvent>> {
        let _lock = self.cycle_lock.lock().await;
        self.run_cycle(now).await
    }

    /// Distinct logged exercise names starting with `prefix`, for autocomplete
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get_distinct_exercise_names(&self, prefix: Option<&str>) -> AppResult<Vec<String>> {
        self.database
            .sessions()
            .distinct_exercise_names(prefix)
            .await
    }

    /// Statistics of one exercise as of the last committed cycle
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get_exercise_stats(&self, exercise_name: &str) -> AppResult<Option<ExerciseStats>> {
        self.database.achievements().exercise_stats(exercise_name).await
    }

    /// Sessions per day of the Monday-started week containing `date`,
    /// as of the last committed cycle
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn weekly_session_counts(&self, date: NaiveDate) -> AppResult<Vec<(NaiveDate, u32)>> {
        let summaries = self.database.achievements().list_daily_summaries().await?;
        let cached = AggregatedContext {
            summaries,
            ..AggregatedContext::default()
        };
        Ok(cached.weekly_session_counts(date))
    }

    /// One cycle; the caller holds `cycle_lock`
    #[instrument(
        name = "evaluation_cycle",
        skip(self),
        fields(
            sessions_scanned = field::Empty,
            days_summarized = field::Empty,
            evaluated = field::Empty,
            skipped = field::Empty,
            events = field::Empty,
        )
    )]
    async fn run_cycle(&self, now: DateTime<Utc>) -> AppResult<Vec<AchievementEvent>> {
        let started = Instant::now();
        let mut tx = self.database.begin().await?;

        let outcome = match self.evaluate_in(&mut tx, now).await {
            Ok(outcome) => outcome,
            Err(e) => {
                if let Err(rollback_error) = tx.rollback().await {
                    warn!(error = %rollback_error, "Evaluation cycle rollback failed");
                }
                return Err(e);
            }
        };
        tx.commit().await?;

        let CycleOutcome {
            snapshot,
            events,
            sessions_scanned,
            days_summarized,
            evaluated,
            skipped,
        } = outcome;

        self.instances_tx.send_replace(snapshot);
        for event in &events {
            if self.events_tx.send(event.clone()).is_err() {
                debug!("No event subscribers");
                break;
            }
        }

        let span = Span::current();
        span.record("sessions_scanned", sessions_scanned);
        span.record("days_summarized", days_summarized);
        span.record("evaluated", evaluated);
        span.record("skipped", skipped);
        span.record("events", events.len());
        info!(
            sessions_scanned,
            days_summarized,
            evaluated,
            skipped,
            events = events.len(),
            duration_ms = started.elapsed().as_millis(),
            "Evaluation cycle committed"
        );

        Ok(events)
    }

    /// Reads, aggregation and instance writes of one cycle, inside `tx`
    async fn evaluate_in(
        &self,
        tx: &mut TransactionGuard<'_>,
        now: DateTime<Utc>,
    ) -> AppResult<CycleOutcome> {
        let session_log = sessions::load_sessions(tx.executor()?).await?;
        let enabled_schedules = schedules::load_enabled_schedules(tx.executor()?).await?;
        let user_settings = settings::load_settings(tx.executor()?).await?;
        let definitions: HashMap<String, AchievementDefinition> =
            achievements::load_definitions(tx.executor()?)
                .await?
                .into_iter()
                .map(|definition| (definition.id.clone(), definition))
                .collect();
        let instances = achievements::load_instances(tx.executor()?).await?;

        let aggregated = aggregate(
            &session_log,
            &enabled_schedules,
            &user_settings,
            now,
            &self.options,
        );
        achievements::replace_daily_summaries(tx.executor()?, &aggregated.summaries).await?;
        achievements::replace_exercise_stats(tx.executor()?, &aggregated.exercise_stats).await?;

        let context = EvaluationContext {
            timezone: self.options.timezone,
            comeback_gap_days: self.config.comeback_gap_days,
            ..EvaluationContext::new(&aggregated, user_settings.body_weight_kg)
        };
        let deadline_warning = self.config.deadline_warning();

        let mut outcome = CycleOutcome {
            snapshot: Vec::with_capacity(instances.len()),
            events: Vec::new(),
            sessions_scanned: aggregated.sessions_scanned,
            days_summarized: aggregated.summaries.len(),
            evaluated: 0,
            skipped: 0,
        };

        for instance in instances {
            let Some(definition) = definitions.get(&instance.definition_id) else {
                warn!(
                    instance_id = %instance.id,
                    definition_id = %instance.definition_id,
                    "Instance has no definition, skipping"
                );
                outcome.skipped += 1;
                outcome.snapshot.push(instance);
                continue;
            };
            let Some(progress) = EvaluatorRegistry::evaluate(now, &context, definition, &instance)
            else {
                warn!(
                    instance_id = %instance.id,
                    metric = %definition.metric,
                    "No evaluator for metric, progress left unchanged"
                );
                outcome.skipped += 1;
                outcome.snapshot.push(instance);
                continue;
            };

            outcome.evaluated += 1;
            let transition = apply_progress(&instance, definition, progress, now, deadline_warning);
            if transition.changed {
                achievements::update_instance(tx.executor()?, &transition.instance).await?;
                debug!(
                    instance_id = %transition.instance.id,
                    status = transition.instance.status.as_str(),
                    current = transition.instance.progress.current,
                    percent = transition.instance.progress.percent,
                    "Instance progress updated"
                );
            }
            outcome.events.extend(transition.events);
            outcome.snapshot.push(transition.instance);
        }

        Ok(outcome)
    }

    async fn publish_instances(&self) -> AppResult<()> {
        let instances = self.database.achievements().list_instances().await?;
        self.instances_tx.send_replace(instances);
        Ok(())
    }

    async fn publish_goals(&self) -> AppResult<()> {
        let goals = self.database.achievements().list_goals().await?;
        self.goals_tx.send_replace(goals);
        Ok(())
    }
}

/// Insert missing built-in definitions and their single instances
async fn seed_catalog(database: &Database, now: DateTime<Utc>) -> AppResult<()> {
    let definitions = builtin_definitions();
    let mut tx = database.begin().await?;
    for definition in &definitions {
        achievements::insert_definition(tx.executor()?, definition, true).await?;
        let instance = AchievementInstance::new(catalog_instance_id(&definition.id), definition, now);
        achievements::insert_instance(tx.executor()?, &instance, true).await?;
    }
    tx.commit().await?;
    debug!(definitions = definitions.len(), "Built-in catalog seeded");
    Ok(())
}
