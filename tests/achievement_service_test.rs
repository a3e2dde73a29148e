// ABOUTME: Integration tests for the achievement service over an in-memory SQLite database
// ABOUTME: Covers cycles, completion latch, goal lifecycle, deadlines, streams and autocomplete
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::time::Duration as StdDuration;

use chrono::{Duration, NaiveDate, Utc};
use common::{
    assert_close, create_test_database, create_test_service, evaluation_instant, exercise,
    instance, record_all, session_days_ago,
};
use repforge::achievements::catalog_instance_id;
use repforge::config::AchievementConfig;
use repforge::database::achievements::{insert_definition, insert_goal, insert_instance};
use repforge::errors::ErrorCode;
use repforge::models::{
    AchievementDefinition, AchievementEvent, AchievementInstance, AchievementStatus,
    AchievementType, CreateGoalRequest, GoalKind, SessionStatus, UserSettings, WeightUnit,
};
use repforge::services::AchievementService;
use tokio::time::timeout;
use tokio_stream::StreamExt;

fn deadline_events(events: &[AchievementEvent], instance_id: &str) -> usize {
    events
        .iter()
        .filter(|event| {
            matches!(event, AchievementEvent::GoalDeadlineApproaching { .. })
                && event.instance_id() == instance_id
        })
        .count()
}

#[tokio::test]
async fn test_catalog_is_seeded_once() {
    let database = create_test_database().await.unwrap();
    let first = AchievementService::new(database.clone(), AchievementConfig::default())
        .await
        .unwrap();
    let catalog = first.get_catalog().await.unwrap();
    assert_eq!(catalog.len(), 13);
    assert_eq!(first.list_instances().len(), 13);

    let second = AchievementService::new(database, AchievementConfig::default())
        .await
        .unwrap();
    assert_eq!(second.get_catalog().await.unwrap().len(), 13);
    assert_eq!(second.list_instances().len(), 13);
    assert!(second
        .list_instances()
        .iter()
        .all(|instance| instance.status == AchievementStatus::Locked));
}

#[tokio::test]
async fn test_first_session_completes_first_workout() {
    let service = create_test_service().await.unwrap();
    let now = evaluation_instant();
    record_all(
        &service,
        &[session_days_ago(now, 0, vec![exercise("Bench Press", &[(60.0, 5)])])],
    )
    .await
    .unwrap();

    let events = service.evaluate_at(now).await.unwrap();
    let first_workout_id = catalog_instance_id("first_workout");
    assert!(events.iter().any(|event| matches!(
        event,
        AchievementEvent::Completed { instance_id, completed_at, .. }
            if *instance_id == first_workout_id && *completed_at == now
    )));

    let first_workout = instance(&service, &first_workout_id);
    assert_eq!(first_workout.status, AchievementStatus::Completed);
    assert_eq!(first_workout.completed_at, Some(now));

    let weekly = instance(&service, &catalog_instance_id("weekly_regular"));
    assert_eq!(weekly.status, AchievementStatus::InProgress);
    assert_close(weekly.progress.current, 1.0);
}

#[tokio::test]
async fn test_second_cycle_is_idempotent() {
    let service = create_test_service().await.unwrap();
    let now = evaluation_instant();
    record_all(
        &service,
        &[
            session_days_ago(now, 0, vec![exercise("Squat", &[(100.0, 5), (100.0, 5)])]),
            session_days_ago(now, 1, vec![exercise("Bench Press", &[(70.0, 8)])]),
            session_days_ago(now, 2, vec![exercise("Barbell Row", &[(60.0, 10)])]),
        ],
    )
    .await
    .unwrap();

    let first_events = service.evaluate_at(now).await.unwrap();
    assert!(!first_events.is_empty());
    let after_first = service.list_instances();

    let second_events = service.evaluate_at(now).await.unwrap();
    assert!(second_events.is_empty());
    assert_eq!(service.list_instances(), after_first);
    assert_eq!(service.database().achievements().list_instances().await.unwrap(), after_first);
}

#[tokio::test]
async fn test_completion_survives_session_deletion() {
    let service = create_test_service().await.unwrap();
    let now = evaluation_instant();
    let session = session_days_ago(now, 0, vec![exercise("Deadlift", &[(140.0, 3)])]);
    record_all(&service, std::slice::from_ref(&session)).await.unwrap();
    service.evaluate_at(now).await.unwrap();

    assert!(service.database().sessions().delete_session(&session.id).await.unwrap());
    let later = now + Duration::hours(1);
    let events = service.evaluate_at(later).await.unwrap();
    assert!(events.is_empty());

    let first_workout = instance(&service, &catalog_instance_id("first_workout"));
    assert_eq!(first_workout.status, AchievementStatus::Completed);
    assert_eq!(first_workout.completed_at, Some(now));
    assert_close(first_workout.progress.current, 0.0);
}

#[tokio::test]
async fn test_streak_extends_after_gap_is_filled() {
    let service = create_test_service().await.unwrap();
    let now = evaluation_instant();
    let lift = || vec![exercise("Overhead Press", &[(40.0, 8)])];
    record_all(
        &service,
        &[
            session_days_ago(now, 0, lift()),
            session_days_ago(now, 1, lift()),
            session_days_ago(now, 2, lift()),
            session_days_ago(now, 4, lift()),
        ],
    )
    .await
    .unwrap();
    service.evaluate_at(now).await.unwrap();
    assert_close(instance(&service, &catalog_instance_id("streak_7")).progress.current, 3.0);

    record_all(&service, &[session_days_ago(now, 3, lift())]).await.unwrap();
    service.evaluate_at(now).await.unwrap();
    assert_close(instance(&service, &catalog_instance_id("streak_7")).progress.current, 5.0);
}

#[tokio::test]
async fn test_cancelled_sessions_do_not_count() {
    let service = create_test_service().await.unwrap();
    let now = evaluation_instant();
    let mut cancelled = session_days_ago(now, 0, vec![exercise("Squat", &[(200.0, 1)])]);
    cancelled.status = SessionStatus::Cancelled;
    record_all(&service, &[cancelled]).await.unwrap();

    let events = service.evaluate_at(now).await.unwrap();
    assert!(events.is_empty());
    let first_workout = instance(&service, &catalog_instance_id("first_workout"));
    assert_eq!(first_workout.status, AchievementStatus::Locked);
    assert!(service.get_exercise_stats("Squat").await.unwrap().is_none());
}

#[tokio::test]
async fn test_deadline_warnings_follow_distance_and_completion() {
    let service = create_test_service().await.unwrap();
    let now = evaluation_instant();
    record_all(
        &service,
        &[session_days_ago(now, 1, vec![exercise("Lunge", &[(20.0, 12)])])],
    )
    .await
    .unwrap();

    let mut near = CreateGoalRequest::new("Thirty day streak", GoalKind::Streak, 30.0);
    near.deadline = Some(now + Duration::hours(48));
    let near = service.create_user_goal(near).await.unwrap();

    let mut far = CreateGoalRequest::new("Another streak", GoalKind::Streak, 30.0);
    far.deadline = Some(now + Duration::hours(100));
    let far = service.create_user_goal(far).await.unwrap();

    let mut met = CreateGoalRequest::new("Train once", GoalKind::FrequencyInWindow, 1.0);
    met.window_days = Some(7);
    met.deadline = Some(now + Duration::hours(48));
    let met = service.create_user_goal(met).await.unwrap();

    let events = service.evaluate_at(now).await.unwrap();
    assert_eq!(deadline_events(&events, &near.instance_id()), 1);
    assert_eq!(deadline_events(&events, &far.instance_id()), 0);
    assert_eq!(deadline_events(&events, &met.instance_id()), 0);
    assert!(events.iter().any(|event| matches!(
        event,
        AchievementEvent::Completed { instance_id, .. } if *instance_id == met.instance_id()
    )));

    // Warnings repeat while the condition holds
    let again = service.evaluate_at(now + Duration::hours(1)).await.unwrap();
    assert_eq!(deadline_events(&again, &near.instance_id()), 1);
    assert_eq!(deadline_events(&again, &met.instance_id()), 0);
    assert_eq!(again.len(), 1);
}

#[tokio::test]
async fn test_goal_creation_evaluates_and_deletion_removes_everything() {
    let service = create_test_service().await.unwrap();
    let now = Utc::now();
    record_all(
        &service,
        &[session_days_ago(now, 0, vec![exercise("Bench Press", &[(100.0, 3)])])],
    )
    .await
    .unwrap();

    let mut request = CreateGoalRequest::new("Bench 120", GoalKind::LiftWeight, 120.0);
    request.exercise_name = Some("bench press".to_owned());
    let goal = service.create_user_goal(request).await.unwrap();

    assert_eq!(service.list_user_goals(), vec![goal.clone()]);
    let goal_instance = instance(&service, &goal.instance_id());
    assert_eq!(goal_instance.status, AchievementStatus::InProgress);
    assert_close(goal_instance.progress.current, 110.0);
    assert!(service
        .get_catalog()
        .await
        .unwrap()
        .iter()
        .any(|definition| definition.id == goal.definition_id()));

    service.delete_goal(&goal.id).await.unwrap();
    assert!(service.list_user_goals().is_empty());
    assert!(service
        .list_instances()
        .iter()
        .all(|instance| instance.id != goal.instance_id()));
    assert!(service
        .get_catalog()
        .await
        .unwrap()
        .iter()
        .all(|definition| definition.id != goal.definition_id()));

    let missing = service.delete_goal(&goal.id).await.unwrap_err();
    assert_eq!(missing.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_invalid_goal_is_rejected_before_persisting() {
    let service = create_test_service().await.unwrap();
    let request = CreateGoalRequest::new("Bench", GoalKind::LiftWeight, 100.0);
    assert!(service.create_user_goal(request).await.is_err());

    let request = CreateGoalRequest::new("Nothing", GoalKind::Streak, 0.0);
    assert!(service.create_user_goal(request).await.is_err());

    assert!(service.list_user_goals().is_empty());
    assert_eq!(service.get_catalog().await.unwrap().len(), 13);
}

#[tokio::test]
async fn test_oversized_goal_window_is_rejected() {
    let service = create_test_service().await.unwrap();
    let mut request = CreateGoalRequest::new("Train a lot", GoalKind::FrequencyInWindow, 4.0);
    request.window_days = Some(100_000_000);

    let error = service.create_user_goal(request).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ValueOutOfRange);
    assert!(service.list_user_goals().is_empty());
    assert!(service.database().achievements().list_goals().await.unwrap().is_empty());
    service.evaluate_at(evaluation_instant()).await.unwrap();
}

#[tokio::test]
async fn test_stored_huge_window_does_not_break_cycles() {
    let service = create_test_service().await.unwrap();
    let now = evaluation_instant();

    let definition = AchievementDefinition {
        id: "lifetime_sessions".to_owned(),
        title: "Lifetime sessions".to_owned(),
        description: "Sessions over an unbounded window".to_owned(),
        achievement_type: AchievementType::Consistency,
        metric: "frequency_goal".to_owned(),
        target: 2.0,
        window_days: Some(u32::MAX),
        repeatable: false,
        tier: 1,
        icon: "calendar".to_owned(),
        sort_order: 99,
    };
    let lifetime = AchievementInstance::new("instance:lifetime_sessions", &definition, now);
    let mut tx = service.database().begin().await.unwrap();
    insert_definition(tx.executor().unwrap(), &definition, false).await.unwrap();
    insert_instance(tx.executor().unwrap(), &lifetime, false).await.unwrap();
    tx.commit().await.unwrap();

    record_all(
        &service,
        &[
            session_days_ago(now, 0, vec![exercise("Squat", &[(80.0, 5)])]),
            session_days_ago(now, 400, vec![exercise("Squat", &[(60.0, 5)])]),
        ],
    )
    .await
    .unwrap();
    service.evaluate_at(now).await.unwrap();

    let lifetime = instance(&service, "instance:lifetime_sessions");
    assert_eq!(lifetime.status, AchievementStatus::Completed);
    assert_close(lifetime.progress.current, 2.0);
}

#[tokio::test]
async fn test_duplicate_goal_id_is_reported_as_existing() {
    let service = create_test_service().await.unwrap();
    let mut request = CreateGoalRequest::new("Squat 140", GoalKind::LiftWeight, 140.0);
    request.exercise_name = Some("Squat".to_owned());
    let goal = service.create_user_goal(request).await.unwrap();

    let mut tx = service.database().begin().await.unwrap();
    let error = insert_goal(tx.executor().unwrap(), &goal).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceAlreadyExists);
    tx.rollback().await.unwrap();

    assert_eq!(service.list_user_goals(), vec![goal]);
}

#[tokio::test]
async fn test_failed_cycle_leaves_store_and_snapshot_unchanged() {
    let service = create_test_service().await.unwrap();
    let now = evaluation_instant();
    record_all(
        &service,
        &[session_days_ago(now, 1, vec![exercise("Bench Press", &[(60.0, 5)])])],
    )
    .await
    .unwrap();
    service.evaluate_at(now).await.unwrap();
    let before = service.list_instances();

    record_all(
        &service,
        &[session_days_ago(now, 0, vec![exercise("Squat", &[(100.0, 5)])])],
    )
    .await
    .unwrap();
    sqlx::query("DROP TABLE daily_summaries")
        .execute(service.database().pool())
        .await
        .unwrap();
    let mut events = Box::pin(service.observe_events());

    let error = service.evaluate_at(now).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::DatabaseError);
    assert_eq!(service.list_instances(), before);
    assert_eq!(
        service.database().achievements().list_instances().await.unwrap(),
        before
    );
    assert!(timeout(StdDuration::from_millis(50), events.next())
        .await
        .is_err());
}

#[tokio::test]
async fn test_body_weight_goal_uses_current_settings() {
    let service = create_test_service().await.unwrap();
    let now = Utc::now();
    record_all(
        &service,
        &[session_days_ago(now, 0, vec![exercise("Deadlift", &[(180.0, 1)])])],
    )
    .await
    .unwrap();
    service
        .database()
        .settings()
        .save_settings(&UserSettings {
            default_weight_unit: WeightUnit::Kg,
            body_weight_kg: Some(90.0),
        })
        .await
        .unwrap();

    let mut request =
        CreateGoalRequest::new("Deadlift body weight", GoalKind::BodyWeightRelation, 1.0);
    request.exercise_name = Some("Deadlift".to_owned());
    let goal = service.create_user_goal(request).await.unwrap();

    let progress = instance(&service, &goal.instance_id()).progress;
    assert_close(progress.current, 180.0);
    assert_close(progress.target, 90.0);
    assert_close(progress.percent, 1.0);
}

#[tokio::test]
async fn test_unknown_metric_is_skipped_and_left_unchanged() {
    let service = create_test_service().await.unwrap();
    let now = evaluation_instant();

    let definition = AchievementDefinition {
        id: "legacy_metric".to_owned(),
        title: "Retired achievement".to_owned(),
        description: "Evaluated by a metric that no longer exists".to_owned(),
        achievement_type: AchievementType::Milestone,
        metric: "retired_metric".to_owned(),
        target: 10.0,
        window_days: None,
        repeatable: false,
        tier: 1,
        icon: "archive".to_owned(),
        sort_order: 99,
    };
    let legacy = AchievementInstance::new("instance:legacy_metric", &definition, now);
    let mut tx = service.database().begin().await.unwrap();
    insert_definition(tx.executor().unwrap(), &definition, false).await.unwrap();
    insert_instance(tx.executor().unwrap(), &legacy, false).await.unwrap();
    tx.commit().await.unwrap();

    record_all(
        &service,
        &[session_days_ago(now, 0, vec![exercise("Squat", &[(80.0, 5)])])],
    )
    .await
    .unwrap();
    service.evaluate_at(now).await.unwrap();

    assert_eq!(instance(&service, "instance:legacy_metric"), legacy);
    assert_eq!(
        instance(&service, &catalog_instance_id("first_workout")).status,
        AchievementStatus::Completed
    );
}

#[tokio::test]
async fn test_streams_publish_after_commit() {
    let service = create_test_service().await.unwrap();
    let now = evaluation_instant();
    let mut events = Box::pin(service.observe_events());
    let mut snapshots = Box::pin(service.observe_instances());

    let initial = snapshots.next().await.unwrap();
    assert_eq!(initial.len(), 13);

    record_all(
        &service,
        &[session_days_ago(now, 0, vec![exercise("Pull Up", &[(10.0, 8)])])],
    )
    .await
    .unwrap();
    let raised = service.evaluate_at(now).await.unwrap();
    assert!(!raised.is_empty());

    let received = timeout(StdDuration::from_secs(1), events.next())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(received, raised[0]);

    let updated = timeout(StdDuration::from_secs(1), snapshots.next())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated, service.list_instances());
}

#[tokio::test]
async fn test_goal_stream_tracks_creation() {
    let service = create_test_service().await.unwrap();
    let mut goals = Box::pin(service.observe_user_goals());
    assert!(goals.next().await.unwrap().is_empty());

    let goal = service
        .create_user_goal(CreateGoalRequest::new("Streak", GoalKind::Streak, 5.0))
        .await
        .unwrap();
    let published = timeout(StdDuration::from_secs(1), goals.next())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(published, vec![goal]);
}

#[tokio::test]
async fn test_distinct_exercise_names_for_autocomplete() {
    let service = create_test_service().await.unwrap();
    let now = evaluation_instant();
    record_all(
        &service,
        &[
            session_days_ago(now, 0, vec![exercise("Bench Press", &[(60.0, 5)])]),
            session_days_ago(now, 1, vec![exercise("bench press ", &[(62.5, 5)])]),
            session_days_ago(now, 2, vec![exercise("Back Squat", &[(90.0, 5)])]),
            session_days_ago(now, 3, vec![exercise("Deadlift", &[(120.0, 5)])]),
        ],
    )
    .await
    .unwrap();

    let all = service.get_distinct_exercise_names(None).await.unwrap();
    assert_eq!(all, vec!["Back Squat", "Bench Press", "Deadlift"]);

    let b = service.get_distinct_exercise_names(Some("b")).await.unwrap();
    assert_eq!(b, vec!["Back Squat", "Bench Press"]);

    let none = service.get_distinct_exercise_names(Some("%")).await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_cycle_refreshes_cached_rollups() {
    let service = create_test_service().await.unwrap();
    let now = evaluation_instant();
    record_all(
        &service,
        &[
            session_days_ago(now, 0, vec![exercise("Squat", &[(100.0, 5)])]),
            session_days_ago(now, 1, vec![exercise("squat", &[(110.0, 3)])]),
        ],
    )
    .await
    .unwrap();
    service.evaluate_at(now).await.unwrap();

    let stats = service.get_exercise_stats("SQUAT").await.unwrap().unwrap();
    assert_eq!(stats.total_sets, 2);
    assert_close(stats.total_volume_kg, 830.0);
    assert_close(stats.best_weight_kg, 110.0);

    // 2025-03-12 is a Wednesday
    let week = service
        .weekly_session_counts(NaiveDate::from_ymd_opt(2025, 3, 12).unwrap())
        .await
        .unwrap();
    assert_eq!(week.len(), 7);
    assert_eq!(week[0].0, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
    let counts: Vec<u32> = week.iter().map(|(_, count)| *count).collect();
    assert_eq!(counts, vec![0, 1, 1, 0, 0, 0, 0]);
}
