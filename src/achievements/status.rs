// ABOUTME: Status state machine applying fresh progress to an instance with a one-way completion latch
// ABOUTME: Emits Completed on the first transition and deadline warnings for open goal instances
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Duration, Utc};

use crate::models::{
    goal_id_from_definition, AchievementDefinition, AchievementEvent, AchievementInstance,
    AchievementStatus, Progress,
};

/// Result of applying one evaluation to one instance
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Instance with refreshed progress and, unless latched, refreshed status
    pub instance: AchievementInstance,
    /// Events raised by this transition
    pub events: Vec<AchievementEvent>,
    /// Whether anything persisted on the instance changed
    pub changed: bool,
}

/// Apply freshly evaluated `progress` to `instance`
///
/// Progress always refreshes. Status and `completed_at` only move forward:
/// once the latch is set they are left untouched.
#[must_use]
pub fn apply_progress(
    instance: &AchievementInstance,
    definition: &AchievementDefinition,
    progress: Progress,
    now: DateTime<Utc>,
    deadline_warning: Duration,
) -> Transition {
    let mut updated = instance.clone();
    updated.progress = progress;
    let mut events = Vec::new();

    if !instance.is_latched() {
        updated.status = AchievementStatus::from_progress(&progress);
        if updated.status == AchievementStatus::Completed {
            let completed_at = *updated.completed_at.get_or_insert(now);
            events.push(AchievementEvent::Completed {
                instance_id: updated.id.clone(),
                definition_id: definition.id.clone(),
                title: definition.title.clone(),
                completed_at,
            });
        }
    }

    if let Some(deadline) = approaching_deadline(&updated, now, deadline_warning) {
        events.push(AchievementEvent::GoalDeadlineApproaching {
            instance_id: updated.id.clone(),
            definition_id: definition.id.clone(),
            title: definition.title.clone(),
            deadline,
        });
    }

    let changed = updated != *instance;
    Transition {
        instance: updated,
        events,
        changed,
    }
}

/// Deadline of an open goal instance falling within `warning` of `now`
fn approaching_deadline(
    instance: &AchievementInstance,
    now: DateTime<Utc>,
    warning: Duration,
) -> Option<DateTime<Utc>> {
    if instance.is_latched() || goal_id_from_definition(&instance.definition_id).is_none() {
        return None;
    }
    instance
        .metadata
        .deadline
        .filter(|deadline| *deadline > now && *deadline - now <= warning)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::thresholds::DEADLINE_WARNING_HOURS;
    use crate::models::{AchievementType, MetricType, ProgressUnit};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 20, 12, 0, 0).unwrap()
    }

    fn warning() -> Duration {
        Duration::hours(DEADLINE_WARNING_HOURS)
    }

    fn definition(id: &str) -> AchievementDefinition {
        AchievementDefinition {
            id: id.to_owned(),
            title: "Bench 100".to_owned(),
            description: String::new(),
            achievement_type: AchievementType::UserGoal,
            metric: MetricType::OneRmTarget.as_str().to_owned(),
            target: 100.0,
            window_days: None,
            repeatable: false,
            tier: 1,
            icon: "target".to_owned(),
            sort_order: 0,
        }
    }

    fn progress(current: f64) -> Progress {
        Progress::toward(current, 100.0, ProgressUnit::Kg)
    }

    #[test]
    fn test_status_follows_progress_until_completion() {
        let def = definition("bench");
        let fresh = AchievementInstance::new("i", &def, now());

        let locked = apply_progress(&fresh, &def, progress(0.0), now(), warning());
        assert_eq!(locked.instance.status, AchievementStatus::Locked);
        assert!(locked.events.is_empty());
        assert!(!locked.changed);

        let partial = apply_progress(&fresh, &def, progress(40.0), now(), warning());
        assert_eq!(partial.instance.status, AchievementStatus::InProgress);
        assert!(partial.changed);
        assert!(partial.events.is_empty());
    }

    #[test]
    fn test_completion_emits_once_and_latches() {
        let def = definition("bench");
        let fresh = AchievementInstance::new("i", &def, now());

        let done = apply_progress(&fresh, &def, progress(120.0), now(), warning());
        assert_eq!(done.instance.status, AchievementStatus::Completed);
        assert_eq!(done.instance.completed_at, Some(now()));
        assert_eq!(done.events.len(), 1);
        assert_eq!(done.events[0].kind(), "completed");

        let later = now() + Duration::days(3);
        let again = apply_progress(&done.instance, &def, progress(120.0), later, warning());
        assert!(again.events.is_empty());
        assert!(!again.changed);

        let regressed = apply_progress(&done.instance, &def, progress(10.0), later, warning());
        assert_eq!(regressed.instance.status, AchievementStatus::Completed);
        assert_eq!(regressed.instance.completed_at, Some(now()));
        assert!((regressed.instance.progress.current - 10.0).abs() < f64::EPSILON);
        assert!(regressed.events.is_empty());
    }

    #[test]
    fn test_deadline_warning_window() {
        let def = definition("goal:g1");
        let mut instance = AchievementInstance::new("goal:g1:instance", &def, now());

        instance.metadata.deadline = Some(now() + Duration::hours(48));
        let near = apply_progress(&instance, &def, progress(10.0), now(), warning());
        assert_eq!(near.events.len(), 1);
        assert_eq!(near.events[0].kind(), "goal_deadline_approaching");

        // repeats while the condition holds
        let next = apply_progress(&near.instance, &def, progress(10.0), now(), warning());
        assert_eq!(next.events.len(), 1);

        instance.metadata.deadline = Some(now() + Duration::hours(100));
        let far = apply_progress(&instance, &def, progress(10.0), now(), warning());
        assert!(far.events.is_empty());

        instance.metadata.deadline = Some(now() - Duration::hours(1));
        let past = apply_progress(&instance, &def, progress(10.0), now(), warning());
        assert!(past.events.is_empty());
    }

    #[test]
    fn test_completed_goal_gets_no_deadline_warning() {
        let def = definition("goal:g1");
        let mut instance = AchievementInstance::new("goal:g1:instance", &def, now());
        instance.metadata.deadline = Some(now() + Duration::hours(24));

        let done = apply_progress(&instance, &def, progress(100.0), now(), warning());
        assert_eq!(done.events.len(), 1);
        assert_eq!(done.events[0].kind(), "completed");

        let after = apply_progress(&done.instance, &def, progress(100.0), now(), warning());
        assert!(after.events.is_empty());
    }

    #[test]
    fn test_catalog_instances_ignore_deadlines() {
        let def = definition("streak_7");
        let mut instance = AchievementInstance::new("instance:streak_7", &def, now());
        instance.metadata.deadline = Some(now() + Duration::hours(12));
        let transition = apply_progress(&instance, &def, progress(10.0), now(), warning());
        assert!(transition.events.is_empty());
    }
}
