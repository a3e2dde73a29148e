// ABOUTME: Aggregation-and-evaluation engine for workout achievements and user goals
// ABOUTME: Pure building blocks composed by the achievement service into evaluation cycles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Achievement Engine
//!
//! One evaluation cycle flows through these modules in order:
//!
//! 1. [`aggregation`] rebuilds per-day summaries, per-exercise statistics and
//!    schedule expectations from the full session log
//! 2. [`evaluators`] maps each instance's metric to a strategy producing a
//!    fresh [`Progress`](crate::models::Progress)
//! 3. [`status`] derives the new status, enforces the completion latch and
//!    collects events
//!
//! [`goals`] translates user goals into synthetic definition/instance pairs and
//! [`catalog`] holds the built-in definitions. Nothing here touches storage.

pub mod aggregation;
pub mod calendar;
pub mod catalog;
pub mod classification;
pub mod evaluators;
pub mod goals;
pub mod status;

pub use aggregation::{aggregate, AggregatedContext, AggregationOptions};
pub use catalog::{builtin_definitions, catalog_instance_id};
pub use evaluators::{EvaluationContext, EvaluatorRegistry, MetricEvaluator};
pub use goals::{build_goal_records, GoalRecordIds, GoalRecords};
pub use status::{apply_progress, Transition};
