// ABOUTME: Domain service layer shared by every front end of the achievement engine
// ABOUTME: Wraps the database and the pure engine behind one serialised entry point
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain service layer

/// Evaluation cycles, goal lifecycle, and live snapshots
pub mod achievements;

pub use achievements::AchievementService;
