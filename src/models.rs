// ABOUTME: Workout log, achievement, goal and event models
// ABOUTME: Re-exports the domain types of repforge-core
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use repforge_core::models::*;
