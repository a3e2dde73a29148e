// ABOUTME: Re-exports command modules for repforge-cli
// ABOUTME: Evaluation and listing, goal lifecycle, and settings/schedule writers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod achievements;
pub mod goals;
pub mod log;
