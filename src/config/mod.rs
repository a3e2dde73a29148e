// ABOUTME: Configuration module for database location and achievement engine tunables
// ABOUTME: Every value has a compiled-in default and an environment override
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration
//!
//! | Variable | Default |
//! |---|---|
//! | `DATABASE_URL` | `sqlite:./data/repforge.db` |
//! | `REPFORGE_UTC_OFFSET_MINUTES` | `0` |
//! | `REPFORGE_EARLY_BIRD_HOUR` | `8` |
//! | `REPFORGE_DEADLINE_WARNING_HOURS` | `72` |
//! | `REPFORGE_SCHEDULE_WINDOW_DAYS` | `28` |
//! | `REPFORGE_COMEBACK_GAP_DAYS` | `14` |
//! | `REPFORGE_EVENT_CHANNEL_SIZE` | `64` |
//!
//! Logging is configured separately by [`crate::logging::LoggingConfig`].

/// Achievement engine tunables
pub mod achievements;
/// Database location
pub mod database;
/// Top-level configuration
pub mod environment;

pub use achievements::AchievementConfig;
pub use database::{DatabaseConfig, DatabaseUrl};
pub use environment::ServerConfig;
