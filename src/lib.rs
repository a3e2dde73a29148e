// ABOUTME: Main library entry point for the Repforge achievement engine
// ABOUTME: Aggregates workout logs and evaluates achievements and user goals over SQLite
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Repforge
//!
//! Progress tracking for strength training. Every evaluation cycle rebuilds
//! per-day summaries and per-exercise statistics from the complete session
//! log, evaluates each achievement instance against its metric, and raises
//! completion and goal deadline events.
//!
//! ## Architecture
//!
//! - **achievements**: the pure engine (calendar, classification, aggregation,
//!   evaluators, status latch, catalog, goal mapping)
//! - **database**: `SQLite` stores and the transaction guard
//! - **services**: [`services::AchievementService`], the single entry point
//! - **config** / **logging**: environment-driven setup
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use repforge::config::ServerConfig;
//! use repforge::database::Database;
//! use repforge::errors::AppResult;
//! use repforge::services::AchievementService;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     let database = Database::new(&config.database.url).await?;
//!     let service = AchievementService::new(database, config.achievements).await?;
//!
//!     for event in service.evaluate_now().await? {
//!         println!("{}: {}", event.kind(), event.instance_id());
//!     }
//!     Ok(())
//! }
//! ```

/// Pure aggregation and evaluation engine
pub mod achievements;

/// Environment configuration
pub mod config;

/// Windows, thresholds, and unit conversions
pub mod constants;

/// `SQLite` persistence
pub mod database;

/// Unified error handling
pub mod errors;

/// Structured logging setup
pub mod logging;

/// Domain models
pub mod models;

/// Service layer
pub mod services;
