// ABOUTME: Core types and constants for the Repforge achievement engine
// ABOUTME: Foundation crate with error handling, constants, and domain models
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Repforge Core
//!
//! Foundation crate providing shared types and constants for the Repforge
//! achievement engine. It is designed to change infrequently, so the engine
//! crate recompiles without touching it.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Windows, thresholds, and unit conversions
//! - **models**: Workout log, achievement, goal, and event types

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (sessions, definitions, instances, goals, events)
pub mod models;
