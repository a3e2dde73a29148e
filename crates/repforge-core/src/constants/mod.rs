// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Windows, thresholds, and unit conversions for achievement evaluation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped by domain. Configuration types read their defaults
//! from here so that the env-driven config and the pure evaluators agree.

/// Rolling-window defaults used by evaluators when a definition omits one
pub mod windows {
    /// Variety balance looks at the trailing week by default
    pub const VARIETY_DEFAULT_DAYS: u32 = 7;
    /// Schedule adherence window, also the expectation window of the pipeline
    pub const SCHEDULE_ADHERENCE_DEFAULT_DAYS: u32 = 28;
    /// Early-bird sessions are counted over the trailing month
    pub const EARLY_BIRD_DEFAULT_DAYS: u32 = 30;
    /// Sessions after a comeback are counted over this many days
    pub const COMEBACK_DEFAULT_DAYS: u32 = 7;
    /// Fallback for frequency and time-under-tension goals
    pub const GOAL_DEFAULT_DAYS: u32 = 7;
    /// Fallback for the built-in workouts-per-window metric
    pub const WORKOUTS_DEFAULT_DAYS: u32 = 7;
    /// Longest window a goal or schedule may span (ten years)
    pub const MAX_WINDOW_DAYS: u32 = 3650;
}

/// Thresholds for derived daily statistics
pub mod thresholds {
    /// Sessions starting before this local hour count as early
    pub const EARLY_BIRD_HOUR: u32 = 8;
    /// Minimum gap (days between active days) that qualifies as a comeback
    pub const COMEBACK_GAP_DAYS: i64 = 14;
    /// Deadline warnings fire when a deadline is at most this far away
    pub const DEADLINE_WARNING_HOURS: i64 = 72;
    /// Longest accepted deadline warning lead time (one year)
    pub const MAX_DEADLINE_WARNING_HOURS: i64 = 8760;
    /// Denominator of the Epley one-rep-max estimate
    pub const EPLEY_REP_DIVISOR: f64 = 30.0;
}

/// Unit conversion constants
pub mod units {
    /// Kilograms per international avoirdupois pound
    pub const KG_PER_LB: f64 = 0.453_592_37;
    /// Seconds per minute
    pub const SECONDS_PER_MINUTE: f64 = 60.0;
}

/// Identifier conventions for synthetic records
pub mod ids {
    /// Prefix of definition ids synthesized from a user goal
    pub const GOAL_DEFINITION_PREFIX: &str = "goal:";
    /// Suffix appended to a goal definition id to form its instance id
    pub const GOAL_INSTANCE_SUFFIX: &str = ":instance";
    /// Prefix of instance ids for built-in catalog entries
    pub const CATALOG_INSTANCE_PREFIX: &str = "instance:";
}

/// Runtime defaults for the service layer
pub mod service {
    /// Capacity of the achievement event broadcast channel
    pub const EVENT_CHANNEL_SIZE: usize = 64;
    /// Service name used in structured logs
    pub const SERVICE_NAME: &str = "repforge";
    /// Default database location
    pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/repforge.db";
    /// Largest accepted timezone offset magnitude, in minutes
    pub const MAX_UTC_OFFSET_MINUTES: i32 = 18 * 60;
}
