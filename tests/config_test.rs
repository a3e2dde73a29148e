// ABOUTME: Integration tests for environment-driven configuration and logging setup
// ABOUTME: Mutates process environment variables, so every test runs serially
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::env;

use repforge::config::environment::{AchievementConfig, DatabaseConfig};
use repforge::config::{DatabaseUrl, ServerConfig};
use repforge::errors::ErrorCode;
use repforge::logging::{LogFormat, LoggingConfig};
use serial_test::serial;

const ACHIEVEMENT_VARS: [&str; 6] = [
    "REPFORGE_UTC_OFFSET_MINUTES",
    "REPFORGE_EARLY_BIRD_HOUR",
    "REPFORGE_DEADLINE_WARNING_HOURS",
    "REPFORGE_SCHEDULE_WINDOW_DAYS",
    "REPFORGE_COMEBACK_GAP_DAYS",
    "REPFORGE_EVENT_CHANNEL_SIZE",
];

fn clear_env() {
    for key in ACHIEVEMENT_VARS {
        env::remove_var(key);
    }
    env::remove_var("DATABASE_URL");
}

#[test]
#[serial]
fn test_defaults_when_unset() {
    clear_env();
    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.achievements, AchievementConfig::default());
    assert_eq!(config.achievements.deadline_warning_hours, 72);
    assert_eq!(config.achievements.early_bird_hour, 8);
    assert_eq!(config.achievements.schedule_window_days, 28);
    assert_eq!(config.achievements.comeback_gap_days, 14);
    assert_eq!(config.achievements.event_channel_size, 64);
    assert_eq!(
        config.database.url,
        DatabaseUrl::SQLite {
            path: "./data/repforge.db".into()
        }
    );
}

#[test]
#[serial]
fn test_overrides_are_applied() {
    clear_env();
    env::set_var("REPFORGE_UTC_OFFSET_MINUTES", "-300");
    env::set_var("REPFORGE_DEADLINE_WARNING_HOURS", "24");
    env::set_var("DATABASE_URL", "sqlite::memory:");

    let achievements = AchievementConfig::from_env().unwrap();
    assert_eq!(achievements.utc_offset_minutes, -300);
    assert_eq!(achievements.deadline_warning_hours, 24);
    assert_eq!(achievements.aggregation_options().unwrap().timezone.local_minus_utc(), -300 * 60);
    assert!(DatabaseConfig::from_env().url.is_memory());

    clear_env();
}

#[test]
#[serial]
fn test_unparseable_values_fall_back_to_defaults() {
    clear_env();
    env::set_var("REPFORGE_EARLY_BIRD_HOUR", "seven");
    env::set_var("REPFORGE_EVENT_CHANNEL_SIZE", "-1");

    let config = AchievementConfig::from_env().unwrap();
    assert_eq!(config.early_bird_hour, 8);
    assert_eq!(config.event_channel_size, 64);

    clear_env();
}

#[test]
#[serial]
fn test_out_of_range_offset_is_rejected() {
    clear_env();
    env::set_var("REPFORGE_UTC_OFFSET_MINUTES", "1200");

    let error = AchievementConfig::from_env().unwrap_err();
    assert_eq!(error.code, ErrorCode::ConfigInvalid);

    clear_env();
}

#[test]
#[serial]
fn test_oversized_windows_are_rejected() {
    clear_env();
    env::set_var("REPFORGE_DEADLINE_WARNING_HOURS", i64::MAX.to_string());
    let error = AchievementConfig::from_env().unwrap_err();
    assert_eq!(error.code, ErrorCode::ConfigInvalid);

    clear_env();
    env::set_var("REPFORGE_SCHEDULE_WINDOW_DAYS", u32::MAX.to_string());
    let error = AchievementConfig::from_env().unwrap_err();
    assert_eq!(error.code, ErrorCode::ConfigInvalid);

    clear_env();
    env::set_var("REPFORGE_DEADLINE_WARNING_HOURS", "8760");
    env::set_var("REPFORGE_SCHEDULE_WINDOW_DAYS", "3650");
    let config = AchievementConfig::from_env().unwrap();
    assert_eq!(config.deadline_warning().num_hours(), 8760);
    assert_eq!(config.schedule_window_days, 3650);

    clear_env();
}

#[test]
#[serial]
fn test_logging_config_from_env() {
    env::set_var("LOG_FORMAT", "json");
    env::set_var("ENVIRONMENT", "production");
    env::set_var("RUST_LOG", "warn");

    let config = LoggingConfig::from_env();
    assert_eq!(config.format, LogFormat::Json);
    assert_eq!(config.environment, "production");
    assert_eq!(config.level, "warn");

    env::remove_var("LOG_FORMAT");
    env::remove_var("ENVIRONMENT");
    env::remove_var("RUST_LOG");
}
