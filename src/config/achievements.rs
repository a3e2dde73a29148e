// ABOUTME: Achievement engine tunables loaded from REPFORGE_* environment variables
// ABOUTME: Timezone offset, early-bird hour, deadline warning window and channel sizing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::env;
use std::fmt::Display;
use std::str::FromStr;

use chrono::{Duration, FixedOffset};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::achievements::AggregationOptions;
use crate::constants::service::{EVENT_CHANNEL_SIZE, MAX_UTC_OFFSET_MINUTES};
use crate::constants::thresholds::{
    COMEBACK_GAP_DAYS, DEADLINE_WARNING_HOURS, EARLY_BIRD_HOUR, MAX_DEADLINE_WARNING_HOURS,
};
use crate::constants::windows::{MAX_WINDOW_DAYS, SCHEDULE_ADHERENCE_DEFAULT_DAYS};
use crate::errors::{AppError, AppResult};

/// Tunables of the achievement service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementConfig {
    /// User timezone as minutes east of UTC
    pub utc_offset_minutes: i32,
    /// Sessions starting before this local hour are early
    pub early_bird_hour: u32,
    /// How far ahead a goal deadline starts raising warnings
    pub deadline_warning_hours: i64,
    /// Days of schedule expectations generated per cycle
    pub schedule_window_days: u32,
    /// Minimum days between active days that counts as a comeback
    pub comeback_gap_days: i64,
    /// Capacity of the live event channel
    pub event_channel_size: usize,
}

impl Default for AchievementConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            early_bird_hour: EARLY_BIRD_HOUR,
            deadline_warning_hours: DEADLINE_WARNING_HOURS,
            schedule_window_days: SCHEDULE_ADHERENCE_DEFAULT_DAYS,
            comeback_gap_days: COMEBACK_GAP_DAYS,
            event_channel_size: EVENT_CHANNEL_SIZE,
        }
    }
}

impl AchievementConfig {
    /// Load from the environment
    ///
    /// Unset or unparseable variables fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns a config error if a parsed value is out of range
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();
        let config = Self {
            utc_offset_minutes: env_parse(
                "REPFORGE_UTC_OFFSET_MINUTES",
                defaults.utc_offset_minutes,
            ),
            early_bird_hour: env_parse("REPFORGE_EARLY_BIRD_HOUR", defaults.early_bird_hour),
            deadline_warning_hours: env_parse(
                "REPFORGE_DEADLINE_WARNING_HOURS",
                defaults.deadline_warning_hours,
            ),
            schedule_window_days: env_parse(
                "REPFORGE_SCHEDULE_WINDOW_DAYS",
                defaults.schedule_window_days,
            ),
            comeback_gap_days: env_parse("REPFORGE_COMEBACK_GAP_DAYS", defaults.comeback_gap_days),
            event_channel_size: env_parse(
                "REPFORGE_EVENT_CHANNEL_SIZE",
                defaults.event_channel_size,
            ),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check every value is in range
    ///
    /// # Errors
    ///
    /// Returns a config error naming the first invalid value
    pub fn validate(&self) -> AppResult<()> {
        if self.utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
            return Err(AppError::config(format!(
                "REPFORGE_UTC_OFFSET_MINUTES must be within ±{MAX_UTC_OFFSET_MINUTES}, got {}",
                self.utc_offset_minutes
            )));
        }
        if self.early_bird_hour > 23 {
            return Err(AppError::config(format!(
                "REPFORGE_EARLY_BIRD_HOUR must be 0-23, got {}",
                self.early_bird_hour
            )));
        }
        if !(1..=MAX_DEADLINE_WARNING_HOURS).contains(&self.deadline_warning_hours) {
            return Err(AppError::config(format!(
                "REPFORGE_DEADLINE_WARNING_HOURS must be 1-{MAX_DEADLINE_WARNING_HOURS}, got {}",
                self.deadline_warning_hours
            )));
        }
        if !(1..=MAX_WINDOW_DAYS).contains(&self.schedule_window_days) {
            return Err(AppError::config(format!(
                "REPFORGE_SCHEDULE_WINDOW_DAYS must be 1-{MAX_WINDOW_DAYS}, got {}",
                self.schedule_window_days
            )));
        }
        if !(1..=i64::from(MAX_WINDOW_DAYS)).contains(&self.comeback_gap_days) {
            return Err(AppError::config(format!(
                "REPFORGE_COMEBACK_GAP_DAYS must be 1-{MAX_WINDOW_DAYS}, got {}",
                self.comeback_gap_days
            )));
        }
        if self.event_channel_size == 0 {
            return Err(AppError::config("REPFORGE_EVENT_CHANNEL_SIZE must be positive"));
        }
        Ok(())
    }

    /// User timezone
    ///
    /// # Errors
    ///
    /// Returns a config error if the offset is out of range
    pub fn timezone(&self) -> AppResult<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| {
            AppError::config(format!(
                "Invalid UTC offset: {} minutes",
                self.utc_offset_minutes
            ))
        })
    }

    /// Pipeline options derived from this configuration
    ///
    /// # Errors
    ///
    /// Returns a config error if the offset is out of range
    pub fn aggregation_options(&self) -> AppResult<AggregationOptions> {
        Ok(AggregationOptions {
            timezone: self.timezone()?,
            early_bird_hour: self.early_bird_hour,
            schedule_window_days: self.schedule_window_days,
        })
    }

    /// Deadline warning window, clamped to the accepted range
    #[must_use]
    pub fn deadline_warning(&self) -> Duration {
        Duration::hours(
            self.deadline_warning_hours
                .clamp(0, MAX_DEADLINE_WARNING_HOURS),
        )
    }
}

/// Read `key`, falling back to `default` when unset or unparseable
fn env_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy + Display,
    T::Err: Display,
{
    let Ok(value) = env::var(key) else {
        return default;
    };
    value.trim().parse().unwrap_or_else(|e| {
        warn!(key, value = %value, error = %e, default = %default, "Invalid value, using default");
        default
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AchievementConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.deadline_warning(), Duration::hours(72));
        assert_eq!(config.timezone().unwrap().local_minus_utc(), 0);
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        let mut config = AchievementConfig {
            utc_offset_minutes: 19 * 60,
            ..AchievementConfig::default()
        };
        assert!(config.validate().is_err());

        config.utc_offset_minutes = -300;
        assert!(config.validate().is_ok());
        assert_eq!(config.timezone().unwrap().local_minus_utc(), -300 * 60);

        config.early_bird_hour = 24;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deadline_warning_never_overflows() {
        let config = AchievementConfig {
            deadline_warning_hours: i64::MAX,
            ..AchievementConfig::default()
        };
        assert!(config.validate().is_err());
        assert_eq!(
            config.deadline_warning(),
            Duration::hours(MAX_DEADLINE_WARNING_HOURS)
        );
    }
}
