// ABOUTME: Top-level runtime configuration assembled from environment variables
// ABOUTME: Combines database location and achievement engine tunables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use tracing::info;

pub use super::achievements::AchievementConfig;
pub use super::database::DatabaseConfig;
use crate::errors::AppResult;

/// Runtime configuration of the service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Database location
    pub database: DatabaseConfig,
    /// Achievement engine tunables
    pub achievements: AchievementConfig,
}

impl ServerConfig {
    /// Load configuration from the environment
    ///
    /// # Errors
    ///
    /// Returns a config error if any variable is invalid
    pub fn from_env() -> AppResult<Self> {
        let config = Self {
            database: DatabaseConfig::from_env(),
            achievements: AchievementConfig::from_env()?,
        };
        info!(
            database = %config.database.url,
            utc_offset_minutes = config.achievements.utc_offset_minutes,
            deadline_warning_hours = config.achievements.deadline_warning_hours,
            "Configuration loaded"
        );
        Ok(config)
    }
}
