// ABOUTME: Database configuration for file-backed and in-memory SQLite stores
// ABOUTME: Parses DATABASE_URL into a typed location
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::service::DEFAULT_DATABASE_URL;

/// Type-safe database location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// `SQLite` database file
    SQLite {
        /// Path to the database file
        path: PathBuf,
    },
    /// In-memory `SQLite` (tests and dry runs)
    Memory,
}

impl DatabaseUrl {
    /// Parse a `sqlite:` URL or bare file path
    #[must_use]
    pub fn parse_url(s: &str) -> Self {
        let path_str = s.strip_prefix("sqlite:").unwrap_or(s);
        let path_str = path_str.strip_prefix("//").unwrap_or(path_str);
        if path_str == ":memory:" || path_str.is_empty() {
            Self::Memory
        } else {
            Self::SQLite {
                path: PathBuf::from(path_str),
            }
        }
    }

    /// Convert to an `SQLx` connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".into(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::parse_url(DEFAULT_DATABASE_URL)
    }
}

impl Display for DatabaseUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Database configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database location
    pub url: DatabaseUrl,
}

impl DatabaseConfig {
    /// Load from `DATABASE_URL`, falling back to the default file location
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            url: env::var("DATABASE_URL")
                .map(|url| DatabaseUrl::parse_url(&url))
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_memory_and_file_urls() {
        assert!(DatabaseUrl::parse_url("sqlite::memory:").is_memory());
        assert_eq!(
            DatabaseUrl::parse_url("sqlite:./data/app.db"),
            DatabaseUrl::SQLite {
                path: PathBuf::from("./data/app.db")
            }
        );
        assert_eq!(
            DatabaseUrl::parse_url("/tmp/log.db").to_connection_string(),
            "sqlite:/tmp/log.db"
        );
    }
}
