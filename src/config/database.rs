// ABOUTME: Database configuration types for SQLite connections
// ABOUTME: Parses DATABASE_URL into a typed location and holds migration settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::defaults;
use crate::errors::{AppError, AppResult};

/// Type-safe database location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// `SQLite` database with file path
    SQLite {
        /// Path to `SQLite` database file
        path: PathBuf,
    },
    /// In-memory `SQLite` (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string with validation
    ///
    /// Accepts `sqlite:<path>`, `sqlite::memory:` and bare file paths.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty path or a URL with another scheme.
    pub fn parse_url(s: &str) -> AppResult<Self> {
        let trimmed = s.trim();
        if let Some(path_str) = trimmed.strip_prefix("sqlite:") {
            let path_str = path_str.trim_start_matches("//");
            return match path_str {
                ":memory:" => Ok(Self::Memory),
                "" => Err(AppError::config("DATABASE_URL has an empty SQLite path")),
                path => Ok(Self::SQLite {
                    path: PathBuf::from(path),
                }),
            };
        }

        if trimmed.contains("://") {
            return Err(AppError::config(format!(
                "Unsupported database URL scheme: {trimmed}"
            )));
        }
        if trimmed.is_empty() {
            return Err(AppError::config("DATABASE_URL is empty"));
        }

        Ok(Self::SQLite {
            path: PathBuf::from(trimmed),
        })
    }

    /// Convert to connection string
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
        Self::SQLite {
            path: PathBuf::from(
                defaults::DATABASE_URL
                    .strip_prefix("sqlite:")
                    .unwrap_or(defaults::DATABASE_URL),
            ),
        }
    }
}

impl Display for DatabaseUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Database connection and management configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database location
    pub url: DatabaseUrl,
    /// Create tables on startup
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DatabaseUrl::default(),
            auto_migrate: true,
        }
    }
}

impl DatabaseConfig {
    /// Load database configuration from environment
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` or `DATABASE_AUTO_MIGRATE` is invalid
    pub fn from_env() -> AppResult<Self> {
        let url = match env::var("DATABASE_URL") {
            Ok(raw) => DatabaseUrl::parse_url(&raw)?,
            Err(_) => DatabaseUrl::default(),
        };

        Ok(Self {
            url,
            auto_migrate: env_var_or("DATABASE_AUTO_MIGRATE", "true")
                .parse()
                .map_err(|e| {
                    AppError::config(format!("Invalid DATABASE_AUTO_MIGRATE value: {e}"))
                })?,
        })
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_memory_url() {
        assert_eq!(
            DatabaseUrl::parse_url("sqlite::memory:").unwrap(),
            DatabaseUrl::Memory
        );
    }

    #[test]
    fn test_parse_file_urls() {
        let url = DatabaseUrl::parse_url("sqlite:./data/test.db").unwrap();
        assert_eq!(url.to_connection_string(), "sqlite:./data/test.db");
        assert!(!url.is_memory());

        let bare = DatabaseUrl::parse_url("/var/lib/counselhub.db").unwrap();
        assert_eq!(bare.to_connection_string(), "sqlite:/var/lib/counselhub.db");
    }

    #[test]
    fn test_rejects_other_schemes() {
        let err = DatabaseUrl::parse_url("postgres://localhost/counselhub").unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::ConfigError);
        assert!(DatabaseUrl::parse_url("sqlite:").is_err());
    }

    #[test]
    fn test_default_points_at_data_dir() {
        assert_eq!(
            DatabaseUrl::default().to_connection_string(),
            defaults::DATABASE_URL
        );
    }
}
