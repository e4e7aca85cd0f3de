//! `repository.toml` parsing.
//!
//! A config file picks the backend and, for Postgres, its pool settings:
//!
//! ```toml
//! [repository]
//! type = "postgres"
//!
//! [postgres]
//! database_url = "postgres://studio:****@db:5432/inkbook"
//! max_connections = 20
//! ```
//!
//! Everything under `[postgres]` except the URL has a sensible default, and
//! the whole table may be omitted when `type = "local"`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

use super::factory::RepositoryType;
use super::repository::RepositoryError;
use crate::db::PostgresConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub repository: RepositorySettings,
    #[serde(default)]
    pub postgres: PostgresSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    /// Backend name as written in the file; parsed lazily so an unknown
    /// value surfaces as an error instead of a silent fallback.
    #[serde(rename = "type")]
    pub repo_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostgresSettings {
    #[serde(default)]
    pub database_url: String,
    #[serde(default = "defaults::max_connections")]
    pub max_connections: u32,
    #[serde(default = "defaults::min_connections")]
    pub min_connections: u32,
    #[serde(default = "defaults::connect_timeout")]
    pub connect_timeout: u64,
    #[serde(default = "defaults::idle_timeout")]
    pub idle_timeout: u64,
    #[serde(default = "defaults::max_retries")]
    pub max_retries: u32,
    #[serde(default = "defaults::retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for PostgresSettings {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_connections: defaults::max_connections(),
            min_connections: defaults::min_connections(),
            connect_timeout: defaults::connect_timeout(),
            idle_timeout: defaults::idle_timeout(),
            max_retries: defaults::max_retries(),
            retry_delay_ms: defaults::retry_delay_ms(),
        }
    }
}

mod defaults {
    pub fn max_connections() -> u32 {
        10
    }
    pub fn min_connections() -> u32 {
        1
    }
    pub fn connect_timeout() -> u64 {
        30
    }
    pub fn idle_timeout() -> u64 {
        600
    }
    pub fn max_retries() -> u32 {
        3
    }
    pub fn retry_delay_ms() -> u64 {
        100
    }
}

impl RepositoryConfig {
    /// Read and parse a config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read config file: {}", e))
        })?;

        toml::from_str(&content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })
    }

    /// The backend named by the file.
    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        RepositoryType::from_str(&self.repository.repo_type)
    }

    /// Pool settings for a Postgres selection, `None` for any other backend.
    ///
    /// Declaring `type = "postgres"` without a database URL is rejected here
    /// rather than surfacing later as a connection failure.
    #[cfg(feature = "postgres-repo")]
    pub fn to_postgres_config(&self) -> Result<Option<PostgresConfig>, RepositoryError> {
        let repo_type = self.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;

        if repo_type != RepositoryType::Postgres {
            return Ok(None);
        }

        if self.postgres.database_url.is_empty() {
            return Err(RepositoryError::configuration(
                "postgres.database_url is required when type = \"postgres\"",
            ));
        }

        Ok(Some(PostgresConfig {
            database_url: self.postgres.database_url.clone(),
            max_pool_size: self.postgres.max_connections,
            min_pool_size: self.postgres.min_connections,
            connection_timeout_sec: self.postgres.connect_timeout,
            idle_timeout_sec: self.postgres.idle_timeout,
            max_retries: self.postgres.max_retries,
            retry_delay_ms: self.postgres.retry_delay_ms,
        }))
    }

    /// Feature-off variant: a Postgres selection is always an error.
    #[cfg(not(feature = "postgres-repo"))]
    pub fn to_postgres_config(&self) -> Result<Option<PostgresConfig>, RepositoryError> {
        let repo_type = self.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;

        if repo_type == RepositoryType::Postgres {
            return Err(RepositoryError::configuration(
                "Postgres repository feature not enabled",
            ));
        }

        Ok(None)
    }
}
