//! Backend selection and wiring.
//!
//! Everything above the persistence layer holds an `Arc<dyn FullRepository>`
//! and never learns what sits behind it. This module is where that choice is
//! made: explicitly, from the environment, or from a `repository.toml` file.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use super::repo_config::RepositoryConfig;
use super::repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
use super::repositories::PostgresRepository;
use super::repository::{FullRepository, RepositoryError, RepositoryResult};
use super::PostgresConfig;

/// Which storage backend to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// Diesel-backed Postgres store.
    Postgres,
    /// In-memory store; what tests and demo runs use.
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "pg" => Ok(Self::Postgres),
            "local" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// Backend selection from the environment.
    ///
    /// An explicit `REPOSITORY_TYPE` wins, with unparseable values falling
    /// back to `Local`. Absent that, a `DATABASE_URL` or `PG_DATABASE_URL`
    /// in the environment implies Postgres.
    pub fn from_env() -> Self {
        if let Ok(val) = std::env::var("REPOSITORY_TYPE") {
            return val.parse().unwrap_or(Self::Local);
        }

        if std::env::var("DATABASE_URL").is_ok() || std::env::var("PG_DATABASE_URL").is_ok() {
            Self::Postgres
        } else {
            Self::Local
        }
    }
}

/// Constructors for ready-to-use repository handles.
///
/// ```ignore
/// use inkbook::db::RepositoryFactory;
///
/// // Selection driven by REPOSITORY_TYPE / DATABASE_URL:
/// let repository = RepositoryFactory::from_env().await?;
///
/// // Or pinned for a test:
/// let repository = RepositoryFactory::create_local();
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Build a backend of the given type.
    ///
    /// Postgres needs its settings; `Local` ignores the config argument.
    pub async fn create(
        repo_type: RepositoryType,
        postgres_config: Option<&PostgresConfig>,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        match repo_type {
            RepositoryType::Local => Ok(Self::create_local()),
            RepositoryType::Postgres => {
                #[cfg(not(feature = "postgres-repo"))]
                {
                    let _ = postgres_config;
                    Err(RepositoryError::configuration(
                        "Postgres repository feature not enabled",
                    ))
                }
                #[cfg(feature = "postgres-repo")]
                {
                    let config = postgres_config.ok_or_else(|| {
                        RepositoryError::configuration(
                            "Postgres repository requires PostgresConfig",
                        )
                    })?;
                    let pg = Self::create_postgres(config).await?;
                    Ok(pg as Arc<dyn FullRepository>)
                }
            }
        }
    }

    /// Connect to Postgres, run pending migrations, hand back the store.
    #[cfg(feature = "postgres-repo")]
    pub async fn create_postgres(
        config: &PostgresConfig,
    ) -> RepositoryResult<Arc<PostgresRepository>> {
        let repo = PostgresRepository::new(config.clone())?;
        Ok(Arc::new(repo))
    }

    /// Fresh in-memory store.
    pub fn create_local() -> Arc<dyn FullRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Build whatever backend the environment asks for.
    ///
    /// When the selection lands on Postgres, its settings are read from the
    /// environment as well; an incomplete environment is a configuration
    /// error rather than a silent fallback.
    pub async fn from_env() -> RepositoryResult<Arc<dyn FullRepository>> {
        let repo_type = RepositoryType::from_env();
        let settings = Self::postgres_settings_from_env(repo_type)?;
        Self::create(repo_type, settings.as_ref()).await
    }

    /// Build the backend described by a `repository.toml` file.
    pub async fn from_config_file<P: AsRef<Path>>(
        config_path: P,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        let file = RepositoryConfig::from_file(config_path)?;
        let repo_type = file
            .repository_type()
            .map_err(|e| RepositoryError::configuration(format!("Invalid repository type: {}", e)))?;
        let settings = file.to_postgres_config()?;
        Self::create(repo_type, settings.as_ref()).await
    }

    #[cfg(feature = "postgres-repo")]
    fn postgres_settings_from_env(
        repo_type: RepositoryType,
    ) -> RepositoryResult<Option<PostgresConfig>> {
        if repo_type != RepositoryType::Postgres {
            return Ok(None);
        }
        PostgresConfig::from_env()
            .map(Some)
            .map_err(RepositoryError::configuration)
    }

    // Without the feature there are no settings to read; `create` reports
    // the missing feature itself.
    #[cfg(not(feature = "postgres-repo"))]
    fn postgres_settings_from_env(
        _repo_type: RepositoryType,
    ) -> RepositoryResult<Option<PostgresConfig>> {
        Ok(None)
    }
}

/// Fluent variant of [`RepositoryFactory`] for call sites that assemble
/// their choices step by step.
pub struct RepositoryBuilder {
    repo_type: RepositoryType,
    #[cfg(feature = "postgres-repo")]
    postgres_config: Option<PostgresConfig>,
}

impl RepositoryBuilder {
    /// Start from the environment's backend selection.
    pub fn new() -> Self {
        Self {
            repo_type: RepositoryType::from_env(),
            #[cfg(feature = "postgres-repo")]
            postgres_config: None,
        }
    }

    /// Override the backend type.
    pub fn repository_type(mut self, repo_type: RepositoryType) -> Self {
        self.repo_type = repo_type;
        self
    }

    /// Supply Postgres settings for a [`RepositoryType::Postgres`] build.
    #[cfg(feature = "postgres-repo")]
    pub fn postgres_config(mut self, config: PostgresConfig) -> Self {
        self.postgres_config = Some(config);
        self
    }

    pub async fn build(self) -> RepositoryResult<Arc<dyn FullRepository>> {
        #[cfg(feature = "postgres-repo")]
        let settings = self.postgres_config.as_ref();
        #[cfg(not(feature = "postgres-repo"))]
        let settings = None;

        RepositoryFactory::create(self.repo_type, settings).await
    }
}

impl Default for RepositoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_type_names_the_offender() {
        let err = RepositoryType::from_str("redis").unwrap_err();
        assert!(err.contains("redis"));
    }

    #[tokio::test]
    async fn test_local_backend_is_usable_immediately() {
        let repo = RepositoryFactory::create_local();
        assert!(repo.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_builder_override_beats_environment() {
        let repo = RepositoryBuilder::default()
            .repository_type(RepositoryType::Local)
            .build()
            .await
            .unwrap();
        assert!(repo.health_check().await.unwrap());
    }
}
