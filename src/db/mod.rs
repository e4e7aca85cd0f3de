//! Storage backends for appointments.
//!
//! Everything above this module talks to storage through the traits in
//! [`repository`]; which backend sits behind them is decided at runtime by
//! the [`factory`]. Two implementations ship today:
//!
//! - [`repositories::postgres`]: Diesel on an r2d2 pool, behind the
//!   `postgres-repo` feature
//! - [`repositories::local`]: an in-memory map for tests and single-desk
//!   setups, behind `local-repo`
//!
//! [`repo_config`] reads the `[repository]` table of a TOML file and feeds
//! the factory.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use inkbook::db::{PostgresConfig, RepositoryFactory, RepositoryType};
//! use inkbook::ledger::RecordingLedger;
//! use inkbook::scheduler::SchedulingService;
//!
//! async fn wire_up() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PostgresConfig::from_env()?;
//!     let repo = RepositoryFactory::create(RepositoryType::Postgres, Some(&config)).await?;
//!     let service = SchedulingService::new(repo, Arc::new(RecordingLedger::new()));
//!     Ok(())
//! }
//! ```

#[cfg(not(any(feature = "postgres-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;

// Postgres config is colocated with the repository implementation. The
// stub keeps `RepositoryFactory::create`'s signature stable when the
// backend is compiled out; it cannot be constructed.
#[cfg(feature = "postgres-repo")]
pub use repositories::postgres::{PoolStats, PostgresConfig};
#[cfg(not(feature = "postgres-repo"))]
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    _private: (),
}

pub use factory::{RepositoryBuilder, RepositoryFactory, RepositoryType};
pub use repo_config::RepositoryConfig;
pub use repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::PostgresRepository;
pub use repository::{
    AppointmentRepository, DirectoryRepository, ErrorContext, FullRepository, RepositoryError,
    RepositoryResult,
};
