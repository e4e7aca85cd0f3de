//! Concrete storage backends.
//!
//! [`postgres`] persists through Diesel; [`local`] keeps everything in a
//! process-local map. Both satisfy the traits in [`crate::db::repository`].

pub mod local;
#[cfg(feature = "postgres-repo")]
pub mod postgres;

pub use local::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use postgres::{PoolStats, PostgresConfig, PostgresRepository};
