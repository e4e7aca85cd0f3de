//! Repository trait definitions for database operations.
//!
//! This module provides focused repository traits that abstract persistence.
//! Splitting responsibilities across traits keeps implementations testable:
//!
//! - [`error`]: Error types for repository operations
//! - [`appointments`]: CRUD and date/artist queries for appointments
//! - [`directory`]: Artist and bed availability lookups
//!
//! # Convenience Trait Bound
//!
//! Functions that need the whole persistence surface take the
//! [`FullRepository`] bound:
//!
//! ```ignore
//! async fn my_service<R: FullRepository>(repo: &R) -> RepositoryResult<()> {
//!     let existing = repo.appointments_on(date).await?;
//!     let active = repo.artist_is_available(artist_id, date).await?;
//!     Ok(())
//! }
//! ```

pub mod appointments;
pub mod directory;
pub mod error;

// Re-export error types
pub use error::{ErrorContext, RepositoryError, RepositoryResult};

// Re-export all traits
pub use appointments::AppointmentRepository;
pub use directory::DirectoryRepository;

/// Composite trait bound for a complete repository implementation.
///
/// Automatically implemented for any type that implements both repository
/// traits; use it as the bound wherever all persistence operations are
/// needed (the scheduler, the HTTP state).
pub trait FullRepository: AppointmentRepository + DirectoryRepository + std::fmt::Debug {}

// Blanket implementation: both traits together make a full repository
impl<T> FullRepository for T where T: AppointmentRepository + DirectoryRepository + std::fmt::Debug {}
