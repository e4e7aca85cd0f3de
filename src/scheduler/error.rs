//! Error taxonomy for scheduling operations.
//!
//! Domain failures (validation, conflicts, lifecycle violations) get their
//! own variants so callers can react to each; infrastructure failures from
//! the repository or the ledger pass through unmasked.

use crate::api::{AppointmentId, AppointmentStatus};
use crate::db::repository::RepositoryError;
use crate::ledger::LedgerError;
use crate::scheduler::conflicts::Conflict;

/// Result type for scheduling operations
pub type SchedulingResult<T> = Result<T, SchedulingError>;

/// Error type for scheduling operations
#[derive(Debug, thiserror::Error)]
pub enum SchedulingError {
    /// Request failed validation before any read or write.
    #[error("validation failed: {message}")]
    Validation { message: String },

    /// The requested slot collides with existing bookings or unavailable
    /// resources. Carries every conflict found, not just the first.
    #[error("{} scheduling conflict(s) detected", .conflicts.len())]
    Conflict { conflicts: Vec<Conflict> },

    /// The status change is not an edge of the lifecycle.
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    /// Could not obtain the resource locks within the configured bound.
    /// Retryable: the blocking operation usually finishes quickly.
    #[error("timed out waiting for resource lock {key}")]
    LockTimeout { key: String },

    /// No appointment with this id.
    #[error("appointment {id} not found")]
    NotFound { id: AppointmentId },

    /// The appointment has financial transactions attached and must not be
    /// deleted.
    #[error("appointment {id} has linked financial transactions and cannot be deleted")]
    DeletionBlocked { id: AppointmentId },

    /// Persistence failure, surfaced as-is.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Ledger failure on an operation that needs the ledger's answer
    /// (the delete guard). Commission emission failures are never surfaced
    /// this way; they become warnings.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl SchedulingError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Whether retrying the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::LockTimeout { .. } => true,
            Self::Repository(err) => err.is_retryable(),
            _ => false,
        }
    }

    /// Map a repository lookup failure for `id`: not-found becomes the
    /// domain error, anything else passes through.
    pub(crate) fn lookup(id: AppointmentId, err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { .. } => Self::NotFound { id },
            other => Self::Repository(other),
        }
    }
}
