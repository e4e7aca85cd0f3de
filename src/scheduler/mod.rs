//! Appointment scheduling core.
//!
//! This module owns everything between an incoming booking request and a
//! persisted appointment: interval conflict detection across the artist
//! and bed axes, the status lifecycle, per-resource locking, and the
//! [`SchedulingService`] that ties them together with the repository and
//! the commission ledger.

pub mod conflicts;
pub mod error;
pub mod lifecycle;
pub mod locks;
pub mod service;

pub use conflicts::{find_conflicts, Conflict, ConflictKind, ConflictQuery};
pub use error::{SchedulingError, SchedulingResult};
pub use locks::{LockKey, ResourceLocks};
pub use service::{SchedulingService, StatusChangeOutcome};
