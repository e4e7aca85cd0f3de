//! Resource directory trait for artist and bed availability.
//!
//! The directory answers one question per resource axis: can this artist or
//! bed take bookings on a given date? The studio's full artist and bed
//! records live outside the scheduling core; the directory only tracks the
//! availability flag the conflict detector consults.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::error::RepositoryResult;
use crate::api::{ArtistId, BedId};

/// Repository trait for resource availability lookups.
///
/// Resources the directory has never heard of are reported as available:
/// the directory is authoritative only for resources it knows, so an empty
/// directory never blocks scheduling.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    /// Whether an artist can take bookings on `date`.
    ///
    /// # Arguments
    /// * `artist_id` - The artist to check
    /// * `date` - The booking date (reserved for per-date calendars;
    ///   current backends key availability off the active flag alone)
    ///
    /// # Returns
    /// * `Ok(true)` - The artist is bookable or unknown to the directory
    /// * `Ok(false)` - The artist is marked inactive
    /// * `Err(RepositoryError)` - If the operation fails
    async fn artist_is_available(
        &self,
        artist_id: ArtistId,
        date: NaiveDate,
    ) -> RepositoryResult<bool>;

    /// Whether a bed can take bookings on `date`.
    ///
    /// # Arguments
    /// * `bed_id` - The bed to check
    /// * `date` - The booking date (see [`DirectoryRepository::artist_is_available`])
    ///
    /// # Returns
    /// * `Ok(true)` - The bed is usable or unknown to the directory
    /// * `Ok(false)` - The bed is marked out of service
    /// * `Err(RepositoryError)` - If the operation fails
    async fn bed_is_available(&self, bed_id: BedId, date: NaiveDate) -> RepositoryResult<bool>;
}
