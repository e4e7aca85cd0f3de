//! Double-booking detection across the artist and bed axes.
//!
//! The detector is a pure read-side scan: it fetches the day's appointments
//! through the repository, drops rows whose status no longer holds
//! resources (cancelled, no_show) and overlap-tests the remainder per
//! resource axis. Resource-level availability is checked on top, so an
//! inactive artist conflicts even with an empty calendar. Every conflict
//! found is reported; nothing short-circuits.

use serde::{Deserialize, Serialize};

use crate::api::{AppointmentId, ArtistId, BedId, TimeSlot};
use crate::db::repository::{FullRepository, RepositoryResult};

/// Which axis a conflict occurred on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictKind {
    Artist,
    Bed,
    /// The requested interval itself is unusable (reported by advisory
    /// checks for malformed slots).
    Time,
}

/// A single detected conflict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    pub kind: ConflictKind,
    pub message: String,
    /// The appointment already holding the slot; `None` for resource-level
    /// unavailability and malformed-slot reports.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicting_appointment_id: Option<AppointmentId>,
}

/// A prospective booking to test against the calendar.
#[derive(Debug, Clone)]
pub struct ConflictQuery {
    pub artist_id: ArtistId,
    pub bed_id: Option<BedId>,
    pub slot: TimeSlot,
    /// Skip this appointment in the scan, so an update never conflicts
    /// with its own current booking.
    pub exclude_appointment_id: Option<AppointmentId>,
}

/// Find every conflict for a prospective booking.
///
/// Returns resource-availability conflicts first, then one conflict per
/// overlapping appointment per axis. Repository failures propagate.
pub async fn find_conflicts<R: FullRepository + ?Sized>(
    repo: &R,
    query: &ConflictQuery,
) -> RepositoryResult<Vec<Conflict>> {
    let mut conflicts = Vec::new();
    let date = query.slot.date;

    if !repo.artist_is_available(query.artist_id, date).await? {
        conflicts.push(Conflict {
            kind: ConflictKind::Artist,
            message: format!("artist {} is not available on {}", query.artist_id, date),
            conflicting_appointment_id: None,
        });
    }
    if let Some(bed_id) = query.bed_id {
        if !repo.bed_is_available(bed_id, date).await? {
            conflicts.push(Conflict {
                kind: ConflictKind::Bed,
                message: format!("bed {} is not available on {}", bed_id, date),
                conflicting_appointment_id: None,
            });
        }
    }

    for existing in repo.appointments_on(date).await? {
        if query.exclude_appointment_id == Some(existing.id) {
            continue;
        }
        if !existing.status.holds_resources() {
            continue;
        }
        let other = existing.slot();
        if !query.slot.overlaps(&other) {
            continue;
        }

        if existing.artist_id == query.artist_id {
            conflicts.push(Conflict {
                kind: ConflictKind::Artist,
                message: format!(
                    "artist {} is already booked {}-{} (appointment {})",
                    query.artist_id,
                    other.start_time.format("%H:%M"),
                    other.end_time().format("%H:%M"),
                    existing.id
                ),
                conflicting_appointment_id: Some(existing.id),
            });
        }
        if let (Some(requested_bed), Some(existing_bed)) = (query.bed_id, existing.bed_id) {
            if requested_bed == existing_bed {
                conflicts.push(Conflict {
                    kind: ConflictKind::Bed,
                    message: format!(
                        "bed {} is already booked {}-{} (appointment {})",
                        requested_bed,
                        other.start_time.format("%H:%M"),
                        other.end_time().format("%H:%M"),
                        existing.id
                    ),
                    conflicting_appointment_id: Some(existing.id),
                });
            }
        }
    }

    Ok(conflicts)
}
