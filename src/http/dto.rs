//! Data Transfer Objects for the HTTP API.
//!
//! Request and response shapes for the REST surface. Domain types that
//! already derive Serialize/Deserialize (appointments, conflicts, the
//! calendar view projections) are re-exported rather than mirrored.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use crate::api::{AppointmentId, AppointmentStatus, ArtistId, BedId, ClientId, ServiceType};
use crate::models::{Appointment, AppointmentPatch, TimeSlot};
use crate::scheduler::ConflictQuery;

// Re-export existing DTOs that are already serializable
pub use crate::models::NewAppointment;
pub use crate::routes::day_view::{DayViewData, HourBucket};
pub use crate::routes::week_view::{DayAggregates, WeekDayBucket, WeekViewData};
pub use crate::scheduler::{Conflict, ConflictKind, StatusChangeOutcome};

/// Request body for partially updating an appointment.
///
/// Absent fields are left untouched. `bed_id` assigns a new bed;
/// `clear_bed` removes the current assignment and wins when both are
/// given. A `status` carried here goes through the same lifecycle
/// validation as the status endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAppointmentRequest {
    #[serde(default)]
    pub client_id: Option<ClientId>,
    #[serde(default)]
    pub artist_id: Option<ArtistId>,
    /// New bed assignment
    #[serde(default)]
    pub bed_id: Option<BedId>,
    /// Drop the bed assignment entirely
    #[serde(default)]
    pub clear_bed: bool,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    #[serde(default)]
    pub duration_minutes: Option<i64>,
    #[serde(default)]
    pub service_type: Option<ServiceType>,
    #[serde(default)]
    pub status: Option<AppointmentStatus>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl UpdateAppointmentRequest {
    /// Convert into the scheduler's patch type.
    ///
    /// The flat `bed_id`/`clear_bed` pair becomes the patch's two-level
    /// option: `clear_bed` maps to an explicit `None` assignment, an
    /// absent pair leaves the bed untouched.
    pub fn into_patch(self) -> AppointmentPatch {
        let bed_id = if self.clear_bed {
            Some(None)
        } else {
            self.bed_id.map(Some)
        };
        AppointmentPatch {
            client_id: self.client_id,
            artist_id: self.artist_id,
            bed_id,
            date: self.date,
            start_time: self.start_time,
            duration_minutes: self.duration_minutes,
            service_type: self.service_type,
            status: self.status,
            price: self.price,
            notes: self.notes,
        }
    }
}

/// Request body for moving an appointment to a new slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleRequest {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
}

/// Request body for a single status change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChangeRequest {
    pub status: AppointmentStatus,
}

/// Request body for applying one status to many appointments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkStatusRequest {
    pub appointment_ids: Vec<AppointmentId>,
    pub status: AppointmentStatus,
}

/// Outcome of one appointment within a bulk status change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkStatusEntry {
    pub appointment_id: AppointmentId,
    pub success: bool,
    /// The updated appointment, on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment: Option<Appointment>,
    /// Side-effect warning, e.g. a failed commission emission
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    /// The failure, in the same shape as top-level API errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

/// Response for the bulk status endpoint, entries in request order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkStatusResponse {
    pub results: Vec<BulkStatusEntry>,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Query parameters for the conflict check endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictCheckQuery {
    pub artist_id: ArtistId,
    #[serde(default)]
    pub bed_id: Option<BedId>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: i64,
    /// Appointment to skip, so an update can pre-check its own move
    #[serde(default)]
    pub exclude_appointment_id: Option<AppointmentId>,
}

impl ConflictCheckQuery {
    /// Convert into the scheduler's query, validating the slot.
    pub fn into_query(self) -> Result<ConflictQuery, String> {
        let slot = TimeSlot::new(self.date, self.start_time, self.duration_minutes)?;
        Ok(ConflictQuery {
            artist_id: self.artist_id,
            bed_id: self.bed_id,
            slot,
            exclude_appointment_id: self.exclude_appointment_id,
        })
    }
}

/// Response for the conflict check endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictCheckResponse {
    pub conflicts: Vec<Conflict>,
    /// Convenience flag, true when `conflicts` is empty
    pub available: bool,
}

/// Query parameters for an artist's appointment listing.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ArtistAppointmentsQuery {
    /// Earliest date to include (inclusive, optional)
    #[serde(default)]
    pub start: Option<NaiveDate>,
    /// Latest date to include (inclusive, optional)
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

/// Appointment list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentListResponse {
    pub appointments: Vec<Appointment>,
    pub total: usize,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Crate version
    pub version: String,
    /// Repository connection status
    pub database: String,
}
