use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{AppointmentId, AppointmentStatus, ArtistId, BedId, ClientId, ServiceType};
use crate::models::slot::TimeSlot;

/// A booked studio appointment.
///
/// The single canonical shape for appointments across the service layer,
/// the repositories and the HTTP API. Input arrives as [`NewAppointment`],
/// partial edits as [`AppointmentPatch`]; both collapse into this entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    /// Database ID (repository-assigned)
    pub id: AppointmentId,
    /// Client receiving the service
    pub client_id: ClientId,
    /// Artist performing the service
    pub artist_id: ArtistId,
    /// Work bed, if the service needs one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bed_id: Option<BedId>,
    /// Calendar date of the appointment (naive local)
    pub date: NaiveDate,
    /// Wall-clock start time (naive local)
    pub start_time: NaiveTime,
    /// Booked length in minutes, always positive
    pub duration_minutes: i64,
    /// What is being booked
    pub service_type: ServiceType,
    /// Lifecycle state; mutate only through the scheduler
    pub status: AppointmentStatus,
    /// Agreed price; defaulted to 0 when completing an unpriced appointment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Free-form notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// The interval this appointment occupies.
    pub fn slot(&self) -> TimeSlot {
        TimeSlot {
            date: self.date,
            start_time: self.start_time,
            duration_minutes: self.duration_minutes,
        }
    }

    /// Combined date and start time, for comparisons against "now".
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.start_time)
    }
}

/// Input shape for creating an appointment.
///
/// Carries everything but the server-assigned id, status and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAppointment {
    pub client_id: ClientId,
    pub artist_id: ArtistId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bed_id: Option<BedId>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: i64,
    pub service_type: ServiceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewAppointment {
    /// Validate the request and return the slot it books.
    ///
    /// Checks run before any repository access: positive duration, no
    /// midnight crossing, non-negative price.
    pub fn validate(&self) -> Result<TimeSlot, String> {
        if let Some(price) = self.price {
            if price < 0.0 {
                return Err(format!("price must be non-negative, got {}", price));
            }
        }
        TimeSlot::new(self.date, self.start_time, self.duration_minutes)
    }
}

/// Partial update for an existing appointment.
///
/// `None` fields are left untouched. `bed_id` is doubly optional so a
/// patch can distinguish "leave the bed alone" (`None`) from "remove the
/// bed" (`Some(None)`). Status changes included here go through the same
/// lifecycle validation as a direct status update.
#[derive(Debug, Clone, Default)]
pub struct AppointmentPatch {
    pub client_id: Option<ClientId>,
    pub artist_id: Option<ArtistId>,
    pub bed_id: Option<Option<BedId>>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub duration_minutes: Option<i64>,
    pub service_type: Option<ServiceType>,
    pub status: Option<AppointmentStatus>,
    pub price: Option<f64>,
    pub notes: Option<String>,
}

impl AppointmentPatch {
    /// Whether the patch moves the appointment in time or across resources,
    /// requiring a fresh conflict check.
    pub fn touches_schedule(&self) -> bool {
        self.artist_id.is_some()
            || self.bed_id.is_some()
            || self.date.is_some()
            || self.start_time.is_some()
            || self.duration_minutes.is_some()
    }

    /// Apply every field except `status` onto the appointment.
    ///
    /// Status is deliberately excluded: the scheduler routes it through
    /// lifecycle validation and its side effects.
    pub fn apply_fields(&self, appointment: &mut Appointment) {
        if let Some(client_id) = self.client_id {
            appointment.client_id = client_id;
        }
        if let Some(artist_id) = self.artist_id {
            appointment.artist_id = artist_id;
        }
        if let Some(bed_id) = self.bed_id {
            appointment.bed_id = bed_id;
        }
        if let Some(date) = self.date {
            appointment.date = date;
        }
        if let Some(start_time) = self.start_time {
            appointment.start_time = start_time;
        }
        if let Some(duration) = self.duration_minutes {
            appointment.duration_minutes = duration;
        }
        if let Some(service_type) = self.service_type {
            appointment.service_type = service_type;
        }
        if let Some(price) = self.price {
            appointment.price = Some(price);
        }
        if let Some(notes) = &self.notes {
            appointment.notes = Some(notes.clone());
        }
    }
}
