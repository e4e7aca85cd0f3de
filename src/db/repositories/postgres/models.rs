use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;

use super::schema::appointments;
use crate::api::{
    Appointment, AppointmentId, AppointmentStatus, ArtistId, BedId, ClientId, NewAppointment,
    ServiceType,
};
use crate::db::repository::{ErrorContext, RepositoryError, RepositoryResult};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = appointments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AppointmentRow {
    pub appointment_id: i64,
    pub client_id: i64,
    pub artist_id: i64,
    pub bed_id: Option<i64>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: i64,
    pub service_type: String,
    pub status: String,
    pub price: Option<f64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AppointmentRow {
    /// Convert the row into the domain entity.
    ///
    /// Status and service type live in text columns; rows written by this
    /// crate always parse back, so a failure here means the table was edited
    /// out-of-band.
    pub fn into_entity(self) -> RepositoryResult<Appointment> {
        let service_type: ServiceType = parse_enum_column(&self.service_type, self.appointment_id)?;
        let status: AppointmentStatus = parse_enum_column(&self.status, self.appointment_id)?;

        Ok(Appointment {
            id: AppointmentId::new(self.appointment_id),
            client_id: ClientId::new(self.client_id),
            artist_id: ArtistId::new(self.artist_id),
            bed_id: self.bed_id.map(BedId::new),
            date: self.date,
            start_time: self.start_time,
            duration_minutes: self.duration_minutes,
            service_type,
            status,
            price: self.price,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn parse_enum_column<T>(raw: &str, appointment_id: i64) -> RepositoryResult<T>
where
    T: std::str::FromStr<Err = String>,
{
    raw.parse().map_err(|message: String| RepositoryError::ValidationError {
        message,
        context: ErrorContext::new("row_conversion")
            .with_entity("appointment")
            .with_entity_id(appointment_id),
    })
}

/// Insertable row for a new appointment.
///
/// The database assigns `appointment_id` and both timestamps; new rows
/// always start out `scheduled`.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = appointments)]
pub struct NewAppointmentRow {
    pub client_id: i64,
    pub artist_id: i64,
    pub bed_id: Option<i64>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: i64,
    pub service_type: String,
    pub status: String,
    pub price: Option<f64>,
    pub notes: Option<String>,
}

impl From<&NewAppointment> for NewAppointmentRow {
    fn from(request: &NewAppointment) -> Self {
        Self {
            client_id: request.client_id.value(),
            artist_id: request.artist_id.value(),
            bed_id: request.bed_id.map(|id| id.value()),
            date: request.date,
            start_time: request.start_time,
            duration_minutes: request.duration_minutes,
            service_type: request.service_type.as_str().to_string(),
            status: AppointmentStatus::Scheduled.as_str().to_string(),
            price: request.price,
            notes: request.notes.clone(),
        }
    }
}
