//! Core appointment repository trait for CRUD and calendar queries.
//!
//! This trait defines the fundamental database operations for appointments.
//! Lifecycle rules and conflict checks are not enforced here; the scheduler
//! owns those and treats the repository as plain storage.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::error::RepositoryResult;
use crate::api::{Appointment, AppointmentId, ArtistId, NewAppointment};

/// Repository trait for appointment database operations.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    // ==================== Health & Connection ====================

    /// Check if the database connection is healthy.
    ///
    /// # Returns
    /// - `Ok(true)` if connection is healthy
    /// - `Ok(false)` if connection is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if an error occurred during the check
    async fn health_check(&self) -> RepositoryResult<bool>;

    // ==================== Appointment Operations ====================

    /// Store a new appointment.
    ///
    /// The repository assigns the id and timestamps; new appointments are
    /// stored with `scheduled` status.
    ///
    /// # Arguments
    /// * `appointment` - The validated appointment request to store
    ///
    /// # Returns
    /// * `Ok(Appointment)` - The stored appointment including its assigned ID
    /// * `Err(RepositoryError)` - If the operation fails
    async fn store_appointment(
        &self,
        appointment: &NewAppointment,
    ) -> RepositoryResult<Appointment>;

    /// Retrieve an appointment by ID.
    ///
    /// # Arguments
    /// * `appointment_id` - The ID of the appointment to retrieve
    ///
    /// # Returns
    /// * `Ok(Appointment)` - The appointment
    /// * `Err(RepositoryError::NotFound)` - If no such appointment exists
    /// * `Err(RepositoryError)` - If the operation fails
    async fn get_appointment(
        &self,
        appointment_id: AppointmentId,
    ) -> RepositoryResult<Appointment>;

    /// Persist the current state of an appointment.
    ///
    /// Replaces every mutable column and refreshes `updated_at`. The entity
    /// must already exist.
    ///
    /// # Arguments
    /// * `appointment` - The appointment to persist, identified by its id
    ///
    /// # Returns
    /// * `Ok(Appointment)` - The stored appointment with its new `updated_at`
    /// * `Err(RepositoryError::NotFound)` - If the appointment doesn't exist
    /// * `Err(RepositoryError)` - If the operation fails
    async fn update_appointment(&self, appointment: &Appointment)
        -> RepositoryResult<Appointment>;

    /// Delete an appointment.
    ///
    /// # Arguments
    /// * `appointment_id` - The ID of the appointment to delete
    ///
    /// # Returns
    /// * `Ok(())` - If the appointment was deleted
    /// * `Err(RepositoryError::NotFound)` - If the appointment doesn't exist
    /// * `Err(RepositoryError)` - If the operation fails
    async fn delete_appointment(&self, appointment_id: AppointmentId) -> RepositoryResult<()>;

    // ==================== Calendar Queries ====================

    /// All appointments on a calendar date, regardless of status.
    ///
    /// Status filtering (e.g. ignoring cancelled rows for conflict checks)
    /// is the caller's concern. The day view buckets rows in the order
    /// returned here, so implementations must sort by start time.
    ///
    /// # Arguments
    /// * `date` - The calendar date to query
    ///
    /// # Returns
    /// * `Ok(Vec<Appointment>)` - Appointments on that date, by start time
    /// * `Err(RepositoryError)` - If the operation fails
    async fn appointments_on(&self, date: NaiveDate) -> RepositoryResult<Vec<Appointment>>;

    /// Appointments assigned to an artist, optionally bounded by date.
    ///
    /// # Arguments
    /// * `artist_id` - The artist to query
    /// * `start` - Earliest date to include (inclusive), unbounded if `None`
    /// * `end` - Latest date to include (inclusive), unbounded if `None`
    ///
    /// # Returns
    /// * `Ok(Vec<Appointment>)` - Matching appointments ordered by date and start time
    /// * `Err(RepositoryError)` - If the operation fails
    async fn appointments_by_artist(
        &self,
        artist_id: ArtistId,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> RepositoryResult<Vec<Appointment>>;

    /// List every stored appointment.
    ///
    /// # Returns
    /// * `Ok(Vec<Appointment>)` - All appointments, unordered
    /// * `Err(RepositoryError)` - If the operation fails
    async fn list_appointments(&self) -> RepositoryResult<Vec<Appointment>>;
}
