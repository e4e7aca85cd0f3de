//! In-memory local repository implementation.
//!
//! This module provides a local implementation of all repository traits
//! suitable for unit testing and local development. All data is stored in
//! memory using HashMaps, providing fast, deterministic and isolated
//! execution.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::api::{Appointment, AppointmentId, AppointmentStatus, ArtistId, BedId, NewAppointment};
use crate::db::repository::{
    AppointmentRepository, DirectoryRepository, RepositoryError, RepositoryResult,
};

/// In-memory local repository.
///
/// Appointments live in a HashMap behind an `RwLock`; ids are handed out
/// from a counter, mirroring a database sequence. The directory maps hold
/// explicit availability flags; resources absent from them count as
/// available.
///
/// # Example
/// ```ignore
/// let repo = LocalRepository::new();
/// repo.upsert_artist(ArtistId::new(7), true);
/// let stored = repo.store_appointment(&request).await?;
/// ```
#[derive(Clone, Debug)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

#[derive(Debug)]
struct LocalData {
    appointments: HashMap<AppointmentId, Appointment>,
    artists: HashMap<ArtistId, bool>,
    beds: HashMap<BedId, bool>,

    // ID counter
    next_appointment_id: i64,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            appointments: HashMap::new(),
            artists: HashMap::new(),
            beds: HashMap::new(),
            next_appointment_id: 1,
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Register or update an artist's availability flag.
    pub fn upsert_artist(&self, artist_id: ArtistId, active: bool) {
        self.data.write().artists.insert(artist_id, active);
    }

    /// Register or update a bed's availability flag.
    pub fn upsert_bed(&self, bed_id: BedId, active: bool) {
        self.data.write().beds.insert(bed_id, active);
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data, keeping the health flag.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    /// Number of appointments stored.
    pub fn appointment_count(&self) -> usize {
        self.data.read().appointments.len()
    }

    /// Check if an appointment exists.
    pub fn has_appointment(&self, appointment_id: AppointmentId) -> bool {
        self.data.read().appointments.contains_key(&appointment_id)
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection("database is not healthy"));
        }
        Ok(())
    }

    /// Helper to get an appointment or return NotFound.
    fn get_appointment_impl(&self, appointment_id: AppointmentId) -> RepositoryResult<Appointment> {
        self.data
            .read()
            .appointments
            .get(&appointment_id)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found(format!("appointment {} not found", appointment_id))
            })
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

// ==================== Appointment Repository ====================

#[async_trait]
impl AppointmentRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn store_appointment(
        &self,
        appointment: &NewAppointment,
    ) -> RepositoryResult<Appointment> {
        self.check_health()?;

        let mut data = self.data.write();
        let id = AppointmentId::new(data.next_appointment_id);
        data.next_appointment_id += 1;

        let now = Utc::now();
        let stored = Appointment {
            id,
            client_id: appointment.client_id,
            artist_id: appointment.artist_id,
            bed_id: appointment.bed_id,
            date: appointment.date,
            start_time: appointment.start_time,
            duration_minutes: appointment.duration_minutes,
            service_type: appointment.service_type,
            status: AppointmentStatus::Scheduled,
            price: appointment.price,
            notes: appointment.notes.clone(),
            created_at: now,
            updated_at: now,
        };
        data.appointments.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get_appointment(
        &self,
        appointment_id: AppointmentId,
    ) -> RepositoryResult<Appointment> {
        self.check_health()?;
        self.get_appointment_impl(appointment_id)
    }

    async fn update_appointment(
        &self,
        appointment: &Appointment,
    ) -> RepositoryResult<Appointment> {
        self.check_health()?;

        let mut data = self.data.write();
        if !data.appointments.contains_key(&appointment.id) {
            return Err(RepositoryError::not_found(format!(
                "appointment {} not found",
                appointment.id
            )));
        }

        let mut stored = appointment.clone();
        stored.updated_at = Utc::now();
        data.appointments.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn delete_appointment(&self, appointment_id: AppointmentId) -> RepositoryResult<()> {
        self.check_health()?;

        let removed = self.data.write().appointments.remove(&appointment_id);
        if removed.is_none() {
            return Err(RepositoryError::not_found(format!(
                "appointment {} not found",
                appointment_id
            )));
        }
        Ok(())
    }

    async fn appointments_on(&self, date: NaiveDate) -> RepositoryResult<Vec<Appointment>> {
        self.check_health()?;

        let data = self.data.read();
        let mut on_date: Vec<Appointment> = data
            .appointments
            .values()
            .filter(|a| a.date == date)
            .cloned()
            .collect();
        on_date.sort_by_key(|a| (a.start_time, a.id));
        Ok(on_date)
    }

    async fn appointments_by_artist(
        &self,
        artist_id: ArtistId,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> RepositoryResult<Vec<Appointment>> {
        self.check_health()?;

        let data = self.data.read();
        let mut matching: Vec<Appointment> = data
            .appointments
            .values()
            .filter(|a| a.artist_id == artist_id)
            .filter(|a| start.map_or(true, |s| a.date >= s))
            .filter(|a| end.map_or(true, |e| a.date <= e))
            .cloned()
            .collect();
        matching.sort_by_key(|a| (a.date, a.start_time, a.id));
        Ok(matching)
    }

    async fn list_appointments(&self) -> RepositoryResult<Vec<Appointment>> {
        self.check_health()?;

        let data = self.data.read();
        let mut all: Vec<Appointment> = data.appointments.values().cloned().collect();
        all.sort_by_key(|a| a.id);
        Ok(all)
    }
}

// ==================== Directory Repository ====================

#[async_trait]
impl DirectoryRepository for LocalRepository {
    async fn artist_is_available(
        &self,
        artist_id: ArtistId,
        _date: NaiveDate,
    ) -> RepositoryResult<bool> {
        self.check_health()?;
        Ok(self.data.read().artists.get(&artist_id).copied().unwrap_or(true))
    }

    async fn bed_is_available(&self, bed_id: BedId, _date: NaiveDate) -> RepositoryResult<bool> {
        self.check_health()?;
        Ok(self.data.read().beds.get(&bed_id).copied().unwrap_or(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ClientId, ServiceType};
    use chrono::NaiveTime;

    fn request(artist: i64, day: u32, hour: u32) -> NewAppointment {
        NewAppointment {
            client_id: ClientId::new(1),
            artist_id: ArtistId::new(artist),
            bed_id: None,
            date: NaiveDate::from_ymd_opt(2026, 3, day).unwrap(),
            start_time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            duration_minutes: 60,
            service_type: ServiceType::Tattoo,
            price: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_health_check() {
        let repo = LocalRepository::new();
        assert!(repo.health_check().await.unwrap());

        repo.set_healthy(false);
        assert!(!repo.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_store_assigns_sequential_ids() {
        let repo = LocalRepository::new();

        let first = repo.store_appointment(&request(7, 14, 10)).await.unwrap();
        let second = repo.store_appointment(&request(7, 14, 12)).await.unwrap();

        assert_eq!(first.id, AppointmentId::new(1));
        assert_eq!(second.id, AppointmentId::new(2));
        assert_eq!(first.status, AppointmentStatus::Scheduled);
        assert_eq!(repo.appointment_count(), 2);
    }

    #[tokio::test]
    async fn test_store_and_retrieve() {
        let repo = LocalRepository::new();

        let stored = repo.store_appointment(&request(7, 14, 10)).await.unwrap();
        let fetched = repo.get_appointment(stored.id).await.unwrap();
        assert_eq!(fetched, stored);
    }

    #[tokio::test]
    async fn test_not_found_error() {
        let repo = LocalRepository::new();

        let result = repo.get_appointment(AppointmentId::new(999)).await;
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_appointment() {
        let repo = LocalRepository::new();

        let mut stored = repo.store_appointment(&request(7, 14, 10)).await.unwrap();
        stored.notes = Some("bring reference sketch".to_string());
        stored.status = AppointmentStatus::Confirmed;

        let updated = repo.update_appointment(&stored).await.unwrap();
        assert_eq!(updated.notes.as_deref(), Some("bring reference sketch"));
        assert!(updated.updated_at >= stored.created_at);

        let fetched = repo.get_appointment(stored.id).await.unwrap();
        assert_eq!(fetched.status, AppointmentStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_update_missing_appointment() {
        let repo = LocalRepository::new();

        let mut phantom = repo.store_appointment(&request(7, 14, 10)).await.unwrap();
        repo.clear();
        phantom.notes = Some("gone".to_string());

        let result = repo.update_appointment(&phantom).await;
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_appointment() {
        let repo = LocalRepository::new();

        let stored = repo.store_appointment(&request(7, 14, 10)).await.unwrap();
        repo.delete_appointment(stored.id).await.unwrap();
        assert!(!repo.has_appointment(stored.id));

        let result = repo.delete_appointment(stored.id).await;
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_appointments_on_filters_and_sorts() {
        let repo = LocalRepository::new();

        repo.store_appointment(&request(7, 14, 15)).await.unwrap();
        repo.store_appointment(&request(8, 14, 9)).await.unwrap();
        repo.store_appointment(&request(7, 15, 10)).await.unwrap();

        let day = repo
            .appointments_on(NaiveDate::from_ymd_opt(2026, 3, 14).unwrap())
            .await
            .unwrap();
        assert_eq!(day.len(), 2);
        assert_eq!(day[0].start_time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(day[1].start_time, NaiveTime::from_hms_opt(15, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn test_appointments_by_artist_with_bounds() {
        let repo = LocalRepository::new();

        repo.store_appointment(&request(7, 10, 10)).await.unwrap();
        repo.store_appointment(&request(7, 14, 10)).await.unwrap();
        repo.store_appointment(&request(7, 20, 10)).await.unwrap();
        repo.store_appointment(&request(8, 14, 10)).await.unwrap();

        let all = repo
            .appointments_by_artist(ArtistId::new(7), None, None)
            .await
            .unwrap();
        assert_eq!(all.len(), 3);

        let bounded = repo
            .appointments_by_artist(
                ArtistId::new(7),
                Some(NaiveDate::from_ymd_opt(2026, 3, 12).unwrap()),
                Some(NaiveDate::from_ymd_opt(2026, 3, 18).unwrap()),
            )
            .await
            .unwrap();
        assert_eq!(bounded.len(), 1);
        assert_eq!(bounded[0].date, NaiveDate::from_ymd_opt(2026, 3, 14).unwrap());

        // Bounds are inclusive.
        let inclusive = repo
            .appointments_by_artist(
                ArtistId::new(7),
                Some(NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()),
                Some(NaiveDate::from_ymd_opt(2026, 3, 20).unwrap()),
            )
            .await
            .unwrap();
        assert_eq!(inclusive.len(), 3);
    }

    #[tokio::test]
    async fn test_directory_unknown_resources_available() {
        let repo = LocalRepository::new();
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();

        assert!(repo
            .artist_is_available(ArtistId::new(999), date)
            .await
            .unwrap());
        assert!(repo.bed_is_available(BedId::new(999), date).await.unwrap());
    }

    #[tokio::test]
    async fn test_directory_inactive_resources() {
        let repo = LocalRepository::new();
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();

        repo.upsert_artist(ArtistId::new(7), false);
        repo.upsert_bed(BedId::new(2), false);

        assert!(!repo.artist_is_available(ArtistId::new(7), date).await.unwrap());
        assert!(!repo.bed_is_available(BedId::new(2), date).await.unwrap());

        repo.upsert_artist(ArtistId::new(7), true);
        assert!(repo.artist_is_available(ArtistId::new(7), date).await.unwrap());
    }

    #[tokio::test]
    async fn test_unhealthy_repository_rejects_operations() {
        let repo = LocalRepository::new();
        repo.set_healthy(false);

        let result = repo.store_appointment(&request(7, 14, 10)).await;
        assert!(matches!(result, Err(RepositoryError::ConnectionError { .. })));

        let result = repo
            .appointments_on(NaiveDate::from_ymd_opt(2026, 3, 14).unwrap())
            .await;
        assert!(matches!(result, Err(RepositoryError::ConnectionError { .. })));
    }

    #[tokio::test]
    async fn test_clear_resets_ids() {
        let repo = LocalRepository::new();

        repo.store_appointment(&request(7, 14, 10)).await.unwrap();
        repo.clear();
        assert_eq!(repo.appointment_count(), 0);

        let stored = repo.store_appointment(&request(7, 14, 10)).await.unwrap();
        assert_eq!(stored.id, AppointmentId::new(1));
    }
}
