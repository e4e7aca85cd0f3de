//! Appointment scheduling service.
//!
//! Orchestrates the write path: validation, resource locking, conflict
//! detection, lifecycle transitions and the commission side effect. Every
//! appointment mutation goes through [`SchedulingService`]; reads pass
//! through to the repository so callers have a single entry point.
//!
//! The check-then-write race is closed with per-resource async locks keyed
//! by `(resource kind, resource id, date)`: create, update and reschedule
//! hold the locks for every resource they touch from the conflict read to
//! the persisted write. Status changes and deletes do not move resources
//! and run unlocked.

use std::sync::Arc;

use chrono::{Local, NaiveDate, NaiveTime};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::api::{AppointmentId, AppointmentStatus, ArtistId, BedId, ResourceKind};
use crate::config::SchedulingConfig;
use crate::db::repository::FullRepository;
use crate::ledger::CommissionLedger;
use crate::models::{Appointment, AppointmentPatch, NewAppointment, TimeSlot};
use crate::routes::day_view::DayViewData;
use crate::routes::week_view::WeekViewData;
use crate::scheduler::conflicts::{find_conflicts, Conflict, ConflictQuery};
use crate::scheduler::error::{SchedulingError, SchedulingResult};
use crate::scheduler::lifecycle;
use crate::scheduler::locks::{LockGuards, LockKey, ResourceLocks};
use crate::services;

/// Result of a status change.
///
/// `warning` is set when the transition succeeded but a side effect did
/// not, currently only commission emission on completion. The status
/// change itself is never rolled back for a side-effect failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChangeOutcome {
    pub appointment: Appointment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Orchestrates appointment scheduling over a repository and a ledger.
///
/// Holds the per-resource lock registry, so all writers that should
/// exclude each other must share one instance (clone the `Arc` it is
/// wrapped in, not the service).
pub struct SchedulingService {
    repository: Arc<dyn FullRepository>,
    ledger: Arc<dyn CommissionLedger>,
    locks: ResourceLocks,
    config: SchedulingConfig,
}

impl SchedulingService {
    /// Create a service with default configuration.
    pub fn new(repository: Arc<dyn FullRepository>, ledger: Arc<dyn CommissionLedger>) -> Self {
        Self::with_config(repository, ledger, SchedulingConfig::default())
    }

    /// Create a service with explicit configuration.
    pub fn with_config(
        repository: Arc<dyn FullRepository>,
        ledger: Arc<dyn CommissionLedger>,
        config: SchedulingConfig,
    ) -> Self {
        Self {
            repository,
            ledger,
            locks: ResourceLocks::new(),
            config,
        }
    }

    /// The configuration this service runs with.
    pub fn config(&self) -> &SchedulingConfig {
        &self.config
    }

    /// Number of resource lock keys currently registered.
    ///
    /// Released keys are purged after each locked operation, so this stays
    /// proportional to in-flight writes.
    pub fn registered_locks(&self) -> usize {
        self.locks.registered()
    }

    // ==================== Creation ====================

    /// Book a new appointment.
    ///
    /// Validates the request, locks the artist (and bed, if any) for the
    /// requested date, runs conflict detection and persists on a clean
    /// result. The stored appointment starts in `scheduled`.
    ///
    /// # Arguments
    /// * `request` - The appointment to book
    ///
    /// # Returns
    /// * `Ok(Appointment)` - The persisted appointment
    /// * `Err(SchedulingError::Validation)` - Malformed request, nothing written
    /// * `Err(SchedulingError::Conflict)` - Slot taken, carries every conflict found
    /// * `Err(SchedulingError::LockTimeout)` - Resource locks not obtained in time
    pub async fn create_appointment(
        &self,
        request: NewAppointment,
    ) -> SchedulingResult<Appointment> {
        let slot = request.validate().map_err(SchedulingError::validation)?;
        info!(
            "Scheduler: booking {} for artist {} at {}",
            request.service_type, request.artist_id, slot
        );

        let keys = resource_keys(request.artist_id, request.bed_id, request.date);
        let guards = self.acquire(keys).await?;

        let outcome = async {
            let query = ConflictQuery {
                artist_id: request.artist_id,
                bed_id: request.bed_id,
                slot,
                exclude_appointment_id: None,
            };
            let conflicts = find_conflicts(self.repository.as_ref(), &query).await?;
            if !conflicts.is_empty() {
                warn!(
                    "Scheduler: rejected booking for artist {}: {} conflict(s)",
                    request.artist_id,
                    conflicts.len()
                );
                return Err(SchedulingError::Conflict { conflicts });
            }
            Ok(self.repository.store_appointment(&request).await?)
        }
        .await;

        drop(guards);
        self.locks.purge_released();

        let stored = outcome?;
        info!("Scheduler: created appointment {}", stored.id);
        Ok(stored)
    }

    // ==================== Mutation ====================

    /// Apply a partial update to an appointment.
    ///
    /// A patch that moves the appointment in time or across resources
    /// re-runs conflict detection excluding the appointment itself, under
    /// locks covering both the old and the new resource keys. A status
    /// carried in the patch goes through the same lifecycle validation as
    /// [`update_status`](Self::update_status); a patch repeating the
    /// current status is a no-op on that field.
    ///
    /// # Arguments
    /// * `id` - The appointment to update
    /// * `patch` - Fields to change; `None` fields are left untouched
    ///
    /// # Returns
    /// * `Ok(Appointment)` - The updated appointment
    /// * `Err(SchedulingError::NotFound)` - No such appointment
    /// * `Err(SchedulingError::Conflict)` - The new slot collides, nothing written
    /// * `Err(SchedulingError::InvalidTransition)` - Patched status not reachable
    pub async fn update_appointment(
        &self,
        id: AppointmentId,
        patch: AppointmentPatch,
    ) -> SchedulingResult<Appointment> {
        let current = self
            .repository
            .get_appointment(id)
            .await
            .map_err(|err| SchedulingError::lookup(id, err))?;

        let mut updated = current.clone();
        patch.apply_fields(&mut updated);

        if let Some(price) = updated.price {
            if price < 0.0 {
                return Err(SchedulingError::validation(format!(
                    "price must be non-negative, got {}",
                    price
                )));
            }
        }
        let slot = TimeSlot::new(updated.date, updated.start_time, updated.duration_minutes)
            .map_err(SchedulingError::validation)?;

        // Route a patched status through the lifecycle before any write.
        let became_completed = match patch.status {
            Some(new_status) if new_status != current.status => {
                lifecycle::validate_transition(
                    current.status,
                    new_status,
                    current.starts_at(),
                    Local::now().naive_local(),
                )?;
                finalize_status(&mut updated, new_status);
                new_status == AppointmentStatus::Completed
            }
            _ => false,
        };

        let stored = if patch.touches_schedule() {
            // Lock old and new resource keys together so neither side can
            // be double-booked while the appointment moves.
            let mut keys = resource_keys(current.artist_id, current.bed_id, current.date);
            keys.extend(resource_keys(updated.artist_id, updated.bed_id, updated.date));
            let guards = self.acquire(keys).await?;

            let outcome = async {
                let query = ConflictQuery {
                    artist_id: updated.artist_id,
                    bed_id: updated.bed_id,
                    slot,
                    exclude_appointment_id: Some(id),
                };
                let conflicts = find_conflicts(self.repository.as_ref(), &query).await?;
                if !conflicts.is_empty() {
                    warn!(
                        "Scheduler: rejected update of appointment {}: {} conflict(s)",
                        id,
                        conflicts.len()
                    );
                    return Err(SchedulingError::Conflict { conflicts });
                }
                self.repository
                    .update_appointment(&updated)
                    .await
                    .map_err(|err| SchedulingError::lookup(id, err))
            }
            .await;

            drop(guards);
            self.locks.purge_released();
            outcome?
        } else {
            self.repository
                .update_appointment(&updated)
                .await
                .map_err(|err| SchedulingError::lookup(id, err))?
        };

        if became_completed {
            // The patch surface has no warning slot; emission failures are
            // logged and the appointment stays completed.
            self.emit_commission(&stored).await;
        }

        info!("Scheduler: updated appointment {}", id);
        Ok(stored)
    }

    /// Move an appointment to a new date and start time.
    ///
    /// Sugar over [`update_appointment`](Self::update_appointment)
    /// restricted to the time axis, with the same conflict guarantee.
    ///
    /// # Arguments
    /// * `id` - The appointment to move
    /// * `new_date` - Target calendar date
    /// * `new_time` - Target start time
    pub async fn reschedule_appointment(
        &self,
        id: AppointmentId,
        new_date: NaiveDate,
        new_time: NaiveTime,
    ) -> SchedulingResult<Appointment> {
        let patch = AppointmentPatch {
            date: Some(new_date),
            start_time: Some(new_time),
            ..Default::default()
        };
        self.update_appointment(id, patch).await
    }

    /// Delete an appointment.
    ///
    /// Refused while the ledger holds financial records referencing it;
    /// complete-and-paid appointments are history, not clutter.
    ///
    /// # Arguments
    /// * `id` - The appointment to delete
    ///
    /// # Returns
    /// * `Ok(())` - Removed
    /// * `Err(SchedulingError::DeletionBlocked)` - Ledger records reference it
    /// * `Err(SchedulingError::NotFound)` - No such appointment
    pub async fn delete_appointment(&self, id: AppointmentId) -> SchedulingResult<()> {
        if self.ledger.has_transactions(id).await? {
            warn!(
                "Scheduler: refusing to delete appointment {} with ledger records",
                id
            );
            return Err(SchedulingError::DeletionBlocked { id });
        }
        self.repository
            .delete_appointment(id)
            .await
            .map_err(|err| SchedulingError::lookup(id, err))?;
        info!("Scheduler: deleted appointment {}", id);
        Ok(())
    }

    // ==================== Status ====================

    /// Change an appointment's lifecycle status.
    ///
    /// Transitions are validated against the lifecycle graph; `no_show`
    /// additionally requires the start time to have passed. Entering
    /// `completed` defaults a missing price to 0 and emits a commission
    /// calculation to the ledger; a ledger failure is returned as a
    /// warning on the outcome, never as the primary error.
    ///
    /// # Arguments
    /// * `id` - The appointment to transition
    /// * `new_status` - Target status
    ///
    /// # Returns
    /// * `Ok(StatusChangeOutcome)` - Updated appointment plus any side-effect warning
    /// * `Err(SchedulingError::InvalidTransition)` - Edge not in the lifecycle
    /// * `Err(SchedulingError::NotFound)` - No such appointment
    pub async fn update_status(
        &self,
        id: AppointmentId,
        new_status: AppointmentStatus,
    ) -> SchedulingResult<StatusChangeOutcome> {
        let current = self
            .repository
            .get_appointment(id)
            .await
            .map_err(|err| SchedulingError::lookup(id, err))?;

        let from = current.status;
        lifecycle::validate_transition(
            from,
            new_status,
            current.starts_at(),
            Local::now().naive_local(),
        )?;

        let mut updated = current;
        finalize_status(&mut updated, new_status);
        let stored = self
            .repository
            .update_appointment(&updated)
            .await
            .map_err(|err| SchedulingError::lookup(id, err))?;
        info!(
            "Scheduler: appointment {} moved {} -> {}",
            id, from, new_status
        );

        let warning = if new_status == AppointmentStatus::Completed {
            self.emit_commission(&stored).await
        } else {
            None
        };
        Ok(StatusChangeOutcome {
            appointment: stored,
            warning,
        })
    }

    /// Apply one status change to many appointments independently.
    ///
    /// Each id gets the full single-appointment treatment; one failure
    /// does not roll back or stop the others. Results come back in input
    /// order, one entry per input id.
    ///
    /// # Arguments
    /// * `ids` - Appointments to transition
    /// * `new_status` - Target status for all of them
    pub async fn bulk_update_status(
        &self,
        ids: &[AppointmentId],
        new_status: AppointmentStatus,
    ) -> Vec<(AppointmentId, SchedulingResult<StatusChangeOutcome>)> {
        info!(
            "Scheduler: bulk status change of {} appointment(s) to {}",
            ids.len(),
            new_status
        );
        let mut results = Vec::with_capacity(ids.len());
        for &id in ids {
            results.push((id, self.update_status(id, new_status).await));
        }
        results
    }

    // ==================== Queries ====================

    /// Fetch a single appointment.
    pub async fn get_appointment(&self, id: AppointmentId) -> SchedulingResult<Appointment> {
        self.repository
            .get_appointment(id)
            .await
            .map_err(|err| SchedulingError::lookup(id, err))
    }

    /// Run conflict detection without writing anything.
    ///
    /// # Arguments
    /// * `query` - Requested resources and slot, with optional self-exclusion
    pub async fn check_conflicts(&self, query: &ConflictQuery) -> SchedulingResult<Vec<Conflict>> {
        Ok(find_conflicts(self.repository.as_ref(), query).await?)
    }

    /// Fetch an artist's appointments, optionally bounded by dates.
    ///
    /// Both bounds are inclusive when present.
    ///
    /// # Arguments
    /// * `artist_id` - The artist to query
    /// * `start_date` - Earliest date to include, if set
    /// * `end_date` - Latest date to include, if set
    pub async fn appointments_by_artist(
        &self,
        artist_id: ArtistId,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> SchedulingResult<Vec<Appointment>> {
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if end < start {
                return Err(SchedulingError::validation(format!(
                    "end date {} precedes start date {}",
                    end, start
                )));
            }
        }
        Ok(self
            .repository
            .appointments_by_artist(artist_id, start_date, end_date)
            .await?)
    }

    /// Whether the backing repository is reachable and healthy.
    pub async fn health_check(&self) -> SchedulingResult<bool> {
        Ok(self.repository.health_check().await?)
    }

    // ==================== Views ====================

    /// A day's appointments bucketed by starting hour.
    pub async fn day_view(&self, date: NaiveDate) -> SchedulingResult<DayViewData> {
        Ok(services::day_view::get_day_view(self.repository.as_ref(), date, &self.config).await?)
    }

    /// A week's appointments bucketed by calendar date, with per-day
    /// count and revenue aggregates.
    pub async fn week_view(&self, date: NaiveDate) -> SchedulingResult<WeekViewData> {
        Ok(services::week_view::get_week_view(self.repository.as_ref(), date, &self.config).await?)
    }

    // ==================== Internals ====================

    async fn acquire(&self, keys: Vec<LockKey>) -> SchedulingResult<LockGuards> {
        self.locks
            .acquire(keys, self.config.lock_wait())
            .await
            .map_err(|key| {
                warn!("Scheduler: lock wait expired on {}", key);
                SchedulingError::LockTimeout {
                    key: key.to_string(),
                }
            })
    }

    /// Emit the commission calculation for a just-completed appointment.
    ///
    /// Best-effort: a ledger failure is logged and returned as a warning
    /// message, never propagated. The status change stands either way.
    async fn emit_commission(&self, appointment: &Appointment) -> Option<String> {
        let base_amount = appointment.price.unwrap_or(0.0);
        match self
            .ledger
            .calculate_commission(appointment.id, appointment.artist_id, base_amount)
            .await
        {
            Ok(record) => {
                info!(
                    "Scheduler: recorded commission {:.2} (rate {:.2}) for appointment {}",
                    record.commission_amount, record.rate, appointment.id
                );
                None
            }
            Err(err) => {
                let warning = format!(
                    "commission calculation failed for appointment {}: {}",
                    appointment.id, err
                );
                warn!("Scheduler: {}", warning);
                Some(warning)
            }
        }
    }
}

/// Lock keys for one side of a booking: the artist always, the bed when
/// one is requested.
fn resource_keys(artist_id: ArtistId, bed_id: Option<BedId>, date: NaiveDate) -> Vec<LockKey> {
    let mut keys = vec![LockKey::new(ResourceKind::Artist, artist_id.value(), date)];
    if let Some(bed) = bed_id {
        keys.push(LockKey::new(ResourceKind::Bed, bed.value(), date));
    }
    keys
}

/// Set the target status; completion defaults a missing price to 0 so the
/// commission base is well defined.
fn finalize_status(appointment: &mut Appointment, new_status: AppointmentStatus) {
    appointment.status = new_status;
    if new_status == AppointmentStatus::Completed && appointment.price.is_none() {
        appointment.price = Some(0.0);
    }
}
