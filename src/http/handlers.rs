//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! scheduling service for business logic.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;

use super::dto::{
    AppointmentListResponse, ArtistAppointmentsQuery, BulkStatusEntry, BulkStatusRequest,
    BulkStatusResponse, ConflictCheckQuery, ConflictCheckResponse, DayViewData, HealthResponse,
    NewAppointment, RescheduleRequest, StatusChangeOutcome, StatusChangeRequest,
    UpdateAppointmentRequest, WeekViewData,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{AppointmentId, ArtistId};
use crate::models::Appointment;
use crate::scheduler::SchedulingError;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the
/// repository is reachable. Always answers 200; a broken repository shows
/// up as `status: degraded`.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (status, database) = match state.service.health_check().await {
        Ok(true) => ("ok", "connected".to_string()),
        Ok(false) => ("degraded", "disconnected".to_string()),
        Err(e) => ("degraded", format!("error: {}", e)),
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
    })
}

// =============================================================================
// Appointment CRUD
// =============================================================================

/// POST /v1/appointments
///
/// Book a new appointment. Returns 201 with the stored appointment, or
/// 409 carrying the conflict list when the slot is taken.
pub async fn create_appointment(
    State(state): State<AppState>,
    Json(request): Json<NewAppointment>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let stored = state.service.create_appointment(request).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// GET /v1/appointments/{appointment_id}
///
/// Fetch a single appointment.
pub async fn get_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<i64>,
) -> HandlerResult<Appointment> {
    let appointment = state
        .service
        .get_appointment(AppointmentId::new(appointment_id))
        .await?;
    Ok(Json(appointment))
}

/// PATCH /v1/appointments/{appointment_id}
///
/// Partially update an appointment. Moves in time or across resources
/// re-run conflict detection; a patched status goes through lifecycle
/// validation.
pub async fn update_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<i64>,
    Json(request): Json<UpdateAppointmentRequest>,
) -> HandlerResult<Appointment> {
    let updated = state
        .service
        .update_appointment(AppointmentId::new(appointment_id), request.into_patch())
        .await?;
    Ok(Json(updated))
}

/// DELETE /v1/appointments/{appointment_id}
///
/// Delete an appointment. Refused with 409 while the ledger holds
/// financial records referencing it.
pub async fn delete_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state
        .service
        .delete_appointment(AppointmentId::new(appointment_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Scheduling Operations
// =============================================================================

/// POST /v1/appointments/{appointment_id}/reschedule
///
/// Move an appointment to a new date and start time with the same
/// conflict guarantee as a full update.
pub async fn reschedule_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<i64>,
    Json(request): Json<RescheduleRequest>,
) -> HandlerResult<Appointment> {
    let moved = state
        .service
        .reschedule_appointment(
            AppointmentId::new(appointment_id),
            request.date,
            request.start_time,
        )
        .await?;
    Ok(Json(moved))
}

/// GET /v1/appointments/conflicts
///
/// Dry-run conflict detection for a prospective booking; nothing is
/// written or locked.
pub async fn check_conflicts(
    State(state): State<AppState>,
    Query(query): Query<ConflictCheckQuery>,
) -> HandlerResult<ConflictCheckResponse> {
    let query = query.into_query().map_err(SchedulingError::validation)?;
    let conflicts = state.service.check_conflicts(&query).await?;
    let available = conflicts.is_empty();
    Ok(Json(ConflictCheckResponse {
        conflicts,
        available,
    }))
}

// =============================================================================
// Status Lifecycle
// =============================================================================

/// POST /v1/appointments/{appointment_id}/status
///
/// Change an appointment's lifecycle status. Completing may attach a
/// warning when the commission emission failed; the status change itself
/// stands.
pub async fn update_status(
    State(state): State<AppState>,
    Path(appointment_id): Path<i64>,
    Json(request): Json<StatusChangeRequest>,
) -> HandlerResult<StatusChangeOutcome> {
    let outcome = state
        .service
        .update_status(AppointmentId::new(appointment_id), request.status)
        .await?;
    Ok(Json(outcome))
}

/// POST /v1/appointments/status
///
/// Apply one status change to many appointments. Always 200: entries
/// report per-appointment success or failure independently, in request
/// order.
pub async fn bulk_update_status(
    State(state): State<AppState>,
    Json(request): Json<BulkStatusRequest>,
) -> HandlerResult<BulkStatusResponse> {
    let outcomes = state
        .service
        .bulk_update_status(&request.appointment_ids, request.status)
        .await;

    let total = outcomes.len();
    let mut succeeded = 0;
    let results: Vec<BulkStatusEntry> = outcomes
        .into_iter()
        .map(|(appointment_id, result)| match result {
            Ok(outcome) => {
                succeeded += 1;
                BulkStatusEntry {
                    appointment_id,
                    success: true,
                    appointment: Some(outcome.appointment),
                    warning: outcome.warning,
                    error: None,
                }
            }
            Err(err) => {
                let (_, body) = AppError::from(err).to_parts();
                BulkStatusEntry {
                    appointment_id,
                    success: false,
                    appointment: None,
                    warning: None,
                    error: Some(body),
                }
            }
        })
        .collect();

    Ok(Json(BulkStatusResponse {
        results,
        total,
        succeeded,
        failed: total - succeeded,
    }))
}

// =============================================================================
// Artist and Calendar Queries
// =============================================================================

/// GET /v1/artists/{artist_id}/appointments
///
/// An artist's appointments ordered by date and start time, optionally
/// bounded by `start` and `end` (both inclusive).
pub async fn artist_appointments(
    State(state): State<AppState>,
    Path(artist_id): Path<i64>,
    Query(query): Query<ArtistAppointmentsQuery>,
) -> HandlerResult<AppointmentListResponse> {
    let appointments = state
        .service
        .appointments_by_artist(ArtistId::new(artist_id), query.start, query.end)
        .await?;
    let total = appointments.len();
    Ok(Json(AppointmentListResponse {
        appointments,
        total,
    }))
}

/// GET /v1/calendar/day/{date}
///
/// One day's appointments bucketed by starting hour within the operating
/// window.
pub async fn day_view(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> HandlerResult<DayViewData> {
    Ok(Json(state.service.day_view(date).await?))
}

/// GET /v1/calendar/week/{date}
///
/// The week containing `date`, bucketed by day with per-day count and
/// revenue aggregates.
pub async fn week_view(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> HandlerResult<WeekViewData> {
    Ok(Json(state.service.week_view(date).await?))
}
