//! HTTP error handling and response types.
//!
//! Domain failures from the scheduler keep their taxonomy on the wire:
//! each [`SchedulingError`] variant maps to a status code and a stable
//! error code, and conflict rejections carry the full conflict list in
//! `details` so clients can show what exactly is in the way.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::repository::RepositoryError;
use crate::scheduler::SchedulingError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional structured details (the conflict list on a conflict rejection)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<serde_json::Value>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request shape (malformed parameters)
    BadRequest(String),
    /// Domain failure from the scheduling service
    Scheduling(SchedulingError),
    /// Internal server error
    Internal(String),
}

impl AppError {
    /// Status code and response body for this error.
    ///
    /// Factored out of [`IntoResponse`] so the bulk endpoint can embed the
    /// same body shape per entry.
    pub fn to_parts(&self) -> (StatusCode, ApiError) {
        match self {
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ApiError::new("BAD_REQUEST", msg.clone()),
            ),
            AppError::Scheduling(err) => scheduling_parts(err),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg.clone()),
            ),
        }
    }
}

fn scheduling_parts(err: &SchedulingError) -> (StatusCode, ApiError) {
    match err {
        SchedulingError::Validation { .. } => (
            StatusCode::BAD_REQUEST,
            ApiError::new("VALIDATION_ERROR", err.to_string()),
        ),
        SchedulingError::Conflict { conflicts } => {
            let mut body = ApiError::new("SCHEDULING_CONFLICT", err.to_string());
            if let Ok(details) = serde_json::to_value(conflicts) {
                body.details = Some(details);
            }
            (StatusCode::CONFLICT, body)
        }
        SchedulingError::InvalidTransition { .. } => (
            StatusCode::CONFLICT,
            ApiError::new("INVALID_TRANSITION", err.to_string()),
        ),
        SchedulingError::LockTimeout { .. } => (
            StatusCode::SERVICE_UNAVAILABLE,
            ApiError::new("LOCK_TIMEOUT", err.to_string())
                .with_details("the slot is being booked concurrently; retry shortly"),
        ),
        SchedulingError::NotFound { .. } => (
            StatusCode::NOT_FOUND,
            ApiError::new("NOT_FOUND", err.to_string()),
        ),
        SchedulingError::DeletionBlocked { .. } => (
            StatusCode::CONFLICT,
            ApiError::new("DELETION_BLOCKED", err.to_string()),
        ),
        SchedulingError::Repository(repo_err) => repository_parts(repo_err),
        SchedulingError::Ledger(_) => (
            StatusCode::BAD_GATEWAY,
            ApiError::new("LEDGER_ERROR", err.to_string()),
        ),
    }
}

fn repository_parts(err: &RepositoryError) -> (StatusCode, ApiError) {
    match err {
        RepositoryError::NotFound { .. } => (
            StatusCode::NOT_FOUND,
            ApiError::new("NOT_FOUND", err.to_string()),
        ),
        _ if err.is_retryable() => (
            StatusCode::SERVICE_UNAVAILABLE,
            ApiError::new("REPOSITORY_UNAVAILABLE", err.to_string()),
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::new("REPOSITORY_ERROR", err.to_string()),
        ),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.to_parts();
        (status, Json(body)).into_response()
    }
}

impl From<SchedulingError> for AppError {
    fn from(err: SchedulingError) -> Self {
        AppError::Scheduling(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AppointmentId, AppointmentStatus};
    use crate::scheduler::{Conflict, ConflictKind};

    #[test]
    fn test_bad_request_maps_to_400() {
        let (status, body) = AppError::BadRequest("no such field".to_string()).to_parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "BAD_REQUEST");
        assert!(body.details.is_none());
    }

    #[test]
    fn test_conflict_maps_to_409_with_conflict_list() {
        let err = SchedulingError::Conflict {
            conflicts: vec![Conflict {
                kind: ConflictKind::Artist,
                message: "artist 7 is already booked 14:00-15:00 (appointment 3)".to_string(),
                conflicting_appointment_id: Some(AppointmentId::new(3)),
            }],
        };
        let (status, body) = AppError::from(err).to_parts();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.code, "SCHEDULING_CONFLICT");

        let details = body.details.unwrap();
        assert_eq!(details[0]["kind"], "artist");
        assert_eq!(details[0]["conflicting_appointment_id"], 3);
    }

    #[test]
    fn test_invalid_transition_maps_to_409() {
        let err = SchedulingError::InvalidTransition {
            from: AppointmentStatus::Completed,
            to: AppointmentStatus::Scheduled,
        };
        let (status, body) = AppError::from(err).to_parts();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.code, "INVALID_TRANSITION");
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err = SchedulingError::NotFound {
            id: AppointmentId::new(9),
        };
        let (status, body) = AppError::from(err).to_parts();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.code, "NOT_FOUND");
        assert_eq!(body.message, "appointment 9 not found");
    }

    #[test]
    fn test_deletion_blocked_maps_to_409() {
        let err = SchedulingError::DeletionBlocked {
            id: AppointmentId::new(4),
        };
        let (status, body) = AppError::from(err).to_parts();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.code, "DELETION_BLOCKED");
    }

    #[test]
    fn test_lock_timeout_maps_to_503() {
        let err = SchedulingError::LockTimeout {
            key: "artist:7@2026-03-14".to_string(),
        };
        let (status, body) = AppError::from(err).to_parts();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.code, "LOCK_TIMEOUT");
    }

    #[test]
    fn test_repository_errors_split_on_retryability() {
        let err = SchedulingError::Repository(RepositoryError::timeout("pool exhausted"));
        let (status, body) = AppError::from(err).to_parts();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.code, "REPOSITORY_UNAVAILABLE");

        let err = SchedulingError::Repository(RepositoryError::internal("row conversion"));
        let (status, body) = AppError::from(err).to_parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, "REPOSITORY_ERROR");
    }

    #[test]
    fn test_repository_not_found_maps_to_404() {
        let err = SchedulingError::Repository(RepositoryError::not_found("no row"));
        let (status, body) = AppError::from(err).to_parts();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.code, "NOT_FOUND");
    }

    #[test]
    fn test_api_error_serializes_without_empty_details() {
        let json = serde_json::to_value(ApiError::new("NOT_FOUND", "gone")).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert!(json.get("details").is_none());
    }
}
