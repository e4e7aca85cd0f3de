//! Appointment lifecycle rules.
//!
//! The status graph is small and deliberately strict:
//!
//! ```text
//! scheduled ──> confirmed ──> in_progress ──> completed
//!     │             │              │
//!     ├─────────────┼──────────────┴──> cancelled
//!     │             │
//!     └─────────────┴──> no_show   (only after the start time has passed)
//! ```
//!
//! Completed, cancelled and no_show are terminal. Skipping confirmation is
//! not allowed; a walk-in still gets confirmed first.

use chrono::NaiveDateTime;

use super::error::{SchedulingError, SchedulingResult};
use crate::api::AppointmentStatus;

/// Statuses reachable in one step from `from`.
pub fn allowed_transitions(from: AppointmentStatus) -> &'static [AppointmentStatus] {
    use AppointmentStatus::*;
    match from {
        Scheduled => &[Confirmed, Cancelled, NoShow],
        Confirmed => &[InProgress, Cancelled, NoShow],
        InProgress => &[Completed, Cancelled],
        Completed | Cancelled | NoShow => &[],
    }
}

/// Whether a status has no outgoing transitions.
pub fn is_terminal(status: AppointmentStatus) -> bool {
    allowed_transitions(status).is_empty()
}

/// Validate a requested status change.
///
/// `starts_at` and `now` feed the no-show guard: an appointment can only
/// be marked no_show once its start time has passed. A premature no_show
/// request is reported as an invalid transition, same as any other edge
/// the graph does not have.
pub fn validate_transition(
    from: AppointmentStatus,
    to: AppointmentStatus,
    starts_at: NaiveDateTime,
    now: NaiveDateTime,
) -> SchedulingResult<()> {
    if !allowed_transitions(from).contains(&to) {
        return Err(SchedulingError::InvalidTransition { from, to });
    }
    if to == AppointmentStatus::NoShow && now <= starts_at {
        return Err(SchedulingError::InvalidTransition { from, to });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use AppointmentStatus::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn check(from: AppointmentStatus, to: AppointmentStatus) -> SchedulingResult<()> {
        // Start well in the past so the no-show guard never interferes.
        validate_transition(from, to, at(2026, 3, 14, 14), at(2026, 3, 14, 16))
    }

    #[test]
    fn test_happy_path_edges() {
        assert!(check(Scheduled, Confirmed).is_ok());
        assert!(check(Confirmed, InProgress).is_ok());
        assert!(check(InProgress, Completed).is_ok());
    }

    #[test]
    fn test_cancellation_edges() {
        assert!(check(Scheduled, Cancelled).is_ok());
        assert!(check(Confirmed, Cancelled).is_ok());
        assert!(check(InProgress, Cancelled).is_ok());
    }

    #[test]
    fn test_no_skipping_confirmation() {
        assert!(check(Scheduled, InProgress).is_err());
        assert!(check(Scheduled, Completed).is_err());
        assert!(check(Confirmed, Completed).is_err());
    }

    #[test]
    fn test_terminal_states_are_frozen() {
        for terminal in [Completed, Cancelled, NoShow] {
            assert!(is_terminal(terminal));
            for to in [Scheduled, Confirmed, InProgress, Completed, Cancelled, NoShow] {
                let result = check(terminal, to);
                assert!(
                    result.is_err(),
                    "expected {:?} -> {:?} to be rejected",
                    terminal,
                    to
                );
            }
        }
    }

    #[test]
    fn test_self_transition_rejected() {
        assert!(check(Scheduled, Scheduled).is_err());
        assert!(check(Confirmed, Confirmed).is_err());
    }

    #[test]
    fn test_no_show_after_start_allowed() {
        let starts = at(2026, 3, 14, 14);
        let later = at(2026, 3, 14, 15);
        assert!(validate_transition(Scheduled, NoShow, starts, later).is_ok());
        assert!(validate_transition(Confirmed, NoShow, starts, later).is_ok());
    }

    #[test]
    fn test_no_show_before_start_rejected() {
        let starts = at(2026, 3, 14, 14);
        let earlier = at(2026, 3, 14, 13);
        let result = validate_transition(Scheduled, NoShow, starts, earlier);
        assert!(matches!(
            result,
            Err(SchedulingError::InvalidTransition {
                from: Scheduled,
                to: NoShow
            })
        ));
    }

    #[test]
    fn test_no_show_exactly_at_start_rejected() {
        let starts = at(2026, 3, 14, 14);
        assert!(validate_transition(Scheduled, NoShow, starts, starts).is_err());
    }

    #[test]
    fn test_in_progress_cannot_no_show() {
        assert!(check(InProgress, NoShow).is_err());
    }
}
