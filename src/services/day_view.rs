//! Daily calendar projection.
//!
//! Groups a date's appointments into hour buckets over the operating
//! window. Pure computation lives in [`compute_day_view`];
//! [`get_day_view`] is the repository-backed entry point.

use chrono::NaiveDate;
use log::debug;

use crate::config::SchedulingConfig;
use crate::db::repository::{AppointmentRepository, RepositoryResult};
use crate::models::Appointment;
use crate::routes::day_view::{DayViewData, HourBucket};

/// Bucket appointments by their starting hour.
///
/// One bucket per hour in `[start_hour, end_hour)`. An appointment goes
/// into the bucket its start time falls in, regardless of duration; an
/// appointment starting outside the window is not bucketed but still
/// counts towards `total_appointments`. Idempotent over the same input.
pub fn compute_day_view(
    date: NaiveDate,
    appointments: Vec<Appointment>,
    start_hour: u32,
    end_hour: u32,
) -> DayViewData {
    let total_appointments = appointments.len();
    let mut buckets: Vec<HourBucket> = (start_hour..end_hour)
        .map(|hour| HourBucket {
            hour,
            label: format!("{:02}:00", hour),
            appointments: Vec::new(),
        })
        .collect();

    for appointment in appointments {
        let hour = appointment.slot().starting_hour();
        if hour < start_hour || hour >= end_hour {
            continue;
        }
        buckets[(hour - start_hour) as usize]
            .appointments
            .push(appointment);
    }

    DayViewData {
        date,
        buckets,
        total_appointments,
    }
}

/// Fetch a date's appointments and bucket them by the configured window.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `date` - The calendar date to project
/// * `config` - Supplies the operating window bounds
pub async fn get_day_view<R: AppointmentRepository + ?Sized>(
    repo: &R,
    date: NaiveDate,
    config: &SchedulingConfig,
) -> RepositoryResult<DayViewData> {
    let appointments = repo.appointments_on(date).await?;
    debug!("Day view: {} appointment(s) on {}", appointments.len(), date);
    Ok(compute_day_view(
        date,
        appointments,
        config.day_start_hour,
        config.day_end_hour,
    ))
}
