//! Weekly calendar projection.
//!
//! Buckets a week of appointments by calendar date and attaches per-day
//! count and revenue aggregates. The week's start follows the configured
//! first weekday, Monday unless set otherwise.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use futures::future::try_join_all;
use log::debug;

use crate::api::AppointmentStatus;
use crate::config::SchedulingConfig;
use crate::db::repository::{AppointmentRepository, RepositoryResult};
use crate::models::Appointment;
use crate::routes::week_view::{DayAggregates, WeekDayBucket, WeekViewData};

/// The first day of the week containing `date`.
///
/// # Arguments
/// * `date` - Any date within the week
/// * `first_day` - Which weekday the week starts on
pub fn week_start_of(date: NaiveDate, first_day: Weekday) -> NaiveDate {
    let offset =
        (7 + date.weekday().num_days_from_monday() - first_day.num_days_from_monday()) % 7;
    date - Duration::days(i64::from(offset))
}

/// Count and revenue over non-cancelled appointments.
///
/// No-shows still count: the slot was consumed and any charged fee kept.
/// An unpriced appointment contributes 0 to revenue.
pub fn day_aggregates(appointments: &[Appointment]) -> DayAggregates {
    let mut count = 0;
    let mut revenue = 0.0;
    for appointment in appointments {
        if appointment.status == AppointmentStatus::Cancelled {
            continue;
        }
        count += 1;
        revenue += appointment.price.unwrap_or(0.0);
    }
    DayAggregates { count, revenue }
}

/// Assemble the week view from already-fetched days.
///
/// `days` must be in calendar order; every appointment stays in its
/// day's bucket (cancelled ones included) while the aggregates apply the
/// non-cancelled filter. Idempotent over the same input.
pub fn compute_week_view(
    week_start: NaiveDate,
    days: Vec<(NaiveDate, Vec<Appointment>)>,
) -> WeekViewData {
    let week_end = days.last().map_or(week_start, |(date, _)| *date);
    let mut buckets = Vec::with_capacity(days.len());
    let mut totals = DayAggregates::default();

    for (date, appointments) in days {
        let aggregates = day_aggregates(&appointments);
        totals.count += aggregates.count;
        totals.revenue += aggregates.revenue;
        buckets.push(WeekDayBucket {
            date,
            weekday: date.format("%A").to_string(),
            appointments,
            aggregates,
        });
    }

    WeekViewData {
        week_start,
        week_end,
        days: buckets,
        totals,
    }
}

/// Fetch the week containing `reference_date` and project it.
///
/// The seven day queries run concurrently; any repository failure fails
/// the whole view.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `reference_date` - Any date within the requested week
/// * `config` - Supplies the first weekday of the week
pub async fn get_week_view<R: AppointmentRepository + ?Sized>(
    repo: &R,
    reference_date: NaiveDate,
    config: &SchedulingConfig,
) -> RepositoryResult<WeekViewData> {
    let week_start = week_start_of(reference_date, config.week_start());
    let dates: Vec<NaiveDate> = (0..7)
        .map(|offset| week_start + Duration::days(offset))
        .collect();

    let fetched = try_join_all(dates.iter().map(|&date| repo.appointments_on(date))).await?;
    debug!(
        "Week view: {} appointment(s) in week of {}",
        fetched.iter().map(Vec::len).sum::<usize>(),
        week_start
    );

    Ok(compute_week_view(
        week_start,
        dates.into_iter().zip(fetched).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AppointmentId, ArtistId, ClientId, ServiceType};
    use crate::db::repositories::LocalRepository;
    use crate::models::NewAppointment;
    use chrono::{NaiveTime, Utc};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn appointment(
        id: i64,
        date: NaiveDate,
        status: AppointmentStatus,
        price: Option<f64>,
    ) -> Appointment {
        Appointment {
            id: AppointmentId::new(id),
            client_id: ClientId::new(1),
            artist_id: ArtistId::new(7),
            bed_id: None,
            date,
            start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            duration_minutes: 60,
            service_type: ServiceType::Tattoo,
            status,
            price,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_week_start_monday() {
        // 2026-03-14 is a Saturday.
        assert_eq!(
            week_start_of(day(2026, 3, 14), Weekday::Mon),
            day(2026, 3, 9)
        );
        // A Monday is its own week start.
        assert_eq!(week_start_of(day(2026, 3, 9), Weekday::Mon), day(2026, 3, 9));
    }

    #[test]
    fn test_week_start_sunday() {
        assert_eq!(
            week_start_of(day(2026, 3, 14), Weekday::Sun),
            day(2026, 3, 8)
        );
        assert_eq!(week_start_of(day(2026, 3, 8), Weekday::Sun), day(2026, 3, 8));
    }

    #[test]
    fn test_week_start_crosses_month_boundary() {
        // 2026-04-02 is a Thursday; its Monday is in March.
        assert_eq!(
            week_start_of(day(2026, 4, 2), Weekday::Mon),
            day(2026, 3, 30)
        );
    }

    #[test]
    fn test_aggregates_exclude_only_cancelled() {
        let appointments = vec![
            appointment(1, day(2026, 3, 9), AppointmentStatus::Completed, Some(200.0)),
            appointment(2, day(2026, 3, 9), AppointmentStatus::Cancelled, Some(999.0)),
            appointment(3, day(2026, 3, 9), AppointmentStatus::NoShow, Some(50.0)),
            appointment(4, day(2026, 3, 9), AppointmentStatus::Scheduled, None),
        ];
        let aggregates = day_aggregates(&appointments);
        assert_eq!(aggregates.count, 3);
        assert_eq!(aggregates.revenue, 250.0);
    }

    #[test]
    fn test_compute_week_view_buckets_and_totals() {
        let monday = day(2026, 3, 9);
        let days: Vec<(NaiveDate, Vec<Appointment>)> = (0..7)
            .map(|offset| {
                let date = monday + Duration::days(offset);
                let mut appointments = Vec::new();
                if offset == 0 {
                    appointments.push(appointment(1, date, AppointmentStatus::Completed, Some(300.0)));
                    appointments.push(appointment(2, date, AppointmentStatus::Cancelled, Some(100.0)));
                }
                if offset == 3 {
                    appointments.push(appointment(3, date, AppointmentStatus::Confirmed, Some(120.0)));
                }
                (date, appointments)
            })
            .collect();

        let view = compute_week_view(monday, days);
        assert_eq!(view.week_start, monday);
        assert_eq!(view.week_end, day(2026, 3, 15));
        assert_eq!(view.days.len(), 7);
        assert_eq!(view.days[0].weekday, "Monday");
        // Cancelled stays visible in the bucket.
        assert_eq!(view.days[0].appointments.len(), 2);
        assert_eq!(view.days[0].aggregates.count, 1);
        assert_eq!(view.days[0].aggregates.revenue, 300.0);
        assert_eq!(view.days[3].aggregates.count, 1);
        assert_eq!(view.totals.count, 2);
        assert_eq!(view.totals.revenue, 420.0);
    }

    #[tokio::test]
    async fn test_get_week_view_spans_configured_week() {
        let repo = LocalRepository::new();
        for (d, price) in [(day(2026, 3, 9), 150.0), (day(2026, 3, 15), 90.0)] {
            repo.store_appointment(&NewAppointment {
                client_id: ClientId::new(1),
                artist_id: ArtistId::new(7),
                bed_id: None,
                date: d,
                start_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
                duration_minutes: 30,
                service_type: ServiceType::Consultation,
                price: Some(price),
                notes: None,
            })
            .await
            .unwrap();
        }
        // Just outside the week.
        repo.store_appointment(&NewAppointment {
            client_id: ClientId::new(1),
            artist_id: ArtistId::new(7),
            bed_id: None,
            date: day(2026, 3, 16),
            start_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            duration_minutes: 30,
            service_type: ServiceType::Consultation,
            price: Some(999.0),
            notes: None,
        })
        .await
        .unwrap();

        let view = get_week_view(&repo, day(2026, 3, 11), &SchedulingConfig::default())
            .await
            .unwrap();
        assert_eq!(view.week_start, day(2026, 3, 9));
        assert_eq!(view.week_end, day(2026, 3, 15));
        assert_eq!(view.totals.count, 2);
        assert_eq!(view.totals.revenue, 240.0);
    }

    #[tokio::test]
    async fn test_get_week_view_honors_sunday_start() {
        let repo = LocalRepository::new();
        let config = SchedulingConfig {
            week_starts_on: "sunday".to_string(),
            ..Default::default()
        };
        let view = get_week_view(&repo, day(2026, 3, 11), &config).await.unwrap();
        assert_eq!(view.week_start, day(2026, 3, 8));
        assert_eq!(view.week_end, day(2026, 3, 14));
    }
}
