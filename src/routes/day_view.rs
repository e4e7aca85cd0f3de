use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Appointment;

// =========================================================
// Day view types
// =========================================================

/// One hour of the operating day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourBucket {
    /// Hour of day, 24h clock
    pub hour: u32,
    /// Display label, e.g. "08:00"
    pub label: String,
    /// Appointments starting within this hour, in start-time order
    pub appointments: Vec<Appointment>,
}

/// A single day's appointments bucketed by starting hour.
///
/// An appointment lands only in the bucket its start time falls in, no
/// matter how long it runs. Appointments starting outside the operating
/// window stay out of every bucket but still count towards the total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayViewData {
    pub date: NaiveDate,
    /// One bucket per hour of the operating window, in order
    pub buckets: Vec<HourBucket>,
    /// Every appointment on this date, bucketed or not
    pub total_appointments: usize,
}
