use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Appointment;

// =========================================================
// Week view types
// =========================================================

/// Per-day rollups shown in the weekly calendar.
///
/// Cancelled appointments are excluded; no-shows still count, the slot
/// was consumed and any charged fee is kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayAggregates {
    /// Non-cancelled appointments on the day
    pub count: usize,
    /// Sum of `price` over the counted appointments
    pub revenue: f64,
}

/// One calendar day of the week view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekDayBucket {
    pub date: NaiveDate,
    /// Full weekday name, e.g. "Monday"
    pub weekday: String,
    /// Every appointment on the date, cancelled ones included
    pub appointments: Vec<Appointment>,
    pub aggregates: DayAggregates,
}

/// A week's appointments bucketed by calendar date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekViewData {
    /// First day of the week per the configured week start
    pub week_start: NaiveDate,
    /// Last day of the week, inclusive
    pub week_end: NaiveDate,
    /// One bucket per day, `week_start..=week_end` in order
    pub days: Vec<WeekDayBucket>,
    /// Week-wide rollup under the same non-cancelled filter
    pub totals: DayAggregates,
}
