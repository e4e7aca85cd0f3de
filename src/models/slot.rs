use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Seconds in a calendar day; slots must end at or before this mark.
const DAY_SECONDS: i64 = 86_400;

/// A booked time interval on a single calendar date.
///
/// Slots are half-open: an appointment occupies `[start, start + duration)`,
/// so a slot ending exactly when another starts does not overlap it. All
/// times are naive local wall-clock values; slots never cross midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    /// Length of the slot in minutes, always positive.
    pub duration_minutes: i64,
}

impl TimeSlot {
    /// Build a validated slot.
    ///
    /// Rejects non-positive durations and slots that would run past
    /// midnight of `date`.
    pub fn new(
        date: NaiveDate,
        start_time: NaiveTime,
        duration_minutes: i64,
    ) -> Result<Self, String> {
        if duration_minutes <= 0 {
            return Err(format!(
                "duration_minutes must be positive, got {}",
                duration_minutes
            ));
        }
        let slot = Self {
            date,
            start_time,
            duration_minutes,
        };
        if slot.end_seconds() > DAY_SECONDS {
            return Err(format!(
                "appointment starting at {} with duration {} min would cross midnight",
                start_time, duration_minutes
            ));
        }
        Ok(slot)
    }

    /// Seconds elapsed from midnight to the slot start.
    pub fn start_seconds(&self) -> i64 {
        self.start_time.num_seconds_from_midnight() as i64
    }

    /// Seconds elapsed from midnight to the slot end (exclusive bound).
    ///
    /// A slot ending exactly at midnight yields 86400.
    pub fn end_seconds(&self) -> i64 {
        self.start_seconds() + self.duration_minutes * 60
    }

    /// End of the slot as a wall-clock time.
    ///
    /// A slot ending exactly at midnight renders as 00:00; comparisons
    /// should use [`TimeSlot::end_seconds`] instead.
    pub fn end_time(&self) -> NaiveTime {
        let secs = (self.end_seconds() % DAY_SECONDS) as u32;
        NaiveTime::from_num_seconds_from_midnight_opt(secs, 0)
            .unwrap_or(NaiveTime::MIN)
    }

    /// Hour of day (0-23) in which the slot starts.
    pub fn starting_hour(&self) -> u32 {
        self.start_time.hour()
    }

    /// Check if this slot overlaps another.
    ///
    /// Intervals are half-open with strict inequality on both bounds:
    /// `a.start < b.end && b.start < a.end`, and only when both slots fall
    /// on the same date.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.date == other.date
            && self.start_seconds() < other.end_seconds()
            && other.start_seconds() < self.end_seconds()
    }
}

impl std::fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}+{}min",
            self.date,
            self.start_time.format("%H:%M"),
            self.duration_minutes
        )
    }
}
