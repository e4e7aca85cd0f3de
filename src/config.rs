//! Scheduling configuration and environment variable handling.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Tunable knobs for the scheduling core.
///
/// Defaults match studio policy: an 08:00-19:00 operating window, weeks
/// starting on Monday and a 5 second bound on per-resource lock waits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingConfig {
    /// Maximum time to wait for a resource lock before giving up (ms)
    #[serde(default = "default_lock_wait_ms")]
    pub lock_wait_ms: u64,
    /// First hour of the operating window (inclusive, 0-23)
    #[serde(default = "default_day_start_hour")]
    pub day_start_hour: u32,
    /// End of the operating window (exclusive bucket bound, 1-24)
    #[serde(default = "default_day_end_hour")]
    pub day_end_hour: u32,
    /// Weekday the weekly view starts on ("monday", "sunday", ...)
    #[serde(default = "default_week_starts_on")]
    pub week_starts_on: String,
}

fn default_lock_wait_ms() -> u64 {
    5_000
}

fn default_day_start_hour() -> u32 {
    8
}

fn default_day_end_hour() -> u32 {
    19
}

fn default_week_starts_on() -> String {
    "monday".to_string()
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            lock_wait_ms: default_lock_wait_ms(),
            day_start_hour: default_day_start_hour(),
            day_end_hour: default_day_end_hour(),
            week_starts_on: default_week_starts_on(),
        }
    }
}

impl SchedulingConfig {
    /// Build a configuration from environment variables, falling back to
    /// defaults for anything unset.
    ///
    /// # Environment Variables
    /// - `SCHEDULING_LOCK_WAIT_MS` (optional, default: 5000)
    /// - `SCHEDULING_DAY_START_HOUR` (optional, default: 8)
    /// - `SCHEDULING_DAY_END_HOUR` (optional, default: 19)
    /// - `SCHEDULING_WEEK_STARTS_ON` (optional, default: monday)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            lock_wait_ms: env::var("SCHEDULING_LOCK_WAIT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.lock_wait_ms),
            day_start_hour: env::var("SCHEDULING_DAY_START_HOUR")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.day_start_hour),
            day_end_hour: env::var("SCHEDULING_DAY_END_HOUR")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.day_end_hour),
            week_starts_on: env::var("SCHEDULING_WEEK_STARTS_ON")
                .unwrap_or(defaults.week_starts_on),
        }
    }

    /// Validate window bounds.
    pub fn validate(&self) -> Result<(), String> {
        if self.day_start_hour >= self.day_end_hour {
            return Err(format!(
                "day_start_hour ({}) must be before day_end_hour ({})",
                self.day_start_hour, self.day_end_hour
            ));
        }
        if self.day_end_hour > 24 {
            return Err(format!(
                "day_end_hour ({}) must be at most 24",
                self.day_end_hour
            ));
        }
        if self.lock_wait_ms == 0 {
            return Err("lock_wait_ms must be positive".to_string());
        }
        Ok(())
    }

    /// Lock wait bound as a [`Duration`].
    pub fn lock_wait(&self) -> Duration {
        Duration::from_millis(self.lock_wait_ms)
    }

    /// Parsed week start, falling back to Monday for unknown strings.
    pub fn week_start(&self) -> Weekday {
        Weekday::from_str(&self.week_starts_on).unwrap_or(Weekday::Mon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SchedulingConfig::default();
        assert_eq!(config.lock_wait_ms, 5_000);
        assert_eq!(config.day_start_hour, 8);
        assert_eq!(config.day_end_hour, 19);
        assert_eq!(config.week_start(), Weekday::Mon);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_from_toml() {
        let toml = r#"
lock_wait_ms = 250
day_start_hour = 9
day_end_hour = 21
week_starts_on = "sunday"
"#;
        let config: SchedulingConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.lock_wait_ms, 250);
        assert_eq!(config.day_start_hour, 9);
        assert_eq!(config.day_end_hour, 21);
        assert_eq!(config.week_start(), Weekday::Sun);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml = r#"
day_start_hour = 10
"#;
        let config: SchedulingConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.day_start_hour, 10);
        assert_eq!(config.day_end_hour, 19);
        assert_eq!(config.lock_wait_ms, 5_000);
    }

    #[test]
    fn test_validate_rejects_inverted_window() {
        let config = SchedulingConfig {
            day_start_hour: 20,
            day_end_hour: 8,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_hour_past_midnight() {
        let config = SchedulingConfig {
            day_end_hour: 25,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_week_start_falls_back_to_monday() {
        let config = SchedulingConfig {
            week_starts_on: "someday".to_string(),
            ..Default::default()
        };
        assert_eq!(config.week_start(), Weekday::Mon);
    }

    #[test]
    fn test_lock_wait_duration() {
        let config = SchedulingConfig {
            lock_wait_ms: 1_500,
            ..Default::default()
        };
        assert_eq!(config.lock_wait(), Duration::from_millis(1_500));
    }
}
