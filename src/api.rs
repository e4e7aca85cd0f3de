//! Public API surface for the scheduling backend.
//!
//! This file consolidates the identifier newtypes, the domain enums and the
//! DTO re-exports for the HTTP API. All types derive Serialize/Deserialize
//! for JSON serialization.

pub use crate::routes::day_view::DayViewData;
pub use crate::routes::day_view::HourBucket;
pub use crate::routes::week_view::DayAggregates;
pub use crate::routes::week_view::WeekDayBucket;
pub use crate::routes::week_view::WeekViewData;

use serde::{Deserialize, Serialize};

/// Appointment identifier (database primary key).
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct AppointmentId(pub i64);

/// Client identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientId(pub i64);

/// Artist identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ArtistId(pub i64);

/// Work-bed identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BedId(pub i64);

impl AppointmentId {
    pub fn new(value: i64) -> Self {
        AppointmentId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl ClientId {
    pub fn new(value: i64) -> Self {
        ClientId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl ArtistId {
    pub fn new(value: i64) -> Self {
        ArtistId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl BedId {
    pub fn new(value: i64) -> Self {
        BedId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for ArtistId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for BedId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<AppointmentId> for i64 {
    fn from(id: AppointmentId) -> Self {
        id.0
    }
}

/// Kind of service an appointment books.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Tattoo,
    Piercing,
    Consultation,
}

impl ServiceType {
    /// Wire and database label for this service type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Tattoo => "tattoo",
            ServiceType::Piercing => "piercing",
            ServiceType::Consultation => "consultation",
        }
    }
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ServiceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tattoo" => Ok(ServiceType::Tattoo),
            "piercing" => Ok(ServiceType::Piercing),
            "consultation" => Ok(ServiceType::Consultation),
            other => Err(format!("unknown service type: {}", other)),
        }
    }
}

/// Lifecycle state of an appointment.
///
/// Transition rules live in [`crate::scheduler::lifecycle`]; this type only
/// carries the wire representation and the resource-holding query used by
/// conflict detection.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    /// Whether an appointment in this status still occupies its artist and bed.
    ///
    /// Cancelled and no-show appointments release both resource axes; every
    /// other status keeps its interval blocked for double-booking checks.
    pub fn holds_resources(&self) -> bool {
        !matches!(self, AppointmentStatus::Cancelled | AppointmentStatus::NoShow)
    }

    /// Wire and database label for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::InProgress => "in_progress",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::NoShow => "no_show",
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(AppointmentStatus::Scheduled),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "in_progress" => Ok(AppointmentStatus::InProgress),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            "no_show" => Ok(AppointmentStatus::NoShow),
            other => Err(format!("unknown appointment status: {}", other)),
        }
    }
}

/// Resource axis an appointment occupies.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Artist,
    Bed,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ResourceKind::Artist => "artist",
            ResourceKind::Bed => "bed",
        };
        write!(f, "{}", label)
    }
}

pub use crate::models::{Appointment, AppointmentPatch, NewAppointment, TimeSlot};

pub use crate::scheduler::conflicts::{Conflict, ConflictKind};

#[cfg(test)]
mod tests {
    use super::{AppointmentId, AppointmentStatus, ArtistId, BedId, ClientId, ResourceKind};

    #[test]
    fn test_appointment_id_new() {
        let id = AppointmentId::new(42);
        assert_eq!(id.value(), 42);
    }

    #[test]
    fn test_appointment_id_equality() {
        let id1 = AppointmentId::new(100);
        let id2 = AppointmentId::new(100);
        let id3 = AppointmentId::new(101);

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
    }

    #[test]
    fn test_appointment_id_ordering() {
        let id1 = AppointmentId::new(1);
        let id2 = AppointmentId::new(2);

        assert!(id1 < id2);
        assert!(id2 > id1);
    }

    #[test]
    fn test_appointment_id_display() {
        assert_eq!(AppointmentId::new(7).to_string(), "7");
    }

    #[test]
    fn test_client_id_new() {
        let id = ClientId::new(55);
        assert_eq!(id.value(), 55);
    }

    #[test]
    fn test_artist_id_equality() {
        let id1 = ArtistId::new(200);
        let id2 = ArtistId::new(200);
        assert_eq!(id1, id2);
    }

    #[test]
    fn test_bed_id_new() {
        let id = BedId::new(3);
        assert_eq!(id.value(), 3);
    }

    #[test]
    fn test_all_ids_hash() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(AppointmentId::new(1));
        set.insert(AppointmentId::new(2));
        set.insert(AppointmentId::new(1)); // Duplicate

        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_status_holds_resources() {
        assert!(AppointmentStatus::Scheduled.holds_resources());
        assert!(AppointmentStatus::Confirmed.holds_resources());
        assert!(AppointmentStatus::InProgress.holds_resources());
        assert!(AppointmentStatus::Completed.holds_resources());
        assert!(!AppointmentStatus::Cancelled.holds_resources());
        assert!(!AppointmentStatus::NoShow.holds_resources());
    }

    #[test]
    fn test_status_wire_labels() {
        let json = serde_json::to_string(&AppointmentStatus::NoShow).unwrap();
        assert_eq!(json, "\"no_show\"");
        let json = serde_json::to_string(&AppointmentStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }

    #[test]
    fn test_status_display_matches_wire() {
        assert_eq!(AppointmentStatus::NoShow.to_string(), "no_show");
        assert_eq!(AppointmentStatus::Scheduled.to_string(), "scheduled");
    }

    #[test]
    fn test_status_parse_roundtrip() {
        for status in [
            AppointmentStatus::Scheduled,
            AppointmentStatus::Confirmed,
            AppointmentStatus::InProgress,
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
            AppointmentStatus::NoShow,
        ] {
            let parsed: AppointmentStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert!("booked".parse::<AppointmentStatus>().is_err());
    }

    #[test]
    fn test_service_type_parse_roundtrip() {
        use super::ServiceType;

        for service in [
            ServiceType::Tattoo,
            ServiceType::Piercing,
            ServiceType::Consultation,
        ] {
            let parsed: ServiceType = service.as_str().parse().unwrap();
            assert_eq!(parsed, service);
        }
        assert!("massage".parse::<ServiceType>().is_err());
    }

    #[test]
    fn test_resource_kind_ordering() {
        // Lock keys sort artist before bed.
        assert!(ResourceKind::Artist < ResourceKind::Bed);
    }

    #[test]
    fn test_resource_kind_display() {
        assert_eq!(ResourceKind::Artist.to_string(), "artist");
        assert_eq!(ResourceKind::Bed.to_string(), "bed");
    }
}
