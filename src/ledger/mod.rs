//! Financial ledger collaborator for commission side effects.
//!
//! Completing an appointment asks the ledger to turn the final price into a
//! commission record for the artist. The scheduler treats the ledger as
//! fire-and-forget: a failure here is logged and surfaced as a warning,
//! never as a failure of the status change itself. The ledger also answers
//! whether an appointment has financial records attached, which blocks
//! deletion.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::{AppointmentId, ArtistId};

/// Commission rate applied when an artist has no negotiated override.
pub const DEFAULT_COMMISSION_RATE: f64 = 0.50;

/// Errors from the financial ledger.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The ledger backend could not be reached.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),
    /// The ledger refused the request.
    #[error("commission request rejected: {0}")]
    Rejected(String),
}

/// A computed commission entry.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CommissionRecord {
    pub id: Uuid,
    pub appointment_id: AppointmentId,
    pub artist_id: ArtistId,
    /// Price the commission was computed from
    pub base_amount: f64,
    /// Rate applied (0.0 - 1.0)
    pub rate: f64,
    pub commission_amount: f64,
    pub created_at: DateTime<Utc>,
}

/// Financial collaborator consumed by the scheduler.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait CommissionLedger: Send + Sync {
    /// Compute and record the commission for a completed appointment.
    ///
    /// # Arguments
    /// * `appointment_id` - The completed appointment
    /// * `artist_id` - The artist earning the commission
    /// * `base_amount` - The appointment's final price
    ///
    /// # Returns
    /// * `Ok(CommissionRecord)` - The recorded commission
    /// * `Err(LedgerError)` - If the ledger is down or refuses the request
    async fn calculate_commission(
        &self,
        appointment_id: AppointmentId,
        artist_id: ArtistId,
        base_amount: f64,
    ) -> Result<CommissionRecord, LedgerError>;

    /// Whether any financial records reference this appointment.
    ///
    /// Deletion of an appointment is refused while this returns `true`.
    async fn has_transactions(&self, appointment_id: AppointmentId) -> Result<bool, LedgerError>;
}

struct LedgerState {
    records: Vec<CommissionRecord>,
    rates: HashMap<ArtistId, f64>,
    failing: bool,
}

/// In-memory ledger used by the bundled backends and by tests.
///
/// Keeps every emitted commission record, applies per-artist rate
/// overrides over [`DEFAULT_COMMISSION_RATE`], and can be switched into a
/// failing mode to simulate a ledger outage.
#[derive(Clone)]
pub struct RecordingLedger {
    state: Arc<RwLock<LedgerState>>,
    default_rate: f64,
}

impl RecordingLedger {
    /// Create a ledger with the standard default rate.
    pub fn new() -> Self {
        Self::with_default_rate(DEFAULT_COMMISSION_RATE)
    }

    /// Create a ledger with a custom default rate.
    pub fn with_default_rate(default_rate: f64) -> Self {
        Self {
            state: Arc::new(RwLock::new(LedgerState {
                records: Vec::new(),
                rates: HashMap::new(),
                failing: false,
            })),
            default_rate,
        }
    }

    /// Set a negotiated rate for one artist.
    pub fn set_artist_rate(&self, artist_id: ArtistId, rate: f64) {
        self.state.write().rates.insert(artist_id, rate);
    }

    /// Toggle outage simulation; while failing, every call errors.
    pub fn set_failing(&self, failing: bool) {
        self.state.write().failing = failing;
    }

    /// Every commission recorded so far, in emission order.
    pub fn records(&self) -> Vec<CommissionRecord> {
        self.state.read().records.clone()
    }

    /// Commissions recorded for one appointment.
    pub fn records_for(&self, appointment_id: AppointmentId) -> Vec<CommissionRecord> {
        self.state
            .read()
            .records
            .iter()
            .filter(|r| r.appointment_id == appointment_id)
            .cloned()
            .collect()
    }
}

impl Default for RecordingLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommissionLedger for RecordingLedger {
    async fn calculate_commission(
        &self,
        appointment_id: AppointmentId,
        artist_id: ArtistId,
        base_amount: f64,
    ) -> Result<CommissionRecord, LedgerError> {
        let mut state = self.state.write();
        if state.failing {
            return Err(LedgerError::Unavailable(
                "ledger is in simulated outage".to_string(),
            ));
        }
        if base_amount < 0.0 {
            return Err(LedgerError::Rejected(format!(
                "base amount must be non-negative, got {}",
                base_amount
            )));
        }

        let rate = state
            .rates
            .get(&artist_id)
            .copied()
            .unwrap_or(self.default_rate);
        let record = CommissionRecord {
            id: Uuid::new_v4(),
            appointment_id,
            artist_id,
            base_amount,
            rate,
            commission_amount: base_amount * rate,
            created_at: Utc::now(),
        };
        state.records.push(record.clone());
        Ok(record)
    }

    async fn has_transactions(&self, appointment_id: AppointmentId) -> Result<bool, LedgerError> {
        let state = self.state.read();
        if state.failing {
            return Err(LedgerError::Unavailable(
                "ledger is in simulated outage".to_string(),
            ));
        }
        Ok(state
            .records
            .iter()
            .any(|r| r.appointment_id == appointment_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_commission_uses_default_rate() {
        let ledger = RecordingLedger::new();
        let record = ledger
            .calculate_commission(AppointmentId::new(1), ArtistId::new(7), 500.0)
            .await
            .unwrap();

        assert_eq!(record.rate, DEFAULT_COMMISSION_RATE);
        assert_eq!(record.commission_amount, 250.0);
        assert_eq!(record.base_amount, 500.0);
    }

    #[tokio::test]
    async fn test_commission_uses_artist_override() {
        let ledger = RecordingLedger::new();
        ledger.set_artist_rate(ArtistId::new(7), 0.7);

        let record = ledger
            .calculate_commission(AppointmentId::new(1), ArtistId::new(7), 200.0)
            .await
            .unwrap();
        assert_eq!(record.rate, 0.7);
        assert!((record.commission_amount - 140.0).abs() < 1e-9);

        // Other artists keep the default.
        let record = ledger
            .calculate_commission(AppointmentId::new(2), ArtistId::new(8), 200.0)
            .await
            .unwrap();
        assert_eq!(record.rate, DEFAULT_COMMISSION_RATE);
    }

    #[tokio::test]
    async fn test_failing_mode() {
        let ledger = RecordingLedger::new();
        ledger.set_failing(true);

        let result = ledger
            .calculate_commission(AppointmentId::new(1), ArtistId::new(7), 100.0)
            .await;
        assert!(matches!(result, Err(LedgerError::Unavailable(_))));

        ledger.set_failing(false);
        let result = ledger
            .calculate_commission(AppointmentId::new(1), ArtistId::new(7), 100.0)
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_rejects_negative_base() {
        let ledger = RecordingLedger::new();
        let result = ledger
            .calculate_commission(AppointmentId::new(1), ArtistId::new(7), -5.0)
            .await;
        assert!(matches!(result, Err(LedgerError::Rejected(_))));
        assert!(ledger.records().is_empty());
    }

    #[tokio::test]
    async fn test_has_transactions() {
        let ledger = RecordingLedger::new();
        let id = AppointmentId::new(42);

        assert!(!ledger.has_transactions(id).await.unwrap());

        ledger
            .calculate_commission(id, ArtistId::new(7), 300.0)
            .await
            .unwrap();

        assert!(ledger.has_transactions(id).await.unwrap());
        assert!(!ledger.has_transactions(AppointmentId::new(43)).await.unwrap());
        assert_eq!(ledger.records_for(id).len(), 1);
    }
}
