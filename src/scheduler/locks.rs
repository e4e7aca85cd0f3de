//! Keyed mutual exclusion for resource/date pairs.
//!
//! Create, update and reschedule hold a lock per `(resource kind, resource
//! id, date)` across their check-conflicts-then-persist window, so two
//! requests for the same artist or bed on the same day serialize while
//! unrelated bookings proceed in parallel. Keys are always acquired in
//! sorted order; an operation touching an artist and a bed can therefore
//! never deadlock against another operation touching the same pair.

use chrono::NaiveDate;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::api::ResourceKind;

/// One resource on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LockKey {
    pub kind: ResourceKind,
    pub resource_id: i64,
    pub date: NaiveDate,
}

impl LockKey {
    pub fn new(kind: ResourceKind, resource_id: i64, date: NaiveDate) -> Self {
        Self {
            kind,
            resource_id,
            date,
        }
    }
}

impl fmt::Display for LockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}@{}", self.kind, self.resource_id, self.date)
    }
}

/// Guards for one acquired key set; locks release on drop.
pub struct LockGuards {
    guards: Vec<OwnedMutexGuard<()>>,
}

impl LockGuards {
    /// Number of keys held.
    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

/// Registry handing out per-key async locks.
///
/// The registry keeps an entry per key it has ever seen;
/// [`ResourceLocks::purge_released`] drops entries no task currently
/// holds and is called by the scheduler after each locked operation.
pub struct ResourceLocks {
    locks: Mutex<HashMap<LockKey, Arc<AsyncMutex<()>>>>,
}

impl ResourceLocks {
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn lock_for(&self, key: LockKey) -> Arc<AsyncMutex<()>> {
        self.locks
            .lock()
            .entry(key)
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    /// Acquire every key, waiting at most `wait` for the whole set.
    ///
    /// Keys are sorted and deduplicated before acquisition. On timeout the
    /// key that could not be obtained is returned and any guards already
    /// taken are released.
    pub async fn acquire(
        &self,
        mut keys: Vec<LockKey>,
        wait: Duration,
    ) -> Result<LockGuards, LockKey> {
        keys.sort();
        keys.dedup();

        let deadline = tokio::time::Instant::now() + wait;
        let mut guards = Vec::with_capacity(keys.len());
        for key in keys {
            let lock = self.lock_for(key);
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            match tokio::time::timeout(remaining, lock.lock_owned()).await {
                Ok(guard) => guards.push(guard),
                Err(_) => return Err(key),
            }
        }
        Ok(LockGuards { guards })
    }

    /// Drop registry entries whose lock nobody holds.
    ///
    /// An `OwnedMutexGuard` keeps its `Arc` alive, so a strong count of 1
    /// means the registry holds the only reference and nobody is using or
    /// waiting on the key.
    pub fn purge_released(&self) {
        self.locks.lock().retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    /// Number of keys currently registered.
    pub fn registered(&self) -> usize {
        self.locks.lock().len()
    }
}

impl Default for ResourceLocks {
    fn default() -> Self {
        Self::new()
    }
}
