//! Application state for the HTTP server.

use std::sync::Arc;

use crate::scheduler::SchedulingService;

/// Shared application state passed to all handlers.
///
/// Handlers go through the scheduler rather than the repository so every
/// write path gets conflict detection and lifecycle validation; the
/// scheduler also owns the resource lock registry, which must be shared
/// by all writers.
#[derive(Clone)]
pub struct AppState {
    /// Scheduling service all endpoints delegate to
    pub service: Arc<SchedulingService>,
}

impl AppState {
    /// Create a new application state around the given service.
    pub fn new(service: Arc<SchedulingService>) -> Self {
        Self { service }
    }
}
