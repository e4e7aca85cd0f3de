//! Service layer for read-side projections.
//!
//! Sits between the repositories and the transport layers. Each view
//! keeps its pure computation separate from the repository-backed entry
//! point so projections stay testable without a store.

pub mod day_view;
pub mod week_view;

pub use day_view::{compute_day_view, get_day_view};
pub use week_view::{compute_week_view, day_aggregates, get_week_view, week_start_of};
