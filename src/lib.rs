//! # Inkbook
//!
//! Booking engine for a tattoo and piercing studio.
//!
//! Appointments claim an artist and, optionally, a bed for a time slot on
//! a date. Creating or moving one checks both resource axes for overlap
//! and takes per-resource-day locks to keep concurrent writers honest; a
//! validated status lifecycle posts commissions when work completes. Day
//! and week calendar projections feed the front desk UI. Persistence is a
//! pluggable repository (in-memory or Postgres), and the whole engine can
//! be served over REST with axum.
//!
//! ## Module map
//!
//! - [`api`]: identifiers, status enums, time slots
//! - [`models`]: the appointment entity plus request and patch types
//! - [`scheduler`]: conflict checks, locks, lifecycle, the service facade
//! - [`db`]: repository traits and the two storage backends
//! - [`ledger`]: commission postings
//! - [`config`]: env-tunable scheduling knobs
//! - [`services`]: calendar view computation
//! - [`routes`]: payload types for the calendar routes
//! - [`http`]: axum handlers and router (feature `http-server`)
//!

// RepositoryError embeds its ErrorContext inline, so Results carrying it run large.
#![allow(clippy::result_large_err)]
//! ## Concurrency
//!
//! Every write that moves an appointment in time or across resources runs
//! under async locks keyed by `(resource kind, resource id, date)`. Two
//! bookings for the same artist-day serialize; bookings for different
//! artists or days run in parallel. Status changes and deletes do not move
//! resources and skip the locks.

pub mod api;
pub mod config;

pub mod db;
pub mod ledger;
pub mod models;

pub mod routes;

pub mod scheduler;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
