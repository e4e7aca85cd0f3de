//! REST surface for the scheduling core, built on axum.
//!
//! Handlers stay thin: decode the request, call
//! [`SchedulingService`](crate::scheduler::SchedulingService), map the
//! outcome onto a status code. Every scheduling rule (conflict checks,
//! lifecycle transitions, commission postings) lives in the service, so
//! compiling this module out via the `http-server` feature changes the
//! surface but never the behavior.
//!
//! # Endpoints
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | GET    | `/health` | liveness plus backend reachability |
//! | POST   | `/v1/appointments` | book an appointment |
//! | GET    | `/v1/appointments/conflicts` | dry-run conflict probe |
//! | POST   | `/v1/appointments/status` | bulk status update |
//! | GET    | `/v1/appointments/{id}` | fetch one appointment |
//! | PATCH  | `/v1/appointments/{id}` | edit fields in place |
//! | DELETE | `/v1/appointments/{id}` | remove an appointment |
//! | POST   | `/v1/appointments/{id}/reschedule` | move to a new slot |
//! | POST   | `/v1/appointments/{id}/status` | single status transition |
//! | GET    | `/v1/artists/{artist_id}/appointments` | per-artist listing |
//! | GET    | `/v1/calendar/day/{date}` | day view |
//! | GET    | `/v1/calendar/week/{date}` | week view |

#[cfg(feature = "http-server")]
pub mod handlers;

#[cfg(feature = "http-server")]
pub mod router;

#[cfg(feature = "http-server")]
pub mod state;

#[cfg(feature = "http-server")]
pub mod error;

#[cfg(feature = "http-server")]
pub mod dto;

#[cfg(feature = "http-server")]
pub use router::create_router;

#[cfg(feature = "http-server")]
pub use state::AppState;
