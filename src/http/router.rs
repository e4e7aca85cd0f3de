//! Route table and middleware stack.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Assemble the full application router.
///
/// Everything except `/health` hangs off the `/v1` prefix. CORS is wide
/// open, which suits a front desk talking to a local server; tighten it
/// before exposing the API beyond the studio network.
pub fn create_router(state: AppState) -> Router {
    let api_v1 = Router::new()
        .route("/appointments", post(handlers::create_appointment))
        .route("/appointments/conflicts", get(handlers::check_conflicts))
        .route("/appointments/status", post(handlers::bulk_update_status))
        .route("/appointments/{appointment_id}", get(handlers::get_appointment))
        .route("/appointments/{appointment_id}", patch(handlers::update_appointment))
        .route("/appointments/{appointment_id}", delete(handlers::delete_appointment))
        .route("/appointments/{appointment_id}/reschedule", post(handlers::reschedule_appointment))
        .route("/appointments/{appointment_id}/status", post(handlers::update_status))
        .route("/artists/{artist_id}/appointments", get(handlers::artist_appointments))
        .route("/calendar/day/{date}", get(handlers::day_view))
        .route("/calendar/week/{date}", get(handlers::week_view));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        // Appointment payloads are small; cap request bodies accordingly.
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
