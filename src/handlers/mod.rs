pub mod booking;
pub mod health;
pub mod search;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/options", get(search::options))
        .route(
            "/api/search",
            get(search::current_results).post(search::search),
        )
        .route("/api/bookings", post(booking::start_booking))
        .route("/api/bookings/:id", get(booking::get_booking))
        .route("/api/bookings/:id/fields", post(booking::update_field))
        .route("/api/bookings/:id/submit", post(booking::submit_booking))
        .route("/api/bookings/:id/cancel", post(booking::cancel_booking))
        .route("/api/bookings/:id/events", get(booking::booking_events))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
