use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handler::{self, SharedRoster};

/// Build the axum router with all Tally endpoints.
pub fn build_router(roster: SharedRoster) -> Router {
    Router::new()
        .route("/", get(handler::home_handler))
        .route("/members/:id", get(handler::member_handler))
        .route("/add-member", post(handler::add_member))
        .route("/remove-member", post(handler::remove_member))
        .route("/rename-member", post(handler::rename_member))
        .route("/add-category", post(handler::add_category))
        .route("/remove-category", post(handler::remove_category))
        .route("/add-item", post(handler::add_item))
        .route("/remove-item", post(handler::remove_item))
        .route("/assign-item", post(handler::assign_item))
        .route("/revoke-item", post(handler::revoke_item))
        .route("/update-attendance", post(handler::update_attendance))
        .route("/update-event-dates", post(handler::update_event_dates))
        .route("/check-eligibility", post(handler::check_eligibility))
        .route("/v1/health", get(handler::health_handler))
        .route("/v1/info", get(handler::info_handler))
        .with_state(roster)
}

/// [`build_router`] with per-request tracing.
pub fn build_traced_router(roster: SharedRoster) -> Router {
    build_router(roster).layer(TraceLayer::new_for_http())
}
