//! Route definitions for the ReadyGo HTTP API.
//!
//! All routes are mounted under `/api`. Role checks happen in the services,
//! so a route only decides which service call a request reaches.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Room for multipart framing and text fields on top of the video itself.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_body = usize::try_from(state.config.media.max_video_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(FORM_OVERHEAD_BYTES);

    let api_routes = Router::new()
        .merge(customer_routes())
        .merge(owner_routes())
        .merge(review_routes())
        .merge(admin_routes())
        .route("/health", get(handlers::health::health));

    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Customer booking endpoints
fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", post(handlers::booking::create_booking))
        .route(
            "/bookings/customer",
            get(handlers::booking::list_customer_bookings),
        )
        .route("/bookings/stats", get(handlers::booking::customer_stats))
}

/// Owner dashboard and booking actions
fn owner_routes() -> Router<AppState> {
    Router::new()
        .route("/owner/bookings", get(handlers::owner::list_owner_bookings))
        .route("/owner/stats", get(handlers::owner::owner_stats))
        .route(
            "/owner/bookings/{id}/confirm-with-video",
            post(handlers::owner::confirm_booking),
        )
        .route(
            "/owner/bookings/{id}/reject",
            put(handlers::owner::reject_booking),
        )
        .route(
            "/owner/bookings/{id}/complete",
            put(handlers::owner::complete_booking),
        )
        .route(
            "/owner/bookings/{id}/report-damage",
            post(handlers::owner::report_damage),
        )
        .route(
            "/owner/damage-reports",
            get(handlers::owner::list_owner_disputes),
        )
        .route("/owner/ratings", get(handlers::owner::owner_ratings))
}

/// Feedback and dispute lookup
fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/reviews", post(handlers::review::submit_feedback))
        .route("/damage-reports/{id}", get(handlers::review::get_dispute))
}

/// Administrator endpoints
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/bookings", get(handlers::admin::list_all_bookings))
        .route(
            "/admin/damage-reports",
            get(handlers::admin::list_all_disputes),
        )
        .route(
            "/admin/damage-reports/{id}/reply",
            post(handlers::admin::reply_dispute),
        )
        .route(
            "/admin/damage-reports/{id}/resolve",
            put(handlers::admin::resolve_dispute),
        )
}
