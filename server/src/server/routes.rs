//! Router configuration for the booking system.
//!
//! Builds the complete Axum router with all endpoints.

use super::state::AppState;
use crate::api::{bookings, categories, experts};
use axum::{
    Router,
    routing::{get, patch},
};
use slotbook_web::AppError;
use slotbook_web::correlation_id_layer;
use slotbook_web::handlers::{health_check, readiness_check, websocket};
use std::path::Path;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// Build the complete Axum router.
///
/// Configures:
/// - `/api` catalog and booking endpoints, with a JSON 404 for unknown API paths
/// - `/health` and `/ready` probes
/// - `/ws` for live slot updates
/// - the web client from `static_dir`, when given, with `index.html` as fallback
pub fn build_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let api_routes = Router::new()
        .route(
            "/experts",
            get(experts::list_experts).post(experts::create_expert),
        )
        .route(
            "/experts/:id",
            get(experts::get_expert).delete(experts::delete_expert),
        )
        .route(
            "/bookings",
            get(bookings::customer_bookings).post(bookings::create_booking),
        )
        .route("/bookings/:id/status", patch(bookings::update_status))
        .route("/categories", get(categories::list_categories))
        .fallback(api_not_found);

    let router = Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/ws", get(websocket::handle))
        .nest("/api", api_routes);

    let router = match static_dir {
        Some(dir) => router.fallback_service(
            ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html"))),
        ),
        None => router,
    };

    router
        .layer(correlation_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[allow(clippy::unused_async)] // Axum handler signature requires async
async fn api_not_found() -> AppError {
    AppError::not_found("Route not found")
}
