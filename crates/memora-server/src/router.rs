//! Router assembly for the memora HTTP API.
//!
//! [`build_router`] wires all handler functions to their routes with
//! CORS and tracing middleware layers.

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the complete axum router with all API routes.
///
/// Routes use axum 0.8 `/{param}` path syntax.
/// CORS is permissive (the web client is served from a different origin).
/// TraceLayer provides request-level logging via tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        // Study feed
        .route(
            "/decks/{deck_id}/cards/progress/{user_id}/due",
            get(handlers::study::get_due_feed),
        )
        // Per-card review progress
        .route(
            "/decks/{deck_id}/cards/{card_id}/progress/{user_id}",
            get(handlers::progress::get_progress).put(handlers::progress::update_progress),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
