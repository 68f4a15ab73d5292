use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                // Request id first so the trace span can read it
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/talks", get(handlers::list_talks))
        .route("/talks/trending", get(handlers::trending_talks))
        .route("/talks/recent", get(handlers::recent_talks))
        .route("/talks/:id", get(handlers::get_talk))
        // Topics
        .route("/topics", get(handlers::list_topics))
        .route("/topics/:topic/talks", get(handlers::talks_by_topic))
        .route("/topics/:topic/toggle", post(handlers::toggle_topic))
        // User preferences
        .route("/preferences", get(handlers::get_preferences))
        .route("/favorites", get(handlers::list_favorites))
        .route(
            "/favorites/:id",
            post(handlers::add_favorite).delete(handlers::remove_favorite),
        )
        .route("/swipes", post(handlers::swipe))
        // Recommendations
        .route("/recommendations", get(handlers::recommendations))
}
