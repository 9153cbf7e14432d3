use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::middleware::metrics_middleware;
use super::{handlers, session, ws};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health, config and metrics
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::metrics))
        // Search session
        .route("/session", get(session::get_session))
        .route("/session/query", put(session::set_query))
        .route("/session/query", delete(session::clear_query))
        .route("/session/filters", put(session::set_filters))
        .route("/session/filters", delete(session::reset_filters))
        .route("/session/details/{id}", post(session::open_details))
        .route("/session/details", delete(session::close_details))
        .route("/session/ws", get(ws::ws_handler))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
