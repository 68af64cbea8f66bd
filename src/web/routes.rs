//! Route definitions for the viewer and control API

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::HttpConfig;
use crate::AppState;

use super::{api, page};

/// Create the main router with all routes
pub fn create_router(app_state: Arc<AppState>, config: &HttpConfig) -> Router {
    let cors = if config.cors_enabled {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    Router::new()
        // Viewer page (camera feed + WebGL overlay)
        .route("/", get(page::viewer_page))
        // API endpoints (JSON)
        .route("/api/status", get(api::get_status))
        .route("/api/scene", get(api::get_scene))
        .route("/api/finishes", get(api::list_finishes))
        .route("/api/finish", post(api::set_finish))
        .route("/api/config", get(api::get_config))
        .route("/api/config", post(api::update_config))
        // SSE stream of scene snapshots
        .route("/api/stream", get(api::scene_stream))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
