//! REST API endpoints

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::PoseTuning;
use crate::scene::Finish;
use crate::web::sse;
use crate::AppState;

/// API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }
}

impl ApiResponse<()> {
    pub fn error(message: &str) -> Json<Self> {
        Json(Self {
            success: false,
            data: None,
            error: Some(message.to_string()),
        })
    }
}

/// Status response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub finish: String,
    pub assets_loaded: bool,
    pub tracker_alive: bool,
    pub version: String,
}

/// Get current service status
pub async fn get_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let scene = state.scene.read().await;

    ApiResponse::success(StatusResponse {
        finish: scene.finish().to_string(),
        assets_loaded: scene.has_attachments(),
        tracker_alive: state.is_tracker_alive(),
        version: crate::VERSION.to_string(),
    })
}

/// Get the current scene snapshot
pub async fn get_scene(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.scene_snapshot().await)
}

/// List the available finish presets
pub async fn list_finishes() -> impl IntoResponse {
    let names: Vec<&'static str> = Finish::ALL.iter().map(|f| f.as_str()).collect();
    ApiResponse::success(names)
}

/// Finish-change request
#[derive(Debug, Deserialize)]
pub struct SetFinishRequest {
    pub finish: String,
}

/// Switch the finish on both attachments.
///
/// Unknown finish names are rejected; the scene is not touched.
pub async fn set_finish(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SetFinishRequest>,
) -> impl IntoResponse {
    match request.finish.parse::<Finish>() {
        Ok(finish) => {
            state.set_finish(finish).await;
            tracing::info!("Finish switched to {}", finish);
            (
                StatusCode::OK,
                ApiResponse::success(finish.as_str().to_string()),
            )
                .into_response()
        }
        Err(e) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ApiResponse::error(&e.to_string()),
        )
            .into_response(),
    }
}

/// Get current configuration
pub async fn get_config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let config = state.config.read().await;
    Json(config.clone())
}

/// Runtime-tunable configuration update
#[derive(Debug, Deserialize)]
pub struct ConfigUpdate {
    #[serde(default)]
    pub tuning: Option<PoseTuning>,
    #[serde(default)]
    pub render_fps: Option<u32>,
}

pub async fn update_config(
    State(state): State<Arc<AppState>>,
    Json(update): Json<ConfigUpdate>,
) -> impl IntoResponse {
    let mut config = state.config.write().await;
    let previous = config.clone();

    if let Some(tuning) = update.tuning {
        config.tuning = tuning;
    }
    if let Some(fps) = update.render_fps {
        config.render.fps = fps;
    }

    if let Err(e) = config.validate() {
        *config = previous;
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            ApiResponse::error(&e.to_string()),
        )
            .into_response();
    }

    drop(config);
    state.signal_config_changed();
    tracing::info!("Configuration updated via API");

    (StatusCode::OK, ApiResponse::success("updated".to_string())).into_response()
}

/// SSE stream of scene snapshots
pub async fn scene_stream(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    sse::create_scene_stream(state)
}
