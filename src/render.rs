//! Scene snapshot broadcast loop.
//!
//! Free-runs at the configured frame rate and publishes whatever scene state
//! currently exists, independent of detection cadence and asset-load status.
//! The browser viewer consumes these snapshots over SSE and does the actual
//! WebGL compositing.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::error::Result;
use crate::AppState;

/// Run the broadcast loop until shutdown.
pub async fn run_render_loop(state: Arc<AppState>) -> Result<()> {
    let mut fps = state.config.read().await.render.fps;
    let mut interval = make_interval(fps);

    let mut shutdown_rx = state.subscribe_shutdown();

    tracing::info!("Render loop started ({} fps)", fps);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let snapshot = state.scene.read().await.snapshot();
                // No subscribers is fine; the stream may connect later
                let _ = state.snapshot_tx.send(snapshot);
            }
            _ = state.wait_config_changed() => {
                let new_fps = state.config.read().await.render.fps;
                if new_fps != fps {
                    tracing::info!("Render loop rate changed: {} -> {} fps", fps, new_fps);
                    fps = new_fps;
                    interval = make_interval(fps);
                }
            }
            _ = shutdown_rx.recv() => {
                tracing::info!("Render loop shutting down");
                return Ok(());
            }
        }
    }
}

fn make_interval(fps: u32) -> tokio::time::Interval {
    let mut interval = tokio::time::interval(Duration::from_secs_f64(1.0 / fps as f64));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}
