//! Server-Sent Events for real-time scene updates

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::scene::SceneSnapshot;
use crate::AppState;

/// Create an SSE stream of render-loop scene snapshots
pub fn create_scene_stream(
    app_state: Arc<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = app_state.subscribe_snapshots();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(snapshot) => Some(Ok(snapshot_to_event(&snapshot))),
        Err(_) => None, // Skip lagged messages; the next snapshot supersedes them
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Convert a scene snapshot to an SSE event
fn snapshot_to_event(snapshot: &SceneSnapshot) -> Event {
    let data = serde_json::to_string(snapshot).unwrap_or_else(|_| "{}".to_string());

    Event::default().event("scene").data(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Finish, MeshSurface, ModelTemplate, PbrMaterial, Scene};

    #[test]
    fn test_snapshot_serializes_for_wire() {
        let mut scene = Scene::new(Finish::Silver);
        scene.install_template(&ModelTemplate::from_surfaces(vec![MeshSurface {
            name: "hoop".to_string(),
            material: PbrMaterial::default(),
        }]));

        let json = serde_json::to_value(scene.snapshot()).unwrap();
        assert_eq!(json["finish"], "silver");
        assert_eq!(json["attachments"].as_array().unwrap().len(), 2);
        assert_eq!(json["attachments"][1]["side"], "right");
        assert_eq!(json["attachments"][0]["visible"], false);
    }
}
