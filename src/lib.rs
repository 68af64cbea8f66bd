//! Adorna - Headless AR Earring Try-On Service
//!
//! A Rust service that:
//! - Receives face-landmark frames from a camera/FaceMesh helper over UDP
//! - Solves per-frame 3D poses for two symmetric earring attachments
//! - Manages a switchable metal-finish appearance (gold, silver, rose)
//! - Streams scene snapshots to a browser viewer that composites the
//!   overlay on the live camera feed

pub mod config;
pub mod error;
pub mod pose;
pub mod render;
pub mod scene;
pub mod tracking;
pub mod web;

pub use config::Config;
pub use error::{AdornaError, Result};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, Notify, RwLock};

use scene::{Finish, Scene, SceneSnapshot};

/// Application state shared across all components
#[derive(Debug)]
pub struct AppState {
    /// Current configuration
    pub config: RwLock<Config>,
    /// Current scene (attachments, finish)
    pub scene: RwLock<Scene>,
    /// Channel for scene snapshot broadcasts
    pub snapshot_tx: broadcast::Sender<SceneSnapshot>,
    /// Shutdown signal
    pub shutdown_tx: broadcast::Sender<()>,
    /// Whether the tracker has delivered any data yet
    pub tracker_alive: AtomicBool,
    /// Config changed signal
    pub config_changed: Notify,
}

impl AppState {
    /// Create a new application state with the given configuration.
    ///
    /// The default finish was validated by `Config::validate`; a bad value
    /// here falls back rather than panicking.
    pub fn new(config: Config) -> Arc<Self> {
        let (snapshot_tx, _) = broadcast::channel(64);
        let (shutdown_tx, _) = broadcast::channel(1);

        let finish = config
            .asset
            .default_finish
            .parse::<Finish>()
            .unwrap_or_default();

        Arc::new(Self {
            config: RwLock::new(config),
            scene: RwLock::new(Scene::new(finish)),
            snapshot_tx,
            shutdown_tx,
            tracker_alive: AtomicBool::new(false),
            config_changed: Notify::new(),
        })
    }

    /// Switch the global finish, re-tinting any existing attachments
    pub async fn set_finish(&self, finish: Finish) {
        let mut scene = self.scene.write().await;
        scene.set_finish(finish);
    }

    /// Get a snapshot of the current scene
    pub async fn scene_snapshot(&self) -> SceneSnapshot {
        self.scene.read().await.snapshot()
    }

    /// Subscribe to scene snapshot broadcasts
    pub fn subscribe_snapshots(&self) -> broadcast::Receiver<SceneSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Subscribe to shutdown signal
    pub fn subscribe_shutdown(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Signal shutdown
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Record whether tracking data has arrived
    pub fn set_tracker_alive(&self, alive: bool) {
        self.tracker_alive.store(alive, Ordering::Relaxed);
    }

    /// Whether tracking data has arrived
    pub fn is_tracker_alive(&self) -> bool {
        self.tracker_alive.load(Ordering::Relaxed)
    }

    /// Signal that config has changed
    pub fn signal_config_changed(&self) {
        self.config_changed.notify_waiters();
    }

    /// Wait for config change signal
    pub async fn wait_config_changed(&self) {
        self.config_changed.notified().await;
    }
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
