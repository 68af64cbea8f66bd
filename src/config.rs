//! Configuration parsing and management for Adorna

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AdornaError, ConfigError};
use crate::scene::material::Finish;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tracking: TrackingConfig,
    pub asset: AssetConfig,
    pub render: RenderConfig,
    pub http: HttpConfig,
    pub tuning: PoseTuning,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tracking: TrackingConfig::default(),
            asset: AssetConfig::default(),
            render: RenderConfig::default(),
            http: HttpConfig::default(),
            tuning: PoseTuning::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AdornaError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::ReadFile(format!("{}: {}", path.as_ref().display(), e))
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_str(s: &str) -> Result<Self, AdornaError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()).into())
    }

    /// Load configuration from default paths
    pub fn load() -> Result<Self, AdornaError> {
        let paths = [
            PathBuf::from("config.toml"),
            PathBuf::from("config/default.toml"),
            dirs_path().join("config.toml"),
        ];

        for path in &paths {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), AdornaError> {
        if self.http.enabled && self.http.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "http.port".to_string(),
                message: "Port must be greater than 0".to_string(),
            }
            .into());
        }

        if self.render.fps == 0 || self.render.fps > 240 {
            return Err(ConfigError::InvalidValue {
                field: "render.fps".to_string(),
                message: "Frame rate must be between 1 and 240".to_string(),
            }
            .into());
        }

        if self.tracking.capture_width == 0 || self.tracking.capture_height == 0 {
            return Err(ConfigError::InvalidValue {
                field: "tracking.capture_width/capture_height".to_string(),
                message: "Capture resolution must be non-zero".to_string(),
            }
            .into());
        }

        for (field, value) in [
            (
                "tracking.detection_confidence",
                self.tracking.detection_confidence,
            ),
            (
                "tracking.tracking_confidence",
                self.tracking.tracking_confidence,
            ),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: "Confidence must be between 0.0 and 1.0".to_string(),
                }
                .into());
            }
        }

        // Reject unknown finish names up front rather than at first use
        self.asset
            .default_finish
            .parse::<Finish>()
            .map_err(|e| ConfigError::InvalidValue {
                field: "asset.default_finish".to_string(),
                message: e.to_string(),
            })?;

        self.tuning.validate()?;

        if self.tracking.auto_launch {
            let path = Path::new(&self.tracking.tracker_script);
            if !path.exists() {
                tracing::warn!(
                    "Tracker auto_launch enabled but script not found at: {}",
                    self.tracking.tracker_script
                );
            }
        }

        Ok(())
    }
}

/// Face-tracker input configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Enable the landmark receiver
    pub enabled: bool,
    /// UDP port to receive landmark packets on
    pub port: u16,
    /// Listen address for UDP socket
    pub listen_address: String,
    /// Auto-launch the Python tracker subprocess
    pub auto_launch: bool,
    /// Path to the camera/FaceMesh helper script
    pub tracker_script: String,
    /// Camera device index
    pub camera_device: u32,
    /// Camera capture width
    pub capture_width: u32,
    /// Camera capture height
    pub capture_height: u32,
    /// Camera capture FPS
    pub capture_fps: u32,
    /// Maximum number of faces the detector tracks
    pub max_faces: u32,
    /// Minimum face detection confidence
    pub detection_confidence: f32,
    /// Minimum landmark tracking confidence
    pub tracking_confidence: f32,
    /// Auto-restart subprocess on crash
    pub auto_restart: bool,
    /// Delay before restarting crashed subprocess (seconds)
    pub restart_delay_secs: u64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 12360,
            listen_address: "127.0.0.1".to_string(),
            auto_launch: true,
            tracker_script: "scripts/facemesh_tracker.py".to_string(),
            camera_device: 0,
            capture_width: 640,
            capture_height: 480,
            capture_fps: 30,
            max_faces: 1,
            detection_confidence: 0.7,
            tracking_confidence: 0.7,
            auto_restart: true,
            restart_delay_secs: 3,
        }
    }
}

/// Earring model asset configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Path to the earring GLB model
    pub model_path: String,
    /// Finish applied to both attachments at startup
    pub default_finish: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            model_path: "assets/earring.glb".to_string(),
            default_finish: "gold".to_string(),
        }
    }
}

/// Scene snapshot broadcast configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Snapshot broadcast rate (frames per second)
    pub fps: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { fps: 60 }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Enable the HTTP server
    pub enabled: bool,
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Enable permissive CORS (for external viewer pages)
    pub cors_enabled: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "127.0.0.1".to_string(),
            port: 8700,
            cors_enabled: true,
        }
    }
}

/// Pose placement tuning.
///
/// All offsets are fractions of the measured face width, which keeps
/// placement invariant to camera distance and resolution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseTuning {
    /// Horizontal offset of each earring from face center
    pub ear_offset: f32,
    /// Vertical drop from face center to ear height
    pub ear_drop: f32,
    /// Extra vertical lift per unit of |yaw| (foreshortening compensation)
    pub yaw_lift: f32,
    /// Forward pull from the nose plane
    pub forward_offset: f32,
    /// Extra forward pull per unit of |yaw| (keeps earrings clear of the cheek)
    pub yaw_forward: f32,
    /// Exponential smoothing factor for position, per update
    pub position_smoothing: f32,
    /// Uniform scale as a fraction of face width
    pub scale_factor: f32,
    /// In-plane swing per unit of yaw
    pub swing_gain: f32,
    /// Exponential smoothing factor for swing, per update
    pub swing_smoothing: f32,
    /// Yaw deadband beyond which the averted-side earring is hidden
    pub visibility_yaw: f32,
}

impl Default for PoseTuning {
    fn default() -> Self {
        Self {
            ear_offset: 0.42,
            ear_drop: 0.18,
            yaw_lift: 0.04,
            forward_offset: 0.25,
            yaw_forward: 0.4,
            position_smoothing: 0.45,
            scale_factor: 0.08,
            swing_gain: 0.6,
            swing_smoothing: 0.15,
            visibility_yaw: 0.15,
        }
    }
}

impl PoseTuning {
    /// Validate tuning parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("tuning.position_smoothing", self.position_smoothing),
            ("tuning.swing_smoothing", self.swing_smoothing),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: "Smoothing factor must be in (0.0, 1.0]".to_string(),
                });
            }
        }

        if self.scale_factor <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "tuning.scale_factor".to_string(),
                message: "Scale factor must be positive".to_string(),
            });
        }

        if self.visibility_yaw < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "tuning.visibility_yaw".to_string(),
                message: "Visibility deadband must be non-negative".to_string(),
            });
        }

        Ok(())
    }
}

/// Get the platform-specific configuration directory
fn dirs_path() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        if let Some(config_dir) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(config_dir).join("adorna");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config/adorna");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join("Library/Application Support/adorna");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("adorna");
        }
    }

    PathBuf::from(".")
}
