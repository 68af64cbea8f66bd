//! Error types for Adorna

use thiserror::Error;

/// Main error type for Adorna
#[derive(Error, Debug)]
pub enum AdornaError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Tracking error: {0}")]
    Tracking(#[from] TrackingError),

    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("Web server error: {0}")]
    Web(#[from] WebError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid configuration value: {field} - {message}")]
    InvalidValue { field: String, message: String },
}

/// Face-tracking errors
#[derive(Error, Debug)]
pub enum TrackingError {
    #[error("Receiver error: {0}")]
    Receiver(String),

    #[error("Failed to parse landmark packet: {0}")]
    PacketParse(String),

    #[error("Tracker subprocess error: {0}")]
    Subprocess(String),
}

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Failed to decode model '{path}': {message}")]
    Decode { path: String, message: String },

    #[error("Model '{0}' contains no meshes")]
    NoMeshes(String),
}

/// Scene state errors
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Unknown finish: '{0}'")]
    UnknownFinish(String),
}

/// Web server errors
#[derive(Error, Debug)]
pub enum WebError {
    #[error("Failed to bind to {addr}: {message}")]
    Bind { addr: String, message: String },
}

/// Result type alias using AdornaError
pub type Result<T> = std::result::Result<T, AdornaError>;
