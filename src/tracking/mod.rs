//! Face tracking module
//!
//! Landmark ingestion for driving the scene:
//! - FaceMesh landmark packets (JSON over UDP) from the camera helper
//! - detector-to-render-space coordinate mapping
//! - optional auto-launched tracker subprocess

pub mod landmarks;
pub mod receiver;
pub mod subprocess;

pub use landmarks::{FaceFrame, LEFT_CHEEK, NOSE_TIP, RIGHT_CHEEK};
pub use receiver::{FrameData, FramePacket, FrameReceiver};
