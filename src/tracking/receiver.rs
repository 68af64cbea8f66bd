//! Face-landmark receiver
//!
//! Receives JSON-over-UDP packets from the `scripts/facemesh_tracker.py`
//! Python helper. Each packet carries the full landmark set for at most one
//! face; the latest packet always replaces the previous one.

use serde::Deserialize;
use std::net::UdpSocket;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::config::TrackingConfig;
use crate::error::{AdornaError, TrackingError};
use crate::tracking::landmarks::FaceFrame;

/// A single JSON packet from the tracker helper
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FramePacket {
    /// Whether a face was detected this frame
    pub face_detected: bool,
    /// Ordered landmark list: [x, y, z] per point in detector space
    #[serde(default)]
    pub landmarks: Vec<[f32; 3]>,
}

impl FramePacket {
    /// The face frame carried by this packet, if any.
    ///
    /// A packet with `face_detected == false` (or an empty landmark list)
    /// means "no update this tick" rather than an error.
    pub fn face_frame(&self) -> Option<FaceFrame> {
        if self.face_detected && !self.landmarks.is_empty() {
            Some(FaceFrame::new(self.landmarks.clone()))
        } else {
            None
        }
    }
}

/// Aggregated tracking data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameData {
    /// Most recently parsed packet
    pub packet: Option<FramePacket>,
    /// Whether any data has been received
    pub has_data: bool,
}

impl FrameData {
    /// The current face frame, if the latest packet carried one.
    pub fn face_frame(&self) -> Option<FaceFrame> {
        self.packet.as_ref().and_then(|p| p.face_frame())
    }
}

/// JSON-over-UDP landmark receiver
pub struct FrameReceiver {
    config: TrackingConfig,
    socket: Option<UdpSocket>,
    data: Arc<RwLock<FrameData>>,
}

impl FrameReceiver {
    /// Create a new receiver (does not bind yet)
    pub fn new(config: &TrackingConfig) -> Self {
        Self {
            config: config.clone(),
            socket: None,
            data: Arc::new(RwLock::new(FrameData::default())),
        }
    }

    /// Bind the UDP socket and start receiving
    pub fn start(&mut self) -> Result<(), AdornaError> {
        let addr = format!("{}:{}", self.config.listen_address, self.config.port);

        let socket = UdpSocket::bind(&addr).map_err(|e| {
            TrackingError::Receiver(format!("Failed to bind to {}: {}", addr, e))
        })?;

        socket.set_nonblocking(true).map_err(|e| {
            TrackingError::Receiver(format!("Failed to set non-blocking: {}", e))
        })?;

        socket
            .set_read_timeout(Some(Duration::from_millis(100)))
            .ok();

        tracing::info!("Landmark receiver listening on {}", addr);
        self.socket = Some(socket);

        Ok(())
    }

    /// Process incoming JSON packets (non-blocking)
    pub async fn process(&self) -> Result<Option<FrameData>, AdornaError> {
        let socket = match &self.socket {
            Some(s) => s,
            None => return Ok(None),
        };

        let mut buf = [0u8; 65536];

        match socket.recv(&mut buf) {
            Ok(size) if size > 0 => {
                let packet: FramePacket = serde_json::from_slice(&buf[..size])
                    .map_err(|e| TrackingError::PacketParse(e.to_string()))?;

                let mut data = self.data.write().await;
                data.packet = Some(packet);
                data.has_data = true;
            }
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                // No data available
            }
            Err(e) => {
                return Err(
                    TrackingError::Receiver(format!("Receive error: {}", e)).into()
                );
            }
        }

        Ok(Some(self.data.read().await.clone()))
    }

    /// Get the current tracking data
    pub async fn get_data(&self) -> FrameData {
        self.data.read().await.clone()
    }

    /// Check if any data has been received
    pub async fn has_data(&self) -> bool {
        self.data.read().await.has_data
    }

    /// Stop the receiver
    pub fn stop(&mut self) {
        self.socket = None;
        tracing::info!("Landmark receiver stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::landmarks::NOSE_TIP;

    fn sample_json(face_detected: bool, count: usize) -> String {
        let landmarks: Vec<[f32; 3]> = (0..count)
            .map(|i| [0.5, 0.5, i as f32 * 0.001])
            .collect();
        serde_json::json!({
            "face_detected": face_detected,
            "landmarks": landmarks,
        })
        .to_string()
    }

    #[test]
    fn test_parse_packet() {
        let json = sample_json(true, 468);
        let pkt: FramePacket = serde_json::from_str(&json).unwrap();

        assert!(pkt.face_detected);
        assert_eq!(pkt.landmarks.len(), 468);
        assert!((pkt.landmarks[NOSE_TIP][2] - 0.001).abs() < 1e-6);
    }

    #[test]
    fn test_parse_no_face() {
        let json = r#"{"face_detected":false,"landmarks":[]}"#;
        let pkt: FramePacket = serde_json::from_str(json).unwrap();
        assert!(!pkt.face_detected);
        assert!(pkt.face_frame().is_none());
    }

    #[test]
    fn test_parse_missing_landmarks_field() {
        // Helper may omit the list entirely when no face is found
        let json = r#"{"face_detected":false}"#;
        let pkt: FramePacket = serde_json::from_str(json).unwrap();
        assert!(pkt.landmarks.is_empty());
        assert!(pkt.face_frame().is_none());
    }

    #[test]
    fn test_face_frame_from_packet() {
        let json = sample_json(true, 468);
        let pkt: FramePacket = serde_json::from_str(&json).unwrap();

        let frame = pkt.face_frame().unwrap();
        assert_eq!(frame.len(), 468);
    }

    #[test]
    fn test_detected_but_empty_is_no_frame() {
        let pkt = FramePacket {
            face_detected: true,
            landmarks: vec![],
        };
        assert!(pkt.face_frame().is_none());
    }

    #[test]
    fn test_frame_data_default() {
        let data = FrameData::default();
        assert!(!data.has_data);
        assert!(data.packet.is_none());
        assert!(data.face_frame().is_none());
    }

    #[test]
    fn test_parse_garbage_fails() {
        let res: Result<FramePacket, _> = serde_json::from_str("not json");
        assert!(res.is_err());
    }
}
