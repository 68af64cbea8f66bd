//! Landmark coordinates and the detector-to-render-space mapping.
//!
//! The detector emits normalized image coordinates: x and y in [0, 1] with y
//! growing downward, z a small depth value growing away from the camera.
//! Render space is centered on the origin with y growing upward.

use glam::Vec3;

/// Nose tip index in the 468/478-point FaceMesh topology
pub const NOSE_TIP: usize = 1;
/// Left cheek (viewer's left) index
pub const LEFT_CHEEK: usize = 234;
/// Right cheek index
pub const RIGHT_CHEEK: usize = 454;

/// Landmark count without iris refinement
pub const FACE_MESH_POINTS: usize = 468;

/// Convert one raw detector landmark into a render-space point.
///
/// Recenters x/y to the origin, flips the y axis, and compresses depth.
/// Input is not validated; the detector contract guarantees well-formed
/// landmarks.
pub fn to_render_space(raw: [f32; 3]) -> Vec3 {
    Vec3::new(
        (raw[0] - 0.5) * 2.0,
        -(raw[1] - 0.5) * 2.0,
        -raw[2] * 0.5,
    )
}

/// The ordered landmark set for one detected face in one detection cycle.
///
/// Replaced wholesale each packet; the most recent frame always wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaceFrame {
    points: Vec<[f32; 3]>,
}

impl FaceFrame {
    pub fn new(points: Vec<[f32; 3]>) -> Self {
        Self { points }
    }

    /// Render-space position of the landmark at `index`, or `None` if the
    /// frame is shorter than the requested index.
    pub fn landmark(&self, index: usize) -> Option<Vec3> {
        self.points.get(index).copied().map(to_render_space)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
