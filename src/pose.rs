//! Per-frame landmark-to-pose solving.
//!
//! Derives one shared face reference frame (center, width, yaw) from three
//! cheek/nose landmarks, then places the two attachments relative to it. All
//! offsets scale with the measured face width, so placement is invariant to
//! camera distance and resolution.

use glam::Vec3;

use crate::config::PoseTuning;
use crate::scene::attachment::{Attachment, Side};
use crate::tracking::landmarks::{FaceFrame, LEFT_CHEEK, NOSE_TIP, RIGHT_CHEEK};

/// The shared reference frame computed from one face frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FacePose {
    /// Midpoint of the two cheek landmarks
    pub center: Vec3,
    /// Cheek-to-cheek distance; the single scale reference for the head
    pub width: f32,
    /// Signed head-rotation proxy: relative cheek depth over face width.
    /// Positive when the right cheek is farther from the camera.
    pub yaw: f32,
    /// Nose tip in render space
    pub nose: Vec3,
}

impl FacePose {
    /// Solve the reference frame from a face frame.
    ///
    /// Returns `None` when the frame is too short to carry the cheek/nose
    /// landmarks, or when the cheeks coincide (degenerate width).
    pub fn solve(frame: &FaceFrame) -> Option<Self> {
        let left_cheek = frame.landmark(LEFT_CHEEK)?;
        let right_cheek = frame.landmark(RIGHT_CHEEK)?;
        let nose = frame.landmark(NOSE_TIP)?;

        let width = left_cheek.distance(right_cheek);
        if width <= f32::EPSILON {
            return None;
        }

        Some(Self {
            center: (left_cheek + right_cheek) * 0.5,
            width,
            yaw: (right_cheek.z - left_cheek.z) / width,
            nose,
        })
    }

    /// The placement target for one side, before smoothing
    pub fn target(&self, side: Side, tuning: &PoseTuning) -> Vec3 {
        let s = side.factor();
        let base_y = self.center.y - self.width * tuning.ear_drop;

        Vec3::new(
            self.center.x + s * self.width * tuning.ear_offset,
            base_y - self.yaw.abs() * self.width * tuning.yaw_lift,
            self.nose.z
                - self.width * (tuning.forward_offset + self.yaw.abs() * tuning.yaw_forward),
        )
    }

    /// Whether the attachment on `side` should be visible.
    ///
    /// Hides the earring on the side of the head rotated away from the
    /// camera, with a deadband around yaw = 0 keeping both visible when
    /// near-frontal.
    pub fn side_visible(&self, side: Side, tuning: &PoseTuning) -> bool {
        match side {
            Side::Left => self.yaw < tuning.visibility_yaw,
            Side::Right => self.yaw > -tuning.visibility_yaw,
        }
    }
}

/// Place one attachment against the solved pose, mutating its transform.
///
/// Position and swing are exponentially smoothed toward their targets to
/// damp detector jitter; scale and visibility are set directly.
pub fn place(attachment: &mut Attachment, pose: &FacePose, tuning: &PoseTuning) {
    let target = pose.target(attachment.side, tuning);
    let t = &mut attachment.transform;

    t.position += (target - t.position) * tuning.position_smoothing;
    t.scale = pose.width * tuning.scale_factor;

    let swing = attachment.side.factor() * pose.yaw * tuning.swing_gain;
    t.roll += (swing - t.roll) * tuning.swing_smoothing;

    t.visible = pose.side_visible(attachment.side, tuning);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::landmarks::to_render_space;

    const EPS: f32 = 1e-5;

    /// Build a frame whose cheek/nose landmarks map to the given
    /// render-space points (inverts the normalizer).
    fn frame_with(left: Vec3, right: Vec3, nose: Vec3) -> FaceFrame {
        fn raw(p: Vec3) -> [f32; 3] {
            [p.x / 2.0 + 0.5, -p.y / 2.0 + 0.5, -p.z / 0.5]
        }

        let mut points = vec![[0.5, 0.5, 0.0]; 468];
        points[LEFT_CHEEK] = raw(left);
        points[RIGHT_CHEEK] = raw(right);
        points[NOSE_TIP] = raw(nose);

        // Sanity: the inverse mapping must round-trip
        assert!(to_render_space(points[LEFT_CHEEK]).distance(left) < EPS);
        FaceFrame::new(points)
    }

    fn frontal_frame() -> FaceFrame {
        frame_with(
            Vec3::new(-0.3, 0.0, 0.0),
            Vec3::new(0.3, 0.0, 0.0),
            Vec3::ZERO,
        )
    }

    #[test]
    fn test_width_symmetric_and_positive() {
        let a = Vec3::new(-0.3, 0.1, 0.02);
        let b = Vec3::new(0.25, -0.05, -0.01);
        assert!((a.distance(b) - b.distance(a)).abs() < EPS);
        assert!(a.distance(b) > 0.0);
        assert_eq!(a.distance(a), 0.0);
    }

    #[test]
    fn test_degenerate_width_rejected() {
        let p = Vec3::new(0.1, 0.0, 0.0);
        let frame = frame_with(p, p, Vec3::ZERO);
        assert!(FacePose::solve(&frame).is_none());
    }

    #[test]
    fn test_short_frame_rejected() {
        let frame = FaceFrame::new(vec![[0.5, 0.5, 0.0]; 10]);
        assert!(FacePose::solve(&frame).is_none());
    }

    #[test]
    fn test_frontal_pose() {
        let pose = FacePose::solve(&frontal_frame()).unwrap();
        assert!((pose.width - 0.6).abs() < EPS);
        assert!(pose.yaw.abs() < EPS);
        assert!(pose.center.length() < EPS);
    }

    #[test]
    fn test_yaw_sign() {
        // yaw = (right.z - left.z) / width: sign follows relative cheek depth
        let pose = FacePose::solve(&frame_with(
            Vec3::new(-0.3, 0.0, -0.2),
            Vec3::new(0.3, 0.0, 0.0),
            Vec3::ZERO,
        ))
        .unwrap();
        assert!(pose.yaw > 0.0);

        let pose = FacePose::solve(&frame_with(
            Vec3::new(-0.3, 0.0, 0.0),
            Vec3::new(0.3, 0.0, -0.2),
            Vec3::ZERO,
        ))
        .unwrap();
        assert!(pose.yaw < 0.0);
    }

    #[test]
    fn test_frontal_targets() {
        let tuning = PoseTuning::default();
        let pose = FacePose::solve(&frontal_frame()).unwrap();

        let left = pose.target(Side::Left, &tuning);
        let right = pose.target(Side::Right, &tuning);

        // ±faceWidth * 0.42 = ±0.252 around center
        assert!((left.x + 0.252).abs() < EPS);
        assert!((right.x - 0.252).abs() < EPS);

        // baseY = -faceWidth * 0.18, no yaw lift when frontal
        assert!((left.y + 0.6 * 0.18).abs() < EPS);
        assert!((left.y - right.y).abs() < EPS);

        // z = nose.z - faceWidth * 0.25 when frontal
        assert!((left.z + 0.6 * 0.25).abs() < EPS);
    }

    #[test]
    fn test_turned_head_pulls_forward_and_lifts() {
        let tuning = PoseTuning::default();
        let frontal = FacePose::solve(&frontal_frame()).unwrap();
        let turned = FacePose {
            yaw: 0.5,
            ..frontal
        };

        let f = frontal.target(Side::Left, &tuning);
        let t = turned.target(Side::Left, &tuning);

        assert!(t.z < f.z, "turning must pull the earring forward");
        assert!(t.y < f.y, "turning must drop the target y");
    }

    #[test]
    fn test_visibility_deadband() {
        let tuning = PoseTuning::default();
        let base = FacePose::solve(&frontal_frame()).unwrap();

        for yaw in [-0.1, 0.0, 0.1] {
            let pose = FacePose { yaw, ..base };
            assert!(pose.side_visible(Side::Left, &tuning));
            assert!(pose.side_visible(Side::Right, &tuning));
        }

        // At and beyond the +0.15 boundary only the right side shows
        for yaw in [0.15, 0.3, 0.9] {
            let pose = FacePose { yaw, ..base };
            assert!(!pose.side_visible(Side::Left, &tuning));
            assert!(pose.side_visible(Side::Right, &tuning));
        }

        // Mirror case
        for yaw in [-0.15, -0.3, -0.9] {
            let pose = FacePose { yaw, ..base };
            assert!(pose.side_visible(Side::Left, &tuning));
            assert!(!pose.side_visible(Side::Right, &tuning));
        }
    }

    #[test]
    fn test_strong_turn_hides_right() {
        // rightCheek pushed far from the camera: yaw ≈ -0.833
        let frame = frame_with(
            Vec3::new(-0.3, 0.0, 0.0),
            Vec3::new(0.3, 0.0, -0.5),
            Vec3::ZERO,
        );
        let pose = FacePose::solve(&frame).unwrap();
        let tuning = PoseTuning::default();

        assert!(pose.yaw < -0.8);
        assert!(pose.side_visible(Side::Left, &tuning));
        assert!(!pose.side_visible(Side::Right, &tuning));
    }

    #[test]
    fn test_position_smoothing_converges_without_overshoot() {
        let tuning = PoseTuning::default();
        let pose = FacePose::solve(&frontal_frame()).unwrap();
        let target = pose.target(Side::Right, &tuning);

        let mut attachment = Attachment::new(Side::Right, vec![]);
        let mut last_distance = f32::INFINITY;

        for _ in 0..40 {
            place(&mut attachment, &pose, &tuning);
            let distance = attachment.transform.position.distance(target);

            // Each step closes 45% of the remaining distance, never passes it
            assert!(distance <= last_distance);
            last_distance = distance;
        }

        assert!(last_distance < 1e-4);
    }

    #[test]
    fn test_scale_set_directly() {
        let tuning = PoseTuning::default();
        let pose = FacePose::solve(&frontal_frame()).unwrap();
        let mut attachment = Attachment::new(Side::Left, vec![]);

        place(&mut attachment, &pose, &tuning);
        assert!((attachment.transform.scale - 0.6 * 0.08).abs() < EPS);

        // No smoothing: a second call with the same pose yields the same scale
        place(&mut attachment, &pose, &tuning);
        assert!((attachment.transform.scale - 0.6 * 0.08).abs() < EPS);
    }

    #[test]
    fn test_swing_smoothing_and_mirroring() {
        let tuning = PoseTuning::default();
        let base = FacePose::solve(&frontal_frame()).unwrap();
        let pose = FacePose { yaw: 0.4, ..base };

        let mut left = Attachment::new(Side::Left, vec![]);
        let mut right = Attachment::new(Side::Right, vec![]);

        for _ in 0..200 {
            place(&mut left, &pose, &tuning);
            place(&mut right, &pose, &tuning);
        }

        // Converges to side * yaw * 0.6, mirrored between sides
        let expected = 0.4 * 0.6;
        assert!((right.transform.roll - expected).abs() < 1e-3);
        assert!((left.transform.roll + expected).abs() < 1e-3);
    }
}
