//! Scene state module
//!
//! Owns the two earring attachments, the current finish, and the rules for
//! updating both: face frames drive the pose, finish changes re-tint any
//! existing attachments immediately.

pub mod assets;
pub mod attachment;
pub mod material;

pub use assets::ModelTemplate;
pub use attachment::{Attachment, MeshSurface, Side, Transform};
pub use material::{Finish, FinishPreset, PbrMaterial};

use serde::Serialize;

use crate::config::PoseTuning;
use crate::pose::{self, FacePose};
use crate::tracking::landmarks::FaceFrame;

/// The two attachment instances, created together from one template
#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentPair {
    pub left: Attachment,
    pub right: Attachment,
}

impl AttachmentPair {
    fn for_each(&mut self, mut f: impl FnMut(&mut Attachment)) {
        f(&mut self.left);
        f(&mut self.right);
    }
}

/// The complete mutable scene state.
///
/// Attachments are absent until the model loads; every operation that
/// touches them no-ops in that window. When no face is present the prior
/// pose persists unchanged.
#[derive(Debug, Clone)]
pub struct Scene {
    finish: Finish,
    attachments: Option<AttachmentPair>,
}

impl Scene {
    pub fn new(finish: Finish) -> Self {
        Self {
            finish,
            attachments: None,
        }
    }

    pub fn finish(&self) -> Finish {
        self.finish
    }

    pub fn has_attachments(&self) -> bool {
        self.attachments.is_some()
    }

    pub fn attachments(&self) -> Option<&AttachmentPair> {
        self.attachments.as_ref()
    }

    /// Create both attachments from a loaded template, applying the
    /// current finish to each new instance.
    pub fn install_template(&mut self, template: &ModelTemplate) {
        self.attachments = Some(AttachmentPair {
            left: template.instantiate(Side::Left, self.finish),
            right: template.instantiate(Side::Right, self.finish),
        });
        tracing::info!(
            "Attachments created ({} surfaces each, finish: {})",
            template.surface_count(),
            self.finish
        );
    }

    /// Switch the global finish, re-tinting any existing attachments.
    ///
    /// Before the model loads this only records the selection; attachment
    /// creation picks it up.
    pub fn set_finish(&mut self, finish: Finish) {
        self.finish = finish;
        if let Some(pair) = &mut self.attachments {
            let preset = finish.preset();
            pair.for_each(|a| a.apply_finish(&preset));
        }
        tracing::debug!("Finish set to {}", finish);
    }

    /// Apply one face frame: solve the pose and place both attachments.
    ///
    /// Returns `false` (leaving all state untouched) when attachments are
    /// absent or the frame does not yield a usable pose.
    pub fn apply_frame(&mut self, frame: &FaceFrame, tuning: &PoseTuning) -> bool {
        let Some(pair) = &mut self.attachments else {
            return false;
        };
        let Some(face_pose) = FacePose::solve(frame) else {
            return false;
        };

        pose::place(&mut pair.left, &face_pose, tuning);
        pose::place(&mut pair.right, &face_pose, tuning);
        true
    }

    /// Serializable copy of the scene for the broadcast loop and the API
    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            finish: self.finish,
            attachments: self
                .attachments
                .iter()
                .flat_map(|pair| [&pair.left, &pair.right])
                .map(AttachmentSnapshot::from)
                .collect(),
        }
    }
}

/// Immutable scene copy handed to the render loop, SSE stream, and API
#[derive(Debug, Clone, Serialize)]
pub struct SceneSnapshot {
    pub finish: Finish,
    pub attachments: Vec<AttachmentSnapshot>,
}

/// One attachment's transform and materials in wire form
#[derive(Debug, Clone, Serialize)]
pub struct AttachmentSnapshot {
    pub side: Side,
    pub position: [f32; 3],
    pub scale: f32,
    pub roll: f32,
    pub visible: bool,
    pub surfaces: Vec<MeshSurface>,
}

impl From<&Attachment> for AttachmentSnapshot {
    fn from(a: &Attachment) -> Self {
        Self {
            side: a.side,
            position: a.transform.position.to_array(),
            scale: a.transform.scale,
            roll: a.transform.roll,
            visible: a.transform.visible,
            surfaces: a.surfaces.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::material::hex_to_rgb;
    use crate::tracking::landmarks::{LEFT_CHEEK, NOSE_TIP, RIGHT_CHEEK};

    fn test_template() -> ModelTemplate {
        ModelTemplate::from_surfaces(vec![MeshSurface {
            name: "hoop".to_string(),
            material: PbrMaterial::default(),
        }])
    }

    fn frontal_frame() -> FaceFrame {
        let mut points = vec![[0.5, 0.5, 0.0]; 468];
        points[LEFT_CHEEK] = [0.35, 0.5, 0.0];
        points[RIGHT_CHEEK] = [0.65, 0.5, 0.0];
        points[NOSE_TIP] = [0.5, 0.5, 0.0];
        FaceFrame::new(points)
    }

    #[test]
    fn test_operations_noop_before_assets() {
        let mut scene = Scene::new(Finish::Gold);

        assert!(!scene.apply_frame(&frontal_frame(), &PoseTuning::default()));
        scene.set_finish(Finish::Silver);

        assert!(!scene.has_attachments());
        assert!(scene.snapshot().attachments.is_empty());
        // The selection is still recorded for later
        assert_eq!(scene.finish(), Finish::Silver);
    }

    #[test]
    fn test_install_applies_current_finish() {
        let mut scene = Scene::new(Finish::Gold);
        scene.set_finish(Finish::Rose);
        scene.install_template(&test_template());

        let pair = scene.attachments().unwrap();
        assert_eq!(
            pair.left.surfaces[0].material.base_color,
            hex_to_rgb(0xb76e79)
        );
        assert_eq!(pair.left.surfaces[0], pair.right.surfaces[0]);
    }

    #[test]
    fn test_finish_switch_retints_both() {
        let mut scene = Scene::new(Finish::Gold);
        scene.install_template(&test_template());

        scene.set_finish(Finish::Gold);
        scene.set_finish(Finish::Silver);

        let pair = scene.attachments().unwrap();
        for attachment in [&pair.left, &pair.right] {
            let mat = &attachment.surfaces[0].material;
            assert_eq!(mat.base_color, hex_to_rgb(0xe6e6e6));
            assert_eq!(mat.metalness, 1.0);
            assert_eq!(mat.roughness, 0.2);
        }
    }

    #[test]
    fn test_apply_frame_places_both_sides() {
        let mut scene = Scene::new(Finish::Gold);
        scene.install_template(&test_template());

        assert!(scene.apply_frame(&frontal_frame(), &PoseTuning::default()));

        let pair = scene.attachments().unwrap();
        assert!(pair.left.transform.visible);
        assert!(pair.right.transform.visible);
        assert!(pair.left.transform.position.x < 0.0);
        assert!(pair.right.transform.position.x > 0.0);
    }

    #[test]
    fn test_pose_frozen_without_face() {
        let mut scene = Scene::new(Finish::Gold);
        scene.install_template(&test_template());
        let tuning = PoseTuning::default();

        scene.apply_frame(&frontal_frame(), &tuning);
        let before = scene.attachments().unwrap().clone();

        // An unusable frame leaves the prior pose untouched
        assert!(!scene.apply_frame(&FaceFrame::default(), &tuning));
        assert_eq!(*scene.attachments().unwrap(), before);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut scene = Scene::new(Finish::Gold);
        scene.install_template(&test_template());
        scene.apply_frame(&frontal_frame(), &PoseTuning::default());

        let snapshot = scene.snapshot();
        assert_eq!(snapshot.finish, Finish::Gold);
        assert_eq!(snapshot.attachments.len(), 2);
        assert_eq!(snapshot.attachments[0].side, Side::Left);
        assert_eq!(snapshot.attachments[1].side, Side::Right);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["finish"], "gold");
        assert_eq!(json["attachments"][0]["side"], "left");
    }
}
