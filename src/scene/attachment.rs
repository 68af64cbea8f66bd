//! Earring attachment instances.
//!
//! Each attachment is one renderable earring with a fixed side, a mutable
//! transform, and its own copy of every mesh material. Material ownership is
//! per-instance so a finish change on one ear never bleeds into the other.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::scene::material::{FinishPreset, PbrMaterial};

/// Which ear an attachment belongs to. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Self::Left, Self::Right];

    /// Signed horizontal factor: left = -1, right = +1
    pub fn factor(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// Mutable placement state of one attachment
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Render-space position
    pub position: Vec3,
    /// Uniform scale
    pub scale: f32,
    /// In-plane rotation about the view axis, radians
    pub roll: f32,
    /// Whether the attachment is drawn this frame
    pub visible: bool,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            scale: 1.0,
            roll: 0.0,
            visible: false,
        }
    }
}

/// One mesh surface of the attachment model with its owned material
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshSurface {
    pub name: String,
    pub material: PbrMaterial,
}

/// A renderable earring instance: side, transform, and owned materials
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub side: Side,
    pub transform: Transform,
    pub surfaces: Vec<MeshSurface>,
}

impl Attachment {
    pub fn new(side: Side, surfaces: Vec<MeshSurface>) -> Self {
        Self {
            side,
            transform: Transform::default(),
            surfaces,
        }
    }

    /// Apply a finish preset to every surface of this attachment
    pub fn apply_finish(&mut self, preset: &FinishPreset) {
        for surface in &mut self.surfaces {
            surface.material.set_finish(preset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::material::{hex_to_rgb, Finish};

    fn test_attachment(side: Side) -> Attachment {
        Attachment::new(
            side,
            vec![
                MeshSurface {
                    name: "hoop".to_string(),
                    material: PbrMaterial::default(),
                },
                MeshSurface {
                    name: "pendant".to_string(),
                    material: PbrMaterial::default(),
                },
            ],
        )
    }

    #[test]
    fn test_side_factor() {
        assert_eq!(Side::Left.factor(), -1.0);
        assert_eq!(Side::Right.factor(), 1.0);
    }

    #[test]
    fn test_default_transform_hidden() {
        // Attachments stay invisible until a face frame places them
        let a = test_attachment(Side::Left);
        assert!(!a.transform.visible);
        assert_eq!(a.transform.position, Vec3::ZERO);
    }

    #[test]
    fn test_apply_finish_hits_all_surfaces() {
        let mut a = test_attachment(Side::Right);
        a.apply_finish(&Finish::Rose.preset());

        for surface in &a.surfaces {
            assert_eq!(surface.material.base_color, hex_to_rgb(0xb76e79));
            assert_eq!(surface.material.metalness, 1.0);
            assert_eq!(surface.material.roughness, 0.3);
        }
    }

    #[test]
    fn test_material_isolation_between_sides() {
        let mut left = test_attachment(Side::Left);
        let mut right = test_attachment(Side::Right);

        left.apply_finish(&Finish::Gold.preset());
        right.apply_finish(&Finish::Silver.preset());

        // Changing one side never alters the other
        assert_eq!(left.surfaces[0].material.base_color, hex_to_rgb(0xd4af37));
        assert_eq!(right.surfaces[0].material.base_color, hex_to_rgb(0xe6e6e6));
    }
}
