//! Metal finish presets and PBR material state.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::SceneError;

/// A named metal appearance preset.
///
/// The set is fixed at compile time; there is no dynamic finish
/// registration. Unknown names are rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Finish {
    Gold,
    Silver,
    Rose,
}

impl Default for Finish {
    fn default() -> Self {
        Self::Gold
    }
}

impl Finish {
    pub const ALL: [Finish; 3] = [Self::Gold, Self::Silver, Self::Rose];

    /// The (color, metalness, roughness) triple for this finish
    pub fn preset(self) -> FinishPreset {
        match self {
            Self::Gold => FinishPreset {
                color: 0xd4af37,
                metalness: 1.0,
                roughness: 0.25,
            },
            Self::Silver => FinishPreset {
                color: 0xe6e6e6,
                metalness: 1.0,
                roughness: 0.2,
            },
            Self::Rose => FinishPreset {
                color: 0xb76e79,
                metalness: 1.0,
                roughness: 0.3,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gold => "gold",
            Self::Silver => "silver",
            Self::Rose => "rose",
        }
    }
}

impl std::fmt::Display for Finish {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Finish {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gold" => Ok(Self::Gold),
            "silver" => Ok(Self::Silver),
            "rose" | "rose_gold" => Ok(Self::Rose),
            other => Err(SceneError::UnknownFinish(other.to_string())),
        }
    }
}

/// Immutable preset values: sRGB hex color, metalness, roughness
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinishPreset {
    pub color: u32,
    pub metalness: f32,
    pub roughness: f32,
}

/// Mutable PBR material state of one mesh surface
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PbrMaterial {
    /// Base color as linear-ish [r, g, b] in [0, 1]
    pub base_color: [f32; 3],
    pub metalness: f32,
    pub roughness: f32,
}

impl Default for PbrMaterial {
    fn default() -> Self {
        Self {
            base_color: [1.0, 1.0, 1.0],
            metalness: 0.0,
            roughness: 1.0,
        }
    }
}

impl PbrMaterial {
    /// Overwrite this material's surface values with a finish preset
    pub fn set_finish(&mut self, preset: &FinishPreset) {
        self.base_color = hex_to_rgb(preset.color);
        self.metalness = preset.metalness;
        self.roughness = preset.roughness;
    }
}

/// Expand a 24-bit hex color into [r, g, b] components in [0, 1]
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}
