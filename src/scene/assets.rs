//! Earring model loading and per-side instantiation.
//!
//! Decodes the GLB once into a template, then stamps out one independent
//! instance per ear. Instantiation deep-clones the material set so the two
//! sides (and the template) never share material state.

use std::path::Path;

use crate::error::{AdornaError, AssetError};
use crate::scene::attachment::{Attachment, MeshSurface, Side};
use crate::scene::material::{Finish, PbrMaterial};

/// The loaded earring model, ready to instantiate per side
#[derive(Debug, Clone)]
pub struct ModelTemplate {
    surfaces: Vec<MeshSurface>,
}

impl ModelTemplate {
    /// Build a template from an explicit surface list
    pub fn from_surfaces(surfaces: Vec<MeshSurface>) -> Self {
        Self { surfaces }
    }

    /// Decode a GLB file into a template.
    ///
    /// Fails if the file cannot be decoded or contains no meshes.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AdornaError> {
        let display = path.as_ref().display().to_string();

        let (document, _buffers, _images) =
            gltf::import(path.as_ref()).map_err(|e| AssetError::Decode {
                path: display.clone(),
                message: e.to_string(),
            })?;

        let mut surfaces = Vec::new();
        for mesh in document.meshes() {
            let prim_count = mesh.primitives().count();
            for (prim_index, primitive) in mesh.primitives().enumerate() {
                let pbr = primitive.material().pbr_metallic_roughness();
                let [r, g, b, _a] = pbr.base_color_factor();

                let name = match mesh.name() {
                    Some(n) if prim_count > 1 => {
                        format!("{}.{}", n, prim_index)
                    }
                    Some(n) => n.to_string(),
                    None => format!("mesh{}.{}", mesh.index(), prim_index),
                };

                surfaces.push(MeshSurface {
                    name,
                    material: PbrMaterial {
                        base_color: [r, g, b],
                        metalness: pbr.metallic_factor(),
                        roughness: pbr.roughness_factor(),
                    },
                });
            }
        }

        if surfaces.is_empty() {
            return Err(AssetError::NoMeshes(display).into());
        }

        tracing::info!("Loaded earring model ({} surfaces)", surfaces.len());
        Ok(Self { surfaces })
    }

    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// Stamp out one attachment for the given side.
    ///
    /// Materials are cloned per instance and the current finish applied
    /// immediately, so the instance starts tinted and fully independent.
    pub fn instantiate(&self, side: Side, finish: Finish) -> Attachment {
        let mut attachment = Attachment::new(side, self.surfaces.clone());
        attachment.apply_finish(&finish.preset());
        attachment
    }
}
