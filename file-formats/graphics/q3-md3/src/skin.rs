//! Skin description files
//!
//! A `.skin` file maps mesh names to texture paths, one `mesh,texture` pair
//! per line. Lines naming attachment points (`tag_*`) carry no texture and
//! are skipped.

use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{Md3Error, Result};
use crate::model::Md3Model;

/// Prefix of skin lines that name attachment points instead of meshes
pub const TAG_PREFIX: &str = "tag_";

/// Index into a model's bound texture list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct TextureId(pub u32);

impl fmt::Display for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One `mesh,texture` line
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct SkinEntry {
    pub mesh_name: String,
    pub texture_path: String,
}

/// A parsed skin description
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkinFile {
    pub entries: Vec<SkinEntry>,
}

impl SkinFile {
    /// Parse skin text.
    ///
    /// Blank lines and `tag_` lines are ignored; a line without a comma is
    /// skipped with a warning.
    pub fn parse(text: &str) -> Self {
        let mut entries = Vec::new();

        for (number, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(TAG_PREFIX) {
                continue;
            }

            match line.split_once(',') {
                Some((mesh, texture)) => entries.push(SkinEntry {
                    mesh_name: mesh.trim().to_string(),
                    texture_path: texture.trim().to_string(),
                }),
                None => log::warn!("Skin line {} has no comma: {:?}", number + 1, line),
            }
        }

        Self { entries }
    }

    /// Read and parse a skin file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading skin from {}", path.display());
        Ok(Self::parse(&fs::read_to_string(path)?))
    }
}

/// Outcome of binding a skin to a model
#[derive(Debug, Default)]
pub struct SkinBinding {
    /// Meshes that received a texture, with the texture they received
    pub bound: Vec<(String, TextureId)>,
    /// Skin lines whose mesh name matched nothing
    pub unbound: Vec<Md3Error>,
}

impl SkinBinding {
    pub fn is_complete(&self) -> bool {
        self.unbound.is_empty()
    }
}

impl Md3Model {
    /// Bind textures to meshes by exact name.
    ///
    /// Each matched line appends its texture path to [`Md3Model::textures`]
    /// and points the mesh at it. Unmatched names are logged and reported as
    /// [`Md3Error::UnboundSkin`]; the mesh list is left untouched for them.
    pub fn bind_skin(&mut self, skin: &SkinFile) -> SkinBinding {
        let mut binding = SkinBinding::default();

        for entry in &skin.entries {
            let Some(mesh) = self
                .meshes
                .iter_mut()
                .find(|m| m.header.name == entry.mesh_name)
            else {
                log::warn!(
                    "Skin entry '{}' matches no mesh in '{}'",
                    entry.mesh_name,
                    self.header.name
                );
                binding.unbound.push(Md3Error::UnboundSkin {
                    mesh: entry.mesh_name.clone(),
                });
                continue;
            };

            let id = TextureId(self.textures.len() as u32);
            self.textures.push(entry.texture_path.clone());
            mesh.texture = Some(id);
            binding.bound.push((entry.mesh_name.clone(), id));
        }

        binding
    }

    /// Texture path bound to a mesh, if any
    pub fn texture_path(&self, id: TextureId) -> Option<&str> {
        self.textures.get(id.0 as usize).map(String::as_str)
    }
}
