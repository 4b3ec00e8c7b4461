//! Decoder and animation playback for Quake III Arena MD3 models.
//!
//! ```no_run
//! use q3_md3::{Character, ClipId};
//! use glam::Mat4;
//!
//! let mut sarge = Character::load_manifest("models/players/sarge/model.txt")?;
//! sarge.set_animation(ClipId::LegsRun)?;
//! sarge.update(1.0 / 60.0);
//!
//! let pose = sarge.pose(Mat4::IDENTITY)?;
//! println!("{} vertices", pose.vertex_count());
//! # Ok::<(), q3_md3::Md3Error>(())
//! ```

pub mod animation;
pub mod attachment;
pub mod character;
pub mod common;
pub mod error;
pub mod frame;
pub mod header;
pub mod manifest;
pub mod mesh;
pub mod model;
pub mod normals;
pub mod pose;
pub mod skin;
pub mod tag;
pub mod validation;

// Re-export common types
pub use animation::{AnimationClip, AnimationTable, ClipId, ClipScope, PlaybackState};
pub use attachment::{AttachmentGraph, ModelNode, NodeId};
pub use character::{BodyPart, Character};
pub use error::{Md3Error, Result};
pub use frame::Md3Frame;
pub use header::Md3Header;
pub use manifest::CharacterManifest;
pub use mesh::{Md3Mesh, Md3Vertex};
pub use model::{DecodeOptions, Md3Model};
pub use pose::{MeshGeometry, PoseNode, RenderVertex, compose};
pub use skin::{SkinBinding, SkinFile, TextureId};
pub use tag::Md3Tag;
pub use validation::validate_clip_ranges;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
