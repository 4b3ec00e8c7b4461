//! Player animation support
//!
//! This module provides:
//! - The fixed 25-clip catalog and its text description parser
//! - Per-instance playback state with looping two-keyframe stepping
//! - Column-wise blending of transforms and vertices between keyframes
//!
//! # Example
//!
//! ```rust,no_run
//! use q3_md3::animation::{AnimationTable, ClipId, PlaybackState};
//!
//! let table = AnimationTable::load("models/players/sarge/animation.cfg")?;
//! let clip = table.clip(ClipId::TorsoAttack);
//! let mut state = PlaybackState::new(clip, 153)?;
//! state.tick(0.016, clip.fps);
//! # Ok::<(), q3_md3::Md3Error>(())
//! ```

mod clip;
mod interpolation;
mod playback;
mod table;

pub use clip::{AnimationClip, CLIP_COUNT, ClipId, ClipScope, UnknownClip};
pub use interpolation::{BlendedVertex, blend_mat4, blend_vertex};
pub use playback::PlaybackState;
pub(crate) use playback::clip_range;
pub use table::AnimationTable;
