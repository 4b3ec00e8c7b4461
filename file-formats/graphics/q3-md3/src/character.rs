//! Player characters assembled from four models
//!
//! The lower body is the root. The upper body hangs from its `tag_torso`,
//! and the head and weapon hang from the upper body's `tag_head` and
//! `tag_weapon`. One active clip drives the lower and upper bodies; the head
//! and weapon hold their first keyframe.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use glam::Mat4;

use crate::animation::{AnimationTable, ClipId, ClipScope, PlaybackState};
use crate::attachment::{AttachmentGraph, NodeId};
use crate::error::{Md3Error, Result};
use crate::manifest::{CharacterManifest, PartFiles};
use crate::model::Md3Model;
use crate::pose::{PoseNode, compose};
use crate::skin::SkinFile;
use crate::validation::validate_clip_ranges;

/// Tag on the lower body carrying the upper body
pub const TAG_TORSO: &str = "tag_torso";
/// Tag on the upper body carrying the head
pub const TAG_HEAD: &str = "tag_head";
/// Tag on the upper body carrying the weapon
pub const TAG_WEAPON: &str = "tag_weapon";

/// The four models of a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyPart {
    Lower,
    Upper,
    Head,
    Weapon,
}

impl BodyPart {
    pub const ALL: [Self; 4] = [Self::Lower, Self::Upper, Self::Head, Self::Weapon];

    pub fn name(self) -> &'static str {
        match self {
            Self::Lower => "lower",
            Self::Upper => "upper",
            Self::Head => "head",
            Self::Weapon => "weapon",
        }
    }
}

impl fmt::Display for BodyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An animated player character
#[derive(Debug, Clone)]
pub struct Character {
    graph: AttachmentGraph,
    nodes: [NodeId; 4],
    animations: AnimationTable,
    current: ClipId,
}

impl Character {
    /// Assemble a character from decoded models.
    ///
    /// Every clip is checked against the frame counts of the models it
    /// drives before anything is linked. Missing attachment tags are logged
    /// and leave the part detached. Playback starts on `BOTH_DEATH1`.
    pub fn from_parts(
        lower: Arc<Md3Model>,
        upper: Arc<Md3Model>,
        head: Arc<Md3Model>,
        weapon: Arc<Md3Model>,
        animations: AnimationTable,
    ) -> Result<Self> {
        validate_clip_ranges(&animations, lower.frame_count(), upper.frame_count())?;

        let mut graph = AttachmentGraph::new();
        let nodes = [
            graph.add_node(BodyPart::Lower.name(), lower),
            graph.add_node(BodyPart::Upper.name(), upper),
            graph.add_node(BodyPart::Head.name(), head),
            graph.add_node(BodyPart::Weapon.name(), weapon),
        ];

        let links = [
            (BodyPart::Lower, TAG_TORSO, BodyPart::Upper),
            (BodyPart::Upper, TAG_HEAD, BodyPart::Head),
            (BodyPart::Upper, TAG_WEAPON, BodyPart::Weapon),
        ];
        for (parent, tag, child) in links {
            match graph.link(nodes[parent as usize], tag, nodes[child as usize]) {
                Ok(_) => {}
                Err(Md3Error::UnresolvedAttachment { tag }) => {
                    log::warn!("The {parent} model has no '{tag}'; {child} stays detached");
                }
                Err(err) => return Err(err),
            }
        }

        let mut character = Self {
            graph,
            nodes,
            animations,
            current: ClipId::BothDeath1,
        };
        character.set_animation(ClipId::BothDeath1)?;
        Ok(character)
    }

    /// Load every file named by a manifest and assemble the character
    pub fn load(manifest: &CharacterManifest) -> Result<Self> {
        let lower = load_part(BodyPart::Lower, &manifest.lower)?;
        let upper = load_part(BodyPart::Upper, &manifest.upper)?;
        let head = load_part(BodyPart::Head, &manifest.head)?;
        let weapon = load_part(BodyPart::Weapon, &manifest.weapon)?;
        let animations = AnimationTable::load(&manifest.animation)?;

        Self::from_parts(lower, upper, head, weapon, animations)
    }

    /// Load the manifest at `path`, then the character it describes
    pub fn load_manifest<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load(&CharacterManifest::load(path)?)
    }

    /// Switch the active clip.
    ///
    /// Death clips play on both bodies. Torso clips play on the upper body
    /// while the legs idle (`LEGS_IDLE`); leg clips play on the lower body
    /// while the torso stands (`TORSO_STAND`). Every part restarts, so the
    /// head and weapon blend with the same factor as the torso they hang
    /// from.
    pub fn set_animation(&mut self, clip: ClipId) -> Result<()> {
        let (upper_clip, lower_clip) = match clip.scope() {
            ClipScope::Both => (clip, clip),
            ClipScope::Torso => (clip, ClipId::LegsIdle),
            ClipScope::Legs => (ClipId::TorsoStand, clip),
        };

        let upper = PlaybackState::new(
            self.animations.clip(upper_clip),
            self.model(BodyPart::Upper).frame_count(),
        )?;
        let lower = PlaybackState::new(
            self.animations.clip(lower_clip),
            self.model(BodyPart::Lower).frame_count(),
        )?;

        let (upper_node, lower_node) = (self.node(BodyPart::Upper), self.node(BodyPart::Lower));
        *self.graph.playback_mut(upper_node) = upper;
        *self.graph.playback_mut(lower_node) = lower;
        for part in [BodyPart::Head, BodyPart::Weapon] {
            let node = self.node(part);
            *self.graph.playback_mut(node) = PlaybackState::hold();
        }
        self.current = clip;

        log::debug!("Playing {clip} (upper {upper_clip}, lower {lower_clip})");
        Ok(())
    }

    /// Move to the next clip, wrapping after `LEGS_TURN`
    pub fn increment_animation(&mut self) -> Result<()> {
        self.set_animation(self.current.next())
    }

    /// Advance all parts by `seconds` at the active clip's rate
    pub fn update(&mut self, seconds: f32) {
        let fps = self.animations.clip(self.current).fps;
        self.graph.advance_all(seconds * fps as f32);
    }

    /// Blended geometry of the whole character placed by `world`
    pub fn pose(&self, world: Mat4) -> Result<PoseNode> {
        compose(&self.graph, self.node(BodyPart::Lower), world)
    }

    pub fn current_animation(&self) -> ClipId {
        self.current
    }

    pub fn animations(&self) -> &AnimationTable {
        &self.animations
    }

    pub fn graph(&self) -> &AttachmentGraph {
        &self.graph
    }

    pub fn node(&self, part: BodyPart) -> NodeId {
        self.nodes[part as usize]
    }

    pub fn model(&self, part: BodyPart) -> &Md3Model {
        &self.graph.node(self.node(part)).model
    }

    pub fn playback(&self, part: BodyPart) -> &PlaybackState {
        self.graph.playback(self.node(part))
    }
}

fn load_part(part: BodyPart, files: &PartFiles) -> Result<Arc<Md3Model>> {
    let mut model = Md3Model::load(&files.model)?;
    let binding = model.bind_skin(&SkinFile::load(&files.skin)?);
    log::info!(
        "Loaded {part} model '{}': {} meshes, {} textured",
        model.name(),
        model.mesh_count(),
        binding.bound.len()
    );
    Ok(Arc::new(model))
}
