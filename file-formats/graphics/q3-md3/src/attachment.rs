//! Models connected through named tags
//!
//! Each node owns a shared, read-only model and its own playback state. A
//! parent has one child slot per tag; linking through a tag name fills the
//! slot of the first tag with that name.

use std::sync::Arc;

use crate::animation::PlaybackState;
use crate::error::{Md3Error, Result};
use crate::model::Md3Model;

/// Handle to a node in an [`AttachmentGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A model instance in the graph
#[derive(Debug, Clone)]
pub struct ModelNode {
    /// Label used in logs and reports
    pub name: String,
    pub model: Arc<Md3Model>,
    pub playback: PlaybackState,
    /// Child per tag slot of `model`
    links: Vec<Option<NodeId>>,
}

impl ModelNode {
    pub fn links(&self) -> &[Option<NodeId>] {
        &self.links
    }
}

/// Tree of model instances joined at tags.
///
/// Edges that would make a node its own ancestor are refused, so traversal
/// from any node always terminates.
#[derive(Debug, Clone, Default)]
pub struct AttachmentGraph {
    nodes: Vec<ModelNode>,
}

impl AttachmentGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a model instance holding frame 0
    pub fn add_node(&mut self, name: impl Into<String>, model: Arc<Md3Model>) -> NodeId {
        let id = NodeId(self.nodes.len());
        let links = vec![None; model.tag_count()];
        self.nodes.push(ModelNode {
            name: name.into(),
            model,
            playback: PlaybackState::hold(),
            links,
        });
        id
    }

    /// Attach `child` to the first tag of `parent` named `tag`.
    ///
    /// Returns the slot that was filled. A slot that already had a child is
    /// overwritten.
    ///
    /// # Panics
    ///
    /// Panics if either id belongs to another graph.
    pub fn link(&mut self, parent: NodeId, tag: &str, child: NodeId) -> Result<usize> {
        let slot = self.nodes[parent.0]
            .model
            .tag_slot(tag)
            .ok_or_else(|| Md3Error::UnresolvedAttachment {
                tag: tag.to_string(),
            })?;

        if self.reaches(child, parent) {
            return Err(Md3Error::AttachmentCycle {
                tag: tag.to_string(),
            });
        }

        let previous = self.nodes[parent.0].links[slot].replace(child);
        if let Some(previous) = previous {
            log::debug!(
                "Replacing '{}' on {}.{} with '{}'",
                self.nodes[previous.0].name,
                self.nodes[parent.0].name,
                tag,
                self.nodes[child.0].name
            );
        } else {
            log::trace!(
                "Linked '{}' to {}.{} (slot {})",
                self.nodes[child.0].name,
                self.nodes[parent.0].name,
                tag,
                slot
            );
        }

        Ok(slot)
    }

    /// Whether `target` is `from` or one of its descendants
    fn reaches(&self, from: NodeId, target: NodeId) -> bool {
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            if id == target {
                return true;
            }
            stack.extend(self.nodes[id.0].links.iter().flatten());
        }
        false
    }

    pub fn node(&self, id: NodeId) -> &ModelNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut ModelNode {
        &mut self.nodes[id.0]
    }

    pub fn playback(&self, id: NodeId) -> &PlaybackState {
        &self.nodes[id.0].playback
    }

    pub fn playback_mut(&mut self, id: NodeId) -> &mut PlaybackState {
        &mut self.nodes[id.0].playback
    }

    /// Child attached at `slot`, if any
    pub fn child(&self, parent: NodeId, slot: usize) -> Option<NodeId> {
        self.nodes[parent.0].links.get(slot).copied().flatten()
    }

    /// Resolved children of a node with their tag slots
    pub fn children(&self, parent: NodeId) -> impl Iterator<Item = (usize, NodeId)> + '_ {
        self.nodes[parent.0]
            .links
            .iter()
            .enumerate()
            .filter_map(|(slot, link)| link.map(|child| (slot, child)))
    }

    /// Every node id, in insertion order
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Step every node's playback by the same frame fraction
    pub fn advance_all(&mut self, frame_fraction: f32) {
        for node in &mut self.nodes {
            node.playback.advance(frame_fraction);
        }
    }
}
