//! Composition of an attachment graph into world-space geometry
//!
//! [`compose`] walks the graph depth first. Every node gets two accumulated
//! transforms, one built from the tags of each ancestor's current keyframe
//! and one from their next keyframes. Vertices of the current keyframe are
//! placed with the first, vertices of the next keyframe with the second, and
//! the two results are blended by the node's interpolation factor.

use custom_debug::Debug;
use glam::{Mat4, Vec2, Vec3};
use md3_utils::debug;

use crate::animation::{blend_mat4, blend_vertex};
use crate::attachment::{AttachmentGraph, NodeId};
use crate::error::Result;
use crate::mesh::Md3Mesh;
use crate::normals::{self, NormalTable};
use crate::skin::TextureId;

/// One vertex ready for submission
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

/// Blended geometry of one mesh
#[derive(Debug, Clone, PartialEq)]
pub struct MeshGeometry {
    pub name: String,
    pub texture: Option<TextureId>,
    #[debug(with = debug::trimmed_collection_fmt)]
    pub vertices: Vec<RenderVertex>,
    #[debug(with = debug::trimmed_collection_fmt)]
    pub indices: Vec<u32>,
}

/// A node of the composed pose tree
#[derive(Debug, Clone, PartialEq)]
pub struct PoseNode {
    pub node: NodeId,
    /// Label of the graph node
    pub name: String,
    /// Tag on the parent this node hangs from; `None` for the root
    pub tag: Option<String>,
    /// Accumulated transform at the parents' current keyframes
    pub world: Mat4,
    /// Accumulated transform at the parents' next keyframes
    pub world_next: Mat4,
    /// Column blend of `world` and `world_next`
    pub blended: Mat4,
    pub meshes: Vec<MeshGeometry>,
    pub children: Vec<PoseNode>,
}

impl PoseNode {
    /// This node and all descendants, depth first
    pub fn iter(&self) -> impl Iterator<Item = &PoseNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// Vertices in this node and all descendants
    pub fn vertex_count(&self) -> usize {
        self.iter()
            .flat_map(|n| &n.meshes)
            .map(|m| m.vertices.len())
            .sum()
    }
}

/// Compose the subtree under `root`, placed in the world by `world`.
///
/// Fails with [`crate::Md3Error::FrameIndexOutOfRange`] if a node's playback
/// refers to a keyframe its model does not have.
pub fn compose(graph: &AttachmentGraph, root: NodeId, world: Mat4) -> Result<PoseNode> {
    compose_node(graph, root, None, world, world, normals::init())
}

fn compose_node(
    graph: &AttachmentGraph,
    id: NodeId,
    tag: Option<String>,
    world: Mat4,
    world_next: Mat4,
    normals: &NormalTable,
) -> Result<PoseNode> {
    let node = graph.node(id);
    let state = node.playback;
    let t = state.interpolation;

    let meshes = node
        .model
        .meshes
        .iter()
        .map(|mesh| {
            blend_mesh(
                mesh,
                state.current_frame,
                state.next_frame,
                &world,
                &world_next,
                normals,
                t,
            )
        })
        .collect::<Result<Vec<_>>>()?;

    let mut children = Vec::new();
    for (slot, child) in graph.children(id) {
        let current_tag = node.model.tag(state.current_frame, slot)?;
        let next_tag = node.model.tag(state.next_frame, slot)?;

        children.push(compose_node(
            graph,
            child,
            Some(current_tag.name.clone()),
            world * current_tag.to_mat4(),
            world_next * next_tag.to_mat4(),
            normals,
        )?);
    }

    Ok(PoseNode {
        node: id,
        name: node.name.clone(),
        tag,
        world,
        world_next,
        blended: blend_mat4(&world, &world_next, t),
        meshes,
        children,
    })
}

fn blend_mesh(
    mesh: &Md3Mesh,
    current_frame: usize,
    next_frame: usize,
    world: &Mat4,
    world_next: &Mat4,
    normals: &NormalTable,
    t: f32,
) -> Result<MeshGeometry> {
    let current = mesh.vertex_block(current_frame)?;
    let next = mesh.vertex_block(next_frame)?;

    let vertices = current
        .iter()
        .zip(next)
        .enumerate()
        .map(|(i, (a, b))| {
            let blended = blend_vertex(a, b, world, world_next, normals, t);
            RenderVertex {
                position: blended.position,
                normal: blended.normal,
                uv: mesh.tex_coords.get(i).copied().unwrap_or(Vec2::ZERO),
            }
        })
        .collect();

    Ok(MeshGeometry {
        name: mesh.name().to_string(),
        texture: mesh.texture,
        vertices,
        indices: mesh.indices(),
    })
}
