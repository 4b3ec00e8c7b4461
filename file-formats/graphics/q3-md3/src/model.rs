//! Whole-file MD3 decoding and encoding
//!
//! An [`Md3Model`] is the immutable asset produced by decoding one file:
//! keyframe bounds, the per-frame tag table and every mesh with all of its
//! keyframes. Playback state lives elsewhere so one decoded model can back
//! any number of animated instances.

use custom_debug::Debug;
use md3_utils::debug;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::common::{ensure_within, to_i32, to_usize};
use crate::error::{Md3Error, Result};
use crate::frame::Md3Frame;
use crate::header::{MD3_HEADER_SIZE, Md3Header};
use crate::mesh::Md3Mesh;
use crate::tag::Md3Tag;

/// Options controlling how strictly a file is decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Reject any version other than 15
    pub strict_version: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            strict_version: true,
        }
    }
}

/// A decoded MD3 model
#[derive(Debug, Clone, PartialEq)]
pub struct Md3Model {
    pub header: Md3Header,
    /// One entry per keyframe
    #[debug(with = debug::trimmed_collection_fmt)]
    pub frames: Vec<Md3Frame>,
    /// `frame_count * tag_count` tags; slot `s` of frame `f` is at
    /// `f * tag_count + s`
    #[debug(with = debug::trimmed_collection_fmt)]
    pub tags: Vec<Md3Tag>,
    pub meshes: Vec<Md3Mesh>,
    /// Texture paths bound from skin files, indexed by [`crate::TextureId`]
    pub textures: Vec<String>,
}

impl Md3Model {
    /// Assemble a model from decoded or generated tables.
    ///
    /// `tags` is frame-major with `tag_count` entries per frame, and every
    /// mesh must carry exactly `frames.len()` keyframes.
    pub fn new(
        name: &str,
        frames: Vec<Md3Frame>,
        tag_count: usize,
        tags: Vec<Md3Tag>,
        meshes: Vec<Md3Mesh>,
    ) -> Result<Self> {
        let mut model = Self {
            header: Md3Header::new(name),
            frames,
            tags,
            meshes,
            textures: Vec::new(),
        };
        model.header.tag_count = to_i32(tag_count, "tag count")?;
        model.update_layout()?;
        model.check_consistency()?;
        Ok(model)
    }

    /// Load a model from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading MD3 model from {}", path.display());
        let mut reader = BufReader::new(File::open(path)?);
        Self::parse(&mut reader)
    }

    /// Decode a model from an in-memory buffer
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::parse(&mut Cursor::new(data))
    }

    /// Decode a model with the default options
    pub fn parse<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        Self::parse_with_options(reader, DecodeOptions::default())
    }

    /// Decode a model.
    ///
    /// Either the whole model is returned or an error; a short read anywhere
    /// becomes [`Md3Error::MalformedAsset`].
    pub fn parse_with_options<R: Read + Seek>(
        reader: &mut R,
        options: DecodeOptions,
    ) -> Result<Self> {
        Self::decode(reader, options).map_err(Md3Error::truncation_as_malformed)
    }

    fn decode<R: Read + Seek>(reader: &mut R, options: DecodeOptions) -> Result<Self> {
        let stream_len = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;

        let header = Md3Header::parse(reader, options.strict_version)?;

        let frame_count = to_usize(header.frame_count, "frame count")?;
        let tag_count = to_usize(header.tag_count, "tag count")?;
        let mesh_count = to_usize(header.mesh_count, "mesh count")?;
        let frame_offset = to_usize(header.frame_offset, "frame offset")? as u64;
        let tag_offset = to_usize(header.tag_offset, "tag offset")? as u64;
        let mesh_offset = to_usize(header.mesh_offset, "mesh offset")? as u64;

        log::debug!(
            "MD3 '{}' v{}: {} frames, {} tags, {} meshes",
            header.name,
            header.version,
            frame_count,
            tag_count,
            mesh_count
        );

        // Frames
        ensure_within(stream_len, frame_offset, frame_count, Md3Frame::SIZE, "frame")?;
        reader.seek(SeekFrom::Start(frame_offset))?;
        let frames = (0..frame_count)
            .map(|_| Md3Frame::parse(reader))
            .collect::<Result<Vec<_>>>()?;

        // Tags
        let total_tags = frame_count
            .checked_mul(tag_count)
            .ok_or_else(|| Md3Error::MalformedAsset("tag table size overflows".to_string()))?;
        ensure_within(stream_len, tag_offset, total_tags, Md3Tag::SIZE, "tag")?;
        reader.seek(SeekFrom::Start(tag_offset))?;
        let tags = (0..total_tags)
            .map(|_| Md3Tag::parse(reader))
            .collect::<Result<Vec<_>>>()?;

        // Meshes: each record's internal offsets are relative to its own
        // start, and the next record follows after `mesh_size` bytes.
        let mut meshes = Vec::with_capacity(mesh_count.min(256));
        let mut mesh_base = mesh_offset;
        for index in 0..mesh_count {
            let mesh = Md3Mesh::parse(reader, mesh_base, stream_len)?;

            if mesh.frame_count() != frame_count {
                return Err(Md3Error::MalformedAsset(format!(
                    "mesh {index} '{}' has {} frames, model has {frame_count}",
                    mesh.name(),
                    mesh.frame_count()
                )));
            }

            mesh_base += mesh.header.mesh_size as u64;
            meshes.push(mesh);
        }

        Ok(Self {
            header,
            frames,
            tags,
            meshes,
            textures: Vec::new(),
        })
    }

    /// Encode the model.
    ///
    /// Counts and offsets are recomputed from the tables first, so the
    /// output is always internally consistent.
    pub fn write<W: Write + Seek>(&self, writer: &mut W) -> Result<()> {
        let mut model = self.clone();
        model.update_layout()?;

        let base = writer.stream_position()?;
        let at = |offset: i32| SeekFrom::Start(base + offset as u64);

        model.header.write(writer)?;

        writer.seek(at(model.header.frame_offset))?;
        for frame in &model.frames {
            frame.write(writer)?;
        }

        writer.seek(at(model.header.tag_offset))?;
        for tag in &model.tags {
            tag.write(writer)?;
        }

        writer.seek(at(model.header.mesh_offset))?;
        for mesh in &model.meshes {
            mesh.write(writer)?;
        }

        Ok(())
    }

    /// Encode the model into a new buffer
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        self.write(&mut cursor)?;
        Ok(cursor.into_inner())
    }

    /// Recompute header counts and offsets from the tables.
    ///
    /// Layout: header, frames, tags, then mesh records back to back.
    pub fn update_layout(&mut self) -> Result<()> {
        for mesh in &mut self.meshes {
            mesh.update_layout()?;
        }

        let frame_offset = MD3_HEADER_SIZE;
        let tag_offset = frame_offset + self.frames.len() * Md3Frame::SIZE;
        let mesh_offset = tag_offset + self.tags.len() * Md3Tag::SIZE;
        let file_size = mesh_offset
            + self
                .meshes
                .iter()
                .map(|m| m.header.mesh_size as usize)
                .sum::<usize>();

        let header = &mut self.header;
        header.frame_count = to_i32(self.frames.len(), "frame count")?;
        header.mesh_count = to_i32(self.meshes.len(), "mesh count")?;
        header.frame_offset = to_i32(frame_offset, "frame offset")?;
        header.tag_offset = to_i32(tag_offset, "tag offset")?;
        header.mesh_offset = to_i32(mesh_offset, "mesh offset")?;
        header.file_size = to_i32(file_size, "file size")?;
        Ok(())
    }

    /// Internal model name from the header
    pub fn name(&self) -> &str {
        &self.header.name
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Attachment points per keyframe
    pub fn tag_count(&self) -> usize {
        self.header.tag_count.max(0) as usize
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// The tag in `slot` at keyframe `frame`
    pub fn tag(&self, frame: usize, slot: usize) -> Result<&Md3Tag> {
        if frame >= self.frame_count() {
            return Err(Md3Error::FrameIndexOutOfRange {
                frame: frame as i64,
                frame_count: self.frame_count(),
            });
        }
        if slot >= self.tag_count() {
            return Err(Md3Error::MalformedAsset(format!(
                "tag slot {slot} outside {} slots",
                self.tag_count()
            )));
        }
        self.tags
            .get(frame * self.tag_count() + slot)
            .ok_or_else(|| Md3Error::MalformedAsset("tag table shorter than declared".to_string()))
    }

    /// Tag names in slot order, taken from the first keyframe
    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().take(self.tag_count()).map(|t| t.name.as_str())
    }

    /// Slot of the first tag with this name
    pub fn tag_slot(&self, name: &str) -> Option<usize> {
        self.tag_names().position(|n| n == name)
    }

    /// Find a mesh by exact name
    pub fn mesh(&self, name: &str) -> Option<&Md3Mesh> {
        self.meshes.iter().find(|m| m.name() == name)
    }

    /// Total vertices per keyframe across all meshes
    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(Md3Mesh::vertex_count).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(Md3Mesh::triangle_count).sum()
    }

    fn check_consistency(&self) -> Result<()> {
        let frame_count = self.frame_count();
        if self.tags.len() != frame_count * self.tag_count() {
            return Err(Md3Error::MalformedAsset(format!(
                "{} tags for {} slots over {frame_count} frames",
                self.tags.len(),
                self.tag_count()
            )));
        }
        if let Some(mesh) = self.meshes.iter().find(|m| m.frame_count() != frame_count) {
            return Err(Md3Error::MalformedAsset(format!(
                "mesh '{}' has {} frames, model has {frame_count}",
                mesh.name(),
                mesh.frame_count()
            )));
        }
        Ok(())
    }
}
