use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use custom_debug::Debug;
use glam::{Vec2, Vec3};
use md3_utils::debug;
use std::io::{Read, Seek, SeekFrom, Write};

use crate::common::{
    MAX_QPATH, ensure_within, read_name, read_vec2, to_i32, to_usize, write_name, write_vec2,
};
use crate::error::{Md3Error, Result};
use crate::header::MD3_MAGIC;
use crate::skin::TextureId;

/// Scale applied to the fixed-point vertex components (1/64)
pub const MD3_XYZ_SCALE: f32 = 1.0 / 64.0;

/// Header of one mesh (surface) record
///
/// Every offset in this header is relative to the start of the mesh record,
/// not to the start of the file.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct Md3MeshHeader {
    /// Magic signature ("IDP3")
    pub ident: [u8; 4],
    /// Mesh name, matched against skin files
    pub name: String,
    pub flags: i32,
    /// Number of keyframes, equal to the model's frame count
    pub frame_count: i32,
    /// Number of embedded shader records
    pub shader_count: i32,
    /// Vertices per keyframe
    pub vertex_count: i32,
    pub triangle_count: i32,
    /// Offset of the triangle table from the mesh start
    pub triangle_offset: i32,
    /// Offset of the shader table from the mesh start
    pub shader_offset: i32,
    /// Offset of the texture coordinate table from the mesh start
    pub tex_coord_offset: i32,
    /// Offset of the vertex table from the mesh start
    pub vertex_offset: i32,
    /// Size of the whole mesh record; the next mesh starts this far on
    pub mesh_size: i32,
}

impl Md3MeshHeader {
    /// Size of a mesh header in bytes
    pub const SIZE: usize = 108;

    pub fn parse<R: Read>(reader: &mut R) -> Result<Self> {
        let mut ident = [0u8; 4];
        reader.read_exact(&mut ident)?;
        let name = read_name::<_, MAX_QPATH>(reader)?;

        Ok(Self {
            ident,
            name,
            flags: reader.read_i32::<LittleEndian>()?,
            frame_count: reader.read_i32::<LittleEndian>()?,
            shader_count: reader.read_i32::<LittleEndian>()?,
            vertex_count: reader.read_i32::<LittleEndian>()?,
            triangle_count: reader.read_i32::<LittleEndian>()?,
            triangle_offset: reader.read_i32::<LittleEndian>()?,
            shader_offset: reader.read_i32::<LittleEndian>()?,
            tex_coord_offset: reader.read_i32::<LittleEndian>()?,
            vertex_offset: reader.read_i32::<LittleEndian>()?,
            mesh_size: reader.read_i32::<LittleEndian>()?,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.ident)?;
        write_name::<_, MAX_QPATH>(writer, &self.name)?;
        writer.write_i32::<LittleEndian>(self.flags)?;
        writer.write_i32::<LittleEndian>(self.frame_count)?;
        writer.write_i32::<LittleEndian>(self.shader_count)?;
        writer.write_i32::<LittleEndian>(self.vertex_count)?;
        writer.write_i32::<LittleEndian>(self.triangle_count)?;
        writer.write_i32::<LittleEndian>(self.triangle_offset)?;
        writer.write_i32::<LittleEndian>(self.shader_offset)?;
        writer.write_i32::<LittleEndian>(self.tex_coord_offset)?;
        writer.write_i32::<LittleEndian>(self.vertex_offset)?;
        writer.write_i32::<LittleEndian>(self.mesh_size)?;
        Ok(())
    }
}

/// Shader reference embedded in a mesh
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct Md3Shader {
    pub name: String,
    pub index: i32,
}

impl Md3Shader {
    /// Size of a shader record in bytes
    pub const SIZE: usize = 68;

    pub fn parse<R: Read>(reader: &mut R) -> Result<Self> {
        let name = read_name::<_, MAX_QPATH>(reader)?;
        let index = reader.read_i32::<LittleEndian>()?;
        Ok(Self { name, index })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_name::<_, MAX_QPATH>(writer, &self.name)?;
        writer.write_i32::<LittleEndian>(self.index)?;
        Ok(())
    }
}

/// One vertex of one keyframe, exactly as stored
///
/// The position stays in fixed point and the normal stays as its two-byte
/// spherical encoding; both are resolved when a pose is composed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct Md3Vertex {
    /// Position in 1/64 units
    pub position: [i16; 3],
    /// Encoded normal, indices into the shared normal table
    pub normal: [u8; 2],
}

impl Md3Vertex {
    /// Size of a vertex record in bytes
    pub const SIZE: usize = 8;

    pub fn new(position: [i16; 3], normal: [u8; 2]) -> Self {
        Self { position, normal }
    }

    /// Position in model units
    pub fn scaled_position(&self) -> Vec3 {
        Vec3::new(
            f32::from(self.position[0]),
            f32::from(self.position[1]),
            f32::from(self.position[2]),
        ) * MD3_XYZ_SCALE
    }

    pub fn parse<R: Read>(reader: &mut R) -> Result<Self> {
        let position = [
            reader.read_i16::<LittleEndian>()?,
            reader.read_i16::<LittleEndian>()?,
            reader.read_i16::<LittleEndian>()?,
        ];
        let normal = [reader.read_u8()?, reader.read_u8()?];
        Ok(Self { position, normal })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        for component in self.position {
            writer.write_i16::<LittleEndian>(component)?;
        }
        writer.write_all(&self.normal)?;
        Ok(())
    }
}

/// A mesh (surface) with all of its keyframes
#[derive(Debug, Clone, PartialEq)]
pub struct Md3Mesh {
    pub header: Md3MeshHeader,
    pub shaders: Vec<Md3Shader>,
    /// Vertex indices into a single keyframe's block
    #[debug(with = debug::trimmed_collection_fmt)]
    pub triangles: Vec<[u32; 3]>,
    /// One coordinate pair per vertex, shared by every keyframe
    #[debug(with = debug::trimmed_collection_fmt)]
    pub tex_coords: Vec<Vec2>,
    /// `vertex_count * frame_count` vertices, keyframe-major
    #[debug(with = debug::trimmed_collection_fmt)]
    pub vertices: Vec<Md3Vertex>,
    /// Texture bound from a skin file, `None` until bound
    pub texture: Option<TextureId>,
}

impl Md3Mesh {
    /// Build a mesh from its tables.
    ///
    /// `vertices` must hold `tex_coords.len()` vertices for each of the
    /// `frame_count` keyframes.
    pub fn new(
        name: &str,
        frame_count: usize,
        triangles: Vec<[u32; 3]>,
        tex_coords: Vec<Vec2>,
        vertices: Vec<Md3Vertex>,
    ) -> Result<Self> {
        let vertex_count = tex_coords.len();
        if Some(vertices.len()) != vertex_count.checked_mul(frame_count) {
            return Err(Md3Error::MalformedAsset(format!(
                "mesh '{name}': {} vertices for {vertex_count} per frame over {frame_count} frames",
                vertices.len()
            )));
        }

        let mut mesh = Self {
            header: Md3MeshHeader {
                ident: MD3_MAGIC,
                name: name.to_string(),
                flags: 0,
                frame_count: to_i32(frame_count, "mesh frame count")?,
                shader_count: 0,
                vertex_count: to_i32(vertex_count, "vertex count")?,
                triangle_count: 0,
                triangle_offset: 0,
                shader_offset: 0,
                tex_coord_offset: 0,
                vertex_offset: 0,
                mesh_size: 0,
            },
            shaders: Vec::new(),
            triangles,
            tex_coords,
            vertices,
            texture: None,
        };
        mesh.check_indices()?;
        mesh.update_layout()?;
        Ok(mesh)
    }

    /// Mesh name
    pub fn name(&self) -> &str {
        &self.header.name
    }

    /// Vertices per keyframe
    pub fn vertex_count(&self) -> usize {
        self.tex_coords.len()
    }

    /// Number of keyframes stored for this mesh
    pub fn frame_count(&self) -> usize {
        self.header.frame_count.max(0) as usize
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// The vertex block of one keyframe
    pub fn vertex_block(&self, frame: usize) -> Result<&[Md3Vertex]> {
        let out_of_range = Md3Error::FrameIndexOutOfRange {
            frame: frame as i64,
            frame_count: self.frame_count(),
        };
        if frame >= self.frame_count() {
            return Err(out_of_range);
        }

        let count = self.vertex_count();
        let start = frame * count;
        self.vertices.get(start..start + count).ok_or(out_of_range)
    }

    /// Triangle indices flattened for an index buffer
    pub fn indices(&self) -> Vec<u32> {
        self.triangles.iter().flatten().copied().collect()
    }

    /// Recompute counts, relative offsets and the record size from the
    /// tables currently held.
    ///
    /// Tables are laid out as shaders, triangles, texture coordinates,
    /// vertices, directly after the mesh header.
    pub fn update_layout(&mut self) -> Result<()> {
        let shader_offset = Md3MeshHeader::SIZE;
        let triangle_offset = shader_offset + self.shaders.len() * Md3Shader::SIZE;
        let tex_coord_offset = triangle_offset + self.triangles.len() * 12;
        let vertex_offset = tex_coord_offset + self.tex_coords.len() * 8;
        let mesh_size = vertex_offset + self.vertices.len() * Md3Vertex::SIZE;

        let header = &mut self.header;
        header.shader_count = to_i32(self.shaders.len(), "shader count")?;
        header.vertex_count = to_i32(self.tex_coords.len(), "vertex count")?;
        header.triangle_count = to_i32(self.triangles.len(), "triangle count")?;
        header.shader_offset = to_i32(shader_offset, "shader offset")?;
        header.triangle_offset = to_i32(triangle_offset, "triangle offset")?;
        header.tex_coord_offset = to_i32(tex_coord_offset, "texture coordinate offset")?;
        header.vertex_offset = to_i32(vertex_offset, "vertex offset")?;
        header.mesh_size = to_i32(mesh_size, "mesh size")?;
        Ok(())
    }

    /// Parse the mesh record starting at absolute offset `base`.
    pub fn parse<R: Read + Seek>(reader: &mut R, base: u64, stream_len: u64) -> Result<Self> {
        reader.seek(SeekFrom::Start(base))?;
        let header = Md3MeshHeader::parse(reader)?;

        if header.ident != MD3_MAGIC {
            return Err(Md3Error::MalformedAsset(format!(
                "mesh at offset {base} has ident {:?}",
                String::from_utf8_lossy(&header.ident)
            )));
        }

        let name = header.name.clone();
        let frame_count = to_usize(header.frame_count, "mesh frame count")?;
        let shader_count = to_usize(header.shader_count, "shader count")?;
        let vertex_count = to_usize(header.vertex_count, "vertex count")?;
        let triangle_count = to_usize(header.triangle_count, "triangle count")?;
        let mesh_size = to_usize(header.mesh_size, "mesh size")?;

        if mesh_size < Md3MeshHeader::SIZE {
            return Err(Md3Error::MalformedAsset(format!(
                "mesh '{name}' declares size {mesh_size}, smaller than its header"
            )));
        }

        let table_start = |offset: i32, what: &str| -> Result<u64> {
            Ok(base + to_usize(offset, what)? as u64)
        };

        // Shaders
        let start = table_start(header.shader_offset, "shader offset")?;
        ensure_within(stream_len, start, shader_count, Md3Shader::SIZE, "shader")?;
        reader.seek(SeekFrom::Start(start))?;
        let shaders = (0..shader_count)
            .map(|_| Md3Shader::parse(reader))
            .collect::<Result<Vec<_>>>()?;

        // Triangles
        let start = table_start(header.triangle_offset, "triangle offset")?;
        ensure_within(stream_len, start, triangle_count, 12, "triangle")?;
        reader.seek(SeekFrom::Start(start))?;
        let mut triangles = Vec::with_capacity(triangle_count);
        for _ in 0..triangle_count {
            let mut triangle = [0u32; 3];
            for index in &mut triangle {
                let raw = reader.read_i32::<LittleEndian>()?;
                *index = u32::try_from(raw)
                    .ok()
                    .filter(|&i| (i as usize) < vertex_count)
                    .ok_or_else(|| {
                        Md3Error::MalformedAsset(format!(
                            "mesh '{name}': triangle index {raw} outside {vertex_count} vertices"
                        ))
                    })?;
            }
            triangles.push(triangle);
        }

        // Texture coordinates, one per vertex
        let start = table_start(header.tex_coord_offset, "texture coordinate offset")?;
        ensure_within(stream_len, start, vertex_count, 8, "texture coordinate")?;
        reader.seek(SeekFrom::Start(start))?;
        let tex_coords = (0..vertex_count)
            .map(|_| read_vec2(reader))
            .collect::<Result<Vec<_>>>()?;

        // Vertices, one block per keyframe
        let total = vertex_count.checked_mul(frame_count).ok_or_else(|| {
            Md3Error::MalformedAsset(format!("mesh '{name}': vertex table size overflows"))
        })?;
        let start = table_start(header.vertex_offset, "vertex offset")?;
        ensure_within(stream_len, start, total, Md3Vertex::SIZE, "vertex")?;
        reader.seek(SeekFrom::Start(start))?;
        let vertices = (0..total)
            .map(|_| Md3Vertex::parse(reader))
            .collect::<Result<Vec<_>>>()?;

        log::trace!(
            "Mesh '{}': {} shaders, {} triangles, {} vertices x {} frames",
            name,
            shaders.len(),
            triangles.len(),
            vertex_count,
            frame_count
        );

        Ok(Self {
            header,
            shaders,
            triangles,
            tex_coords,
            vertices,
            texture: None,
        })
    }

    /// Write the mesh record at the writer's current position using the
    /// offsets stored in the header.
    pub fn write<W: Write + Seek>(&self, writer: &mut W) -> Result<()> {
        let base = writer.stream_position()?;
        let at = |offset: i32| SeekFrom::Start(base + offset.max(0) as u64);

        self.header.write(writer)?;

        writer.seek(at(self.header.shader_offset))?;
        for shader in &self.shaders {
            shader.write(writer)?;
        }

        writer.seek(at(self.header.triangle_offset))?;
        for index in self.triangles.iter().flatten() {
            writer.write_i32::<LittleEndian>(*index as i32)?;
        }

        writer.seek(at(self.header.tex_coord_offset))?;
        for uv in &self.tex_coords {
            write_vec2(writer, *uv)?;
        }

        writer.seek(at(self.header.vertex_offset))?;
        for vertex in &self.vertices {
            vertex.write(writer)?;
        }

        writer.seek(at(self.header.mesh_size))?;
        Ok(())
    }

    fn check_indices(&self) -> Result<()> {
        let vertex_count = self.vertex_count();
        match self
            .triangles
            .iter()
            .flatten()
            .find(|&&i| i as usize >= vertex_count)
        {
            Some(index) => Err(Md3Error::MalformedAsset(format!(
                "mesh '{}': triangle index {index} outside {vertex_count} vertices",
                self.header.name
            ))),
            None => Ok(()),
        }
    }
}
