use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use glam::Vec3;
use std::io::{Read, Write};

use crate::common::{FRAME_NAME_LEN, read_name, read_vec3, write_name, write_vec3};
use crate::error::Result;

/// Per-keyframe bounding volume
///
/// Frame record structure (56 bytes):
/// - min_bounds: 3 x f32
/// - max_bounds: 3 x f32
/// - local_origin: 3 x f32
/// - radius: f32
/// - name: 16 bytes, NUL-padded
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct Md3Frame {
    /// Bounding box minimum corner
    pub min_bounds: Vec3,
    /// Bounding box maximum corner
    pub max_bounds: Vec3,
    /// Local origin, usually zero
    pub local_origin: Vec3,
    /// Radius of the bounding sphere
    pub radius: f32,
    /// Frame name, often the exporting tool
    pub name: String,
}

impl Md3Frame {
    /// Size of a frame record in bytes
    pub const SIZE: usize = 56;

    /// Create a frame record from a bounding box
    pub fn from_bounds(min_bounds: Vec3, max_bounds: Vec3) -> Self {
        Self {
            min_bounds,
            max_bounds,
            local_origin: Vec3::ZERO,
            radius: (max_bounds - min_bounds).length() * 0.5,
            name: String::new(),
        }
    }

    pub fn parse<R: Read>(reader: &mut R) -> Result<Self> {
        let min_bounds = read_vec3(reader)?;
        let max_bounds = read_vec3(reader)?;
        let local_origin = read_vec3(reader)?;
        let radius = reader.read_f32::<LittleEndian>()?;
        let name = read_name::<_, FRAME_NAME_LEN>(reader)?;

        Ok(Self {
            min_bounds,
            max_bounds,
            local_origin,
            radius,
            name,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_vec3(writer, self.min_bounds)?;
        write_vec3(writer, self.max_bounds)?;
        write_vec3(writer, self.local_origin)?;
        writer.write_f32::<LittleEndian>(self.radius)?;
        write_name::<_, FRAME_NAME_LEN>(writer, &self.name)
    }
}
