use glam::{Mat4, Vec3};
use std::io::{Read, Write};

use crate::common::{MAX_QPATH, read_name, read_vec3, write_name, write_vec3};
use crate::error::Result;

/// A named attachment point at one keyframe
///
/// Tag record structure (112 bytes):
/// - name: 64 bytes, NUL-padded
/// - origin: 3 x f32
/// - axis: 9 x f32, three basis vectors stored one after another
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct Md3Tag {
    /// Tag name, e.g. `tag_torso`
    pub name: String,
    /// Translation relative to the owning model
    pub origin: Vec3,
    /// Rotation basis; `axis[i]` is the image of the i-th unit vector
    pub axis: [Vec3; 3],
}

impl Md3Tag {
    /// Size of a tag record in bytes
    pub const SIZE: usize = 112;

    /// Create a tag with an identity rotation
    pub fn new(name: &str, origin: Vec3) -> Self {
        Self {
            name: name.to_string(),
            origin,
            axis: [Vec3::X, Vec3::Y, Vec3::Z],
        }
    }

    /// The tag as a rigid transform, rotation basis in the upper 3x3 and the
    /// origin as translation.
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_cols(
            self.axis[0].extend(0.0),
            self.axis[1].extend(0.0),
            self.axis[2].extend(0.0),
            self.origin.extend(1.0),
        )
    }

    pub fn parse<R: Read>(reader: &mut R) -> Result<Self> {
        let name = read_name::<_, MAX_QPATH>(reader)?;
        let origin = read_vec3(reader)?;
        let axis = [read_vec3(reader)?, read_vec3(reader)?, read_vec3(reader)?];

        Ok(Self { name, origin, axis })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_name::<_, MAX_QPATH>(writer, &self.name)?;
        write_vec3(writer, self.origin)?;
        for basis in &self.axis {
            write_vec3(writer, *basis)?;
        }
        Ok(())
    }
}
