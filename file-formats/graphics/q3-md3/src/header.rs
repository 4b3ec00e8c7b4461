use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

use crate::common::{MAX_QPATH, read_name, write_name};
use crate::error::{Md3Error, Result};

/// Magic signature for MD3 files ("IDP3")
pub const MD3_MAGIC: [u8; 4] = *b"IDP3";

/// The only format version written by the Quake III toolchain
pub const MD3_VERSION: i32 = 15;

/// Size of the file header in bytes
pub const MD3_HEADER_SIZE: usize = 108;

/// MD3 file header
///
/// All three table offsets are absolute. The counts are stored as signed
/// integers on disk and kept that way here so a decoded header reproduces
/// the file exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct Md3Header {
    /// Magic signature ("IDP3")
    pub ident: [u8; 4],
    /// Format version (15)
    pub version: i32,
    /// Internal file name
    pub name: String,
    /// Flags, unused by the engine
    pub flags: i32,
    /// Number of keyframes
    pub frame_count: i32,
    /// Number of tags per keyframe
    pub tag_count: i32,
    /// Number of meshes (surfaces)
    pub mesh_count: i32,
    /// Number of embedded skins, always zero in shipped files
    pub skin_count: i32,
    /// Absolute offset of the frame table
    pub frame_offset: i32,
    /// Absolute offset of the tag table
    pub tag_offset: i32,
    /// Absolute offset of the first mesh record
    pub mesh_offset: i32,
    /// Total size of the file
    pub file_size: i32,
}

impl Md3Header {
    /// Create an empty header for a model with the given internal name
    pub fn new(name: &str) -> Self {
        Self {
            ident: MD3_MAGIC,
            version: MD3_VERSION,
            name: name.to_string(),
            flags: 0,
            frame_count: 0,
            tag_count: 0,
            mesh_count: 0,
            skin_count: 0,
            frame_offset: MD3_HEADER_SIZE as i32,
            tag_offset: MD3_HEADER_SIZE as i32,
            mesh_offset: MD3_HEADER_SIZE as i32,
            file_size: MD3_HEADER_SIZE as i32,
        }
    }

    /// Parse the header from the start of a reader.
    ///
    /// With `strict_version` set, anything other than [`MD3_VERSION`] is
    /// rejected instead of being decoded with the version 15 layout.
    pub fn parse<R: Read>(reader: &mut R, strict_version: bool) -> Result<Self> {
        let mut ident = [0u8; 4];
        reader.read_exact(&mut ident)?;

        if ident != MD3_MAGIC {
            return Err(Md3Error::InvalidMagic {
                expected: String::from_utf8_lossy(&MD3_MAGIC).to_string(),
                actual: String::from_utf8_lossy(&ident).to_string(),
            });
        }

        let version = reader.read_i32::<LittleEndian>()?;
        if strict_version && version != MD3_VERSION {
            return Err(Md3Error::UnsupportedVersion(version));
        }

        let name = read_name::<_, MAX_QPATH>(reader)?;

        Ok(Self {
            ident,
            version,
            name,
            flags: reader.read_i32::<LittleEndian>()?,
            frame_count: reader.read_i32::<LittleEndian>()?,
            tag_count: reader.read_i32::<LittleEndian>()?,
            mesh_count: reader.read_i32::<LittleEndian>()?,
            skin_count: reader.read_i32::<LittleEndian>()?,
            frame_offset: reader.read_i32::<LittleEndian>()?,
            tag_offset: reader.read_i32::<LittleEndian>()?,
            mesh_offset: reader.read_i32::<LittleEndian>()?,
            file_size: reader.read_i32::<LittleEndian>()?,
        })
    }

    /// Write the header
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.ident)?;
        writer.write_i32::<LittleEndian>(self.version)?;
        write_name::<_, MAX_QPATH>(writer, &self.name)?;
        writer.write_i32::<LittleEndian>(self.flags)?;
        writer.write_i32::<LittleEndian>(self.frame_count)?;
        writer.write_i32::<LittleEndian>(self.tag_count)?;
        writer.write_i32::<LittleEndian>(self.mesh_count)?;
        writer.write_i32::<LittleEndian>(self.skin_count)?;
        writer.write_i32::<LittleEndian>(self.frame_offset)?;
        writer.write_i32::<LittleEndian>(self.tag_offset)?;
        writer.write_i32::<LittleEndian>(self.mesh_offset)?;
        writer.write_i32::<LittleEndian>(self.file_size)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_header_size() {
        let mut data = Vec::new();
        Md3Header::new("lower").write(&mut data).unwrap();
        assert_eq!(data.len(), MD3_HEADER_SIZE);
    }

    #[test]
    fn test_header_parse_write() {
        let mut header = Md3Header::new("models/players/sarge/lower.md3");
        header.frame_count = 190;
        header.tag_count = 1;
        header.mesh_count = 2;
        header.tag_offset = 10_748;

        let mut data = Vec::new();
        header.write(&mut data).unwrap();

        let parsed = Md3Header::parse(&mut Cursor::new(data), true).unwrap();
        assert_eq!(parsed, header);
    }

    #[test]
    fn test_invalid_magic() {
        let mut data = Vec::new();
        Md3Header::new("x").write(&mut data).unwrap();
        data[..4].copy_from_slice(b"IDP2");

        let err = Md3Header::parse(&mut Cursor::new(data), true).unwrap_err();
        assert!(matches!(err, Md3Error::InvalidMagic { .. }));
    }

    #[test]
    fn test_version_check() {
        let mut header = Md3Header::new("x");
        header.version = 14;
        let mut data = Vec::new();
        header.write(&mut data).unwrap();

        let err = Md3Header::parse(&mut Cursor::new(data.clone()), true).unwrap_err();
        assert!(matches!(err, Md3Error::UnsupportedVersion(14)));

        let parsed = Md3Header::parse(&mut Cursor::new(data), false).unwrap();
        assert_eq!(parsed.version, 14);
    }
}
