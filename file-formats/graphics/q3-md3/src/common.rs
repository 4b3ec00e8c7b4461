//! Record-level helpers shared by the header, frame, tag and mesh parsers.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use glam::{Vec2, Vec3};
use memchr::memchr;
use std::io::{Read, Write};

use crate::error::{Md3Error, Result};

/// Width of the long name fields (model, tag, mesh and shader names)
pub const MAX_QPATH: usize = 64;

/// Width of the frame name field
pub const FRAME_NAME_LEN: usize = 16;

/// Decode a fixed-width, NUL-padded name.
///
/// Copying stops at the first zero byte; anything after it is ignored. Bytes
/// map one-to-one onto `char`s, so non-ASCII names survive a write/read cycle.
pub fn decode_name(bytes: &[u8]) -> String {
    let end = memchr(0, bytes).unwrap_or(bytes.len());
    bytes[..end].iter().map(|&b| char::from(b)).collect()
}

/// Encode a name into a fixed-width, NUL-padded field of `N` bytes.
///
/// Names longer than `N - 1` bytes are cut so the field stays terminated.
pub fn encode_name<const N: usize>(name: &str) -> [u8; N] {
    let mut field = [0u8; N];
    for (slot, ch) in field.iter_mut().take(N - 1).zip(name.chars()) {
        *slot = u8::try_from(ch).unwrap_or(b'?');
    }
    field
}

/// Read a fixed-width name field
pub fn read_name<R: Read, const N: usize>(reader: &mut R) -> Result<String> {
    let mut field = [0u8; N];
    reader.read_exact(&mut field)?;
    Ok(decode_name(&field))
}

/// Write a fixed-width name field
pub fn write_name<W: Write, const N: usize>(writer: &mut W, name: &str) -> Result<()> {
    writer.write_all(&encode_name::<N>(name))?;
    Ok(())
}

pub fn read_vec3<R: Read>(reader: &mut R) -> Result<Vec3> {
    let x = reader.read_f32::<LittleEndian>()?;
    let y = reader.read_f32::<LittleEndian>()?;
    let z = reader.read_f32::<LittleEndian>()?;
    Ok(Vec3::new(x, y, z))
}

pub fn write_vec3<W: Write>(writer: &mut W, v: Vec3) -> Result<()> {
    writer.write_f32::<LittleEndian>(v.x)?;
    writer.write_f32::<LittleEndian>(v.y)?;
    writer.write_f32::<LittleEndian>(v.z)?;
    Ok(())
}

pub fn read_vec2<R: Read>(reader: &mut R) -> Result<Vec2> {
    let x = reader.read_f32::<LittleEndian>()?;
    let y = reader.read_f32::<LittleEndian>()?;
    Ok(Vec2::new(x, y))
}

pub fn write_vec2<W: Write>(writer: &mut W, v: Vec2) -> Result<()> {
    writer.write_f32::<LittleEndian>(v.x)?;
    writer.write_f32::<LittleEndian>(v.y)?;
    Ok(())
}

/// Convert an on-disk `i32` count or offset into a `usize`
pub fn to_usize(value: i32, what: &str) -> Result<usize> {
    usize::try_from(value)
        .map_err(|_| Md3Error::MalformedAsset(format!("negative {what}: {value}")))
}

/// Convert an in-memory length back into the on-disk `i32` representation
pub fn to_i32(value: usize, what: &str) -> Result<i32> {
    i32::try_from(value)
        .map_err(|_| Md3Error::MalformedAsset(format!("{what} too large for MD3: {value}")))
}

/// Check that `count` records of `record_size` bytes starting at `offset`
/// lie inside a stream of `stream_len` bytes.
///
/// Runs before any table is allocated so a corrupt count cannot request a
/// huge buffer.
pub fn ensure_within(
    stream_len: u64,
    offset: u64,
    count: usize,
    record_size: usize,
    what: &str,
) -> Result<()> {
    let end = (count as u64)
        .checked_mul(record_size as u64)
        .and_then(|bytes| bytes.checked_add(offset));

    match end {
        Some(end) if end <= stream_len => Ok(()),
        _ => Err(Md3Error::MalformedAsset(format!(
            "{what} table ({count} x {record_size} bytes at offset {offset}) exceeds stream length {stream_len}"
        ))),
    }
}
