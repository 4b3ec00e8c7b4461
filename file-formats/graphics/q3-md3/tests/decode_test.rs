//! Integration tests for MD3 decoding and encoding

use std::io::Cursor;

use byteorder::{LittleEndian, WriteBytesExt};
use glam::{Vec2, Vec3};
use pretty_assertions::assert_eq;
use q3_md3::{
    DecodeOptions, Md3Error, Md3Frame, Md3Mesh, Md3Model, Md3Tag, Md3Vertex, SkinFile, TextureId,
};

fn name_field<const N: usize>(name: &str) -> [u8; N] {
    let mut field = [0u8; N];
    field[..name.len()].copy_from_slice(name.as_bytes());
    field
}

/// One frame, one tag, one mesh with one triangle, laid out by hand:
///
/// ```text
///   0 header       108
/// 108 frame         56
/// 164 tag          112
/// 276 mesh header  108
/// 384 shader        68
/// 452 triangle      12
/// 464 texcoords   3x 8
/// 488 vertices    3x 8
/// 512 end
/// ```
fn minimal_model_bytes() -> Vec<u8> {
    let mut buf = Vec::new();

    // Header
    buf.extend_from_slice(b"IDP3");
    buf.write_i32::<LittleEndian>(15).unwrap();
    buf.extend_from_slice(&name_field::<64>("models/test/box.md3"));
    buf.write_i32::<LittleEndian>(0).unwrap(); // flags
    buf.write_i32::<LittleEndian>(1).unwrap(); // frames
    buf.write_i32::<LittleEndian>(1).unwrap(); // tags
    buf.write_i32::<LittleEndian>(1).unwrap(); // meshes
    buf.write_i32::<LittleEndian>(0).unwrap(); // skins
    buf.write_i32::<LittleEndian>(108).unwrap();
    buf.write_i32::<LittleEndian>(164).unwrap();
    buf.write_i32::<LittleEndian>(276).unwrap();
    buf.write_i32::<LittleEndian>(512).unwrap();
    assert_eq!(buf.len(), 108);

    // Frame
    for v in [-1.0f32, -2.0, -3.0, 1.0, 2.0, 3.0, 0.0, 0.0, 0.5, 3.75] {
        buf.write_f32::<LittleEndian>(v).unwrap();
    }
    buf.extend_from_slice(&name_field::<16>("frame0"));
    assert_eq!(buf.len(), 164);

    // Tag: origin then a rotation of 90 degrees about z
    buf.extend_from_slice(&name_field::<64>("tag_weapon"));
    for v in [
        4.0f32, 5.0, 6.0, //
        0.0, 1.0, 0.0, //
        -1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0,
    ] {
        buf.write_f32::<LittleEndian>(v).unwrap();
    }
    assert_eq!(buf.len(), 276);

    // Mesh header, offsets relative to 276
    buf.extend_from_slice(b"IDP3");
    buf.extend_from_slice(&name_field::<64>("box"));
    for v in [0, 1, 1, 3, 1, 176, 108, 188, 212, 236] {
        buf.write_i32::<LittleEndian>(v).unwrap();
    }
    assert_eq!(buf.len(), 384);

    // Shader
    buf.extend_from_slice(&name_field::<64>("textures/test/box"));
    buf.write_i32::<LittleEndian>(7).unwrap();

    // Triangle
    for i in [0, 2, 1] {
        buf.write_i32::<LittleEndian>(i).unwrap();
    }

    // Texture coordinates
    for v in [0.0f32, 0.0, 1.0, 0.0, 0.5, 1.0] {
        buf.write_f32::<LittleEndian>(v).unwrap();
    }

    // Vertices
    for (position, normal) in [
        ([0i16, 0, 0], [0u8, 0]),
        ([64, 0, 0], [64, 0]),
        ([0, -128, 32], [128, 200]),
    ] {
        for c in position {
            buf.write_i16::<LittleEndian>(c).unwrap();
        }
        buf.extend_from_slice(&normal);
    }
    assert_eq!(buf.len(), 512);

    buf
}

#[test]
fn test_decode_minimal_model() {
    let model = Md3Model::from_bytes(&minimal_model_bytes()).unwrap();

    assert_eq!(model.name(), "models/test/box.md3");
    assert_eq!(model.header.version, 15);
    assert_eq!(model.header.file_size, 512);
    assert_eq!(model.frame_count(), 1);
    assert_eq!(model.tag_count(), 1);
    assert_eq!(model.mesh_count(), model.header.mesh_count as usize);

    let frame = &model.frames[0];
    assert_eq!(frame.min_bounds, Vec3::new(-1.0, -2.0, -3.0));
    assert_eq!(frame.max_bounds, Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(frame.local_origin, Vec3::new(0.0, 0.0, 0.5));
    assert_eq!(frame.radius, 3.75);
    assert_eq!(frame.name, "frame0");

    let tag = model.tag(0, 0).unwrap();
    assert_eq!(tag.name, "tag_weapon");
    assert_eq!(tag.origin, Vec3::new(4.0, 5.0, 6.0));
    assert_eq!(tag.axis, [Vec3::Y, Vec3::NEG_X, Vec3::Z]);
    assert_eq!(
        tag.to_mat4().transform_point3(Vec3::X),
        Vec3::new(4.0, 6.0, 6.0)
    );

    let mesh = model.mesh("box").unwrap();
    assert_eq!(mesh.header.mesh_size, 236);
    assert_eq!(mesh.shaders[0].name, "textures/test/box");
    assert_eq!(mesh.shaders[0].index, 7);
    assert_eq!(mesh.triangles, vec![[0, 2, 1]]);
    assert_eq!(
        mesh.tex_coords,
        vec![Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(0.5, 1.0)]
    );
    assert_eq!(mesh.vertices.len(), mesh.vertex_count() * mesh.frame_count());
    assert_eq!(
        mesh.vertices,
        vec![
            Md3Vertex::new([0, 0, 0], [0, 0]),
            Md3Vertex::new([64, 0, 0], [64, 0]),
            Md3Vertex::new([0, -128, 32], [128, 200]),
        ]
    );
    assert_eq!(mesh.vertices[2].scaled_position(), Vec3::new(0.0, -2.0, 0.5));
    assert_eq!(mesh.texture, None);
}

#[test]
fn test_encode_reproduces_bytes() {
    let bytes = minimal_model_bytes();
    let model = Md3Model::from_bytes(&bytes).unwrap();
    assert_eq!(model.to_bytes().unwrap(), bytes);
}

#[test]
fn test_truncation_is_malformed() {
    let bytes = minimal_model_bytes();
    for len in 0..bytes.len() {
        match Md3Model::from_bytes(&bytes[..len]) {
            Err(Md3Error::MalformedAsset(_)) => {}
            other => panic!("length {len}: unexpected result {other:?}"),
        }
    }
}

#[test]
fn test_bad_magic() {
    let mut bytes = minimal_model_bytes();
    bytes[..4].copy_from_slice(b"IDP2");
    assert!(matches!(
        Md3Model::from_bytes(&bytes),
        Err(Md3Error::InvalidMagic { .. })
    ));
}

#[test]
fn test_unknown_version() {
    let mut bytes = minimal_model_bytes();
    bytes[4..8].copy_from_slice(&16i32.to_le_bytes());

    assert!(matches!(
        Md3Model::from_bytes(&bytes),
        Err(Md3Error::UnsupportedVersion(16))
    ));

    let lenient = DecodeOptions {
        strict_version: false,
    };
    let model = Md3Model::parse_with_options(&mut Cursor::new(&bytes), lenient).unwrap();
    assert_eq!(model.header.version, 16);
}

#[test]
fn test_mesh_offset_past_end() {
    let mut bytes = minimal_model_bytes();
    // Vertex offset of the mesh now points past the end of the file
    let vertex_offset_at = 276 + 4 + 64 + 4 * 8;
    bytes[vertex_offset_at..vertex_offset_at + 4].copy_from_slice(&400i32.to_le_bytes());

    assert!(matches!(
        Md3Model::from_bytes(&bytes),
        Err(Md3Error::MalformedAsset(_))
    ));
}

#[test]
fn test_triangle_index_out_of_range() {
    let mut bytes = minimal_model_bytes();
    bytes[452..456].copy_from_slice(&3i32.to_le_bytes());

    assert!(matches!(
        Md3Model::from_bytes(&bytes),
        Err(Md3Error::MalformedAsset(_))
    ));
}

fn mesh(name: &str, frames: usize, vertices: usize, shift: i16) -> Md3Mesh {
    let tex_coords = (0..vertices).map(|i| Vec2::splat(i as f32)).collect();
    let vertices = (0..frames * vertices)
        .map(|i| Md3Vertex::new([i as i16 + shift, 0, 0], [i as u8, 0]))
        .collect();
    Md3Mesh::new(name, frames, vec![[0, 1, 2]], tex_coords, vertices).unwrap()
}

#[test]
fn test_meshes_use_their_own_base() {
    let frames = vec![
        Md3Frame::from_bounds(Vec3::ZERO, Vec3::ONE),
        Md3Frame::from_bounds(Vec3::ZERO, Vec3::splat(2.0)),
    ];
    let tags = vec![
        Md3Tag::new("tag_head", Vec3::Z),
        Md3Tag::new("tag_head", Vec3::Z * 2.0),
    ];
    let model = Md3Model::new(
        "upper.md3",
        frames,
        1,
        tags,
        vec![mesh("u_torso", 2, 4, 0), mesh("u_arms", 2, 3, 100)],
    )
    .unwrap();

    let decoded = Md3Model::from_bytes(&model.to_bytes().unwrap()).unwrap();
    assert_eq!(decoded, model);

    let arms = decoded.mesh("u_arms").unwrap();
    assert_eq!(arms.vertex_block(1).unwrap()[0].position, [103, 0, 0]);
    assert_eq!(
        decoded.header.file_size as usize,
        decoded.header.mesh_offset as usize
            + decoded
                .meshes
                .iter()
                .map(|m| m.header.mesh_size as usize)
                .sum::<usize>()
    );
}

#[test]
fn test_load_and_skin_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("box.md3");
    let skin_path = dir.path().join("box_default.skin");
    std::fs::write(&model_path, minimal_model_bytes()).unwrap();
    std::fs::write(&skin_path, "tag_weapon,\nbox,models/test/box.tga\nlid,lid.tga\n").unwrap();

    let mut model = Md3Model::load(&model_path).unwrap();
    let binding = model.bind_skin(&SkinFile::load(&skin_path).unwrap());

    assert_eq!(binding.bound, vec![("box".to_string(), TextureId(0))]);
    assert_eq!(binding.unbound.len(), 1);
    assert_eq!(model.meshes[0].texture, Some(TextureId(0)));
    assert_eq!(model.texture_path(TextureId(0)), Some("models/test/box.tga"));
}
