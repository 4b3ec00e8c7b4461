//! MD3 model file command implementations

use anyhow::{Context, Result};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use q3_md3::{DecodeOptions, Md3Model};

use crate::utils::{
    NodeType, TreeNode, TreeOptions, add_table_row, create_table, detect_ref_type, format_bytes,
    format_vec3, render_tree,
};

fn load_model(path: &Path) -> Result<Md3Model> {
    Md3Model::load(path)
        .with_context(|| format!("Failed to load MD3 model from {}", path.display()))
}

pub fn handle_info(path: PathBuf, detailed: bool) -> Result<()> {
    println!("Loading MD3 model: {}", path.display());

    let model = load_model(&path)?;
    let file_size = fs::metadata(&path)?.len();

    println!("\n=== MD3 Model Information ===");
    println!("Name: {}", model.name());
    println!("Version: {}", model.header.version);
    println!("File size: {}", format_bytes(file_size));
    println!("Frames: {}", model.frame_count());
    println!("Tags: {}", model.tag_count());
    println!("Meshes: {}", model.mesh_count());
    println!("Vertices: {}", model.vertex_count());
    println!("Triangles: {}", model.triangle_count());

    if let Some(frame) = model.frames.first() {
        println!(
            "Bounds (frame 0): {} .. {}",
            format_vec3(frame.min_bounds),
            format_vec3(frame.max_bounds)
        );
    }

    let tag_names: Vec<&str> = model.tag_names().collect();
    if !tag_names.is_empty() {
        println!("Tag names: {}", tag_names.join(", "));
    }

    if model.mesh_count() > 0 {
        println!("\n=== Meshes ===");
        let mut table = create_table(vec!["Name", "Frames", "Vertices", "Triangles", "Shaders"]);
        for mesh in &model.meshes {
            add_table_row(
                &mut table,
                vec![
                    mesh.name().to_string(),
                    mesh.frame_count().to_string(),
                    mesh.vertex_count().to_string(),
                    mesh.triangle_count().to_string(),
                    mesh.shaders
                        .iter()
                        .map(|s| s.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                ],
            );
        }
        table.printstd();
    }

    if detailed {
        println!("\n=== Detailed Information ===");
        println!("{:#?}", &model);
    }

    Ok(())
}

pub fn handle_tree(path: PathBuf, max_depth: usize, no_color: bool) -> Result<()> {
    let model = load_model(&path)?;
    let file_size = fs::metadata(&path)?.len();

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let header = TreeNode::new("Header", NodeType::Header)
        .with_metadata("name", model.name())
        .with_metadata("version", model.header.version)
        .with_metadata("flags", model.header.flags)
        .with_metadata("frame_offset", model.header.frame_offset)
        .with_metadata("tag_offset", model.header.tag_offset)
        .with_metadata("mesh_offset", model.header.mesh_offset);

    let mut frames = TreeNode::new(format!("Frames ({})", model.frame_count()), NodeType::Table);
    for (i, frame) in model.frames.iter().enumerate() {
        let label = if frame.name.is_empty() {
            format!("#{i}")
        } else {
            format!("#{i} {}", frame.name)
        };
        frames = frames.add_child(
            TreeNode::new(label, NodeType::Property)
                .with_metadata("min", format_vec3(frame.min_bounds))
                .with_metadata("max", format_vec3(frame.max_bounds))
                .with_metadata("radius", format!("{:.2}", frame.radius)),
        );
    }

    let mut tags = TreeNode::new(format!("Tags ({})", model.tag_count()), NodeType::Table);
    for tag in model.tags.iter().take(model.tag_count()) {
        tags = tags.add_child(
            TreeNode::new(tag.name.clone(), NodeType::Tag)
                .with_metadata("origin (frame 0)", format_vec3(tag.origin)),
        );
    }

    let mut meshes = TreeNode::new(format!("Meshes ({})", model.mesh_count()), NodeType::Table);
    for mesh in &model.meshes {
        let mut node = TreeNode::new(mesh.name().to_string(), NodeType::Mesh)
            .with_size(mesh.header.mesh_size as u64)
            .with_metadata("vertices", mesh.vertex_count())
            .with_metadata("triangles", mesh.triangle_count())
            .with_metadata("frames", mesh.frame_count());
        for shader in &mesh.shaders {
            node = node.with_external_ref(&shader.name, detect_ref_type(&shader.name));
        }
        meshes = meshes.add_child(node);
    }

    let root = TreeNode::new(file_name, NodeType::Root)
        .with_size(file_size)
        .add_child(header)
        .add_child(frames)
        .add_child(tags)
        .add_child(meshes);

    let options = TreeOptions {
        max_depth: Some(max_depth),
        no_color,
        ..TreeOptions::default()
    };

    print!("{}", render_tree(&root, &options));
    Ok(())
}

pub fn handle_rewrite(input: PathBuf, output: PathBuf, lenient: bool) -> Result<()> {
    println!("Loading MD3 model: {}", input.display());

    let data =
        fs::read(&input).with_context(|| format!("Failed to read {}", input.display()))?;
    let options = DecodeOptions {
        strict_version: !lenient,
    };
    let model = Md3Model::parse_with_options(&mut Cursor::new(data), options)
        .with_context(|| format!("Failed to decode MD3 model from {}", input.display()))?;

    let bytes = model.to_bytes().context("Failed to encode model")?;
    fs::write(&output, &bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Wrote {} ({}) to {}",
        model.name(),
        format_bytes(bytes.len() as u64),
        output.display()
    );
    Ok(())
}
