//! Character playback command implementations

use anyhow::{Context, Result};
use glam::Mat4;
use std::path::PathBuf;

use q3_md3::{BodyPart, Character, ClipId};

use crate::utils::{add_table_row, create_table, format_vec3};

pub fn handle_play(manifest: PathBuf, clip: Option<String>, ticks: u32, dt: f32) -> Result<()> {
    println!("Loading character: {}", manifest.display());

    let mut character = Character::load_manifest(&manifest)
        .with_context(|| format!("Failed to load character from {}", manifest.display()))?;

    if let Some(name) = clip {
        let id: ClipId = name.parse()?;
        character
            .set_animation(id)
            .with_context(|| format!("Failed to start clip {id}"))?;
    }

    println!(
        "Clip: {} ({} ticks of {:.3}s)",
        character.current_animation(),
        ticks,
        dt
    );

    for _ in 0..ticks {
        character.update(dt);
    }

    println!("\n=== Playback State ===");
    let mut table = create_table(vec!["Part", "Range", "Current", "Next", "Blend"]);
    for part in BodyPart::ALL {
        let state = character.playback(part);
        add_table_row(
            &mut table,
            vec![
                part.to_string(),
                format!("{}..{}", state.start_frame, state.end_frame),
                state.current_frame.to_string(),
                state.next_frame.to_string(),
                format!("{:.3}", state.interpolation),
            ],
        );
    }
    table.printstd();

    let pose = character
        .pose(Mat4::IDENTITY)
        .context("Failed to compose pose")?;

    println!("\n=== Composed Pose ===");
    let mut table = create_table(vec!["Node", "Tag", "Origin", "Meshes", "Vertices"]);
    for node in pose.iter() {
        let vertices: usize = node.meshes.iter().map(|m| m.vertices.len()).sum();
        add_table_row(
            &mut table,
            vec![
                node.name.clone(),
                node.tag.clone().unwrap_or_else(|| "-".to_string()),
                format_vec3(node.blended.w_axis.truncate()),
                node.meshes.len().to_string(),
                vertices.to_string(),
            ],
        );
    }
    table.printstd();
    println!("Total vertices: {}", pose.vertex_count());

    Ok(())
}
