//! animation.cfg command implementations

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use q3_md3::validation::collect_clip_range_errors;
use q3_md3::{AnimationTable, Md3Model};

use crate::utils::{add_table_row, create_table};

fn frame_count(path: &Path) -> Result<usize> {
    let model = Md3Model::load(path)
        .with_context(|| format!("Failed to load MD3 model from {}", path.display()))?;
    Ok(model.frame_count())
}

pub fn handle_anim(path: PathBuf, lower: Option<PathBuf>, upper: Option<PathBuf>) -> Result<()> {
    println!("Loading animation table: {}", path.display());

    let table = AnimationTable::load(&path)
        .with_context(|| format!("Failed to load animation table from {}", path.display()))?;

    println!("\n=== Animation Clips (leg clips rebased) ===");
    let mut output = create_table(vec![
        "#", "Clip", "Scope", "First", "Frames", "Looping", "FPS", "End",
    ]);
    for (id, clip) in table.iter() {
        add_table_row(
            &mut output,
            vec![
                id.index().to_string(),
                id.name().to_string(),
                format!("{:?}", id.scope()),
                clip.first_frame.to_string(),
                clip.total_frames.to_string(),
                clip.looping_frames.to_string(),
                clip.fps.to_string(),
                clip.end_frame().to_string(),
            ],
        );
    }
    output.printstd();

    if let (Some(lower), Some(upper)) = (lower, upper) {
        let lower_frames = frame_count(&lower)?;
        let upper_frames = frame_count(&upper)?;

        println!("\n=== Frame Range Check ===");
        println!("Lower: {lower_frames} frames, upper: {upper_frames} frames");

        let errors = collect_clip_range_errors(&table, lower_frames, upper_frames);
        if errors.is_empty() {
            println!("✓ Every clip fits its models");
        } else {
            println!("{} clips do not fit:", errors.len());
            for (id, err) in &errors {
                println!("  - {id}: {err}");
            }
        }
    }

    Ok(())
}
