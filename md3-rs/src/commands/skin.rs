//! Skin binding command implementations

use anyhow::{Context, Result};
use std::path::PathBuf;

use q3_md3::{Md3Model, SkinFile};

use crate::utils::{add_table_row, create_table, format_percentage};

pub fn handle_skin(model_path: PathBuf, skin_path: PathBuf) -> Result<()> {
    println!("Loading MD3 model: {}", model_path.display());
    let mut model = Md3Model::load(&model_path)
        .with_context(|| format!("Failed to load MD3 model from {}", model_path.display()))?;

    println!("Loading skin: {}", skin_path.display());
    let skin = SkinFile::load(&skin_path)
        .with_context(|| format!("Failed to load skin from {}", skin_path.display()))?;

    let binding = model.bind_skin(&skin);

    println!("\n=== Skin Binding ===");
    let mut table = create_table(vec!["Mesh", "Texture"]);
    for mesh in &model.meshes {
        let texture = mesh
            .texture
            .and_then(|id| model.texture_path(id))
            .unwrap_or("(none)");
        add_table_row(&mut table, vec![mesh.name().to_string(), texture.to_string()]);
    }
    table.printstd();

    let textured = model.meshes.iter().filter(|m| m.texture.is_some()).count();
    let coverage = if model.mesh_count() == 0 {
        100.0
    } else {
        textured as f64 * 100.0 / model.mesh_count() as f64
    };
    println!(
        "\nTextured meshes: {} of {} ({})",
        textured,
        model.mesh_count(),
        format_percentage(coverage)
    );

    if binding.is_complete() {
        println!("✓ Every skin entry matched a mesh");
    } else {
        println!("Unmatched skin entries:");
        for error in &binding.unbound {
            println!("  - {error}");
        }
    }

    Ok(())
}
