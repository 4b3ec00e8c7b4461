//! Load-time checks that keep playback inside each model's frame table

use crate::animation::{AnimationTable, ClipId, ClipScope, clip_range};
use crate::error::{Md3Error, Result};

/// Check every clip against the submodels it drives.
///
/// Death clips must fit both models, torso clips the upper model and leg
/// clips the lower model. The first clip out of range is reported as
/// [`Md3Error::FrameIndexOutOfRange`].
pub fn validate_clip_ranges(
    table: &AnimationTable,
    lower_frames: usize,
    upper_frames: usize,
) -> Result<()> {
    let lower = ("lower", lower_frames);
    let upper = ("upper", upper_frames);

    for (id, clip) in table.iter() {
        let targets = match id.scope() {
            ClipScope::Both => vec![lower, upper],
            ClipScope::Torso => vec![upper],
            ClipScope::Legs => vec![lower],
        };

        for (part, frame_count) in targets {
            if let Err(err) = clip_range(clip, frame_count) {
                log::error!("Clip {id} does not fit the {part} model ({frame_count} frames)");
                return Err(err);
            }
        }
    }

    Ok(())
}

/// Report every clip that does not fit, instead of stopping at the first
pub fn collect_clip_range_errors(
    table: &AnimationTable,
    lower_frames: usize,
    upper_frames: usize,
) -> Vec<(ClipId, Md3Error)> {
    let mut errors = Vec::new();
    for (id, clip) in table.iter() {
        let frame_counts = match id.scope() {
            ClipScope::Both => vec![lower_frames, upper_frames],
            ClipScope::Torso => vec![upper_frames],
            ClipScope::Legs => vec![lower_frames],
        };
        if let Some(err) = frame_counts
            .iter()
            .find_map(|&count| clip_range(clip, count).err())
        {
            errors.push((id, err));
        }
    }
    errors
}
