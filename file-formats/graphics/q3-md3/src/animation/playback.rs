//! Per-instance keyframe playback

use super::clip::AnimationClip;
use crate::error::{Md3Error, Result};

/// Mutable playback position of one model instance.
///
/// Decoded models are never modified during playback; any number of
/// instances can share one model while keeping their own state.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaybackState {
    /// First keyframe of the looping range
    pub start_frame: usize,
    /// One past the last keyframe of the range
    pub end_frame: usize,
    pub current_frame: usize,
    pub next_frame: usize,
    /// Blend factor between `current_frame` and `next_frame`, in `[0, 1)`
    pub interpolation: f32,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::hold()
    }
}

impl PlaybackState {
    /// Start playing `clip` on a model with `frame_count` keyframes.
    ///
    /// Fails with [`Md3Error::FrameIndexOutOfRange`] when the clip is empty
    /// or reaches past the model's last keyframe.
    pub fn new(clip: &AnimationClip, frame_count: usize) -> Result<Self> {
        let (start_frame, end_frame) = clip_range(clip, frame_count)?;
        let next_frame = if end_frame - start_frame > 1 {
            start_frame + 1
        } else {
            start_frame
        };

        Ok(Self {
            start_frame,
            end_frame,
            current_frame: start_frame,
            next_frame,
            interpolation: 0.0,
        })
    }

    /// Stay on frame 0; used by models that have no clip of their own
    pub fn hold() -> Self {
        Self {
            start_frame: 0,
            end_frame: 1,
            current_frame: 0,
            next_frame: 0,
            interpolation: 0.0,
        }
    }

    /// Move `frame_fraction` keyframes forward.
    ///
    /// When the blend factor reaches 1 it resets to 0 and playback steps to
    /// the next keyframe; `next_frame` wraps back to `start_frame` at the end
    /// of the range. Negative or non-finite fractions are ignored.
    pub fn advance(&mut self, frame_fraction: f32) {
        if !frame_fraction.is_finite() || frame_fraction < 0.0 {
            log::trace!("Ignoring frame fraction {frame_fraction}");
            return;
        }

        self.interpolation += frame_fraction;
        if self.interpolation >= 1.0 {
            self.interpolation = 0.0;
            self.current_frame = self.next_frame;
            self.next_frame += 1;
            if self.next_frame >= self.end_frame {
                self.next_frame = self.start_frame;
            }
        }
    }

    /// Advance by wall-clock time at the given playback rate
    pub fn tick(&mut self, seconds: f32, fps: i32) {
        self.advance(seconds * fps as f32);
    }

    /// Keyframe count of the looping range
    pub fn len(&self) -> usize {
        self.end_frame - self.start_frame
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolve a clip into a `[start, end)` keyframe range on a model
pub(crate) fn clip_range(clip: &AnimationClip, frame_count: usize) -> Result<(usize, usize)> {
    let end = clip.end_frame();
    let out_of_range = |frame: i64| Md3Error::FrameIndexOutOfRange { frame, frame_count };

    if clip.first_frame < 0 {
        return Err(out_of_range(i64::from(clip.first_frame)));
    }
    if clip.total_frames < 1 || end > frame_count as i64 {
        // Report the last frame the clip would touch
        return Err(out_of_range(end - 1));
    }

    Ok((clip.first_frame as usize, end as usize))
}
