//! Parser for player animation descriptions (`animation.cfg`)

use std::fs;
use std::path::Path;

use super::clip::{AnimationClip, CLIP_COUNT, ClipId};
use crate::error::{Md3Error, Result};

/// The 25-entry clip catalog of a player model
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationTable {
    clips: [AnimationClip; CLIP_COUNT],
    /// Set once the leg clips have been moved into the shared frame space
    rebased: bool,
}

impl AnimationTable {
    /// Build a table from raw clips, in file order, without rebasing
    pub fn from_clips(clips: [AnimationClip; CLIP_COUNT]) -> Self {
        Self {
            clips,
            rebased: false,
        }
    }

    /// Parse an animation description and rebase the leg clips.
    ///
    /// A line is data iff its first character is an ASCII digit; its first
    /// four whitespace separated fields are `first total looping fps`.
    /// Anything after the fourth field (usually a `// NAME` comment) is
    /// ignored, as are all non-data lines. Data lines beyond the 25th are
    /// not read.
    pub fn parse(text: &str) -> Result<Self> {
        let mut clips = [AnimationClip::default(); CLIP_COUNT];
        let mut lines = [0usize; CLIP_COUNT];
        let mut found = 0;

        for (number, line) in text.lines().enumerate() {
            if !line.starts_with(|c: char| c.is_ascii_digit()) {
                continue;
            }
            if found == CLIP_COUNT {
                log::debug!("Ignoring animation data past line {}", number + 1);
                break;
            }

            clips[found] = parse_data_line(line, number + 1)?;
            lines[found] = number + 1;
            found += 1;
        }

        if found < CLIP_COUNT {
            return Err(Md3Error::AnimationTableIncomplete {
                expected: CLIP_COUNT,
                found,
            });
        }

        let mut table = Self::from_clips(clips);
        table
            .shift_legs()
            .map_err(|id| Md3Error::InvalidAnimationLine {
                line: lines[id.index()],
                reason: format!("{id} first frame overflows when rebased"),
            })?;
        Ok(table)
    }

    /// Read and parse an animation file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading animation table from {}", path.display());
        Self::parse(&fs::read_to_string(path)?)
    }

    /// Shift every leg clip so that `LEGS_WALKCR` starts where
    /// `TORSO_GESTURE` does.
    ///
    /// Leg and torso clips are numbered consecutively in the file, but the
    /// lower body model stores its leg frames directly after the death
    /// frames. Only the first call has an effect. A shift that does not fit
    /// in the frame numbers fails with [`Md3Error::MalformedAsset`] and
    /// leaves the table unchanged.
    pub fn rebase_legs(&mut self) -> Result<()> {
        self.shift_legs().map_err(|id| {
            Md3Error::MalformedAsset(format!("{id} first frame overflows when rebased"))
        })
    }

    /// Checked rebase; reports the first clip whose frame number overflows
    fn shift_legs(&mut self) -> std::result::Result<(), ClipId> {
        if self.rebased {
            return Ok(());
        }

        let legs = ClipId::LegsWalkCrouch.index();
        let delta = self.clips[legs]
            .first_frame
            .checked_sub(self.clip(ClipId::TorsoGesture).first_frame)
            .ok_or(ClipId::LegsWalkCrouch)?;

        let mut clips = self.clips;
        for id in &ClipId::ALL[legs..] {
            let clip = &mut clips[id.index()];
            clip.first_frame = clip.first_frame.checked_sub(delta).ok_or(*id)?;
        }

        self.clips = clips;
        self.rebased = true;
        log::trace!("Rebased leg clips by {delta} frames");
        Ok(())
    }

    pub fn is_rebased(&self) -> bool {
        self.rebased
    }

    pub fn clip(&self, id: ClipId) -> &AnimationClip {
        &self.clips[id.index()]
    }

    /// All clips with their ids, in file order
    pub fn iter(&self) -> impl Iterator<Item = (ClipId, &AnimationClip)> {
        ClipId::ALL.into_iter().zip(self.clips.iter())
    }
}

fn parse_data_line(line: &str, number: usize) -> Result<AnimationClip> {
    let mut fields = [0i32; 4];
    let mut tokens = line.split_whitespace();

    for (i, field) in fields.iter_mut().enumerate() {
        let token = tokens.next().ok_or_else(|| Md3Error::InvalidAnimationLine {
            line: number,
            reason: format!("expected 4 fields, found {i}"),
        })?;
        *field = token
            .parse()
            .map_err(|e| Md3Error::InvalidAnimationLine {
                line: number,
                reason: format!("field {} ('{token}'): {e}", i + 1),
            })?;
    }

    let [first_frame, total_frames, looping_frames, fps] = fields;
    Ok(AnimationClip::new(
        first_frame,
        total_frames,
        looping_frames,
        fps,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Sarge's animation.cfg
    const SARGE: &str = "\
// animation config file

sex m

headoffset 0 0 0
footsteps normal

// first frame, num frames, looping frames, frames per second

0\t30\t0\t25\t\t// BOTH_DEATH1
29\t1\t0\t25\t\t// BOTH_DEAD1
30\t30\t0\t25\t\t// BOTH_DEATH2
59\t1\t0\t25\t\t// BOTH_DEAD2
60\t30\t0\t25\t\t// BOTH_DEATH3
89\t1\t0\t25\t\t// BOTH_DEAD3

90\t40\t0\t20\t\t// TORSO_GESTURE
130\t6\t0\t15\t\t// TORSO_ATTACK
136\t6\t0\t15\t\t// TORSO_ATTACK2
142\t5\t0\t20\t\t// TORSO_DROP
147\t4\t0\t20\t\t// TORSO_RAISE
151\t1\t0\t15\t\t// TORSO_STAND
152\t1\t0\t15\t\t// TORSO_STAND2

153\t8\t8\t20\t\t// LEGS_WALKCR
161\t12\t12\t20\t\t// LEGS_WALK
173\t9\t9\t18\t\t// LEGS_RUN
182\t10\t10\t20\t\t// LEGS_BACK
192\t10\t10\t15\t\t// LEGS_SWIM
202\t8\t0\t15\t\t// LEGS_JUMP
210\t1\t0\t15\t\t// LEGS_LAND
211\t8\t0\t15\t\t// LEGS_JUMPB
219\t1\t0\t15\t\t// LEGS_LANDB
220\t10\t10\t15\t\t// LEGS_IDLE
230\t10\t10\t15\t\t// LEGS_IDLECR
240\t7\t7\t15\t\t// LEGS_TURN
";

    #[test]
    fn test_parse_sarge() {
        let table = AnimationTable::parse(SARGE).unwrap();
        assert!(table.is_rebased());

        assert_eq!(
            *table.clip(ClipId::BothDeath1),
            AnimationClip::new(0, 30, 0, 25)
        );
        assert_eq!(
            *table.clip(ClipId::TorsoAttack),
            AnimationClip::new(130, 6, 0, 15)
        );
        // 153 - 90 = 63 frames earlier
        assert_eq!(
            *table.clip(ClipId::LegsWalkCrouch),
            AnimationClip::new(90, 8, 8, 20)
        );
        assert_eq!(
            *table.clip(ClipId::LegsIdle),
            AnimationClip::new(157, 10, 10, 15)
        );
        assert_eq!(
            *table.clip(ClipId::LegsTurn),
            AnimationClip::new(177, 7, 7, 15)
        );
    }

    #[test]
    fn test_rebase_is_idempotent() {
        let mut table = AnimationTable::parse(SARGE).unwrap();
        let once = table.clone();
        table.rebase_legs().unwrap();
        assert_eq!(table, once);
    }

    #[test]
    fn test_from_clips_is_not_rebased() {
        let table = AnimationTable::parse(SARGE).unwrap();
        let mut clips = [AnimationClip::default(); CLIP_COUNT];
        for (id, clip) in table.iter() {
            clips[id.index()] = *clip;
        }

        let mut raw = AnimationTable::from_clips(clips);
        assert!(!raw.is_rebased());
        raw.rebase_legs().unwrap();
        // Already rebased values: delta is now zero
        assert_eq!(raw.clip(ClipId::LegsIdle).first_frame, 157);
    }

    #[test]
    fn test_rebase_overflow_names_leg_clip() {
        let text = SARGE
            .replacen("90\t40\t0\t20", "2147483647\t40\t0\t20", 1)
            .replacen("153\t8\t8\t20", "0\t8\t8\t20", 1);

        // LEGS_WALKCR moves up to i32::MAX; LEGS_WALK on line 26 cannot follow
        match AnimationTable::parse(&text) {
            Err(Md3Error::InvalidAnimationLine { line, reason }) => {
                assert_eq!(line, 26);
                assert!(reason.starts_with("LEGS_WALK first"), "{reason}");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_rebase_overflow_leaves_table_unchanged() {
        let mut clips = [AnimationClip::new(0, 1, 0, 15); CLIP_COUNT];
        clips[ClipId::TorsoGesture.index()].first_frame = i32::MIN;
        clips[ClipId::LegsWalkCrouch.index()].first_frame = 1;

        let mut table = AnimationTable::from_clips(clips);
        let before = table.clone();
        assert!(matches!(
            table.rebase_legs(),
            Err(Md3Error::MalformedAsset(_))
        ));
        assert_eq!(table, before);
        assert!(!table.is_rebased());
    }

    #[test]
    fn test_incomplete_table() {
        let truncated: String = SARGE.lines().take(20).collect::<Vec<_>>().join("\n");
        match AnimationTable::parse(&truncated) {
            Err(Md3Error::AnimationTableIncomplete { expected, found }) => {
                assert_eq!(expected, 25);
                assert_eq!(found, 10);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_data_line() {
        let text = SARGE.replacen("29\t1\t0\t25", "29\tone\t0\t25", 1);
        match AnimationTable::parse(&text) {
            Err(Md3Error::InvalidAnimationLine { line, .. }) => assert_eq!(line, 11),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_short_data_line() {
        let text = SARGE.replacen("29\t1\t0\t25\t\t// BOTH_DEAD1", "29 1", 1);
        assert!(matches!(
            AnimationTable::parse(&text),
            Err(Md3Error::InvalidAnimationLine { .. })
        ));
    }

    #[test]
    fn test_extra_lines_are_ignored() {
        let text = format!("{SARGE}250\t1\t0\t15\n");
        assert!(AnimationTable::parse(&text).is_ok());
    }

    #[test]
    fn test_iter_order() {
        let table = AnimationTable::parse(SARGE).unwrap();
        let ids: Vec<ClipId> = table.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, ClipId::ALL.to_vec());
    }
}
