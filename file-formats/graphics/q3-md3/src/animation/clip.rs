use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of clips in a player animation table
pub const CLIP_COUNT: usize = 25;

/// Which submodels a clip drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipScope {
    /// Death clips, played by legs and torso together
    Both,
    /// Upper body only; the legs idle
    Torso,
    /// Lower body only; the torso stands
    Legs,
}

/// The fixed catalog of player animation clips, in file order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ClipId {
    BothDeath1 = 0,
    BothDead1 = 1,
    BothDeath2 = 2,
    BothDead2 = 3,
    BothDeath3 = 4,
    BothDead3 = 5,

    TorsoGesture = 6,
    TorsoAttack = 7,
    TorsoAttack2 = 8,
    TorsoDrop = 9,
    TorsoRaise = 10,
    TorsoStand = 11,
    TorsoStand2 = 12,

    LegsWalkCrouch = 13,
    LegsWalk = 14,
    LegsRun = 15,
    LegsBack = 16,
    LegsSwim = 17,
    LegsJump = 18,
    LegsLand = 19,
    LegsJumpBack = 20,
    LegsLandBack = 21,
    LegsIdle = 22,
    LegsIdleCrouch = 23,
    LegsTurn = 24,
}

impl ClipId {
    /// Every clip in file order
    pub const ALL: [Self; CLIP_COUNT] = [
        Self::BothDeath1,
        Self::BothDead1,
        Self::BothDeath2,
        Self::BothDead2,
        Self::BothDeath3,
        Self::BothDead3,
        Self::TorsoGesture,
        Self::TorsoAttack,
        Self::TorsoAttack2,
        Self::TorsoDrop,
        Self::TorsoRaise,
        Self::TorsoStand,
        Self::TorsoStand2,
        Self::LegsWalkCrouch,
        Self::LegsWalk,
        Self::LegsRun,
        Self::LegsBack,
        Self::LegsSwim,
        Self::LegsJump,
        Self::LegsLand,
        Self::LegsJumpBack,
        Self::LegsLandBack,
        Self::LegsIdle,
        Self::LegsIdleCrouch,
        Self::LegsTurn,
    ];

    /// Position in the animation file
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The next clip, wrapping from the last back to the first
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % CLIP_COUNT]
    }

    pub fn scope(self) -> ClipScope {
        if self <= Self::BothDead3 {
            ClipScope::Both
        } else if self <= Self::TorsoStand2 {
            ClipScope::Torso
        } else {
            ClipScope::Legs
        }
    }

    /// Conventional upper-case name, as used in `animation.cfg` comments
    pub fn name(self) -> &'static str {
        match self {
            Self::BothDeath1 => "BOTH_DEATH1",
            Self::BothDead1 => "BOTH_DEAD1",
            Self::BothDeath2 => "BOTH_DEATH2",
            Self::BothDead2 => "BOTH_DEAD2",
            Self::BothDeath3 => "BOTH_DEATH3",
            Self::BothDead3 => "BOTH_DEAD3",
            Self::TorsoGesture => "TORSO_GESTURE",
            Self::TorsoAttack => "TORSO_ATTACK",
            Self::TorsoAttack2 => "TORSO_ATTACK2",
            Self::TorsoDrop => "TORSO_DROP",
            Self::TorsoRaise => "TORSO_RAISE",
            Self::TorsoStand => "TORSO_STAND",
            Self::TorsoStand2 => "TORSO_STAND2",
            Self::LegsWalkCrouch => "LEGS_WALKCR",
            Self::LegsWalk => "LEGS_WALK",
            Self::LegsRun => "LEGS_RUN",
            Self::LegsBack => "LEGS_BACK",
            Self::LegsSwim => "LEGS_SWIM",
            Self::LegsJump => "LEGS_JUMP",
            Self::LegsLand => "LEGS_LAND",
            Self::LegsJumpBack => "LEGS_JUMPB",
            Self::LegsLandBack => "LEGS_LANDB",
            Self::LegsIdle => "LEGS_IDLE",
            Self::LegsIdleCrouch => "LEGS_IDLECR",
            Self::LegsTurn => "LEGS_TURN",
        }
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a clip name is not recognised
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown animation clip '{0}'")]
pub struct UnknownClip(pub String);

impl FromStr for ClipId {
    type Err = UnknownClip;

    /// Accepts the file names (`TORSO_ATTACK`) in any case, or a numeric index
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        if let Ok(index) = wanted.parse::<usize>() {
            return Self::from_index(index).ok_or_else(|| UnknownClip(s.to_string()));
        }
        Self::ALL
            .into_iter()
            .find(|clip| clip.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownClip(s.to_string()))
    }
}

/// One animation range as read from the animation file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationClip {
    pub first_frame: i32,
    pub total_frames: i32,
    /// Stored for completeness; playback always loops the whole clip
    pub looping_frames: i32,
    pub fps: i32,
}

impl AnimationClip {
    pub fn new(first_frame: i32, total_frames: i32, looping_frames: i32, fps: i32) -> Self {
        Self {
            first_frame,
            total_frames,
            looping_frames,
            fps,
        }
    }

    /// One past the last frame of the clip
    pub fn end_frame(&self) -> i64 {
        i64::from(self.first_frame) + i64::from(self.total_frames)
    }
}
