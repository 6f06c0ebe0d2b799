//! Shared primitive types used across the entire practice layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An engine frame count. One frame = one host update call.
pub type Frame = u32;

/// Index of a savestate slot. Valid slots are `0..MAX_SAVESTATES`.
pub type SlotIndex = usize;

/// Host level identifier. Numbering follows the host's level table;
/// `LevelId::NONE` means no level is loaded (file select, title screen).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelId(pub u16);

impl LevelId {
    pub const NONE: LevelId = LevelId(0);
    pub const CASTLE: LevelId = LevelId(6);
    pub const BOB: LevelId = LevelId(9);
    pub const WDW: LevelId = LevelId(11);
    pub const JRB: LevelId = LevelId(12);
    pub const TTC: LevelId = LevelId(14);
    pub const DDD: LevelId = LevelId(23);

    pub fn is_loaded(self) -> bool {
        self != Self::NONE
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "level {}", self.0)
    }
}

/// Area index within a level.
pub type AreaIndex = u16;

/// The (level, area) pair a snapshot is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    pub level: LevelId,
    pub area:  AreaIndex,
}

impl Scope {
    pub fn new(level: LevelId, area: AreaIndex) -> Self {
        Self { level, area }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} area {}", self.level, self.area)
    }
}

/// Stable behavior-class identifier issued by the host's
/// `BehaviorRegistry`. Shared by every instance of one actor type;
/// never an instance identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BehaviorId(pub u32);
