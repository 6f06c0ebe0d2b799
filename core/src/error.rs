use crate::types::{Scope, SlotIndex};
use thiserror::Error;

/// Why a capture was refused before any slot was touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    NoActor,
    ActorUninitialized,
    NoLevelLoaded,
}

impl std::fmt::Display for Precondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            Precondition::NoActor            => "no active actor",
            Precondition::ActorUninitialized => "actor is uninitialized",
            Precondition::NoLevelLoaded      => "no level loaded",
        };
        f.write_str(reason)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SavestateError {
    #[error("Slot {slot} is out of range")]
    InvalidSlot { slot: SlotIndex },

    #[error("Cannot capture: {0}")]
    PreconditionUnmet(Precondition),

    #[error("Slot {slot} holds no savestate")]
    EmptySlot { slot: SlotIndex },

    #[error("Slot {slot} is corrupt: stored checksum {stored:#010x}, computed {computed:#010x}")]
    CorruptSlot { slot: SlotIndex, stored: u32, computed: u32 },

    #[error("Slot {slot} was saved in {saved}, current scope is {current}")]
    ScopeMismatch { slot: SlotIndex, saved: Scope, current: Scope },
}

pub type SavestateResult<T> = Result<T, SavestateError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Quick-save slot {slot} is out of range")]
    InvalidSlot { slot: SlotIndex },
}
