//! Behavior-class registry.
//!
//! The host registers every actor type once at startup and receives a
//! stable `BehaviorId`. Ids are handed out in registration order, so the
//! same registration sequence yields the same ids on every run.

use crate::types::BehaviorId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorKind {
    /// The controllable character's own actor.
    Player,
    /// The actor the camera is attached to.
    CameraPivot,
    /// Scenery with no simulation state worth saving.
    StaticDecoration,
    /// Anything else: enemies, platforms, collectibles.
    Dynamic,
}

impl BehaviorKind {
    /// Kinds that object capture always skips.
    pub fn is_excluded(self) -> bool {
        !matches!(self, BehaviorKind::Dynamic)
    }
}

#[derive(Debug, Clone)]
struct BehaviorEntry {
    name: String,
    kind: BehaviorKind,
}

#[derive(Debug, Clone, Default)]
pub struct BehaviorRegistry {
    entries: Vec<BehaviorEntry>,
}

impl BehaviorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a behavior class. Id 0 is never issued, so a zeroed
    /// object record can never match a live actor.
    pub fn register(&mut self, name: impl Into<String>, kind: BehaviorKind) -> BehaviorId {
        self.entries.push(BehaviorEntry { name: name.into(), kind });
        BehaviorId(self.entries.len() as u32)
    }

    pub fn kind(&self, id: BehaviorId) -> Option<BehaviorKind> {
        self.entry(id).map(|e| e.kind)
    }

    pub fn name(&self, id: BehaviorId) -> Option<&str> {
        self.entry(id).map(|e| e.name.as_str())
    }

    /// Unregistered ids are treated as dynamic: the host may spawn
    /// actors the registry has not been told about.
    pub fn is_excluded(&self, id: BehaviorId) -> bool {
        self.kind(id).is_some_and(BehaviorKind::is_excluded)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, id: BehaviorId) -> Option<&BehaviorEntry> {
        let index = (id.0 as usize).checked_sub(1)?;
        self.entries.get(index)
    }
}
