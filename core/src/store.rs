//! Snapshot store — owns every slot's memory.
//!
//! RULE: Only the store hands out slot references. A slot is replaced
//! wholesale by `commit` after a capture has fully succeeded; nothing
//! else writes into a slot except invalidation.

use crate::{
    error::{SavestateError, SavestateResult},
    snapshot::Snapshot,
    types::{Scope, SlotIndex},
};

/// Slot 0 ("single") and slot 1 ("double").
pub const MAX_SAVESTATES: usize = 2;
pub const SLOT_SINGLE: SlotIndex = 0;
pub const SLOT_DOUBLE: SlotIndex = 1;

#[derive(Debug)]
pub struct SnapshotStore {
    slots: [Box<Snapshot>; MAX_SAVESTATES],
}

impl Default for SnapshotStore {
    fn default() -> Self { Self::new() }
}

impl SnapshotStore {
    /// Every slot starts zeroed.
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| Snapshot::empty()),
        }
    }

    pub fn capacity(&self) -> usize {
        MAX_SAVESTATES
    }

    pub fn get(&self, slot: SlotIndex) -> SavestateResult<&Snapshot> {
        self.slots
            .get(slot)
            .map(|s| &**s)
            .ok_or(SavestateError::InvalidSlot { slot })
    }

    /// Raw mutable access, for diagnostics and corruption tests.
    pub fn get_mut(&mut self, slot: SlotIndex) -> SavestateResult<&mut Snapshot> {
        self.slots
            .get_mut(slot)
            .map(|s| &mut **s)
            .ok_or(SavestateError::InvalidSlot { slot })
    }

    /// Replace a slot with a finished snapshot.
    pub fn commit(&mut self, slot: SlotIndex, snapshot: Box<Snapshot>) -> SavestateResult<()> {
        let target = self
            .slots
            .get_mut(slot)
            .ok_or(SavestateError::InvalidSlot { slot })?;
        *target = snapshot;
        Ok(())
    }

    /// Valid flag set and saved in `scope`. Does not re-verify the checksum.
    pub fn is_valid_in(&self, slot: SlotIndex, scope: Scope) -> bool {
        self.get(slot)
            .map(|s| s.is_valid() && s.scope() == scope)
            .unwrap_or(false)
    }

    /// Mark a slot unusable. The stored bytes are left as they are.
    pub fn invalidate(&mut self, slot: SlotIndex) -> SavestateResult<()> {
        self.get_mut(slot)?.set_valid(false);
        Ok(())
    }

    pub fn invalidate_all(&mut self) {
        for snapshot in &mut self.slots {
            snapshot.set_valid(false);
        }
    }
}
