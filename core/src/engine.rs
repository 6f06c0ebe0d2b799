//! The savestate engine — capture and restore against a host simulation.
//!
//! CAPTURE ORDER (fixed):
//!   1. Actor
//!   2. Camera   (when camera saving is on)
//!   3. Level    (HUD counters, actor health, stage state)
//!   4. Objects  (when object saving is on)
//!
//! RESTORE ORDER is the same. The actor goes first because host camera
//! logic may read actor-relative state while the camera is rewritten.
//!
//! RULES:
//!   - Every precondition is checked before a slot is touched. A rejected
//!     capture or restore leaves the slot exactly as it was.
//!   - Capture builds the snapshot off to the side and commits it in one
//!     step once it is finalized.
//!   - Restore only reads the slot. The one exception is a checksum
//!     mismatch, which invalidates the slot so it cannot be retried.

use crate::{
    checksum,
    config::SavestateSettings,
    error::{Precondition, SavestateError, SavestateResult},
    host::{AudioCue, SimulationHandle, StageKind},
    matcher::{self, MatchReport},
    snapshot::{CameraRecord, LevelRecord, Snapshot},
    store::{SnapshotStore, MAX_SAVESTATES, SLOT_SINGLE},
    types::{Frame, LevelId, Scope, SlotIndex},
};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureReport {
    pub slot:            SlotIndex,
    pub scope:           Scope,
    pub frame:           Frame,
    pub objects_saved:   usize,
    /// Eligible actors left out because the snapshot was full.
    pub objects_dropped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestoreReport {
    pub slot:    SlotIndex,
    pub scope:   Scope,
    /// `None` when object saving is off.
    pub objects: Option<MatchReport>,
}

/// Debug view of a valid slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotSummary {
    pub slot:        SlotIndex,
    pub scope:       Scope,
    pub frame:       Frame,
    pub actor_pos:   [f32; 3],
    pub action:      u32,
    pub health:      i16,
    pub num_objects: usize,
}

impl fmt::Display for SlotSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Slot {}: {}, Frame {}", self.slot, self.scope, self.frame)?;
        writeln!(
            f,
            "Actor Pos: ({:.2}, {:.2}, {:.2})",
            self.actor_pos[0], self.actor_pos[1], self.actor_pos[2]
        )?;
        write!(
            f,
            "Actor Action: 0x{:08X}, Health: {}, Objects: {}",
            self.action, self.health, self.num_objects
        )
    }
}

pub struct SavestateEngine {
    store:    SnapshotStore,
    settings: SavestateSettings,
}

impl Default for SavestateEngine {
    fn default() -> Self { Self::new(SavestateSettings::default()) }
}

impl SavestateEngine {
    pub fn new(settings: SavestateSettings) -> Self {
        Self {
            store: SnapshotStore::new(),
            settings,
        }
    }

    // ── Capture ────────────────────────────────────────────────

    /// Save the host's current state into `slot`, stamped with `now`.
    pub fn capture<H: SimulationHandle + ?Sized>(
        &mut self,
        host: &mut H,
        slot: SlotIndex,
        now: Frame,
    ) -> SavestateResult<CaptureReport> {
        self.store.get(slot)?;

        let actor = *host
            .actor()
            .ok_or(SavestateError::PreconditionUnmet(Precondition::NoActor))?;
        if !actor.is_initialized() {
            return Err(SavestateError::PreconditionUnmet(Precondition::ActorUninitialized));
        }
        let scope = host.scope();
        if !scope.level.is_loaded() {
            return Err(SavestateError::PreconditionUnmet(Precondition::NoLevelLoaded));
        }

        let mut snapshot = Snapshot::empty();
        snapshot.actor = actor;

        if self.settings.save_camera {
            if let Some(camera) = host.camera() {
                snapshot.camera = CameraRecord::capture(camera);
            }
        }

        snapshot.level = capture_level(&*host, scope.level, actor.health);

        let objects_dropped = if self.settings.save_objects {
            matcher::capture_objects(&*host, &mut snapshot)
        } else {
            0
        };

        snapshot.set_valid(true);
        snapshot.set_scope(scope);
        snapshot.frame_count = now;
        snapshot.checksum = checksum::snapshot_checksum(&snapshot);

        let report = CaptureReport {
            slot,
            scope,
            frame: now,
            objects_saved: snapshot.objects().len(),
            objects_dropped,
        };
        self.store.commit(slot, snapshot)?;
        host.play_cue(AudioCue::StateSaved);

        log::debug!(
            "slot={slot} saved in {scope} at frame {now}: {} objects ({} dropped)",
            report.objects_saved,
            report.objects_dropped
        );
        Ok(report)
    }

    // ── Restore ────────────────────────────────────────────────

    /// Write the snapshot in `slot` back into the host.
    pub fn restore<H: SimulationHandle + ?Sized>(
        &mut self,
        host: &mut H,
        slot: SlotIndex,
    ) -> SavestateResult<RestoreReport> {
        let scope = host.scope();
        self.check_loadable(slot, scope)?;
        let snapshot = self.store.get(slot)?;

        if let Some(actor) = host.actor_mut() {
            *actor = snapshot.actor;
            host.actor_restored();
        }

        if self.settings.save_camera && snapshot.camera.is_captured() {
            if let Some(camera) = host.camera_mut() {
                *camera = snapshot.camera.to_state();
            }
        }

        restore_level(host, snapshot);

        let objects = self
            .settings
            .save_objects
            .then(|| matcher::restore_objects(host, snapshot));

        host.play_cue(AudioCue::StateLoaded);

        if let Some(report) = objects {
            log::debug!(
                "slot={slot} loaded in {scope}: {} objects matched, {} unmatched, {} records unused",
                report.matched,
                report.unmatched,
                report.unused
            );
        } else {
            log::debug!("slot={slot} loaded in {scope}");
        }
        Ok(RestoreReport { slot, scope, objects })
    }

    fn check_loadable(&mut self, slot: SlotIndex, current: Scope) -> SavestateResult<()> {
        let snapshot = self.store.get(slot)?;
        if !snapshot.is_valid() {
            return Err(SavestateError::EmptySlot { slot });
        }

        let stored = snapshot.checksum;
        let saved = snapshot.scope();
        if let Err(computed) = checksum::verify(snapshot) {
            self.store.invalidate(slot)?;
            log::warn!(
                "slot={slot} corrupt (stored {stored:#010x}, computed {computed:#010x}); slot invalidated"
            );
            return Err(SavestateError::CorruptSlot { slot, stored, computed });
        }

        if saved != current {
            log::debug!("slot={slot} saved in {saved}, not loadable in {current}");
            return Err(SavestateError::ScopeMismatch { slot, saved, current });
        }
        Ok(())
    }

    // ── Slot management ────────────────────────────────────────

    /// Valid flag set and saved in the host's current scope. The checksum
    /// is only checked by an actual restore.
    pub fn is_valid<H: SimulationHandle + ?Sized>(&self, host: &H, slot: SlotIndex) -> bool {
        self.store.is_valid_in(slot, host.scope())
    }

    pub fn clear(&mut self, slot: SlotIndex) -> SavestateResult<()> {
        self.store.invalidate(slot)
    }

    pub fn clear_all(&mut self) {
        self.store.invalidate_all();
    }

    /// Entering a new level makes every saved state unusable.
    pub fn on_level_enter(&mut self) {
        self.clear_all();
        log::info!("level entered; all savestate slots cleared");
    }

    pub fn slot_level(&self, slot: SlotIndex) -> Option<LevelId> {
        self.store.get(slot).ok().map(|s| LevelId(s.level_num))
    }

    pub fn slot_frame(&self, slot: SlotIndex) -> Option<Frame> {
        self.store.get(slot).ok().map(|s| s.frame_count)
    }

    pub fn slot_summary(&self, slot: SlotIndex) -> Option<SlotSummary> {
        let snapshot = self.store.get(slot).ok().filter(|s| s.is_valid())?;
        Some(SlotSummary {
            slot,
            scope:       snapshot.scope(),
            frame:       snapshot.frame_count,
            actor_pos:   snapshot.actor.pos,
            action:      snapshot.actor.action,
            health:      snapshot.level.health,
            num_objects: snapshot.objects().len(),
        })
    }

    // ── Quick slot and auto-save ───────────────────────────────

    pub fn quick_slot(&self) -> SlotIndex {
        self.settings.quick_slot
    }

    pub fn cycle_quick_slot(&mut self) -> SlotIndex {
        self.settings.quick_slot = (self.settings.quick_slot + 1) % MAX_SAVESTATES;
        self.settings.quick_slot
    }

    pub fn quick_save<H: SimulationHandle + ?Sized>(
        &mut self,
        host: &mut H,
        now: Frame,
    ) -> SavestateResult<CaptureReport> {
        self.capture(host, self.settings.quick_slot, now)
    }

    pub fn quick_load<H: SimulationHandle + ?Sized>(
        &mut self,
        host: &mut H,
    ) -> SavestateResult<RestoreReport> {
        self.restore(host, self.settings.quick_slot)
    }

    /// Capture into the single slot when auto-save is on.
    pub fn auto_save<H: SimulationHandle + ?Sized>(
        &mut self,
        host: &mut H,
        now: Frame,
    ) -> SavestateResult<Option<CaptureReport>> {
        if !self.settings.auto_save {
            return Ok(None);
        }
        let report = self.capture(host, SLOT_SINGLE, now)?;
        log::info!("auto-saved into slot {SLOT_SINGLE} at frame {now}");
        Ok(Some(report))
    }

    /// Hook for the moment a star is collected.
    pub fn on_star_collect<H: SimulationHandle + ?Sized>(
        &mut self,
        host: &mut H,
        now: Frame,
    ) -> SavestateResult<Option<CaptureReport>> {
        self.auto_save(host, now)
    }

    // ── Settings ───────────────────────────────────────────────

    pub fn settings(&self) -> &SavestateSettings {
        &self.settings
    }

    /// Takes effect on the next capture or restore. A slot captured with
    /// camera saving off holds no camera, so restoring it never touches
    /// the live camera.
    pub fn set_save_camera(&mut self, enabled: bool) {
        self.settings.save_camera = enabled;
    }

    /// Takes effect on the next capture or restore. With it off, restore
    /// leaves every live object alone even if the slot holds records.
    pub fn set_save_objects(&mut self, enabled: bool) {
        self.settings.save_objects = enabled;
    }

    pub fn set_auto_save(&mut self, enabled: bool) {
        self.settings.auto_save = enabled;
    }

    pub fn auto_save_enabled(&self) -> bool {
        self.settings.auto_save
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Direct slot access, for diagnostics and corruption tests.
    pub fn store_mut(&mut self) -> &mut SnapshotStore {
        &mut self.store
    }
}

fn capture_level<H: SimulationHandle + ?Sized>(host: &H, level: LevelId, health: i16) -> LevelRecord {
    let hud = host.hud();
    let kind = StageKind::for_level(level);
    let stage = host.stage_state(kind);
    LevelRecord {
        timer:  hud.timer,
        coins:  hud.coins,
        lives:  hud.lives,
        health,
        stage:  if stage.kind() == kind { stage.encode() } else { [0; 4] },
    }
}

fn restore_level<H: SimulationHandle + ?Sized>(host: &mut H, snapshot: &Snapshot) {
    host.set_hud(snapshot.level.hud());
    if let Some(actor) = host.actor_mut() {
        actor.health = snapshot.level.health;
    }
    let stage = snapshot.stage_state();
    if stage.kind() != StageKind::None {
        host.set_stage_state(stage);
    }
}
