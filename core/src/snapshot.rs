//! Snapshot records — the fixed byte image held by one savestate slot.
//!
//! RULE: Every record here is `#[repr(C)]` and padding-free. The integrity
//! checksum runs over the raw bytes of `Snapshot`, so adding, removing or
//! reordering a field changes every checksum. Treat the layout as frozen.

use crate::{
    host::{ActorState, CameraState, HudCounters, LiveObject, StageKind, StageState},
    types::{BehaviorId, Frame, LevelId, Scope},
};
use bytemuck::{Pod, Zeroable};
use std::f32::consts::PI;

/// Object records kept per snapshot. Objects past this are dropped.
pub const MAX_SAVED_OBJECTS: usize = 128;

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct CameraRecord {
    pub pos:       [f32; 3],
    pub focus:     [f32; 3],
    pub yaw:       i16,
    pub pitch:     i16,
    pub mode:      i16,
    /// Nonzero when the camera was saved. A record written with camera
    /// saving off stays all zero and is never restored.
    pub captured:  i16,
}

impl CameraRecord {
    /// Yaw and pitch are derived from the focus→position vector rather
    /// than copied, so they always agree with the saved points.
    pub fn capture(camera: &CameraState) -> Self {
        let (yaw, pitch) = orientation(camera.focus, camera.pos);
        Self {
            pos: camera.pos,
            focus: camera.focus,
            yaw,
            pitch,
            mode: camera.mode,
            captured: 1,
        }
    }

    pub fn is_captured(&self) -> bool {
        self.captured != 0
    }

    pub fn to_state(&self) -> CameraState {
        CameraState {
            pos:   self.pos,
            focus: self.focus,
            yaw:   self.yaw,
            pitch: self.pitch,
            mode:  self.mode,
        }
    }
}

/// Convert radians to host angle units (0x10000 per revolution).
fn angle_units(radians: f32) -> i16 {
    (radians * 32768.0 / PI).round() as i32 as i16
}

/// Yaw and pitch of the vector `from → to`. Yaw 0 faces +Z.
pub fn orientation(from: [f32; 3], to: [f32; 3]) -> (i16, i16) {
    let dx = to[0] - from[0];
    let dy = to[1] - from[1];
    let dz = to[2] - from[2];
    let yaw = angle_units(dx.atan2(dz));
    let pitch = angle_units(dy.atan2(dx.hypot(dz)));
    (yaw, pitch)
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct LevelRecord {
    pub timer:  u16,
    pub coins:  i16,
    pub lives:  i16,
    pub health: i16,
    /// `StageState` payload; its kind follows the snapshot's level.
    pub stage:  [u8; 4],
}

impl LevelRecord {
    pub fn hud(&self) -> HudCounters {
        HudCounters {
            timer: self.timer,
            coins: self.coins,
            lives: self.lives,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct ObjectRecord {
    pub behavior: u32,
    pub pos:      [f32; 3],
    pub angle:    [i16; 3],
    /// Set on capture. Restore tracks consumption on its own copy.
    pub active:   u8,
    pub reserved: u8,
    pub action:   u32,
    pub flags:    u32,
    pub health:   i32,
    pub extra:    [u32; 4],
}

impl ObjectRecord {
    pub fn capture(object: &LiveObject, behavior: BehaviorId) -> Self {
        Self {
            behavior: behavior.0,
            pos:      object.pos,
            angle:    object.angle,
            active:   1,
            reserved: 0,
            action:   object.action,
            flags:    object.flags,
            health:   object.health,
            extra:    [0; 4],
        }
    }

    pub fn behavior(&self) -> BehaviorId {
        BehaviorId(self.behavior)
    }

    /// Write the restorable fields back onto a live object. Flags are
    /// recorded for diagnostics only and are left alone.
    pub fn apply_to(&self, object: &mut LiveObject) {
        object.pos = self.pos;
        object.angle = self.angle;
        object.action = self.action;
        object.health = self.health;
    }
}

/// One slot's complete saved state.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Snapshot {
    pub actor:       ActorState,
    pub camera:      CameraRecord,
    pub level:       LevelRecord,
    pub objects:     [ObjectRecord; MAX_SAVED_OBJECTS],
    pub num_objects: u32,
    pub level_num:   u16,
    pub area_num:    u16,
    pub frame_count: Frame,
    pub is_valid:    u32,
    pub checksum:    u32,
}

impl Snapshot {
    pub fn empty() -> Box<Self> {
        Box::new(Self::zeroed())
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid != 0
    }

    pub fn set_valid(&mut self, valid: bool) {
        self.is_valid = u32::from(valid);
    }

    pub fn scope(&self) -> Scope {
        Scope::new(LevelId(self.level_num), self.area_num)
    }

    pub fn set_scope(&mut self, scope: Scope) {
        self.level_num = scope.level.0;
        self.area_num = scope.area;
    }

    /// Saved object records. A count larger than capacity (only possible
    /// in a corrupted image) is clamped rather than trusted.
    pub fn objects(&self) -> &[ObjectRecord] {
        let count = (self.num_objects as usize).min(MAX_SAVED_OBJECTS);
        &self.objects[..count]
    }

    /// Append a record. Returns false, storing nothing, once full.
    pub fn push_object(&mut self, record: ObjectRecord) -> bool {
        let index = self.num_objects as usize;
        match self.objects.get_mut(index) {
            Some(slot) => {
                *slot = record;
                self.num_objects += 1;
                true
            }
            None => false,
        }
    }

    pub fn is_full(&self) -> bool {
        self.num_objects as usize >= MAX_SAVED_OBJECTS
    }

    pub fn stage_state(&self) -> StageState {
        StageState::decode(StageKind::for_level(LevelId(self.level_num)), self.level.stage)
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    /// Raw image access for diagnostics and corruption tests.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        bytemuck::bytes_of_mut(self)
    }
}
