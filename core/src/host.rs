//! The host simulation boundary.
//!
//! RULE: The practice layer never owns simulation state. Everything it
//! reads or writes goes through `SimulationHandle`, and nothing obtained
//! from the handle is retained past the call that borrowed it.

use crate::{
    behavior::BehaviorRegistry,
    types::{BehaviorId, LevelId, Scope},
};
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Host action codes referenced by the practice layer.
pub mod actions {
    pub const UNINITIALIZED: u32 = 0x0000_0000;
    pub const IDLE: u32 = 0x0C40_0201;
    pub const WALKING: u32 = 0x0400_0440;
    pub const JUMP: u32 = 0x0300_0880;
    pub const WALL_KICK_AIR: u32 = 0x0300_08B0;
}

/// The controllable character's simulation state.
///
/// Stored verbatim inside a snapshot slot, so the layout is fixed and
/// padding-free.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct ActorState {
    pub pos:          [f32; 3],
    pub vel:          [f32; 3],
    pub forward_vel:  f32,
    pub face_angle:   [i16; 3],
    pub health:       i16,
    pub action:       u32,
    pub action_state: u16,
    pub action_timer: u16,
    pub action_arg:   u32,
    pub flags:        u32,
}

impl ActorState {
    pub fn is_initialized(&self) -> bool {
        self.action != actions::UNINITIALIZED
    }

    /// Horizontal speed, as shown by the speed display.
    pub fn horizontal_speed(&self) -> f32 {
        self.vel[0].hypot(self.vel[2])
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub pos:   [f32; 3],
    pub focus: [f32; 3],
    pub yaw:   i16,
    pub pitch: i16,
    pub mode:  i16,
}

/// Level-wide counters shown on the HUD.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudCounters {
    pub timer: u16,
    pub coins: i16,
    pub lives: i16,
}

/// One entry of a host actor list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveObject {
    pub active:   bool,
    pub behavior: Option<BehaviorId>,
    pub pos:      [f32; 3],
    pub angle:    [i16; 3],
    pub action:   u32,
    pub flags:    u32,
    pub health:   i32,
}

/// Which level-specific state a level carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    None,
    Clock,
    Water,
    Submarine,
    Mist,
}

impl StageKind {
    pub fn for_level(level: LevelId) -> Self {
        match level {
            LevelId::TTC => StageKind::Clock,
            LevelId::WDW => StageKind::Water,
            LevelId::DDD => StageKind::Submarine,
            LevelId::JRB => StageKind::Mist,
            _            => StageKind::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StageState {
    None,
    Clock { setting: u8, frame: u8 },
    Water { height: i16, state: u8 },
    Submarine { position: u8, state: u8 },
    Mist { enabled: bool },
}

impl StageState {
    pub fn kind(&self) -> StageKind {
        match self {
            StageState::None              => StageKind::None,
            StageState::Clock { .. }      => StageKind::Clock,
            StageState::Water { .. }      => StageKind::Water,
            StageState::Submarine { .. }  => StageKind::Submarine,
            StageState::Mist { .. }       => StageKind::Mist,
        }
    }

    /// Pack into the fixed payload stored in a snapshot slot.
    pub fn encode(&self) -> [u8; 4] {
        match *self {
            StageState::None => [0; 4],
            StageState::Clock { setting, frame } => [setting, frame, 0, 0],
            StageState::Water { height, state } => {
                let [lo, hi] = height.to_le_bytes();
                [lo, hi, state, 0]
            }
            StageState::Submarine { position, state } => [position, state, 0, 0],
            StageState::Mist { enabled } => [u8::from(enabled), 0, 0, 0],
        }
    }

    /// Unpack a payload. The kind is not stored; it comes from the level
    /// the snapshot was taken in.
    pub fn decode(kind: StageKind, payload: [u8; 4]) -> Self {
        match kind {
            StageKind::None => StageState::None,
            StageKind::Clock => StageState::Clock { setting: payload[0], frame: payload[1] },
            StageKind::Water => StageState::Water {
                height: i16::from_le_bytes([payload[0], payload[1]]),
                state:  payload[2],
            },
            StageKind::Submarine => StageState::Submarine { position: payload[0], state: payload[1] },
            StageKind::Mist => StageState::Mist { enabled: payload[0] != 0 },
        }
    }
}

/// Audio confirmation cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioCue {
    StateSaved,
    StateLoaded,
}

/// The contract a host simulation fulfils for the practice layer.
pub trait SimulationHandle {
    /// The controllable character, if one is spawned.
    fn actor(&self) -> Option<&ActorState>;
    fn actor_mut(&mut self) -> Option<&mut ActorState>;

    /// Called after the actor has been overwritten by a restore, so the
    /// host can resync anything derived from it (render transform).
    fn actor_restored(&mut self) {}

    fn camera(&self) -> Option<&CameraState>;
    fn camera_mut(&mut self) -> Option<&mut CameraState>;

    /// Current level and area.
    fn scope(&self) -> Scope;

    fn hud(&self) -> HudCounters;
    fn set_hud(&mut self, hud: HudCounters);

    /// Read the stage state of the given kind. Hosts return
    /// `StageState::None` for kinds the current level does not carry.
    fn stage_state(&self, kind: StageKind) -> StageState;
    fn set_stage_state(&mut self, state: StageState);

    fn behaviors(&self) -> &BehaviorRegistry;

    /// Actor lists are walked in index order, each list front to back.
    fn object_list_count(&self) -> usize;
    fn object_list(&self, list: usize) -> &[LiveObject];
    fn object_list_mut(&mut self, list: usize) -> &mut [LiveObject];

    fn play_cue(&mut self, cue: AudioCue);

    fn request_level_reset(&mut self) {}
    fn request_soft_reset(&mut self) {}
}
