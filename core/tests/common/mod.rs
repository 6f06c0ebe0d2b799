#![allow(dead_code)]

use savestate_core::{
    behavior::{BehaviorKind, BehaviorRegistry},
    host::{
        actions, ActorState, AudioCue, CameraState, HudCounters, LiveObject, SimulationHandle,
        StageKind, StageState,
    },
    types::{AreaIndex, BehaviorId, LevelId, Scope},
};

pub const NUM_LISTS: usize = 4;

/// In-memory stand-in for a host simulation.
pub struct MockHost {
    pub actor:        Option<ActorState>,
    pub camera:       Option<CameraState>,
    pub scope:        Scope,
    pub hud:          HudCounters,
    pub stage:        StageState,
    pub registry:     BehaviorRegistry,
    pub lists:        Vec<Vec<LiveObject>>,
    pub cues:         Vec<AudioCue>,
    pub actor_syncs:  u32,
    pub level_resets: u32,
    pub soft_resets:  u32,

    pub player:     BehaviorId,
    pub pivot:      BehaviorId,
    pub decoration: BehaviorId,
    pub goomba:     BehaviorId,
    pub bobomb:     BehaviorId,
}

impl MockHost {
    /// The worked example: actor at (100, 0, 200) jumping with 8 health,
    /// camera above the origin, in WDW area 1.
    pub fn new() -> Self {
        let mut registry = BehaviorRegistry::new();
        let player = registry.register("player", BehaviorKind::Player);
        let pivot = registry.register("camera_pivot", BehaviorKind::CameraPivot);
        let decoration = registry.register("static_tree", BehaviorKind::StaticDecoration);
        let goomba = registry.register("goomba", BehaviorKind::Dynamic);
        let bobomb = registry.register("bobomb", BehaviorKind::Dynamic);

        let mut host = Self {
            actor: Some(ActorState {
                pos:          [100.0, 0.0, 200.0],
                vel:          [3.0, 12.5, -4.0],
                forward_vel:  5.0,
                face_angle:   [0, 0x2000, 0],
                health:       8,
                action:       actions::JUMP,
                action_state: 1,
                action_timer: 7,
                action_arg:   0,
                flags:        0x0000_0011,
            }),
            camera: Some(CameraState {
                pos:   [0.0, 500.0, 0.0],
                focus: [100.0, 0.0, 200.0],
                yaw:   0,
                pitch: 0,
                mode:  1,
            }),
            scope: Scope::new(LevelId::WDW, 1),
            hud: HudCounters { timer: 120, coins: 14, lives: 4 },
            stage: StageState::Water { height: -256, state: 1 },
            registry,
            lists: vec![Vec::new(); NUM_LISTS],
            cues: Vec::new(),
            actor_syncs: 0,
            level_resets: 0,
            soft_resets: 0,
            player,
            pivot,
            decoration,
            goomba,
            bobomb,
        };
        host.spawn(0, player, [100.0, 0.0, 200.0]);
        host.spawn(1, pivot, [0.0, 500.0, 0.0]);
        host
    }

    /// Add an active object; returns its (list, index).
    pub fn spawn(&mut self, list: usize, behavior: BehaviorId, pos: [f32; 3]) -> (usize, usize) {
        self.lists[list].push(LiveObject {
            active: true,
            behavior: Some(behavior),
            pos,
            angle: [0, 0, 0],
            action: 0,
            flags: 0x0001,
            health: 1,
        });
        (list, self.lists[list].len() - 1)
    }

    pub fn object(&self, at: (usize, usize)) -> &LiveObject {
        &self.lists[at.0][at.1]
    }

    pub fn object_mut(&mut self, at: (usize, usize)) -> &mut LiveObject {
        &mut self.lists[at.0][at.1]
    }

    pub fn player_state(&self) -> &ActorState {
        self.actor.as_ref().expect("actor present")
    }

    pub fn player_state_mut(&mut self) -> &mut ActorState {
        self.actor.as_mut().expect("actor present")
    }

    pub fn enter(&mut self, level: LevelId, area: AreaIndex) {
        self.scope = Scope::new(level, area);
    }
}

impl SimulationHandle for MockHost {
    fn actor(&self) -> Option<&ActorState> {
        self.actor.as_ref()
    }

    fn actor_mut(&mut self) -> Option<&mut ActorState> {
        self.actor.as_mut()
    }

    fn actor_restored(&mut self) {
        self.actor_syncs += 1;
    }

    fn camera(&self) -> Option<&CameraState> {
        self.camera.as_ref()
    }

    fn camera_mut(&mut self) -> Option<&mut CameraState> {
        self.camera.as_mut()
    }

    fn scope(&self) -> Scope {
        self.scope
    }

    fn hud(&self) -> HudCounters {
        self.hud
    }

    fn set_hud(&mut self, hud: HudCounters) {
        self.hud = hud;
    }

    fn stage_state(&self, kind: StageKind) -> StageState {
        if self.stage.kind() == kind {
            self.stage
        } else {
            StageState::None
        }
    }

    fn set_stage_state(&mut self, state: StageState) {
        self.stage = state;
    }

    fn behaviors(&self) -> &BehaviorRegistry {
        &self.registry
    }

    fn object_list_count(&self) -> usize {
        self.lists.len()
    }

    fn object_list(&self, list: usize) -> &[LiveObject] {
        &self.lists[list]
    }

    fn object_list_mut(&mut self, list: usize) -> &mut [LiveObject] {
        &mut self.lists[list]
    }

    fn play_cue(&mut self, cue: AudioCue) {
        self.cues.push(cue);
    }

    fn request_level_reset(&mut self) {
        self.level_resets += 1;
    }

    fn request_soft_reset(&mut self) {
        self.soft_resets += 1;
    }
}
